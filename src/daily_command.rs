use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::datetime;
use crate::gateway::TimeTrackingGateway;
use crate::time_entry::TimeEntry;

/// 日毎の情報を出力するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct DailyArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date in the format YYYY-MM-DD",
        parse(try_from_str = datetime::parse_date),
    )]
    date: Option<DateTime<Utc>>,
}

pub struct DailyCommand<'a, T: TimeTrackingGateway> {
    gateway: &'a T,
}

impl<'a, T: TimeTrackingGateway> DailyCommand<'a, T> {
    /// 新しい`DailyCommand`を返す。
    ///
    /// # Arguments
    /// * `gateway` - time trackingサービスと通信するためのゲートウェイ
    pub fn new(gateway: &'a T) -> Self {
        Self { gateway }
    }

    /// `daily`サブコマンドの処理を行う。
    ///
    /// Localタイムゾーンで指定された日付の00:00:00から始まる1日のタイムエントリーを取得する。
    /// 日付が指定されていない場合は、Localタイムゾーンで現在の日付を利用する。
    ///
    /// # Arguments
    ///
    /// * `daily` - `daily`サブコマンドの引数
    pub async fn run(&self, daily: DailyArgs) -> Result<Vec<TimeEntry>> {
        let date = daily.date.unwrap_or_else(datetime::now);
        let (start_at, end_at) = datetime::local_day_range(&date)?;
        info!("Start at: {}, End at: {}", start_at, end_at);

        let time_entries = self
            .gateway
            .read_time_entries(&start_at, &end_at)
            .await
            .context("Failed to retrieve time entries")?;
        info!("Time entries retrieved successfully.");

        Ok(time_entries)
    }
}
