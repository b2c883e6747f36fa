use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::datetime;
use crate::gateway::TimeTrackingGateway;
use crate::time_entry::TimeEntry;

/// チケットが設定されていないtime entryの集計キー。
const NO_TICKET: &str = "(no ticket)";

/// `monthly`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct MonthlyArgs {
    #[clap(
        short = 'm',
        long = "month",
        help = "Sets a custom month in the format YYYY-MM",
        parse(try_from_str = datetime::parse_month),
    )]
    month: Option<DateTime<Utc>>,

    #[clap(long = "unlogged", help = "Only sum entries not yet logged in Jira")]
    unlogged: bool,
}

pub struct MonthlyCommand<'a, T: TimeTrackingGateway> {
    gateway: &'a T,
}

impl<'a, T: TimeTrackingGateway> MonthlyCommand<'a, T> {
    /// 新しい`MonthlyCommand`を返す。
    pub fn new(gateway: &'a T) -> Self {
        Self { gateway }
    }

    /// `monthly`サブコマンドの処理を行う。
    ///
    /// Localタイムゾーンで指定された月のtime entryをチケットごとに集計する。
    /// 月が指定されていない場合は、Localタイムゾーンで現在の月を利用する。
    pub async fn run(&self, monthly: MonthlyArgs) -> Result<BTreeMap<String, f64>> {
        let date = monthly.month.unwrap_or_else(datetime::now);
        let (start_at, end_at) = datetime::local_month_range(&date)?;
        info!("Start at: {}, End at: {}", start_at, end_at);

        let time_entries = self
            .gateway
            .read_time_entries(&start_at, &end_at)
            .await
            .context("Failed to retrieve time entries")?;
        info!("Time entries retrieved successfully.");

        Ok(calc_ticket_duration(&time_entries, monthly.unlogged))
    }
}

/// チケットごとの作業時間を時間単位で集計する。
///
/// `unlogged_only`の場合はJiraに記録済みのtime entryを集計対象外とする。
fn calc_ticket_duration(time_entries: &[TimeEntry], unlogged_only: bool) -> BTreeMap<String, f64> {
    time_entries
        .iter()
        .filter(|entry| !(unlogged_only && entry.is_logged()))
        .fold(BTreeMap::new(), |mut accumulate, entry| {
            let key = entry.ticket().unwrap_or(NO_TICKET).to_string();
            *accumulate.entry(key).or_insert(0.0) += entry.duration();
            accumulate
        })
}
