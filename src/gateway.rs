use anyhow::Result;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::time_entry::TimeEntry;

/// time trackingサービスとtime entryをやり取りするためのtrait。
///
/// 実装と呼び出しはcrate内のみで、futureに`Send`を要求しない。
#[allow(async_fn_in_trait)]
#[cfg_attr(test, automock)]
pub trait TimeTrackingGateway {
    /// 指定された期間のタイムエントリーを取得する。
    ///
    /// # Arguments
    ///
    /// * `start_at` - 取得するタイムエントリーの開始日時
    /// * `end_at` - 取得するタイムエントリーの終了日時
    async fn read_time_entries(
        &self,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>>;

    /// 指定されたIDのタイムエントリーを取得する。
    async fn read_time_entry(&self, id: i64) -> Result<TimeEntry>;

    /// タイムエントリーを保存し、サービスが確定した内容を返す。
    async fn persist_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry>;
}
