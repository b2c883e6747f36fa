use std::ops::{Deref, DerefMut};

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;

use crate::gateway::TimeTrackingGateway;
use crate::tag::{self, Classification};

/// time trackingサービスの1件のタイムエントリー。
///
/// タグからチケット番号とJiraへの記録状況を導出する。
#[derive(Clone, Debug, PartialEq)]
pub struct TimeEntry {
    id: i64,
    client: String,
    project: String,
    description: String,
    entry_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    ticket: Option<String>,
    task: Option<String>,
    logged: bool,
    billable: bool,
    running: bool,
    // 時間単位
    duration: f64,
}

impl TimeEntry {
    /// 新しい`TimeEntry`を返す。
    ///
    /// 引数以外のフィールドは空の値で初期化する。
    ///
    /// # Arguments
    ///
    /// * `id` - time trackingサービスが割り当てたID
    /// * `client` - クライアント名
    /// * `project` - プロジェクト名
    /// * `description` - 作業内容
    pub fn new(
        id: i64,
        client: impl Into<String>,
        project: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            client: client.into(),
            project: project.into(),
            description: description.into(),
            entry_date: None,
            tags: vec![],
            ticket: None,
            task: None,
            logged: false,
            billable: false,
            running: false,
            duration: 0.0,
        }
    }

    /// time trackingサービスが割り当てたIDを返す。
    pub fn id(&self) -> i64 {
        self.id
    }

    /// クライアント名を返す。
    pub fn client(&self) -> &str {
        &self.client
    }

    /// クライアント名を設定する。
    pub fn set_client(&mut self, client: impl Into<String>) {
        self.client = client.into();
    }

    /// プロジェクト名を返す。
    pub fn project(&self) -> &str {
        &self.project
    }

    /// プロジェクト名を設定する。タスクコードは再計算しない。
    pub fn set_project(&mut self, project: impl Into<String>) {
        self.project = project.into();
    }

    /// 作業内容を返す。
    pub fn description(&self) -> &str {
        &self.description
    }

    /// 作業内容を設定する。
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// 作業日時を返す。
    pub fn entry_date(&self) -> Option<DateTime<Utc>> {
        self.entry_date
    }

    /// 作業日時を設定する。
    pub fn set_entry_date(&mut self, entry_date: Option<DateTime<Utc>>) {
        self.entry_date = entry_date;
    }

    /// 重複を除いたタグを返す。
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// タグを置き換える。チケット番号などは再計算しない。
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// チケット番号を返す。
    pub fn ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    /// チケット番号を設定する。
    pub fn set_ticket(&mut self, ticket: impl Into<String>) {
        self.ticket = Some(ticket.into());
    }

    /// `set_task`で導出したタスクコードを返す。
    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }

    /// 社内のタスクコードを設定する。
    ///
    /// `task`から数字と小数点のみを取り出し、プロジェクト名の後ろに連結する。
    /// 数字が含まれない場合はプロジェクト名のみとなる。
    ///
    /// # Examples
    ///
    /// ```
    /// use toggl_tickets::time_entry::TimeEntry;
    ///
    /// let mut entry = TimeEntry::new(1, "client", "ABC", "");
    /// entry.set_task("12-3");
    /// assert_eq!(entry.task(), Some("ABC123"));
    /// ```
    pub fn set_task(&mut self, task: &str) {
        let code: String = task
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        self.task = Some(format!("{}{}", self.project, code));
    }

    /// Jiraに記録済みかどうか。
    pub fn is_logged(&self) -> bool {
        self.logged
    }

    /// Jiraに記録済みかどうかを設定する。
    pub fn set_logged(&mut self, logged: bool) {
        self.logged = logged;
    }

    /// 請求対象かどうか。
    pub fn is_billable(&self) -> bool {
        self.billable
    }

    /// 請求対象かどうかを設定する。
    pub fn set_billable(&mut self, billable: bool) {
        self.billable = billable;
    }

    /// タイマーが実行中かどうか。
    ///
    /// 実行中のtime entryは作業時間が確定していない。
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// タイマーが実行中かどうかを設定する。
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// 作業時間を時間単位で返す。
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// 作業時間を時間単位で設定する。
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    /// ミリ秒単位の作業時間を時間単位に変換して設定する。
    pub fn set_duration_time(&mut self, milliseconds: f64) {
        self.duration = milliseconds / 60.0 / 1000.0 / 60.0;
    }

    /// 作業時間を秒単位で返す。
    ///
    /// `set_duration_time`はミリ秒を受け取るが、こちらは秒を返す。
    pub fn duration_time(&self) -> f64 {
        self.duration * 60.0 * 60.0
    }

    /// タグを追加し、全てのタグを再分類する。
    pub fn add_tag(&mut self, new_tag: impl Into<String>) {
        self.tags.push(new_tag.into());
        let classification = tag::classify(&self.tags);
        self.merge(classification);
    }

    /// タグを分類してチケット番号とJiraへの記録状況を更新する。
    ///
    /// `tags`が空の場合は現在のタグを再分類する。
    /// チケット番号のタグが見つからない場合、チケット番号は変更しない。
    ///
    /// # Arguments
    ///
    /// * `tags` - 追加して分類するタグ
    pub fn process_tags<S: AsRef<str>>(&mut self, tags: &[S]) {
        let classification = if tags.is_empty() {
            tag::classify(&self.tags)
        } else {
            tag::classify(tags)
        };
        self.merge(classification);
    }

    fn merge(&mut self, classification: Classification) {
        if let Some(ticket) = classification.ticket {
            debug!("Ticket {} found in time entry {}", ticket, self.id);
            self.ticket = Some(ticket);
        }
        if classification.logged {
            self.logged = true;
        }
        let tags = std::mem::take(&mut self.tags);
        self.tags = tag::unique(tags.into_iter().chain(classification.tags));
    }
}

/// `TimeTrackingGateway`に紐付いた`TimeEntry`。
///
/// `TimeEntry`の操作は`Deref`で行い、保存だけをゲートウェイに委譲する。
pub struct TimeEntryRecord<'a, G: TimeTrackingGateway> {
    gateway: &'a G,
    entry: TimeEntry,
}

impl<'a, G: TimeTrackingGateway> TimeEntryRecord<'a, G> {
    /// 新しい`TimeEntryRecord`を返す。
    ///
    /// # Arguments
    ///
    /// * `gateway` - 保存に利用するゲートウェイ
    /// * `id` - time trackingサービスが割り当てたID
    /// * `client` - クライアント名
    /// * `project` - プロジェクト名
    /// * `description` - 作業内容
    pub fn new(
        gateway: &'a G,
        id: i64,
        client: impl Into<String>,
        project: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::from_entry(gateway, TimeEntry::new(id, client, project, description))
    }

    /// 取得済みの`TimeEntry`をゲートウェイに紐付ける。
    pub fn from_entry(gateway: &'a G, entry: TimeEntry) -> Self {
        Self { gateway, entry }
    }

    /// ゲートウェイとの紐付けを外して`TimeEntry`を返す。
    pub fn into_entry(self) -> TimeEntry {
        self.entry
    }

    /// ゲートウェイを通してタイムエントリーを保存する。
    ///
    /// ゲートウェイが返したエラーはそのまま返す。
    pub async fn save(&self) -> Result<TimeEntryRecord<'a, G>> {
        let saved = self.gateway.persist_time_entry(&self.entry).await?;

        Ok(Self::from_entry(self.gateway, saved))
    }
}

impl<G: TimeTrackingGateway> Deref for TimeEntryRecord<'_, G> {
    type Target = TimeEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl<G: TimeTrackingGateway> DerefMut for TimeEntryRecord<'_, G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entry
    }
}
