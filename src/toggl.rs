use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};

use crate::config::TogglConfig;
use crate::gateway::TimeTrackingGateway;
use crate::time_entry::TimeEntry;

/// Toggl APIのレスポンスをデシリアライズするための構造体。
///
/// `meta=true`を指定した場合のみ`project_name`と`client_name`が含まれる。
#[derive(Debug, Deserialize)]
struct TogglTimeEntry {
    id: i64,
    description: Option<String>,
    project_name: Option<String>,
    client_name: Option<String>,
    task_name: Option<String>,
    start: DateTime<Utc>,
    // 秒単位。実行中のtime entryは負の値になる。
    duration: i64,
    tags: Option<Vec<String>>,
    #[serde(default)]
    billable: bool,
}

impl From<TogglTimeEntry> for TimeEntry {
    fn from(toggl: TogglTimeEntry) -> Self {
        let mut entry = TimeEntry::new(
            toggl.id,
            toggl.client_name.unwrap_or_default(),
            toggl.project_name.unwrap_or_default(),
            toggl.description.unwrap_or_default(),
        );
        if let Some(task) = toggl.task_name {
            entry.set_task(&task);
        }
        entry.set_entry_date(Some(toggl.start));
        entry.set_billable(toggl.billable);
        entry.set_running(toggl.duration < 0);
        entry.set_duration_time((toggl.duration.max(0) * 1000) as f64);
        entry.process_tags(&toggl.tags.unwrap_or_default());
        entry
    }
}

/// Toggl APIでtime entryを更新するためのリクエスト。
#[derive(Debug, Serialize)]
struct TogglTimeEntryUpdate<'a> {
    description: &'a str,
    tags: &'a [String],
    billable: bool,
    // 実行中のtime entryでは送信せず、サーバー側のタイマーを保つ。
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<i64>,
}

impl<'a> From<&'a TimeEntry> for TogglTimeEntryUpdate<'a> {
    fn from(entry: &'a TimeEntry) -> Self {
        Self {
            description: entry.description(),
            tags: entry.tags(),
            billable: entry.is_billable(),
            duration: (!entry.is_running()).then(|| entry.duration_time().round() as i64),
        }
    }
}

/// Toggl APIと通信するためのクライアント。
///
/// # Examples
///
/// ```ignore
/// let client = TogglClient::new(TogglConfig::from_env().unwrap());
/// let time_entries = client.read_time_entries(&start_at, &end_at).await.unwrap();
/// ```
pub struct TogglClient {
    client: Client,
    config: TogglConfig,
}

impl TogglClient {
    /// 新しい`TogglClient`を返す。
    pub fn new(config: TogglConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.config.api_url, path))
            .basic_auth(&self.config.api_token, Some("api_token"))
            .header(CONTENT_TYPE, "application/json")
            .query(&[("meta", "true")])
    }

    /// リクエストを送信し、レスポンスをデシリアライズする。
    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to send request to Toggl API at {}",
                    self.config.api_url
                )
            })?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<T>()
            .await
            .context("Failed to deserialize response")?;

        Ok(response)
    }
}

impl TimeTrackingGateway for TogglClient {
    async fn read_time_entries(
        &self,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        let request = self.get("/me/time_entries").query(&[
            ("start_date", start_at.to_rfc3339()),
            ("end_date", end_at.to_rfc3339()),
        ]);
        let toggl_time_entries: Vec<TogglTimeEntry> = self.send(request).await?;
        info!("length of time entries: {}", toggl_time_entries.len());

        Ok(toggl_time_entries.into_iter().map(TimeEntry::from).collect())
    }

    async fn read_time_entry(&self, id: i64) -> Result<TimeEntry> {
        let request = self.get(&format!("/me/time_entries/{}", id));
        let toggl_time_entry: TogglTimeEntry = self
            .send(request)
            .await
            .with_context(|| format!("Failed to read time entry {}", id))?;

        Ok(toggl_time_entry.into())
    }

    async fn persist_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        let workspace_id = self
            .config
            .workspace_id
            .context("TOGGL_WORKSPACE_ID must be set to save time entries")?;
        let body = TogglTimeEntryUpdate::from(entry);
        debug!("Saving time entry {}: {:?}", entry.id(), body);

        let request = self
            .client
            .put(format!(
                "{}/workspaces/{}/time_entries/{}",
                self.config.api_url,
                workspace_id,
                entry.id()
            ))
            .basic_auth(&self.config.api_token, Some("api_token"))
            .query(&[("meta", "true")])
            .json(&body);
        let toggl_time_entry: TogglTimeEntry = self
            .send(request)
            .await
            .with_context(|| format!("Failed to save time entry {}", entry.id()))?;
        info!("Time entry {} saved.", entry.id());

        Ok(toggl_time_entry.into())
    }
}
