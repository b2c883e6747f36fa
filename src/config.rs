use std::env;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "https://api.track.toggl.com/api/v9";

/// Toggl APIに接続するための設定。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TogglConfig {
    pub api_url: String,
    pub api_token: String,
    /// time entryの保存に利用するworkspace
    pub workspace_id: Option<i64>,
}

impl TogglConfig {
    /// 環境変数から設定を読み込む。
    ///
    /// - `TOGGL_API_TOKEN`: 必須
    /// - `TOGGL_WORKSPACE_ID`: 保存時のみ必要
    /// - `TOGGL_API_URL`: 省略時はToggl API v9
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 指定された関数で値を取得して設定を作成する。
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("TOGGL_API_TOKEN").context("TOGGL_API_TOKEN must be set")?;
        let workspace_id = lookup("TOGGL_WORKSPACE_ID")
            .map(|value| {
                value
                    .parse::<i64>()
                    .with_context(|| format!("Invalid TOGGL_WORKSPACE_ID: {}", value))
            })
            .transpose()?;
        let api_url = lookup("TOGGL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_url,
            api_token,
            workspace_id,
        })
    }
}
