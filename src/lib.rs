//! Togglのtime entryをタグからチケット番号とJiraへの記録状況で分類する。

pub mod config;
pub mod console;
pub mod daily_command;
pub mod datetime;
pub mod gateway;
pub mod monthly_command;
pub mod tag;
pub mod tag_command;
pub mod time_entry;
pub mod toggl;
