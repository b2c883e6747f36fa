use anyhow::{Context, Result};
use log::info;

use crate::gateway::TimeTrackingGateway;
use crate::time_entry::{TimeEntry, TimeEntryRecord};

/// time entryにタグを追加するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct TagArgs {
    #[clap(long = "id", help = "ID of the time entry to tag")]
    id: i64,

    #[clap(
        short = 't',
        long = "tag",
        required = true,
        help = "Tag to add, e.g. a ticket like ABC-123 or Jira"
    )]
    tags: Vec<String>,
}

pub struct TagCommand<'a, T: TimeTrackingGateway> {
    gateway: &'a T,
}

impl<'a, T: TimeTrackingGateway> TagCommand<'a, T> {
    /// 新しい`TagCommand`を返す。
    pub fn new(gateway: &'a T) -> Self {
        Self { gateway }
    }

    /// `tag`サブコマンドの処理を行う。
    ///
    /// time entryを取得してタグを追加し、保存した結果を返す。
    pub async fn run(&self, args: TagArgs) -> Result<TimeEntry> {
        let entry = self
            .gateway
            .read_time_entry(args.id)
            .await
            .with_context(|| format!("Failed to retrieve time entry {}", args.id))?;

        let mut record = TimeEntryRecord::from_entry(self.gateway, entry);
        for tag in args.tags {
            record.add_tag(tag);
        }
        info!(
            "Time entry {}: ticket={:?}, logged={}",
            record.id(),
            record.ticket(),
            record.is_logged()
        );

        let saved = record
            .save()
            .await
            .with_context(|| format!("Failed to save time entry {}", args.id))?;

        Ok(saved.into_entry())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::{TagArgs, TagCommand};
    use crate::gateway::MockTimeTrackingGateway;
    use crate::time_entry::TimeEntry;

    fn args(tags: &[&str]) -> TagArgs {
        TagArgs {
            id: 1,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_tag_command() {
        let mut gateway = MockTimeTrackingGateway::new();
        gateway
            .expect_read_time_entry()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| {
                let mut entry = TimeEntry::new(1, "client", "ABC", "entry");
                entry.process_tags(&["meeting"]);
                Ok(entry)
            });
        gateway
            .expect_persist_time_entry()
            .withf(|entry| {
                entry.tags() == ["meeting", "ABC-7", "Jira"]
                    && entry.ticket() == Some("ABC-7")
                    && entry.is_logged()
            })
            .times(1)
            .returning(|entry| Ok(entry.clone()));

        let command = TagCommand::new(&gateway);
        let saved = command.run(args(&["ABC-7", "Jira"])).await.unwrap();

        assert_eq!(saved.ticket(), Some("ABC-7"));
        assert!(saved.is_logged());
    }

    #[tokio::test]
    async fn test_tag_command_read_error() {
        let mut gateway = MockTimeTrackingGateway::new();
        gateway
            .expect_read_time_entry()
            .times(1)
            .returning(|_| Err(anyhow!("not found")));
        gateway.expect_persist_time_entry().never();

        let command = TagCommand::new(&gateway);
        let result = command.run(args(&["Jira"])).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tag_command_save_error() {
        let mut gateway = MockTimeTrackingGateway::new();
        gateway
            .expect_read_time_entry()
            .times(1)
            .returning(|_| Ok(TimeEntry::new(1, "client", "ABC", "entry")));
        gateway
            .expect_persist_time_entry()
            .times(1)
            .returning(|_| Err(anyhow!("conflict")));

        let command = TagCommand::new(&gateway);
        let error = command.run(args(&["Jira"])).await.err().unwrap();

        assert_eq!(error.root_cause().to_string(), "conflict");
    }
}
