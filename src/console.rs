use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;

use crate::time_entry::TimeEntry;

/// Consoleにtime entryを表示するためのtrait。
pub trait ConsolePresenter {
    /// タイムエントリーを表示する。
    ///
    /// # Arguments
    ///
    /// * `time_entries` - 表示するタイムエントリー
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()>;

    /// チケットごとの作業時間を表示する。
    ///
    /// # Arguments
    ///
    /// * `durations` - チケットと作業時間(時間単位)
    fn show_ticket_durations(&mut self, durations: &BTreeMap<String, f64>) -> Result<()>;
}

/// タイムエントリーをMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // time entryを開始時間順にlist形式で表示する。
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()> {
        let mut sorted_entries = time_entries.to_vec();
        sorted_entries.sort_by_key(|entry| entry.entry_date());

        for entry in sorted_entries {
            writeln!(self.writer, "{}", format_entry(&entry))
                .with_context(|| format!("Failed to write time entry: {:?}", entry))?;
        }

        Ok(())
    }

    fn show_ticket_durations(&mut self, durations: &BTreeMap<String, f64>) -> Result<()> {
        for (ticket, hours) in durations {
            writeln!(self.writer, "- {}: {:.2}", ticket, hours)
                .with_context(|| format!("Failed to write duration of {}", ticket))?;
        }

        Ok(())
    }
}

/// 1件のtime entryを`- HH:MM [TICKET] project: description (H.HHh)`の形式にする。
fn format_entry(entry: &TimeEntry) -> String {
    let start_str = entry
        .entry_date()
        .map(|date| date.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let logged = if entry.is_logged() { " (logged)" } else { "" };

    format!(
        "- {} [{}] {}: {} ({:.2}h){}",
        start_str,
        entry.ticket().unwrap_or("-"),
        entry.project(),
        entry.description(),
        entry.duration(),
        logged
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Local, TimeZone, Utc};
    use rstest::rstest;

    use super::ConsoleMarkdownList;
    use super::ConsolePresenter;
    use crate::time_entry::TimeEntry;

    /// 正常系のテスト。
    #[rstest]
    #[case::no_entry(&[], "")]
    #[case::single(
        &[dummy_entry(1)],
        &expected_output(&dummy_entry(1), "[ABC-1] ABC: entry1 (1.00h) (logged)"),
    )]
    #[case::no_ticket(
        &[dummy_entry(2)],
        &expected_output(&dummy_entry(2), "[-] ABC: entry2 (1.50h)"),
    )]
    #[case::sort_with_entry_date(
        &[dummy_entry(2), dummy_entry(1)],
        &[
            expected_output(&dummy_entry(1), "[ABC-1] ABC: entry1 (1.00h) (logged)"),
            expected_output(&dummy_entry(2), "[-] ABC: entry2 (1.50h)"),
        ].join(""),
    )]
    fn test_show_time_entries(#[case] input: &[TimeEntry], #[case] expected: &str) {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        presenter.show_time_entries(input).unwrap();

        assert_eq!(String::from_utf8(writer).unwrap(), expected);
    }

    #[test]
    fn test_show_time_entries_without_date() {
        let entry = TimeEntry::new(3, "client", "ABC", "entry3");
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        presenter.show_time_entries(&[entry]).unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "- --:-- [-] ABC: entry3 (0.00h)\n"
        );
    }

    #[test]
    fn test_show_ticket_durations() {
        let durations = BTreeMap::from([("B-2".to_string(), 0.5), ("A-1".to_string(), 1.25)]);
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        presenter.show_ticket_durations(&durations).unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "- A-1: 1.25\n- B-2: 0.50\n"
        );
    }

    /// テスト用にダミーのTimeEntryを作成する。
    fn dummy_entry(pattern: u8) -> TimeEntry {
        match pattern {
            1 => {
                let mut entry = TimeEntry::new(1, "client", "ABC", "entry1");
                entry.set_entry_date(Some(Utc.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap()));
                entry.set_duration_time(3_600_000.0);
                entry.process_tags(&["ABC-1", "Jira"]);
                entry
            }
            2 => {
                let mut entry = TimeEntry::new(2, "client", "ABC", "entry2");
                entry.set_entry_date(Some(Utc.with_ymd_and_hms(2021, 1, 1, 3, 0, 0).unwrap()));
                entry.set_duration(1.5);
                entry
            }
            _ => panic!("Invalid pattern: {}", pattern),
        }
    }

    /// テスト用に出力の1 time entryに対する期待値の文字列を作成する。
    fn expected_output(entry: &TimeEntry, rest: &str) -> String {
        let start_str = entry
            .entry_date()
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        format!("- {} {}\n", start_str, rest)
    }
}
