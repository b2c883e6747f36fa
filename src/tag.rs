use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Jiraに記録済みであることを表すタグ。
pub const LOGGED_MARKER: &str = "Jira";

/// チケット番号のパターン。
///
/// タグ全体ではなく部分一致で判定する。
static TICKET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]+-[0-9]+").expect("Failed to compile ticket pattern"));

/// タグの種類。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    /// チケット番号を含むタグ
    Ticket,
    /// Jiraに記録済みであることを表すタグ
    LoggedMarker,
    /// 上記以外のタグ
    Plain,
}

/// タグの分類結果。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// 最後に見つかったチケット番号のタグ
    pub ticket: Option<String>,
    /// `Jira`タグが見つかったかどうか
    pub logged: bool,
    /// 重複を除いたタグ
    pub tags: Vec<String>,
}

/// 1つのタグの種類を判定する。
///
/// チケット番号に一致するタグは`Jira`かどうかを判定しない。
pub fn kind_of(tag: &str) -> TagKind {
    if TICKET_PATTERN.is_match(tag) {
        TagKind::Ticket
    } else if tag == LOGGED_MARKER {
        TagKind::LoggedMarker
    } else {
        TagKind::Plain
    }
}

/// タグの一覧を先頭から順に分類する。
///
/// チケット番号に一致するタグが複数ある場合は、最後のタグを採用する。
///
/// # Arguments
///
/// * `tags` - 分類するタグ
pub fn classify<S: AsRef<str>>(tags: &[S]) -> Classification {
    let classification = tags
        .iter()
        .map(|tag| tag.as_ref())
        .fold(Classification::default(), |mut acc, tag| {
            match kind_of(tag) {
                TagKind::Ticket => acc.ticket = Some(tag.to_string()),
                TagKind::LoggedMarker => acc.logged = true,
                TagKind::Plain => {}
            }
            acc
        });

    Classification {
        tags: unique(tags.iter().map(|tag| tag.as_ref().to_string())),
        ..classification
    }
}

/// タグの重複を取り除く。最初に現れた順序を保つ。
pub fn unique<I: IntoIterator<Item = String>>(tags: I) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
