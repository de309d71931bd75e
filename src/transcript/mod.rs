pub mod labels;

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::models::chat::{ ChatMessage, Role };
pub use labels::{ day_label, days_ago, relative_phrase, DayLabel };

pub const PANEL_TEXT_LIMIT: usize = 45;
const PANEL_TEXT_KEEP: usize = 42;
const ELLIPSIS: &str = "...";

/// Shortens `content` for the history panel.
///
/// Anything over 45 characters keeps its first 42 and gains "...", so the
/// result never exceeds 45 and a second pass leaves it untouched.
pub fn truncate_for_panel(content: &str) -> String {
    if content.chars().count() <= PANEL_TEXT_LIMIT {
        return content.to_string();
    }
    let mut short: String = content.chars().take(PANEL_TEXT_KEEP).collect();
    short.push_str(ELLIPSIS);
    short
}

/// One row of the collapsible history panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelEntry {
    /// Position of the message in the full transcript.
    pub index: usize,
    pub message: ChatMessage,
    /// Label drawn above this row, present only where the day bucket changes.
    pub separator: Option<String>,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub message: ChatMessage,
    pub side: Side,
}

pub fn history_panel(messages: &[ChatMessage], now: DateTime<Utc>) -> Vec<PanelEntry> {
    let mut previous: Option<DayLabel> = None;
    let mut entries = Vec::new();

    for (index, message) in messages.iter().enumerate().filter(|(_, m)| m.is_user()) {
        let label = day_label(message.instant(), now);
        let separator = if previous.as_ref() != Some(&label) {
            Some(label.to_string())
        } else {
            None
        };
        entries.push(PanelEntry {
            index,
            message: message.clone(),
            separator,
            text: truncate_for_panel(&message.content),
        });
        previous = Some(label);
    }

    entries
}

pub fn transcript_view(messages: &[ChatMessage]) -> Vec<TranscriptEntry> {
    messages
        .iter()
        .map(|message| TranscriptEntry {
            message: message.clone(),
            side: match message.role {
                Role::User => Side::Left,
                Role::Bot => Side::Right,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{ Duration, TimeZone };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 18, 0, 0).unwrap()
    }

    fn separators(entries: &[PanelEntry]) -> Vec<Option<&str>> {
        entries
            .iter()
            .map(|e| e.separator.as_deref())
            .collect()
    }

    #[test]
    fn same_day_gets_one_separator() {
        let now = now();
        let messages: Vec<ChatMessage> = (0..5)
            .map(|i| ChatMessage::user(format!("q{}", i), now - Duration::hours(5 - i)))
            .collect();
        let panel = history_panel(&messages, now);
        assert_eq!(separators(&panel), vec![Some("Today"), None, None, None, None]);
    }

    #[test]
    fn tier_boundary_gets_a_separator() {
        let now = now();
        let messages = vec![
            ChatMessage::user("older", now - Duration::days(2)),
            ChatMessage::user("newer", now - Duration::days(1))
        ];
        let panel = history_panel(&messages, now);
        assert_eq!(separators(&panel), vec![Some("2 days ago"), Some("Yesterday")]);
    }

    #[test]
    fn bot_messages_are_skipped_but_indexes_kept() {
        let now = now();
        let messages = vec![
            ChatMessage::user("a", now - Duration::days(3)),
            ChatMessage::bot("reply", now - Duration::minutes(1)),
            ChatMessage::user("b", now - Duration::days(3))
        ];
        let panel = history_panel(&messages, now);
        assert_eq!(panel.len(), 2);
        assert_eq!(panel[1].index, 2);
        assert_eq!(separators(&panel), vec![Some("3 days ago"), None]);
    }

    #[test]
    fn malformed_timestamp_counts_as_today() {
        let now = now();
        let mut broken = ChatMessage::user("x", now);
        broken.timestamp = "not a date".to_string();
        let messages = vec![ChatMessage::user("y", now - Duration::minutes(3)), broken];
        let panel = history_panel(&messages, now);
        assert_eq!(separators(&panel), vec![Some("Today"), None]);
    }

    #[test]
    fn panel_is_stable_across_passes() {
        let now = now();
        let messages = vec![
            ChatMessage::user("a", now - Duration::days(40)),
            ChatMessage::user("b", now - Duration::days(2)),
            ChatMessage::user("c", now)
        ];
        assert_eq!(history_panel(&messages, now), history_panel(&messages, now));
    }

    #[test]
    fn truncation_boundary() {
        let exact = "a".repeat(45);
        assert_eq!(truncate_for_panel(&exact), exact);

        let long = "b".repeat(46);
        let short = truncate_for_panel(&long);
        assert_eq!(short, format!("{}...", "b".repeat(42)));
        assert_eq!(truncate_for_panel(&short), short);
    }

    #[test]
    fn truncation_counts_characters() {
        let wide = "é".repeat(46);
        let short = truncate_for_panel(&wide);
        assert_eq!(short.chars().count(), 45);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn transcript_keeps_every_message() {
        let now = now();
        let messages = vec![ChatMessage::user("hi", now), ChatMessage::bot("hello", now)];
        let view = transcript_view(&messages);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].side, Side::Left);
        assert_eq!(view[1].side, Side::Right);
        assert_eq!(view[1].message.content, "hello");
    }
}
