use chrono::{ DateTime, SecondsFormat, Utc };
use serde::{ Deserialize, Deserializer, Serialize };
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One entry of the client-side transcript.
///
/// `timestamp` is kept exactly as it was stored so that old or hand-edited
/// caches still load; use [`ChatMessage::instant`] to read it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: String,
}

/// Accepts any JSON value; anything but a string reads as unparseable.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
    where D: Deserializer<'de>
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => raw,
        _ => String::new(),
    })
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: format_timestamp(at),
        }
    }

    pub fn user(content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(Role::User, content, at)
    }

    pub fn bot(content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(Role::Bot, content, at)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Parsed creation instant, `None` when the stored value is missing or malformed.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.timestamp.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A question/answer pair in the server-side log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredExchange {
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub created_at: String,
}
