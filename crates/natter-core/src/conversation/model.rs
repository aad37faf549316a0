//! Conversation domain model.

use super::message::Message;
use chrono::{DateTime, Local};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, server-assigned conversation identifier.
///
/// The service may emit identifiers as JSON strings or numbers; either
/// form is accepted and carried as text from then on. The client never
/// interprets or mints identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = ConversationId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a conversation id as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ConversationId(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ConversationId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ConversationId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ConversationId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Sidebar entry: identifier plus display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
}

/// A fully loaded conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub messages: Vec<Message>,
}

/// Title for a newly created conversation, derived from the local
/// date/time, e.g. "Jan 5, 3:45 PM".
pub fn title_for_new_conversation(now: DateTime<Local>) -> String {
    now.format("%b %-d, %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_accepts_json_numbers() {
        let id: ConversationId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn id_accepts_json_strings() {
        let id: ConversationId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn id_serializes_as_string() {
        let json = serde_json::to_string(&ConversationId::from("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn new_conversation_title_matches_locale_shape() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 15, 45, 0).unwrap();
        assert_eq!(title_for_new_conversation(date), "Jan 5, 3:45 PM");
    }

    #[test]
    fn new_conversation_title_morning_hour_is_unpadded() {
        let date = Local.with_ymd_and_hms(2024, 11, 30, 9, 5, 0).unwrap();
        assert_eq!(title_for_new_conversation(date), "Nov 30, 9:05 AM");
    }
}
