//! Wire schema for the board backend and its mapping into the domain shape.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::message::{Attachment, Column, Message, MessageId};

/// Response body of a `MessagesLoad` request.
#[derive(Debug, Deserialize)]
pub struct MessagesEnvelope {
    #[serde(rename = "Messages", default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    pub id: WireId,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub attachments: Vec<WireAttachment>,
}

#[derive(Debug, Deserialize)]
pub struct WireAttachment {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// The backend emits ids as JSON numbers or strings depending on its age.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Num(i64),
    Text(String),
}

impl WireId {
    pub fn as_i64(&self) -> Option<MessageId> {
        match self {
            WireId::Num(n) => Some(*n),
            WireId::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Parse a backend timestamp.
///
/// The backend emits `"YYYY-MM-DD HH:MM:SS"` without a timezone; treat it as
/// UTC. RFC 3339 values are accepted too. Corrupt values degrade to the epoch
/// with a warning instead of failing the whole batch.
pub fn parse_backend_date(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt message date '{}': {}", raw, e);
            DateTime::default()
        })
}

impl WireMessage {
    /// Map into the domain shape, placed in `column`.
    ///
    /// Returns `None` when the id is not numeric — the high-water mark is an
    /// integer max over ids, so a non-numeric id cannot participate in sync.
    pub fn into_message(self, column: Column) -> Option<Message> {
        let Some(id) = self.id.as_i64() else {
            warn!("Dropping message with non-numeric id {:?}", self.id);
            return None;
        };

        let timestamp = parse_backend_date(&self.date);

        Some(Message {
            id,
            author: self.author,
            text: self.content,
            time: timestamp.format("%H:%M").to_string(),
            date: self.date,
            timestamp,
            attachments: self
                .attachments
                .into_iter()
                .map(|a| Attachment {
                    url: a.url.trim().to_string(),
                    kind: if a.kind.is_empty() { "image".to_string() } else { a.kind },
                })
                .collect(),
            is_favorite: false,
            column,
        })
    }
}

impl MessagesEnvelope {
    /// Map the whole batch; freshly fetched messages land in the center column.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
            .into_iter()
            .filter_map(|m| m.into_message(Column::Center))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_accepts_number_and_string() {
        let env: MessagesEnvelope = serde_json::from_str(
            r#"{"Messages":[
                {"id": 7, "author":"a", "content":"x", "date":"2024-03-01 10:15:00"},
                {"id": "12", "author":"b", "content":"y", "date":"2024-03-01 10:16:00"}
            ]}"#,
        )
        .unwrap();
        let msgs = env.into_messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].id, 7);
        assert_eq!(msgs[1].id, 12);
    }

    #[test]
    fn test_non_numeric_id_is_dropped() {
        let env: MessagesEnvelope = serde_json::from_str(
            r#"{"Messages":[
                {"id": "abc", "author":"a", "content":"x", "date":"2024-03-01 10:15:00"},
                {"id": 1, "author":"b", "content":"y", "date":"2024-03-01 10:16:00"}
            ]}"#,
        )
        .unwrap();
        let msgs = env.into_messages();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].id, 1);
    }

    #[test]
    fn test_missing_messages_key_is_empty() {
        let env: MessagesEnvelope = serde_json::from_str(r#"{}"#).unwrap();
        assert!(env.into_messages().is_empty());
    }

    #[test]
    fn test_attachment_url_trimmed_and_kind_defaults() {
        let env: MessagesEnvelope = serde_json::from_str(
            r#"{"Messages":[{
                "id": 1, "author":"a", "content":"x", "date":"2024-03-01 10:15:00",
                "attachments":[{"url":"  https://x/img.png  "},{"url":"https://x/v.mp4","type":"video"}]
            }]}"#,
        )
        .unwrap();
        let msgs = env.into_messages();
        let atts = &msgs[0].attachments;
        assert_eq!(atts[0].url, "https://x/img.png");
        assert_eq!(atts[0].kind, "image");
        assert_eq!(atts[1].kind, "video");
    }

    #[test]
    fn test_time_derived_from_date() {
        let env: MessagesEnvelope = serde_json::from_str(
            r#"{"Messages":[{"id":1,"author":"a","content":"x","date":"2024-03-01 18:05:09"}]}"#,
        )
        .unwrap();
        let msgs = env.into_messages();
        assert_eq!(msgs[0].time, "18:05");
        assert_eq!(msgs[0].date, "2024-03-01 18:05:09");
    }

    #[test]
    fn test_corrupt_date_degrades_to_epoch() {
        let ts = parse_backend_date("not-a-date");
        assert_eq!(ts, DateTime::<Utc>::default());
    }

    #[test]
    fn test_fresh_messages_land_in_center() {
        let env: MessagesEnvelope = serde_json::from_str(
            r#"{"Messages":[{"id":1,"author":"a","content":"x","date":"2024-03-01 10:00:00"}]}"#,
        )
        .unwrap();
        let msgs = env.into_messages();
        assert_eq!(msgs[0].column, Column::Center);
        assert!(!msgs[0].is_favorite);
    }
}
