use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend message ids are integers; the wire layer normalizes the
/// number-or-string JSON forms into this.
pub type MessageId = i64;

/// Which of the three board columns a message lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    #[default]
    Center,
    Right,
}

/// Display ordering for column views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Newest,
    #[default]
    Oldest,
}

/// Which messages a column view keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFilter {
    #[default]
    All,
    /// Keep only favorited messages.
    Favorite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    /// Attachment media type ("image", "video", ...). Defaults to "image".
    #[serde(rename = "type")]
    pub kind: String,
}

/// A board message as held in the canonical collection.
///
/// `date` is the raw backend timestamp string; `timestamp` is its parsed
/// form used as the sort key, and `time` the derived "HH:MM" display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: String,
    pub text: String,
    pub date: String,
    pub timestamp: DateTime<Utc>,
    pub time: String,
    pub attachments: Vec<Attachment>,
    pub is_favorite: bool,
    pub column: Column,
}
