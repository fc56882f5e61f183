use serde::{Deserialize, Serialize};

use triptych_types::{Column, MessageFilter, MessageId, SortOrder};

/// Which merge path a completed fetch took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeKind {
    Initial,
    Older,
    Newer,
}

/// Events fanned out to board consumers.
///
/// A consumer recomputes its column projections on any of these; the
/// payloads exist so a finer-grained surface can update incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BoardEvent {
    /// A fetch entered flight; `loading` is now set.
    FetchStarted,

    /// A fetch completed and its batch was merged.
    MessagesMerged { kind: MergeKind, added: usize },

    /// A fetch failed; `last_error` carries the message.
    FetchFailed { error: String },

    /// A message changed columns.
    MessageMoved { id: MessageId, column: Column },

    /// A message's favorite flag flipped.
    FavoriteToggled { id: MessageId, is_favorite: bool },

    /// A message left the canonical collection.
    MessageDeleted { id: MessageId },

    /// The projection sort order changed.
    SortOrderChanged { order: SortOrder },

    /// The projection filter changed.
    FilterChanged { filter: MessageFilter },
}
