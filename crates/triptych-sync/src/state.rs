//! The synchronization engine: merging fetched batches into the canonical
//! collection without duplication, and the in-memory mutations over it.

use std::collections::{HashMap, HashSet};

use triptych_types::{Column, Message, MessageFilter, MessageId, SortOrder};

/// How a fetched batch folds into the canonical collection.
#[derive(Debug, Clone)]
pub enum MergeMode {
    /// First load: replace the collection, seeding persisted favorite and
    /// column assignments (column defaults to center when absent).
    Initial {
        favorites: HashMap<MessageId, bool>,
        columns: HashMap<MessageId, Column>,
    },
    /// Backwards page: prepend unseen messages, preserving batch order.
    Older,
    /// Poll result: append unseen messages, preserving batch order.
    Newer,
}

/// Canonical board state. All mutation goes through the methods here (via
/// the `Board` handle); views are derived projections and never stored.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub messages: Vec<Message>,
    /// Largest id ever merged; the poll driver asks for strictly newer.
    pub highest_seen_id: MessageId,
    pub sort_order: SortOrder,
    pub filter: MessageFilter,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl BoardState {
    /// Merge a fetched batch. Returns the number of messages added.
    ///
    /// Guarantees that no two messages with the same id coexist afterwards,
    /// and that `highest_seen_id` never decreases across `Older`/`Newer`
    /// merges. An empty `Older`/`Newer` batch mutates nothing.
    pub fn merge(&mut self, batch: Vec<Message>, mode: MergeMode) -> usize {
        match mode {
            MergeMode::Initial { favorites, columns } => {
                let mut seen = HashSet::new();
                self.messages = batch
                    .into_iter()
                    .filter(|m| seen.insert(m.id))
                    .map(|mut m| {
                        m.is_favorite = favorites.get(&m.id).copied().unwrap_or(false);
                        m.column = columns.get(&m.id).copied().unwrap_or_default();
                        m
                    })
                    .collect();
                self.highest_seen_id = self.messages.iter().map(|m| m.id).max().unwrap_or(0);
                self.messages.len()
            }
            MergeMode::Older | MergeMode::Newer => {
                let mut seen: HashSet<MessageId> =
                    self.messages.iter().map(|m| m.id).collect();
                let fresh: Vec<Message> =
                    batch.into_iter().filter(|m| seen.insert(m.id)).collect();
                if fresh.is_empty() {
                    return 0;
                }

                if let Some(max_id) = fresh.iter().map(|m| m.id).max() {
                    self.highest_seen_id = self.highest_seen_id.max(max_id);
                }

                let added = fresh.len();
                match mode {
                    MergeMode::Older => {
                        self.messages.splice(0..0, fresh);
                    }
                    _ => self.messages.extend(fresh),
                }
                added
            }
        }
    }

    /// Set a message's column. Returns false when the id is unknown.
    pub fn move_message(&mut self, id: MessageId, target: Column) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(msg) => {
                msg.column = target;
                true
            }
            None => false,
        }
    }

    /// Flip a message's favorite flag. Returns the new value, or `None` when
    /// the id is unknown.
    pub fn toggle_favorite(&mut self, id: MessageId) -> Option<bool> {
        let msg = self.messages.iter_mut().find(|m| m.id == id)?;
        msg.is_favorite = !msg.is_favorite;
        Some(msg.is_favorite)
    }

    /// Remove a message. A no-op filter: removing an absent id succeeds.
    pub fn delete_message(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Snapshot of all current favorite flags, keyed by id.
    pub fn favorites_map(&self) -> HashMap<MessageId, bool> {
        self.messages.iter().map(|m| (m.id, m.is_favorite)).collect()
    }

    /// Snapshot of all current column assignments, keyed by id.
    pub fn columns_map(&self) -> HashMap<MessageId, Column> {
        self.messages.iter().map(|m| (m.id, m.column)).collect()
    }
}
