//! The shared board handle: one canonical state object, all mutations
//! funneled through named operations, persistence and event fan-out applied
//! on the way.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use triptych_store::Store;
use triptych_types::{Column, Message, MessageFilter, MessageId, SortOrder};

use crate::events::{BoardEvent, MergeKind};
use crate::state::{BoardState, MergeMode};
use crate::view;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared handle over the canonical board state. Cheap to clone; all clones
/// see the same state, store, and event channel.
#[derive(Clone)]
pub struct Board {
    inner: Arc<BoardInner>,
}

struct BoardInner {
    state: Mutex<BoardState>,
    store: Store,
    events: broadcast::Sender<BoardEvent>,
}

impl Board {
    pub fn new(store: Store) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(BoardInner {
                state: Mutex::new(BoardState::default()),
                store,
                events,
            }),
        }
    }

    /// Subscribe to board events. Consumers recompute projections on any
    /// received event.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.inner.events.subscribe()
    }

    fn emit(&self, event: BoardEvent) {
        // No receivers is fine — nobody is watching yet.
        let _ = self.inner.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        // A poisoned lock means a panic mid-mutation; the state itself is
        // still structurally valid, so carry on with it.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current high-water mark, read fresh. The polling driver calls this at
    /// tick time rather than capturing a copy.
    pub fn highest_seen_id(&self) -> MessageId {
        self.lock().highest_seen_id
    }

    /// Clone of the full state, for rendering.
    pub fn snapshot(&self) -> BoardState {
        self.lock().clone()
    }

    /// The display list for one column under the current sort and filter.
    pub fn column_view(&self, column: Column) -> Vec<Message> {
        view::column_view(&self.lock(), column)
    }

    // -- Fetch lifecycle --

    pub fn begin_fetch(&self) {
        {
            let mut state = self.lock();
            state.loading = true;
            state.last_error = None;
        }
        self.emit(BoardEvent::FetchStarted);
    }

    /// Merge a completed fetch. An `Initial` merge seeds the persisted
    /// favorite/column assignments from the store.
    pub fn complete_fetch(&self, kind: MergeKind, batch: Vec<Message>) {
        let mode = match kind {
            MergeKind::Initial => MergeMode::Initial {
                favorites: self.inner.store.load_favorites(),
                columns: self.inner.store.load_columns(),
            },
            MergeKind::Older => MergeMode::Older,
            MergeKind::Newer => MergeMode::Newer,
        };

        let added = {
            let mut state = self.lock();
            state.loading = false;
            state.merge(batch, mode)
        };

        debug!("Merged {:?} batch: {} added", kind, added);
        self.emit(BoardEvent::MessagesMerged { kind, added });
    }

    pub fn fail_fetch(&self, error: String) {
        {
            let mut state = self.lock();
            state.loading = false;
            state.last_error = Some(error.clone());
        }
        self.emit(BoardEvent::FetchFailed { error });
    }

    // -- Mutations --

    /// Move a message to another column and persist every message's current
    /// column assignment. Unknown ids are a logged no-op.
    pub fn move_message(&self, id: MessageId, target: Column) {
        let columns = {
            let mut state = self.lock();
            if !state.move_message(id, target) {
                debug!("move_message: unknown id {}", id);
                return;
            }
            state.columns_map()
        };

        if let Err(e) = self.inner.store.save_columns(&columns) {
            warn!("Failed to persist column assignments: {}", e);
        }
        self.emit(BoardEvent::MessageMoved { id, column: target });
    }

    /// Flip a message's favorite flag and persist the full favorites map.
    /// Unknown ids are a logged no-op.
    pub fn toggle_favorite(&self, id: MessageId) {
        let (is_favorite, favorites) = {
            let mut state = self.lock();
            match state.toggle_favorite(id) {
                Some(flag) => (flag, state.favorites_map()),
                None => {
                    debug!("toggle_favorite: unknown id {}", id);
                    return;
                }
            }
        };

        if let Err(e) = self.inner.store.save_favorites(&favorites) {
            warn!("Failed to persist favorites: {}", e);
        }
        self.emit(BoardEvent::FavoriteToggled { id, is_favorite });
    }

    /// Remove a message and persist the resulting favorites map; the removed
    /// id's entry drops out implicitly. Always succeeds.
    pub fn delete_message(&self, id: MessageId) {
        let favorites = {
            let mut state = self.lock();
            state.delete_message(id);
            state.favorites_map()
        };

        if let Err(e) = self.inner.store.save_favorites(&favorites) {
            warn!("Failed to persist favorites: {}", e);
        }
        self.emit(BoardEvent::MessageDeleted { id });
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.lock().sort_order = order;
        self.emit(BoardEvent::SortOrderChanged { order });
    }

    pub fn set_filter(&self, filter: MessageFilter) {
        self.lock().filter = filter;
        self.emit(BoardEvent::FilterChanged { filter });
    }
}
