//! Pure read-path projections over board state.

use triptych_types::{Column, Message, MessageFilter, SortOrder};

use crate::state::BoardState;

/// The display list for one column: filter by column, order by timestamp per
/// the current sort order, then apply the favorites filter. Pure — callers
/// recompute it whenever the board changes.
pub fn column_view(state: &BoardState, column: Column) -> Vec<Message> {
    let mut view: Vec<Message> = state
        .messages
        .iter()
        .filter(|m| m.column == column)
        .cloned()
        .collect();

    view.sort_by(|a, b| match state.sort_order {
        SortOrder::Newest => b.timestamp.cmp(&a.timestamp),
        SortOrder::Oldest => a.timestamp.cmp(&b.timestamp),
    });

    if state.filter == MessageFilter::Favorite {
        view.retain(|m| m.is_favorite);
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MergeMode;
    use std::collections::HashMap;
    use triptych_types::wire::parse_backend_date;
    use triptych_types::MessageId;

    fn msg(id: MessageId, date: &str) -> Message {
        let timestamp = parse_backend_date(date);
        Message {
            id,
            author: String::new(),
            text: String::new(),
            date: date.to_string(),
            timestamp,
            time: timestamp.format("%H:%M").to_string(),
            attachments: vec![],
            is_favorite: false,
            column: Column::Center,
        }
    }

    fn seeded_state() -> BoardState {
        let mut state = BoardState::default();
        state.merge(
            vec![
                msg(1, "2024-03-01 10:00:00"),
                msg(2, "2024-03-01 11:00:00"),
                msg(3, "2024-03-01 09:00:00"),
            ],
            MergeMode::Initial {
                favorites: HashMap::new(),
                columns: HashMap::new(),
            },
        );
        state
    }

    fn view_ids(state: &BoardState, column: Column) -> Vec<MessageId> {
        column_view(state, column).iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_oldest_first_is_default() {
        let state = seeded_state();
        assert_eq!(view_ids(&state, Column::Center), vec![3, 1, 2]);
    }

    #[test]
    fn test_newest_first() {
        let mut state = seeded_state();
        state.sort_order = SortOrder::Newest;
        assert_eq!(view_ids(&state, Column::Center), vec![2, 1, 3]);
    }

    #[test]
    fn test_filters_by_column() {
        let mut state = seeded_state();
        state.move_message(2, Column::Left);

        assert_eq!(view_ids(&state, Column::Left), vec![2]);
        assert_eq!(view_ids(&state, Column::Center), vec![3, 1]);
        assert!(view_ids(&state, Column::Right).is_empty());
    }

    #[test]
    fn test_favorites_filter() {
        let mut state = seeded_state();
        state.toggle_favorite(2);
        state.filter = MessageFilter::Favorite;

        assert_eq!(view_ids(&state, Column::Center), vec![2]);
    }
}
