//! The two persisted maps: favorite flags and column assignments, keyed by
//! message id. Missing or corrupt data degrades to an empty map — the board
//! must come up even when local state is damaged.

use std::collections::HashMap;

use anyhow::Result;
use tracing::warn;

use triptych_types::{Column, MessageId};

use crate::Store;

const FAVORITES_KEY: &str = "messageFavorites";
const COLUMNS_KEY: &str = "messageColumns";

impl Store {
    pub fn load_favorites(&self) -> HashMap<MessageId, bool> {
        self.load_map(FAVORITES_KEY)
    }

    pub fn save_favorites(&self, favorites: &HashMap<MessageId, bool>) -> Result<()> {
        self.save_map(FAVORITES_KEY, favorites)
    }

    pub fn load_columns(&self) -> HashMap<MessageId, Column> {
        self.load_map(COLUMNS_KEY)
    }

    pub fn save_columns(&self, columns: &HashMap<MessageId, Column>) -> Result<()> {
        self.save_map(COLUMNS_KEY, columns)
    }

    fn load_map<V>(&self, key: &str) -> HashMap<MessageId, V>
    where
        V: serde::de::DeserializeOwned,
    {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                warn!("Failed to read '{}' from store: {}", key, e);
                return HashMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!("Corrupt '{}' blob, falling back to empty map: {}", key, e);
                HashMap::new()
            }
        }
    }

    fn save_map<V>(&self, key: &str, map: &HashMap<MessageId, V>) -> Result<()>
    where
        V: serde::Serialize,
    {
        let raw = serde_json::to_string(map)?;
        self.set_raw(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_maps_are_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_favorites().is_empty());
        assert!(store.load_columns().is_empty());
    }

    #[test]
    fn test_round_trip_favorites() {
        let store = Store::open_in_memory().unwrap();
        let favorites = HashMap::from([(1, true), (3, false)]);
        store.save_favorites(&favorites).unwrap();
        assert_eq!(store.load_favorites(), favorites);
    }

    #[test]
    fn test_round_trip_columns() {
        let store = Store::open_in_memory().unwrap();
        let columns = HashMap::from([(1, Column::Left), (2, Column::Center)]);
        store.save_columns(&columns).unwrap();
        assert_eq!(store.load_columns(), columns);
    }

    #[test]
    fn test_save_replaces_previous_blob() {
        let store = Store::open_in_memory().unwrap();
        store.save_favorites(&HashMap::from([(1, true)])).unwrap();
        store.save_favorites(&HashMap::from([(2, true)])).unwrap();

        let favorites = store.load_favorites();
        assert!(!favorites.contains_key(&1));
        assert_eq!(favorites.get(&2), Some(&true));
    }

    #[test]
    fn test_corrupt_blob_degrades_to_empty() {
        let store = Store::open_in_memory().unwrap();
        store.set_raw("messageFavorites", "{not json").unwrap();
        assert!(store.load_favorites().is_empty());
    }
}
