//! JSON file store.
//!
//! Layout:
//! ```text
//! {base_dir}/
//! └── {user_id}/
//!     └── cards.json   # Array of all cards for the user
//! ```

use super::{CardStore, Result, validate_user_id};
use crate::models::Card;
use std::fs;
use std::path::PathBuf;

pub struct JsonFileCardStore {
    base_dir: PathBuf,
}

impl JsonFileCardStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.base_dir.join(user_id)
    }

    fn cards_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("cards.json")
    }
}

impl CardStore for JsonFileCardStore {
    fn load_all(&self, user_id: &str) -> Result<Vec<Card>> {
        validate_user_id(user_id)?;
        let path = self.cards_path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let cards: Vec<Card> = serde_json::from_str(&content)?;
        log::info!("Loaded {} cards from {:?}", cards.len(), path);
        Ok(cards)
    }

    fn save_all(&self, user_id: &str, cards: &[Card]) -> Result<()> {
        validate_user_id(user_id)?;
        fs::create_dir_all(self.user_dir(user_id))?;

        // Write next to the target and rename so readers never see a partial file
        let path = self.cards_path(user_id);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(cards)?)?;
        fs::rename(&tmp_path, &path)?;

        log::info!("Saved {} cards to {:?}", cards.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedRandom, Rating, apply_rating};
    use crate::store::StoreError;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileCardStore::new(dir.path());

        assert!(store.load_all("local").unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileCardStore::new(dir.path());
        let now = Utc.with_ymd_and_hms(2024, 2, 20, 10, 0, 0).unwrap();

        let fresh = Card::new("hello", "cześć", now);
        let reviewed = apply_rating(
            &Card::new("thank you", "dziękuję", now),
            Rating::Easy,
            now,
            &mut FixedRandom::no_fuzz(),
        );
        let cards = vec![fresh, reviewed];

        store.save_all("local", &cards).unwrap();
        assert!(dir.path().join("local").join("cards.json").exists());
        assert!(!dir.path().join("local").join("cards.json.tmp").exists());

        let loaded = store.load_all("local").unwrap();
        assert_eq!(loaded, cards);
    }

    #[test]
    fn test_invalid_user_id_rejected() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileCardStore::new(dir.path());

        assert!(matches!(
            store.save_all("../escape", &[]),
            Err(StoreError::InvalidUserId(_))
        ));
        assert!(matches!(
            store.load_all(""),
            Err(StoreError::InvalidUserId(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileCardStore::new(dir.path());
        fs::create_dir_all(dir.path().join("local")).unwrap();
        fs::write(dir.path().join("local").join("cards.json"), "{ not json").unwrap();

        assert!(matches!(store.load_all("local"), Err(StoreError::Json(_))));
    }
}
