use super::{CardStore, Result, StoreError, validate_user_id};
use crate::models::Card;
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local store keyed by user id.
#[derive(Default)]
pub struct InMemoryCardStore {
    cards: Mutex<HashMap<String, Vec<Card>>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CardStore for InMemoryCardStore {
    fn load_all(&self, user_id: &str) -> Result<Vec<Card>> {
        validate_user_id(user_id)?;
        let cards = self.cards.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(cards.get(user_id).cloned().unwrap_or_default())
    }

    fn save_all(&self, user_id: &str, cards: &[Card]) -> Result<()> {
        validate_user_id(user_id)?;
        let mut stored = self.cards.lock().map_err(|_| StoreError::Poisoned)?;
        stored.insert(user_id.to_string(), cards.to_vec());
        log::debug!("Saved {} cards for '{}' in memory", cards.len(), user_id);
        Ok(())
    }
}
