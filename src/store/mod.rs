//! Card persistence.
//!
//! The scheduler never touches storage; callers load cards through a
//! `CardStore`, run a session and hand the merged result back to `save_all`.
//! Concurrent writers resolve as last-writer-wins.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileCardStore;
pub use memory::InMemoryCardStore;

use crate::models::Card;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("Card store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait CardStore: Send + Sync {
    fn load_all(&self, user_id: &str) -> Result<Vec<Card>>;
    fn save_all(&self, user_id: &str, cards: &[Card]) -> Result<()>;
}

impl<S: CardStore + ?Sized> CardStore for Arc<S> {
    fn load_all(&self, user_id: &str) -> Result<Vec<Card>> {
        (**self).load_all(user_id)
    }

    fn save_all(&self, user_id: &str, cards: &[Card]) -> Result<()> {
        (**self).save_all(user_id, cards)
    }
}

/// User ids double as directory names, so they must be a single path component.
pub(crate) fn validate_user_id(user_id: &str) -> Result<()> {
    let invalid = user_id.is_empty()
        || user_id == "."
        || user_id == ".."
        || user_id.contains(['/', '\\'])
        || user_id.contains('\0');

    if invalid {
        Err(StoreError::InvalidUserId(user_id.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("local").is_ok());
        assert!(validate_user_id("user-42").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("..").is_err());
        assert!(validate_user_id("a/b").is_err());
        assert!(validate_user_id("a\\b").is_err());
    }
}
