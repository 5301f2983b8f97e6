//! JSON import/export of card lists.
//! Scheduling fields travel with the cards, so an exported deck can be
//! imported elsewhere without resetting progress.

use crate::models::Card;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exports cards to a JSON file at the specified path.
pub fn export_json_to_path(cards: &[Card], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(cards)?;
    fs::write(path.as_ref(), json_string)?;
    log::info!("Exported {} cards to {:?}", cards.len(), path.as_ref());
    Ok(())
}

/// Imports cards from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: impl AsRef<Path>) -> Result<Vec<Card>, ExportError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let cards: Vec<Card> = serde_json::from_str(&contents)?;

    log::info!("Imported {} cards from {:?}", cards.len(), path.as_ref());
    Ok(cards)
}
