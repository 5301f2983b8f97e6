pub mod config;
pub mod export;
pub mod models;
pub mod store;

pub use config::Settings;
pub use models::{Card, Rating, ReviewSession, SessionResult};
pub use store::{CardStore, InMemoryCardStore, JsonFileCardStore};
