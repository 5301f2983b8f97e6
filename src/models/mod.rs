pub mod card;
pub mod clock;
pub mod random;
pub mod review_session;
pub mod scheduler;

pub use card::{Card, Rating};
pub use clock::{Clock, SimulatedClock, SystemClock};
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use review_session::{ReviewSession, SessionError, SessionResult, SessionState, run_session};
pub use scheduler::{ReviewStats, apply_rating, select_due_cards};
