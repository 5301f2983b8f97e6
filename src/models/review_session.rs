//! Review session: walks through due cards one at a time and applies ratings.
//!
//! `NotStarted -> Presenting(0) -> ... -> Presenting(n-1) -> Complete`.
//! A card only advances once it has been rated; there is no going back.

use super::random::RandomSource;
use super::scheduler::apply_rating;
use super::{Card, Rating};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Presenting(usize),
    Complete,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session has not been started")]
    NotStarted,

    #[error("Session is already complete")]
    AlreadyComplete,

    #[error("Session is incomplete: {reviewed} of {total} cards rated")]
    Incomplete { reviewed: usize, total: usize },
}

/// Cards rescheduled during a session, ready to be persisted.
#[derive(Clone, Debug, Default)]
pub struct SessionResult {
    pub updated_cards: Vec<Card>,
    pub ratings: Vec<Rating>,
}

impl SessionResult {
    pub fn count(&self, rating: Rating) -> usize {
        self.ratings.iter().filter(|&&r| r == rating).count()
    }
}

pub struct ReviewSession {
    due_cards: Vec<Card>,
    result: SessionResult,
    state: SessionState,
    pub show_answer: bool,
}

impl ReviewSession {
    /// `due_cards` are presented in the given order, normally the output of
    /// `select_due_cards`.
    pub fn new(due_cards: Vec<Card>) -> Self {
        Self {
            due_cards,
            result: SessionResult::default(),
            state: SessionState::NotStarted,
            show_answer: false,
        }
    }

    pub fn start(&mut self) {
        if self.state == SessionState::NotStarted {
            self.state = if self.due_cards.is_empty() {
                SessionState::Complete
            } else {
                SessionState::Presenting(0)
            };
            log::info!("Review session started with {} cards", self.due_cards.len());
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn current_card(&self) -> Option<&Card> {
        match self.state {
            SessionState::Presenting(i) => self.due_cards.get(i),
            _ => None,
        }
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    /// Rates the current card and moves to the next one.
    /// Returns the rescheduled card.
    pub fn record_rating(
        &mut self,
        rating: Rating,
        now: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Result<&Card, SessionError> {
        let index = match self.state {
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::Complete => return Err(SessionError::AlreadyComplete),
            SessionState::Presenting(i) => i,
        };

        let updated = apply_rating(&self.due_cards[index], rating, now, rng);
        self.result.updated_cards.push(updated);
        self.result.ratings.push(rating);

        self.show_answer = false;
        self.state = if index + 1 < self.due_cards.len() {
            SessionState::Presenting(index + 1)
        } else {
            log::info!("Review session complete ({} cards)", self.due_cards.len());
            SessionState::Complete
        };

        Ok(&self.result.updated_cards[index])
    }

    /// (rated, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.result.updated_cards.len(), self.due_cards.len())
    }

    /// Cards and ratings recorded so far.
    pub fn result(&self) -> &SessionResult {
        &self.result
    }

    pub fn finish(self) -> Result<SessionResult, SessionError> {
        if self.is_completed() {
            Ok(self.result)
        } else {
            let (reviewed, total) = self.progress();
            Err(SessionError::Incomplete { reviewed, total })
        }
    }
}

/// Runs a whole session, asking `rate` for each card in turn.
pub fn run_session<F>(
    due_cards: Vec<Card>,
    mut rate: F,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> SessionResult
where
    F: FnMut(&Card) -> Rating,
{
    let mut session = ReviewSession::new(due_cards);
    session.start();

    while let Some(card) = session.current_card() {
        let rating = rate(card);
        if session.record_rating(rating, now, rng).is_err() {
            break;
        }
    }

    session.result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::random::FixedRandom;
    use crate::models::scheduler::select_due_cards;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
    }

    fn due_cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                Card::with_due_date(
                    format!("q{}", i),
                    format!("a{}", i),
                    now().date_naive() - Duration::days(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn test_state_transitions() {
        let mut session = ReviewSession::new(due_cards(2));
        let mut rng = FixedRandom::no_fuzz();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(
            session.record_rating(Rating::Good, now(), &mut rng).unwrap_err(),
            SessionError::NotStarted
        );

        session.start();
        assert_eq!(session.state(), SessionState::Presenting(0));
        assert_eq!(session.current_card().map(|c| c.question.as_str()), Some("q0"));

        session.toggle_answer();
        let rated = session.record_rating(Rating::Easy, now(), &mut rng).unwrap();
        assert_eq!(rated.interval_days, 4);
        assert!(!session.show_answer);
        assert_eq!(session.state(), SessionState::Presenting(1));

        session.record_rating(Rating::Forgot, now(), &mut rng).unwrap();
        assert!(session.is_completed());
        assert!(session.current_card().is_none());
        assert_eq!(
            session.record_rating(Rating::Good, now(), &mut rng).unwrap_err(),
            SessionError::AlreadyComplete
        );
    }

    #[test]
    fn test_empty_session_completes_on_start() {
        let mut session = ReviewSession::new(Vec::new());
        session.start();
        assert!(session.is_completed());
        assert!(session.finish().unwrap().updated_cards.is_empty());
    }

    #[test]
    fn test_finish_requires_completion() {
        let mut session = ReviewSession::new(due_cards(3));
        session.start();
        session
            .record_rating(Rating::Good, now(), &mut FixedRandom::no_fuzz())
            .unwrap();

        assert_eq!(session.progress(), (1, 3));
        assert_eq!(
            session.finish().unwrap_err(),
            SessionError::Incomplete { reviewed: 1, total: 3 }
        );
    }

    #[test]
    fn test_run_session_rates_every_card_in_order() {
        let cards = due_cards(4);
        let due = select_due_cards(&cards, now());
        let expected: Vec<_> = due.iter().map(|c| c.id).collect();

        let result = run_session(
            due,
            |card| {
                if card.question == "q3" {
                    Rating::Hard
                } else {
                    Rating::Good
                }
            },
            now(),
            &mut FixedRandom::no_fuzz(),
        );

        let ids: Vec<_> = result.updated_cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(result.count(Rating::Good), 3);
        assert_eq!(result.count(Rating::Hard), 1);
        assert!(result.updated_cards.iter().all(|c| c.last_reviewed == Some(now())));
    }
}
