//! Card is a question/answer pair plus its spaced repetition schedule.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub ease_factor: f64,
    pub interval_days: u32,
    /// Day the card becomes eligible for review.
    pub due_date: NaiveDate,
    /// `None` until the first rating is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl Card {
    /// Creates a never-reviewed card that is due on the day of `now`.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::with_due_date(question, answer, now.date_naive())
    }

    pub fn with_due_date(
        question: impl Into<String>,
        answer: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 1,
            due_date,
            last_reviewed: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none()
    }
}

/// Learner's self-assessed recall quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Forgot = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Forgot, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Forgot and Hard send the card back to a one day interval.
    pub fn is_lapse(self) -> bool {
        self.ordinal() < 2
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Forgot => "Forgot",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Forgot),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            other => Err(other),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
