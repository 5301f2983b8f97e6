//! Time sources. The scheduler only ever receives `now` as an argument;
//! callers get it from a `Clock`.
use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock shifted by whole days, for stepping through review schedules.
#[derive(Default)]
pub struct SimulatedClock {
    base: Option<DateTime<Utc>>,
    offset_days: i64,
}

impl SimulatedClock {
    /// Simulated clock that follows the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated clock pinned at `base`.
    pub fn fixed(base: DateTime<Utc>) -> Self {
        Self {
            base: Some(base),
            offset_days: 0,
        }
    }

    pub fn advance_day(&mut self) {
        self.offset_days += 1;
    }

    pub fn offset_days(&self) -> i64 {
        self.offset_days
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> DateTime<Utc> {
        self.base.unwrap_or_else(Utc::now) + Duration::days(self.offset_days)
    }
}
