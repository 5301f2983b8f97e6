//! SM-2 style review scheduler.
//!
//! Ratings map to four ordinal levels (Forgot, Hard, Good, Easy):
//! - Forgot / Hard: the interval resets to one day and the ease factor drops by 0.2
//! - Good / Easy on a new card (or one still at a one day interval): 3 or 4 days
//! - Good / Easy otherwise: the interval is multiplied by the ease factor
//! - A ±10% fuzz spreads cards out so they don't pile up on the same day
//!
//! The ease factor never falls below 1.3 and intervals stay within 1..=365 days.
//! Nothing here reads the system clock or an ambient RNG: `now` and the random
//! source are always passed in.

use super::random::RandomSource;
use super::{Card, Rating};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MIN_INTERVAL_DAYS: u32 = 1;
pub const MAX_INTERVAL_DAYS: u32 = 365;

const LAPSE_EASE_PENALTY: f64 = 0.2;
const FUZZ_SPREAD: f64 = 0.2;

/// Start-of-day (UTC) of an instant.
pub fn start_of_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

pub fn is_due(card: &Card, today: NaiveDate) -> bool {
    card.due_date <= today
}

/// Returns the cards due on or before the day of `today`, oldest due first.
/// Cards sharing a due date keep their input order.
pub fn select_due_cards(cards: &[Card], today: DateTime<Utc>) -> Vec<Card> {
    let today = start_of_day(today);
    let mut due: Vec<Card> = cards
        .iter()
        .filter(|card| is_due(card, today))
        .cloned()
        .collect();
    // sort_by_key is stable
    due.sort_by_key(|card| card.due_date);
    due
}

fn clamp_ease(ease_factor: f64) -> f64 {
    if ease_factor.is_finite() {
        ease_factor.max(MIN_EASE_FACTOR)
    } else {
        MIN_EASE_FACTOR
    }
}

fn clamp_interval(days: u32) -> u32 {
    days.clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
}

fn round_ease(ease_factor: f64) -> f64 {
    (ease_factor * 100.0).round() / 100.0
}

/// Interval the rating would produce before fuzz and clamping.
fn base_interval(card: &Card, rating: Rating) -> u32 {
    if rating.is_lapse() {
        return 1;
    }

    let interval = clamp_interval(card.interval_days);
    if card.is_new() || interval <= 1 {
        match rating {
            Rating::Easy => 4,
            _ => 3,
        }
    } else {
        (interval as f64 * clamp_ease(card.ease_factor)).ceil() as u32
    }
}

fn next_ease(ease_factor: f64, rating: Rating) -> f64 {
    let ease_factor = clamp_ease(ease_factor);
    if rating.is_lapse() {
        return (ease_factor - LAPSE_EASE_PENALTY).max(MIN_EASE_FACTOR);
    }

    // EF' = EF + (0.1 - (3-q) * (0.08 + (3-q) * 0.02))
    let miss = 3.0 - rating.ordinal() as f64;
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

fn fuzz(interval: u32, rng: &mut dyn RandomSource) -> u32 {
    let r = rng.next_f64().clamp(0.0, 1.0);
    let fuzzed = (interval as f64 * (1.0 - FUZZ_SPREAD / 2.0 + r * FUZZ_SPREAD)).round();
    clamp_interval(fuzzed as u32)
}

/// Applies a rating given at `now` and returns the rescheduled card.
/// The input card is left untouched.
pub fn apply_rating(
    card: &Card,
    rating: Rating,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> Card {
    let interval_days = fuzz(base_interval(card, rating), rng);
    let ease_factor = round_ease(next_ease(card.ease_factor, rating));
    let due_date = start_of_day(now + Duration::days(interval_days as i64));

    log::debug!(
        "card {} rated {}: interval {} -> {} days, ease {:.2} -> {:.2}",
        card.id,
        rating,
        card.interval_days,
        interval_days,
        card.ease_factor,
        ease_factor
    );

    Card {
        ease_factor,
        interval_days,
        due_date,
        last_reviewed: Some(now),
        ..card.clone()
    }
}

/// Pre-fuzz intervals for Forgot, Hard, Good and Easy, clamped to the valid range.
/// Used to label rating buttons.
pub fn preview_intervals(card: &Card) -> [u32; 4] {
    Rating::ALL.map(|rating| clamp_interval(base_interval(card, rating)))
}

/// Formats an interval in days as a short label (`3d`, `2w`, `4mo`, `1y`).
pub fn format_interval(days: u32) -> String {
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewStats {
    pub total: usize,
    pub due: usize,
    pub new: usize,
    pub reviewed_today: usize,
}

pub fn review_stats(cards: &[Card], today: DateTime<Utc>) -> ReviewStats {
    let day = start_of_day(today);
    cards.iter().fold(ReviewStats::default(), |mut stats, card| {
        stats.total += 1;
        if is_due(card, day) {
            stats.due += 1;
        }
        match card.last_reviewed {
            None => stats.new += 1,
            Some(at) if start_of_day(at) == day => stats.reviewed_today += 1,
            Some(_) => {}
        }
        stats
    })
}

/// Replaces cards in `all` with their updated versions (matched by id).
/// Updates for ids not present in `all` are appended once each; when an id
/// repeats in `updated`, the last version wins.
pub fn merge_updates(all: &[Card], updated: &[Card]) -> Vec<Card> {
    let mut by_id: HashMap<_, &Card> = updated.iter().map(|card| (card.id, card)).collect();

    let mut merged: Vec<Card> = all
        .iter()
        .map(|card| by_id.remove(&card.id).unwrap_or(card).clone())
        .collect();

    merged.extend(
        updated
            .iter()
            .filter_map(|card| by_id.remove(&card.id))
            .cloned(),
    );
    merged
}
