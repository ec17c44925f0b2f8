/// Posting-slot suggestion heuristic
///
/// Brute-force enumeration of 15-minute slots within a day's working hours,
/// filtered against existing calendar events (with a buffer on each side)
/// and scored by a small additive heuristic:
///
/// - time-of-day preference: mid-morning and early-afternoon hours score
///   highest, matching when Australian small-business audiences are active
/// - urgency: slots closer to an approaching due date score higher
/// - round-number bonus: on-the-hour beats half-past beats quarter-hours
///
/// The weights are tuning constants, not a contract; tests assert relative
/// ordering only.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Slot granularity
const SLOT_STEP_MINUTES: i64 = 15;

/// Clearance required on each side of an existing event
const BUFFER_MINUTES: i64 = 15;

/// Weight of the time-of-day preference component
const TIME_OF_DAY_WEIGHT: f64 = 10.0;

/// Weight of the urgency component
const URGENCY_WEIGHT: f64 = 5.0;

/// Bonus for an on-the-hour slot; half-past earns half of this
const ROUND_NUMBER_BONUS: f64 = 2.0;

/// Horizon over which urgency decays to zero
const URGENCY_HORIZON_HOURS: f64 = 72.0;

/// Working-hours window for a day (whole hours, half-open)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkingHours {
    /// First hour slots may start (0-23)
    pub start_hour: u32,

    /// Hour at which slots stop (exclusive, 1-24)
    pub end_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
        }
    }
}

/// An occupied window on the calendar
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BusyWindow {
    /// Window start
    pub starts_at: DateTime<Utc>,

    /// Window end
    pub ends_at: DateTime<Utc>,
}

/// A scored candidate slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuggestedSlot {
    /// When the slot starts
    pub starts_at: DateTime<Utc>,

    /// Heuristic score (higher is better)
    pub score: f64,
}

/// Suggests posting slots for a day, best first
///
/// Enumerates every `SLOT_STEP_MINUTES` slot inside the working hours,
/// drops those within `BUFFER_MINUTES` of a busy window, scores the rest,
/// and returns the top `limit` ordered by score (earlier slot wins ties).
pub fn suggest_slots(
    date: NaiveDate,
    hours: WorkingHours,
    busy: &[BusyWindow],
    due_at: Option<DateTime<Utc>>,
    limit: usize,
) -> Vec<SuggestedSlot> {
    if hours.start_hour >= hours.end_hour || hours.end_hour > 24 {
        return Vec::new();
    }

    let day_start = Utc
        .from_utc_datetime(&date.and_hms_opt(hours.start_hour, 0, 0).expect("valid hour"));
    let total_minutes = i64::from(hours.end_hour - hours.start_hour) * 60;
    let buffer = Duration::minutes(BUFFER_MINUTES);

    let mut slots: Vec<SuggestedSlot> = (0..total_minutes)
        .step_by(SLOT_STEP_MINUTES as usize)
        .map(|offset| day_start + Duration::minutes(offset))
        .filter(|start| !collides(*start, busy, buffer))
        .map(|start| SuggestedSlot {
            starts_at: start,
            score: score_slot(start, due_at),
        })
        .collect();

    slots.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.starts_at.cmp(&b.starts_at))
    });
    slots.truncate(limit);
    slots
}

/// Checks whether a slot start falls inside any buffered busy window
fn collides(start: DateTime<Utc>, busy: &[BusyWindow], buffer: Duration) -> bool {
    let slot_end = start + Duration::minutes(SLOT_STEP_MINUTES);
    busy.iter().any(|window| {
        start < window.ends_at + buffer && slot_end > window.starts_at - buffer
    })
}

/// Additive slot score
fn score_slot(start: DateTime<Utc>, due_at: Option<DateTime<Utc>>) -> f64 {
    time_of_day_preference(start.hour()) * TIME_OF_DAY_WEIGHT
        + urgency(start, due_at) * URGENCY_WEIGHT
        + round_number_bonus(start.minute())
}

/// Preference for the hour of day, 0.0 to 1.0
///
/// Mid-morning peak, smaller early-afternoon shoulder, low edges.
fn time_of_day_preference(hour: u32) -> f64 {
    match hour {
        9..=11 => 1.0,
        13..=15 => 0.8,
        8 | 12 | 16 => 0.6,
        17..=19 => 0.4,
        _ => 0.2,
    }
}

/// Urgency, 0.0 to 1.0, rising as the due date approaches
///
/// Zero with no due date or when the due date is beyond the horizon; slots
/// after the due date are not excluded, just unboosted.
fn urgency(start: DateTime<Utc>, due_at: Option<DateTime<Utc>>) -> f64 {
    let Some(due) = due_at else { return 0.0 };
    let hours_left = (due - start).num_minutes() as f64 / 60.0;
    if hours_left <= 0.0 {
        return 0.0;
    }
    (1.0 - hours_left / URGENCY_HORIZON_HOURS).clamp(0.0, 1.0)
}

/// Bonus for round start times
fn round_number_bonus(minute: u32) -> f64 {
    match minute {
        0 => ROUND_NUMBER_BONUS,
        30 => ROUND_NUMBER_BONUS / 2.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date().and_hms_opt(hour, minute, 0).unwrap())
    }

    #[test]
    fn test_enumerates_within_working_hours() {
        let slots = suggest_slots(date(), WorkingHours::default(), &[], None, usize::MAX);

        // 10 working hours, 4 slots per hour
        assert_eq!(slots.len(), 40);
        for slot in &slots {
            assert!(slot.starts_at >= at(8, 0));
            assert!(slot.starts_at < at(18, 0));
        }
    }

    #[test]
    fn test_invalid_hours_yield_nothing() {
        let hours = WorkingHours {
            start_hour: 18,
            end_hour: 8,
        };
        assert!(suggest_slots(date(), hours, &[], None, 10).is_empty());
    }

    #[test]
    fn test_busy_windows_are_avoided_with_buffer() {
        let busy = [BusyWindow {
            starts_at: at(10, 0),
            ends_at: at(11, 0),
        }];

        let slots = suggest_slots(date(), WorkingHours::default(), &busy, None, usize::MAX);

        for slot in &slots {
            // Nothing inside the event or within the 15-minute buffer
            assert!(
                slot.starts_at + Duration::minutes(SLOT_STEP_MINUTES) <= at(9, 45)
                    || slot.starts_at >= at(11, 15),
                "slot at {} collides",
                slot.starts_at
            );
        }
    }

    #[test]
    fn test_round_hour_outranks_quarter_hour() {
        let slots = suggest_slots(date(), WorkingHours::default(), &[], None, usize::MAX);

        let on_the_hour = slots.iter().find(|s| s.starts_at == at(10, 0)).unwrap();
        let quarter_past = slots.iter().find(|s| s.starts_at == at(10, 15)).unwrap();
        let half_past = slots.iter().find(|s| s.starts_at == at(10, 30)).unwrap();

        assert!(on_the_hour.score > half_past.score);
        assert!(half_past.score > quarter_past.score);
    }

    #[test]
    fn test_morning_peak_outranks_evening() {
        let hours = WorkingHours {
            start_hour: 8,
            end_hour: 20,
        };
        let slots = suggest_slots(date(), hours, &[], None, usize::MAX);

        let morning = slots.iter().find(|s| s.starts_at == at(10, 0)).unwrap();
        let evening = slots.iter().find(|s| s.starts_at == at(19, 0)).unwrap();
        assert!(morning.score > evening.score);
    }

    #[test]
    fn test_approaching_due_date_boosts_score() {
        let due = at(14, 0);
        let slots = suggest_slots(date(), WorkingHours::default(), &[], Some(due), usize::MAX);
        let baseline = suggest_slots(date(), WorkingHours::default(), &[], None, usize::MAX);

        let urgent = slots.iter().find(|s| s.starts_at == at(13, 0)).unwrap();
        let relaxed = baseline.iter().find(|s| s.starts_at == at(13, 0)).unwrap();
        assert!(urgent.score > relaxed.score);
    }

    #[test]
    fn test_limit_and_ordering() {
        let slots = suggest_slots(date(), WorkingHours::default(), &[], None, 5);

        assert_eq!(slots.len(), 5);
        for pair in slots.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
