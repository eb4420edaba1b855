//! Working-day slot grid.
//!
//! The shop opens at 08:00 and the last bookable slot starts at 17:30. Slots
//! are 30 minutes long, which yields twenty slots per day. Everything here is
//! pure so availability and booking checks can be unit tested without I/O.

use chrono::{NaiveTime, Timelike};

/// First bookable hour (inclusive).
pub const OPENING_HOUR: u32 = 8;
/// Closing hour (exclusive).
pub const CLOSING_HOUR: u32 = 18;
/// Length of a slot in minutes.
pub const SLOT_MINUTES: u32 = 30;
/// Number of slots in a working day.
pub const SLOTS_PER_DAY: usize = 20;

/// Every bookable start time of a working day, in ascending order.
///
/// # Examples
/// ```
/// use clickbeard::domain::schedule::{all_slots, SLOTS_PER_DAY};
///
/// let slots = all_slots();
/// assert_eq!(slots.len(), SLOTS_PER_DAY);
/// assert_eq!(slots[0].to_string(), "08:00:00");
/// assert_eq!(slots[SLOTS_PER_DAY - 1].to_string(), "17:30:00");
/// ```
#[must_use]
pub fn all_slots() -> Vec<NaiveTime> {
    (OPENING_HOUR..CLOSING_HOUR)
        .flat_map(|hour| {
            (0..60)
                .step_by(SLOT_MINUTES as usize)
                .filter_map(move |minute| NaiveTime::from_hms_opt(hour, minute, 0))
        })
        .collect()
}

/// Remove `booked` start times from the day's grid, keeping grid order.
///
/// Booked values outside the grid are ignored.
#[must_use]
pub fn available_slots(booked: &[NaiveTime]) -> Vec<NaiveTime> {
    all_slots()
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect()
}

/// True when the hour of `time` lies in `[OPENING_HOUR, CLOSING_HOUR)`.
#[must_use]
pub fn is_within_working_hours(time: NaiveTime) -> bool {
    (OPENING_HOUR..CLOSING_HOUR).contains(&time.hour())
}

/// True when `time` starts exactly on a slot boundary.
#[must_use]
pub fn is_on_slot_grid(time: NaiveTime) -> bool {
    time.minute() % SLOT_MINUTES == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// Parse a time of day written as `HH:MM` or `HH:MM:SS`.
///
/// # Examples
/// ```
/// use clickbeard::domain::schedule::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("10:30").map(|t| t.to_string()), Some("10:30:00".to_owned()));
/// assert!(parse_time_of_day("25:00").is_none());
/// ```
#[must_use]
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    #[rstest]
    fn grid_runs_from_opening_to_last_half_hour() {
        let slots = all_slots();
        assert_eq!(slots.len(), SLOTS_PER_DAY);
        assert_eq!(slots.first(), Some(&at(8, 0)));
        assert_eq!(slots.last(), Some(&at(17, 30)));
        assert!(slots.windows(2).all(|pair| {
            matches!(pair, [a, b] if (*b - *a).num_minutes() == i64::from(SLOT_MINUTES))
        }));
    }

    #[rstest]
    fn booked_slot_is_removed_and_neighbours_remain() {
        let available = available_slots(&[at(10, 0)]);
        assert_eq!(available.len(), SLOTS_PER_DAY - 1);
        assert!(!available.contains(&at(10, 0)));
        assert!(available.contains(&at(10, 30)));
        assert!(available.contains(&at(9, 30)));
    }

    #[rstest]
    fn fully_booked_day_has_no_availability() {
        assert!(available_slots(&all_slots()).is_empty());
    }

    #[rstest]
    fn off_grid_bookings_do_not_remove_slots() {
        assert_eq!(available_slots(&[at(10, 15)]).len(), SLOTS_PER_DAY);
    }

    #[rstest]
    #[case(at(7, 30), false)]
    #[case(at(7, 59), false)]
    #[case(at(8, 0), true)]
    #[case(at(17, 30), true)]
    #[case(at(17, 59), true)]
    #[case(at(18, 0), false)]
    #[case(at(23, 0), false)]
    fn working_hours_bounds(#[case] time: NaiveTime, #[case] expected: bool) {
        assert_eq!(is_within_working_hours(time), expected);
    }

    #[rstest]
    #[case(at(10, 0), true)]
    #[case(at(10, 30), true)]
    #[case(at(10, 15), false)]
    #[case(NaiveTime::from_hms_opt(10, 0, 5).expect("valid time"), false)]
    fn slot_grid_alignment(#[case] time: NaiveTime, #[case] expected: bool) {
        assert_eq!(is_on_slot_grid(time), expected);
    }

    #[rstest]
    #[case("10:00", Some(at(10, 0)))]
    #[case("10:00:00", Some(at(10, 0)))]
    #[case(" 09:30 ", Some(at(9, 30)))]
    #[case("9h30", None)]
    #[case("", None)]
    fn parses_time_of_day(#[case] raw: &str, #[case] expected: Option<NaiveTime>) {
        assert_eq!(parse_time_of_day(raw), expected);
    }
}
