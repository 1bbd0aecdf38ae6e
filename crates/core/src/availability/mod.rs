//! Interval overlap evaluation and slot availability rendering
//!
//! Everything here is pure: the caller supplies the busy intervals for the
//! day (see [`service::AvailabilityService`]) and these functions derive
//! which slots are bookable and how conflicting slots should be coloured.

pub mod ports;
pub mod service;

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use studiobook_domain::{BusyCategory, BusyInterval, Result, Slot, StudiobookError, TimeInterval};

/// Half-open interval overlap: `[a.start, a.end)` intersects
/// `[b.start, b.end)`. Touching endpoints do not count as a conflict.
pub fn overlaps(candidate: &TimeInterval, busy: &TimeInterval) -> bool {
    candidate.start < busy.end && candidate.end > busy.start
}

/// Category of the first busy interval the candidate window overlaps, in
/// iteration order. First match wins; no attempt is made to resolve
/// multiple overlapping categories.
pub fn classify(candidate: &TimeInterval, busy: &[BusyInterval]) -> Option<BusyCategory> {
    busy.iter().find(|b| overlaps(candidate, &b.interval)).map(|b| b.category)
}

/// Availability of one slot for a given day and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Free,
    Busy(BusyCategory),
}

/// Derive the render status for a slot: free, or busy with the colour of
/// the first conflicting interval. `Unknown` conflicts render as `Rent`,
/// matching the calendar colour fallback.
pub fn slot_status(
    date: NaiveDate,
    slot: &Slot,
    duration_hours: u8,
    busy: &[BusyInterval],
    tz: Tz,
) -> Result<SlotStatus> {
    let candidate = candidate_window(date, slot.start_time(), duration_hours, tz)?;
    Ok(match classify(&candidate, busy) {
        None => SlotStatus::Free,
        Some(BusyCategory::Unknown) => SlotStatus::Busy(BusyCategory::Rent),
        Some(category) => SlotStatus::Busy(category),
    })
}

/// Build the UTC window for a local (date, time, duration) selection.
///
/// The date is treated as a local calendar date in the operating timezone,
/// never UTC-shifted; an off-by-one day here was the original motivation
/// for keeping the conversion in one place.
pub fn candidate_window(
    date: NaiveDate,
    time: NaiveTime,
    duration_hours: u8,
    tz: Tz,
) -> Result<TimeInterval> {
    let start_local = date.and_time(time);
    let end_local = start_local + Duration::hours(i64::from(duration_hours));

    let start = tz
        .from_local_datetime(&start_local)
        .earliest()
        .ok_or_else(|| invalid_local_time(&start_local.to_string()))?;
    let end = tz
        .from_local_datetime(&end_local)
        .earliest()
        .ok_or_else(|| invalid_local_time(&end_local.to_string()))?;

    TimeInterval::new(start.with_timezone(&chrono::Utc), end.with_timezone(&chrono::Utc))
}

/// Build the UTC window covering one local calendar day.
pub fn day_window(date: NaiveDate, tz: Tz) -> Result<TimeInterval> {
    let midnight = NaiveTime::MIN;
    let next = date
        .succ_opt()
        .ok_or_else(|| StudiobookError::InvalidInput(format!("date out of range: {date}")))?;

    let start = tz
        .from_local_datetime(&date.and_time(midnight))
        .earliest()
        .ok_or_else(|| invalid_local_time(&date.to_string()))?;
    let end = tz
        .from_local_datetime(&next.and_time(midnight))
        .earliest()
        .ok_or_else(|| invalid_local_time(&next.to_string()))?;

    TimeInterval::new(start.with_timezone(&chrono::Utc), end.with_timezone(&chrono::Utc))
}

fn invalid_local_time(what: &str) -> StudiobookError {
    StudiobookError::InvalidInput(format!("local time does not exist in timezone: {what}"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use studiobook_domain::constants::DEFAULT_TIMEZONE;

    use super::*;

    fn tz() -> Tz {
        DEFAULT_TIMEZONE.parse().unwrap()
    }

    fn interval(start_h: u32, end_h: u32) -> TimeInterval {
        TimeInterval::new(
            Utc.with_ymd_and_hms(2025, 6, 10, start_h, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, end_h, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn busy(start_h: u32, end_h: u32, category: BusyCategory) -> BusyInterval {
        BusyInterval { interval: interval(start_h, end_h), category, summary: None }
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = interval(10, 12);
        let b = interval(11, 13);
        let c = interval(14, 15);
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        assert_eq!(overlaps(&a, &c), overlaps(&c, &a));
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        let a = interval(10, 12);
        let after = interval(12, 14);
        let before = interval(8, 10);
        assert!(!overlaps(&a, &after));
        assert!(!overlaps(&a, &before));
    }

    #[test]
    fn containment_counts_as_overlap() {
        let outer = interval(9, 15);
        let inner = interval(10, 11);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn classify_returns_first_match_in_iteration_order() {
        let list = vec![
            busy(8, 9, BusyCategory::External),
            busy(10, 12, BusyCategory::Service),
            busy(11, 13, BusyCategory::Rent),
        ];
        // Candidate overlaps both the service and rent intervals; the
        // service one comes first.
        let candidate = interval(11, 12);
        assert_eq!(classify(&candidate, &list), Some(BusyCategory::Service));
        assert_eq!(classify(&interval(14, 16), &list), None);
    }

    #[test]
    fn slot_status_maps_unknown_to_rent() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let slot = Slot { label: "14:00".into(), start_offset_minutes: 14 * 60 };
        // 14:00 local ≈ 11:00 UTC in summer; use a window wide enough to
        // not depend on the offset.
        let all_day = BusyInterval {
            interval: interval(0, 23),
            category: BusyCategory::Unknown,
            summary: None,
        };
        let status = slot_status(date, &slot, 2, &[all_day], tz()).unwrap();
        assert_eq!(status, SlotStatus::Busy(BusyCategory::Rent));
    }

    #[test]
    fn candidate_window_uses_local_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        let window = candidate_window(date, time, 2, tz()).unwrap();
        // Israel is UTC+3 in June.
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 6, 10, 11, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 6, 10, 13, 0, 0).unwrap());
    }

    #[test]
    fn day_window_spans_local_midnights() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let window = day_window(date, tz()).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 6, 9, 21, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 6, 10, 21, 0, 0).unwrap());
    }

    #[test]
    fn late_slot_window_crosses_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let time = NaiveTime::from_hms_opt(23, 45, 0).unwrap();
        let window = candidate_window(date, time, 2, tz()).unwrap();
        assert!(window.end > window.start);
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 6, 10, 22, 45, 0).unwrap());
    }
}
