//! Conversion between unix timestamps and OmniFocus (Core Data) timestamps.
//!
//! OmniFocus stores dates as seconds since 2001-01-01T00:00:00Z, while the
//! logbook and its persisted sync time use seconds since 1970-01-01T00:00:00Z.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Seconds between the unix epoch and the Core Data reference date.
pub const CORE_DATA_EPOCH_OFFSET: f64 = 978_307_200.0;

/// Convert a unix timestamp into an OmniFocus timestamp.
#[must_use]
pub fn unix_to_core_data(unix_timestamp: f64) -> f64 {
    unix_timestamp - CORE_DATA_EPOCH_OFFSET
}

/// Convert an OmniFocus timestamp into a unix timestamp.
#[must_use]
pub fn core_data_to_unix(core_data_timestamp: f64) -> f64 {
    core_data_timestamp + CORE_DATA_EPOCH_OFFSET
}

/// Snap a unix timestamp to midnight of the same calendar day in `tz`.
///
/// When midnight is ambiguous the earlier instant wins. When midnight falls in
/// a DST gap, the first local time of that day that exists is used instead.
/// If `unix_timestamp` is out of range for `tz`, it is returned unchanged.
#[must_use]
pub fn start_of_day<Tz: TimeZone>(unix_timestamp: i64, tz: &Tz) -> i64 {
    let Some(instant) = tz.timestamp_opt(unix_timestamp, 0).single() else {
        return unix_timestamp;
    };
    first_valid_local_time(instant.date_naive(), |local| {
        tz.from_local_datetime(local).earliest().map(|dt| dt.timestamp())
    })
    .unwrap_or(unix_timestamp)
}

/// Step through `day` from 00:00 in 15-minute increments and return the first
/// local time that `resolve` maps to an instant.
fn first_valid_local_time(
    day: NaiveDate,
    resolve: impl Fn(&NaiveDateTime) -> Option<i64>,
) -> Option<i64> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    (0..24 * 4)
        .map(|step| midnight + Duration::minutes(step * 15))
        .find_map(|local| resolve(&local))
}

/// [`start_of_day`] in the host's local time zone.
#[must_use]
pub fn start_of_day_local(unix_timestamp: i64) -> i64 {
    start_of_day(unix_timestamp, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    #[test]
    fn test_offset_matches_reference_date() {
        let reference = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let expected = reference.timestamp() as f64;
        assert!((CORE_DATA_EPOCH_OFFSET - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unix_to_core_data() {
        assert!((unix_to_core_data(978_307_300.0) - 100.0).abs() < f64::EPSILON);
        assert!((unix_to_core_data(0.0) + 978_307_200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_core_data_to_unix() {
        assert!((core_data_to_unix(100.0) - 978_307_300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_start_of_day_utc() {
        let noon = Utc.with_ymd_and_hms(2024, 3, 15, 12, 34, 56).unwrap().timestamp();
        let midnight = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap().timestamp();
        assert_eq!(start_of_day(noon, &Utc), midnight);
    }

    #[test]
    fn test_start_of_day_is_idempotent_at_midnight() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap().timestamp();
        assert_eq!(start_of_day(midnight, &Utc), midnight);
    }

    #[test]
    fn test_start_of_day_respects_zone() {
        // 2024-03-15T01:00:00Z is still 2024-03-14 at UTC-05:00.
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 1, 0, 0).unwrap().timestamp();
        let expected = tz.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap().timestamp();
        assert_eq!(start_of_day(instant, &tz), expected);
    }

    #[test]
    fn test_midnight_in_dst_gap_uses_first_valid_time() {
        // A zone that springs forward at midnight: 00:00-00:59 do not exist.
        let day = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let one_am = day.and_hms_opt(1, 0, 0).unwrap();
        let resolved = first_valid_local_time(day, |local| {
            (*local >= one_am).then(|| local.and_utc().timestamp())
        });
        assert_eq!(resolved, Some(one_am.and_utc().timestamp()));
    }

    #[test]
    fn test_day_without_valid_time_resolves_to_none() {
        let day = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        assert_eq!(first_valid_local_time(day, |_| None), None);
    }

    #[test]
    fn test_start_of_day_zero_stays_on_epoch_day() {
        assert_eq!(start_of_day(0, &Utc), 0);
    }

    #[test]
    fn test_start_of_day_local_never_moves_forward() {
        let now = Utc::now().timestamp();
        let snapped = start_of_day_local(now);
        assert!(snapped <= now);
        assert!(now - snapped < 2 * 86_400);
    }

    proptest! {
        #[test]
        fn prop_round_trip_from_unix(t in -(1i64 << 40)..(1i64 << 40)) {
            #[allow(clippy::cast_precision_loss)]
            let t = t as f64;
            prop_assert_eq!(core_data_to_unix(unix_to_core_data(t)), t);
        }

        #[test]
        fn prop_round_trip_from_core_data(t in -(1i64 << 40)..(1i64 << 40)) {
            #[allow(clippy::cast_precision_loss)]
            let t = t as f64;
            prop_assert_eq!(unix_to_core_data(core_data_to_unix(t)), t);
        }

        #[test]
        fn prop_start_of_day_within_one_day(t in 0i64..4_000_000_000) {
            let snapped = start_of_day(t, &Utc);
            prop_assert!(snapped <= t);
            prop_assert!(t - snapped < 86_400);
            prop_assert_eq!(snapped % 86_400, 0);
        }
    }
}
