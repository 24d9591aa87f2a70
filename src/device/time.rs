//! Conversion of the local wall clock into the representation the device
//! expects: the local calendar/clock fields re-labelled as UTC, so the
//! device shows the sender's local time regardless of its own timezone
//! handling.

use chrono::{DateTime, Duration, Local, Offset, TimeZone, Utc};

/// Minutes the local clock lags UTC: positive when local time is behind
/// UTC, negative when ahead, i.e. the JavaScript `Date.getTimezoneOffset`
/// convention the device firmware expects.
pub fn utc_offset_minutes<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    // Floor on the seconds before negating, so sub-minute offsets (old
    // local-mean-time zones) round consistently.
    -i64::from(now.offset().fix().local_minus_utc()).div_euclid(60)
}

/// Shifts an instant by the negated timezone offset. The result, when
/// serialized as UTC, reads as the local wall-clock time.
pub fn device_timestamp(instant: DateTime<Utc>, offset_minutes: i64) -> DateTime<Utc> {
    instant - Duration::minutes(offset_minutes)
}

/// Reads the clock and offset fresh, so the value is correct even right
/// after a DST transition.
pub fn current_device_timestamp() -> DateTime<Utc> {
    let now = Local::now();
    device_timestamp(now.with_timezone(&Utc), utc_offset_minutes(&now))
}

/// JSON string body for the `/time` endpoint, millisecond precision with a
/// `Z` suffix.
pub fn timestamp_payload(timestamp: DateTime<Utc>) -> String {
    let formatted = timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    serde_json::Value::String(formatted).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn offset_is_negated_minutes_east() {
        // UTC+2: local is two hours ahead, so the offset reads -120.
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 14, 30, 0)
            .unwrap();
        assert_eq!(utc_offset_minutes(&local), -120);

        // UTC-5: local lags by five hours, offset reads +300.
        let local = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 14, 30, 0)
            .unwrap();
        assert_eq!(utc_offset_minutes(&local), 300);
    }

    #[test]
    fn sub_minute_offsets_floor_on_the_seconds() {
        // Amsterdam local mean time was UTC+00:19:32 (1172 seconds).
        let east = FixedOffset::east_opt(1172)
            .unwrap()
            .with_ymd_and_hms(1900, 1, 1, 12, 0, 0)
            .unwrap();
        assert_eq!(utc_offset_minutes(&east), -19);

        let west = FixedOffset::west_opt(1172)
            .unwrap()
            .with_ymd_and_hms(1900, 1, 1, 12, 0, 0)
            .unwrap();
        assert_eq!(utc_offset_minutes(&west), 20);
    }

    #[test]
    fn adjusted_timestamp_preserves_wall_clock_reading() {
        // 14:30 local at UTC+2 is 12:30 UTC; the adjusted value reads
        // 14:30 again once 120 minutes are added back.
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 14, 30, 0)
            .unwrap();
        let adjusted = device_timestamp(local.with_timezone(&Utc), utc_offset_minutes(&local));
        assert_eq!(
            adjusted,
            Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn offset_is_taken_from_the_given_instant() {
        // Same zone, either side of the CET/CEST switch: the computation
        // must follow whatever offset the instant carries.
        let winter = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
            .unwrap();
        let summer = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 15, 9, 0, 0)
            .unwrap();
        assert_eq!(utc_offset_minutes(&winter), -60);
        assert_eq!(utc_offset_minutes(&summer), -120);

        let adjusted_winter =
            device_timestamp(winter.with_timezone(&Utc), utc_offset_minutes(&winter));
        let adjusted_summer =
            device_timestamp(summer.with_timezone(&Utc), utc_offset_minutes(&summer));
        assert_eq!(
            adjusted_winter,
            Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
        );
        assert_eq!(
            adjusted_summer,
            Utc.with_ymd_and_hms(2024, 7, 15, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn payload_is_a_json_string_with_millis_and_z() {
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        assert_eq!(
            timestamp_payload(timestamp),
            "\"2024-06-01T14:30:00.000Z\""
        );
    }
}
