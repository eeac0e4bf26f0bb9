//! Time-of-day and weekday helpers shared by the interval model, the
//! configuration layer and the wire format.
//!
//! All arithmetic on the scheduling grid is done in whole minutes after
//! midnight; [`NaiveTime`] is only used at the edges (parsing, rendering).

use chrono::{NaiveTime, Timelike, Weekday};

/// Minutes in one day. No interval may cross this bound.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes elapsed since midnight, ignoring seconds.
pub fn minutes_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Build a time-of-day from minutes after midnight.
///
/// Returns `None` for values at or past [`MINUTES_PER_DAY`].
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Shorthand for literal times in tests and defaults.
///
/// # Panics
/// Panics if `hour`/`minute` are out of range.
pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("hour/minute out of range")
}

/// Render a time as `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M").or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
}

/// Position of a weekday in a Monday-first week (Mon = 0 .. Sun = 6).
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

/// Full English weekday name, used in rendered proposals.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serde adapter writing [`NaiveTime`] as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hhmm(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw).map_err(|e| {
            serde::de::Error::custom(format!("invalid time '{}': {}", raw, e))
        })
    }
}

/// Serde adapter for `Vec<NaiveTime>` written as `["HH:MM", ...]`.
pub mod hhmm_list {
    use chrono::NaiveTime;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(times: &[NaiveTime], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(times.len()))?;
        for t in times {
            seq.serialize_element(&super::format_hhmm(*t))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<NaiveTime>, D::Error> {
        let raw = Vec::<String>::deserialize(d)?;
        raw.iter()
            .map(|s| {
                super::parse_hhmm(s).map_err(|e| {
                    serde::de::Error::custom(format!("invalid time '{}': {}", s, e))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_roundtrip() {
        let t = hm(14, 45);
        assert_eq!(minutes_of_day(t), 14 * 60 + 45);
        assert_eq!(time_from_minutes(minutes_of_day(t)), Some(t));
    }

    #[test]
    fn test_time_from_minutes_rejects_midnight_overflow() {
        assert!(time_from_minutes(MINUTES_PER_DAY).is_none());
        assert_eq!(time_from_minutes(MINUTES_PER_DAY - 1), Some(hm(23, 59)));
    }

    #[test]
    fn test_parse_hhmm_accepts_optional_seconds() {
        assert_eq!(parse_hhmm("08:45").unwrap(), hm(8, 45));
        assert_eq!(parse_hhmm(" 17:45:00 ").unwrap(), hm(17, 45));
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("noon").is_err());
    }

    #[test]
    fn test_format_hhmm_pads() {
        assert_eq!(format_hhmm(hm(9, 5)), "09:05");
    }

    #[test]
    fn test_weekday_index_is_monday_first() {
        assert_eq!(weekday_index(Weekday::Mon), 0);
        assert_eq!(weekday_index(Weekday::Fri), 4);
        assert_eq!(weekday_index(Weekday::Sun), 6);
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Tue), "Tuesday");
    }
}
