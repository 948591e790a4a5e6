//! Epoch instants and the calendar conversions the type-conversion layer
//! needs. Everything here is UTC-fixed: day counts, second counts and text
//! forms never consult a time zone.

use crate::decimal::{pow10, Dec};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

pub const MILLIS_PER_DAY: i64 = 86_400_000;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01.
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Widest second count whose millisecond form still fits an i64.
const MAX_SECONDS: i64 = i64::MAX / 1000;
const MIN_SECONDS: i64 = i64::MIN / 1000;

/// An instant: floored seconds since the epoch plus the sub-second
/// nanoseconds in `[0, 1e9)`. The pre-epoch half-second is
/// `{ seconds: -1, nanos: 500_000_000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u32) -> Timestamp {
        debug_assert!(nanos < NANOS_PER_SECOND as u32);
        Timestamp { seconds, nanos }
    }

    pub fn from_millis(millis: i64) -> Timestamp {
        let seconds = millis.div_euclid(1000);
        let sub_millis = millis.rem_euclid(1000);
        Timestamp {
            seconds,
            nanos: (sub_millis * 1_000_000) as u32,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Milliseconds since the epoch, truncating sub-millisecond digits.
    pub fn millis(&self) -> i64 {
        self.seconds * 1000 + (self.nanos / 1_000_000) as i64
    }
}

/// Floor a millisecond count to whole seconds. `-500` millis is second `-1`.
pub fn millis_to_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000)
}

/// Midnight of an epoch day count, in milliseconds.
pub fn days_to_millis(days: i64) -> i64 {
    days * MILLIS_PER_DAY
}

/// Epoch day containing the given second count; floors, so second `-1` is
/// day `-1`.
pub fn time_to_date_days(seconds: i64) -> i64 {
    seconds.div_euclid(SECONDS_PER_DAY)
}

/// Seconds since the epoch as a double, sub-second part in the fraction.
pub fn seconds_as_double(ts: Timestamp) -> f64 {
    ts.seconds() as f64 + ts.nanos() as f64 / NANOS_PER_SECOND as f64
}

/// Seconds-as-double back to an instant: the integer part is truncated
/// toward zero, the fraction is rounded to nanoseconds. Non-finite values
/// and values outside the millisecond domain have no instant.
pub fn double_to_timestamp(value: f64) -> Option<Timestamp> {
    if !value.is_finite() {
        return None;
    }
    if value >= MAX_SECONDS as f64 || value <= MIN_SECONDS as f64 {
        return None;
    }
    let mut seconds = value as i64;
    let mut nanos = ((value - seconds as f64) * NANOS_PER_SECOND as f64).round() as i64;
    if nanos < 0 {
        seconds -= 1;
        nanos += NANOS_PER_SECOND;
    }
    if nanos >= NANOS_PER_SECOND {
        seconds += 1;
        nanos -= NANOS_PER_SECOND;
    }
    Some(Timestamp::new(seconds, nanos as u32))
}

/// Decimal seconds to an instant. Digits beyond nanosecond precision
/// truncate toward zero; seconds outside the millisecond domain have no
/// instant.
pub fn decimal_to_timestamp(value: &Dec) -> Option<Timestamp> {
    let scale = value.scale();
    let total_nanos: i128 = if scale <= 9 {
        value.unscaled().checked_mul(pow10((9 - scale) as usize))?
    } else {
        value.unscaled() / pow10((scale - 9) as usize)
    };
    let seconds = total_nanos.div_euclid(NANOS_PER_SECOND as i128);
    let nanos = total_nanos.rem_euclid(NANOS_PER_SECOND as i128) as u32;
    if seconds > MAX_SECONDS as i128 || seconds < MIN_SECONDS as i128 {
        return None;
    }
    Some(Timestamp::new(seconds as i64, nanos))
}

/// Strict `YYYY-MM-DD` parse to an epoch day count.
pub fn parse_date(text: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(date.num_days_from_ce() as i64 - EPOCH_DAYS_FROM_CE)
}

/// Epoch day count to `YYYY-MM-DD`. `None` for day counts outside the
/// calendar range.
pub fn format_date(days: i64) -> Option<String> {
    let from_ce = days.checked_add(EPOCH_DAYS_FROM_CE)?;
    let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(from_ce).ok()?)?;
    Some(format!("{}", date.format("%Y-%m-%d")))
}

/// Strict `YYYY-MM-DD HH:MM:SS[.f{1,9}]` parse. Rejects surrounding
/// whitespace, time zones, and empty or over-long fractions.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let (main, frac) = match text.find('.') {
        Some(dot) => (&text[..dot], Some(&text[dot + 1..])),
        None => (text, None),
    };
    let datetime = NaiveDateTime::parse_from_str(main, "%Y-%m-%d %H:%M:%S").ok()?;
    let nanos = match frac {
        None => 0u32,
        Some(digits) => {
            if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            let parsed: u32 = digits.parse().ok()?;
            parsed * pow10(9 - digits.len()) as u32
        }
    };
    let utc = datetime.and_utc();
    Some(Timestamp::new(utc.timestamp(), nanos))
}

/// Instant to `YYYY-MM-DD HH:MM:SS.f…`, fraction trimmed of trailing zeros
/// but never empty. `None` for instants outside the calendar range.
pub fn format_timestamp(ts: Timestamp) -> Option<String> {
    let datetime = DateTime::from_timestamp(ts.seconds(), ts.nanos())?;
    let mut out = format!("{}", datetime.naive_utc().format("%Y-%m-%d %H:%M:%S"));
    let mut frac = format!("{:09}", ts.nanos());
    while frac.len() > 1 && frac.ends_with('0') {
        frac.pop();
    }
    out.push('.');
    out.push_str(&frac);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_seconds_floors() {
        assert_eq!(millis_to_seconds(0), 0);
        assert_eq!(millis_to_seconds(999), 0);
        assert_eq!(millis_to_seconds(1000), 1);
        assert_eq!(millis_to_seconds(-1), -1);
        assert_eq!(millis_to_seconds(-500), -1);
        assert_eq!(millis_to_seconds(-1000), -1);
        assert_eq!(millis_to_seconds(-1001), -2);
    }

    #[test]
    fn test_from_millis() {
        let ts = Timestamp::from_millis(-500);
        assert_eq!(ts.seconds(), -1);
        assert_eq!(ts.nanos(), 500_000_000);
        assert_eq!(ts.millis(), -500);

        let ts = Timestamp::from_millis(1500);
        assert_eq!((ts.seconds(), ts.nanos()), (1, 500_000_000));
        assert_eq!(ts.millis(), 1500);
    }

    #[test]
    fn test_time_to_date_days() {
        assert_eq!(time_to_date_days(0), 0);
        assert_eq!(time_to_date_days(1), 0);
        assert_eq!(time_to_date_days(SECONDS_PER_DAY), 1);
        assert_eq!(time_to_date_days(-1), -1);
        assert_eq!(time_to_date_days(-SECONDS_PER_DAY), -1);
        assert_eq!(time_to_date_days(-SECONDS_PER_DAY - 1), -2);
    }

    #[test]
    fn test_seconds_as_double() {
        assert_eq!(seconds_as_double(Timestamp::new(1, 0)), 1.0);
        assert_eq!(seconds_as_double(Timestamp::new(-1, 500_000_000)), -0.5);
        assert_eq!(seconds_as_double(Timestamp::new(0, 250_000_000)), 0.25);
    }

    #[test]
    fn test_double_to_timestamp() {
        assert_eq!(double_to_timestamp(0.0), Some(Timestamp::new(0, 0)));
        assert_eq!(
            double_to_timestamp(1.5),
            Some(Timestamp::new(1, 500_000_000))
        );
        assert_eq!(
            double_to_timestamp(-0.5),
            Some(Timestamp::new(-1, 500_000_000))
        );
        assert_eq!(
            double_to_timestamp(-1.25),
            Some(Timestamp::new(-2, 750_000_000))
        );
        assert_eq!(double_to_timestamp(f64::NAN), None);
        assert_eq!(double_to_timestamp(f64::INFINITY), None);
        assert_eq!(double_to_timestamp(f64::NEG_INFINITY), None);
        assert_eq!(double_to_timestamp(1e19), None);
    }

    #[test]
    fn test_decimal_to_timestamp() {
        let half = Dec::parse("-0.5").unwrap();
        assert_eq!(
            decimal_to_timestamp(&half),
            Some(Timestamp::new(-1, 500_000_000))
        );
        let whole = Dec::parse("12").unwrap();
        assert_eq!(decimal_to_timestamp(&whole), Some(Timestamp::new(12, 0)));
        // Sub-nanosecond digits truncate.
        let fine = Dec::parse("1.0000000019").unwrap();
        assert_eq!(decimal_to_timestamp(&fine), Some(Timestamp::new(1, 1)));
        let huge = Dec::parse("1e30").unwrap();
        assert_eq!(decimal_to_timestamp(&huge), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1970-01-01"), Some(0));
        assert_eq!(parse_date("1970-01-02"), Some(1));
        assert_eq!(parse_date("1969-12-31"), Some(-1));
        assert_eq!(parse_date("2004-02-29"), Some(12477));
        assert_eq!(parse_date("2004-02-30"), None);
        assert_eq!(parse_date(" 1970-01-01"), None);
        assert_eq!(parse_date("1970-01-01 "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0).unwrap(), "1970-01-01");
        assert_eq!(format_date(-1).unwrap(), "1969-12-31");
        assert_eq!(format_date(12477).unwrap(), "2004-02-29");
        assert_eq!(format_date(i64::MAX), None);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("1970-01-01 00:00:01"),
            Some(Timestamp::new(1, 0))
        );
        assert_eq!(
            parse_timestamp("1969-12-31 23:59:59"),
            Some(Timestamp::new(-1, 0))
        );
        assert_eq!(
            parse_timestamp("1970-01-01 00:00:00.5"),
            Some(Timestamp::new(0, 500_000_000))
        );
        assert_eq!(
            parse_timestamp("2020-02-29 12:34:56.123456789"),
            Some(Timestamp::new(1_582_979_696, 123_456_789))
        );
        assert_eq!(parse_timestamp("1970-01-01T00:00:00"), None);
        assert_eq!(parse_timestamp("1970-01-01 00:00:00."), None);
        assert_eq!(parse_timestamp("1970-01-01 00:00:00.1234567891"), None);
        assert_eq!(parse_timestamp(" 1970-01-01 00:00:00"), None);
        assert_eq!(parse_timestamp("1970-01-01"), None);
        assert_eq!(parse_timestamp("nope"), None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(Timestamp::new(0, 0)).unwrap(),
            "1970-01-01 00:00:00.0"
        );
        assert_eq!(
            format_timestamp(Timestamp::new(1, 500_000_000)).unwrap(),
            "1970-01-01 00:00:01.5"
        );
        assert_eq!(
            format_timestamp(Timestamp::new(-1, 0)).unwrap(),
            "1969-12-31 23:59:59.0"
        );
        assert_eq!(
            format_timestamp(Timestamp::new(0, 123_456_789)).unwrap(),
            "1970-01-01 00:00:00.123456789"
        );
    }

    #[test]
    fn test_parse_format_round_trip() {
        for text in [
            "1970-01-01 00:00:00.0",
            "2024-06-30 23:59:59.999",
            "1900-01-01 12:00:00.000000001",
        ] {
            let ts = parse_timestamp(text).unwrap();
            assert_eq!(format_timestamp(ts).unwrap(), text);
        }
    }
}
