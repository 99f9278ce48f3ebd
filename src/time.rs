//! UTCTime and GeneralizedTime.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, ops};
use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, SubsecRound, TimeZone,
    Timelike, Utc
};
use crate::tag::Tag;
use crate::value::{SchemaError, Value};


//------------ Time ----------------------------------------------------------

/// A point in time as used in certificates.
///
/// Certificates encode points in time either as UTCTime, which has a
/// two-digit year, or GeneralizedTime, which has a four-digit year. This
/// type decodes both. When encoding, the rules of RFC 5280 are followed:
/// times in the years 1950 through 2049 use UTCTime, all others use
/// GeneralizedTime. Both are encoded with second precision in UTC.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time(DateTime<Utc>);

impl Time {
    /// Creates a new time from a chrono date time.
    ///
    /// Only times in the years 0 through 9999 can be encoded. Use
    /// [`is_encodable`][Self::is_encodable] to check.
    pub fn new(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }

    /// Returns the current time.
    ///
    /// The time is truncated to whole seconds since that is all that can
    /// be encoded.
    pub fn now() -> Self {
        Self::new(Utc::now().trunc_subsecs(0))
    }

    /// Creates a time from a UTC date and time.
    ///
    /// Returns `None` if the values do not describe a valid point in time.
    pub fn utc(
        year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single().map(Time)
    }

    /// Returns the time `years` years after this time.
    ///
    /// A 29 February that has no counterpart is moved to 28 February.
    /// Returns `None` if the result is out of range.
    pub fn years_later(self, years: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(years.checked_mul(12)?))
            .map(Time)
    }

    /// Returns whether the time fits the four digit year of GeneralizedTime.
    pub fn is_encodable(self) -> bool {
        (0..=9999).contains(&self.0.year())
    }

    /// Returns the number of non-leap seconds since the Unix epoch.
    pub fn timestamp(self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the underlying chrono date time.
    pub fn to_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

/// # Decoding and Encoding
///
impl Time {
    /// Parses the content of a UTCTime value.
    ///
    /// Two digit years from 50 to 99 are in the twentieth century, those
    /// from 00 to 49 in the twentyfirst. Seconds are optional and the time
    /// zone can be given either as `Z` or as an offset.
    pub fn from_utc_time(content: &[u8]) -> Result<Self, SchemaError> {
        let err = || SchemaError::InvalidValue(Tag::UTC_TIME);
        let mut parser = Parser::new(content);
        let year = parser.digits(2).ok_or_else(err)?;
        let year = if year >= 50 { 1900 + year } else { 2000 + year };
        parser.finish(year as i32, false).ok_or_else(|| xerr!(err()))
    }

    /// Parses the content of a GeneralizedTime value.
    ///
    /// Seconds and fractional seconds are optional. The time zone can be
    /// given either as `Z` or as an offset. Local time without a time zone
    /// is not accepted.
    pub fn from_generalized_time(content: &[u8]) -> Result<Self, SchemaError> {
        let err = || SchemaError::InvalidValue(Tag::GENERALIZED_TIME);
        let mut parser = Parser::new(content);
        let year = parser.digits(4).ok_or_else(err)?;
        parser.finish(year as i32, true).ok_or_else(|| xerr!(err()))
    }

    /// Returns the encoded value for the time.
    ///
    /// This is a UTCTime for the years 1950 to 2049 and a GeneralizedTime
    /// otherwise. The content of the value is only valid if the time
    /// [is encodable][Self::is_encodable].
    pub fn to_value(self) -> Value {
        let year = self.0.year();
        let (tag, content) = if (1950..2050).contains(&year) {
            (
                Tag::UTC_TIME,
                format!(
                    "{:02}{:02}{:02}{:02}{:02}{:02}Z",
                    year % 100, self.0.month(), self.0.day(),
                    self.0.hour(), self.0.minute(), self.0.second()
                )
            )
        }
        else {
            (
                Tag::GENERALIZED_TIME,
                format!(
                    "{:04}{:02}{:02}{:02}{:02}{:02}Z",
                    year, self.0.month(), self.0.day(),
                    self.0.hour(), self.0.minute(), self.0.second()
                )
            )
        };
        Value::primitive(tag, content.into_bytes())
    }
}


//--- From

impl From<DateTime<Utc>> for Time {
    fn from(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }
}

impl From<Time> for DateTime<Utc> {
    fn from(time: Time) -> Self {
        time.0
    }
}


//--- Add and Sub

impl ops::Add<Duration> for Time {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        Time(self.0 + duration)
    }
}

impl ops::Sub<Duration> for Time {
    type Output = Self;

    fn sub(self, duration: Duration) -> Self {
        Time(self.0 - duration)
    }
}


//--- Display

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}


//------------ Parser --------------------------------------------------------

/// Helper for parsing the textual time formats.
struct Parser<'a> {
    data: &'a [u8],
}

impl<'a> Parser<'a> {
    fn new(data: &'a [u8]) -> Self {
        Parser { data }
    }

    /// Takes `count` decimal digits.
    fn digits(&mut self, count: usize) -> Option<u32> {
        if self.data.len() < count {
            return None
        }
        let (head, tail) = self.data.split_at(count);
        let mut res = 0;
        for &ch in head {
            if !ch.is_ascii_digit() {
                return None
            }
            res = res * 10 + u32::from(ch - b'0');
        }
        self.data = tail;
        Some(res)
    }

    /// Returns whether the next octet is a digit.
    fn peek_digit(&self) -> bool {
        self.data.first().map(u8::is_ascii_digit).unwrap_or(false)
    }

    /// Parses everything after the year.
    fn finish(mut self, year: i32, fraction: bool) -> Option<Time> {
        let month = self.digits(2)?;
        let day = self.digits(2)?;
        let hour = self.digits(2)?;
        let minute = self.digits(2)?;
        let second = if self.peek_digit() { self.digits(2)? } else { 0 };
        let mut nanos = 0;
        if fraction {
            if let Some((b'.' | b',', tail)) = self.data.split_first() {
                let len = tail.iter().take_while(|ch| ch.is_ascii_digit())
                    .count();
                if len == 0 {
                    return None
                }
                let (digits, tail) = tail.split_at(len);
                for idx in 0..9 {
                    nanos = nanos * 10 + digits.get(idx).map(|ch| {
                        u32::from(ch - b'0')
                    }).unwrap_or(0);
                }
                self.data = tail;
            }
        }
        let naive = NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_nano_opt(hour, minute, second, nanos)?;
        let offset = match self.data.split_first()? {
            (b'Z', []) => 0,
            (&sign, tail) if sign == b'+' || sign == b'-' => {
                let mut zone = Parser::new(tail);
                let hours = zone.digits(2)?;
                let minutes = zone.digits(2)?;
                if !zone.data.is_empty() || hours > 23 || minutes > 59 {
                    return None
                }
                let offset = i64::from(hours * 60 + minutes);
                if sign == b'+' { offset } else { -offset }
            }
            _ => return None
        };
        let naive = naive.checked_sub_signed(Duration::minutes(offset))?;
        Some(Time(Utc.from_utc_datetime(&naive)))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn utc_time() {
        assert_eq!(
            Time::from_utc_time(b"491231235959Z").unwrap(),
            Time::utc(2049, 12, 31, 23, 59, 59).unwrap()
        );
        assert_eq!(
            Time::from_utc_time(b"500101000000Z").unwrap(),
            Time::utc(1950, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Time::from_utc_time(b"2401021530Z").unwrap(),
            Time::utc(2024, 1, 2, 15, 30, 0).unwrap()
        );
        assert_eq!(
            Time::from_utc_time(b"240102153000+0130").unwrap(),
            Time::utc(2024, 1, 2, 14, 0, 0).unwrap()
        );
        assert!(Time::from_utc_time(b"240102153000").is_err());
        assert!(Time::from_utc_time(b"241302153000Z").is_err());
        assert!(Time::from_utc_time(b"240102153000Zx").is_err());
    }

    #[test]
    fn generalized_time() {
        assert_eq!(
            Time::from_generalized_time(b"20500101000000Z").unwrap(),
            Time::utc(2050, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Time::from_generalized_time(b"19991231235959.5Z").unwrap(),
            Time::utc(1999, 12, 31, 23, 59, 59).unwrap()
                + Duration::milliseconds(500)
        );
        assert!(Time::from_generalized_time(b"20500101000000").is_err());
        assert!(Time::from_generalized_time(b"20500101000000.Z").is_err());
    }

    #[test]
    fn to_value() {
        let value = Time::utc(2024, 1, 2, 3, 4, 5).unwrap().to_value();
        assert_eq!(value.tag(), Tag::UTC_TIME);
        assert_eq!(value.to_octets().unwrap().as_ref(), b"240102030405Z");

        let value = Time::utc(2050, 1, 2, 3, 4, 5).unwrap().to_value();
        assert_eq!(value.tag(), Tag::GENERALIZED_TIME);
        assert_eq!(value.to_octets().unwrap().as_ref(), b"20500102030405Z");

        let value = Time::utc(1949, 12, 31, 0, 0, 0).unwrap().to_value();
        assert_eq!(value.tag(), Tag::GENERALIZED_TIME);
    }

    #[test]
    fn years_later() {
        let start = Time::utc(2024, 2, 29, 12, 0, 0).unwrap();
        assert_eq!(
            start.years_later(1).unwrap(),
            Time::utc(2025, 2, 28, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn encodable_range() {
        assert!(Time::utc(0, 1, 1, 0, 0, 0).unwrap().is_encodable());
        assert!(Time::utc(9999, 12, 31, 23, 59, 59).unwrap().is_encodable());
        assert!(!Time::utc(10000, 1, 1, 0, 0, 0).unwrap().is_encodable());
        assert!(!Time::utc(-1, 12, 31, 0, 0, 0).unwrap().is_encodable());
        assert_eq!(
            Time::utc(9999, 12, 31, 23, 59, 59).unwrap().to_value(),
            Value::primitive(Tag::GENERALIZED_TIME, &b"99991231235959Z"[..])
        );
    }
}
