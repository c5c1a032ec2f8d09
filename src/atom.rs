//! Atom types: scalar values with a validated textual form.
//!
//! Each atom is built through a validating constructor. Parsing input that
//! cannot represent the atom fails with [`Error::TypeMismatch`]:
//!
//! - [`Date`]: ISO-8601 calendar date (`YYYY-MM-DD`)
//! - [`DateTime`]: ISO-8601 combined date and time with an optional UTC offset
//! - [`Binary`]: arbitrary bytes, rendered as standard base64
//! - [`Identifier`]: 128-bit UUID, rendered in the hyphenated lowercase form
//!
//! ## Examples
//!
//! ```rust
//! use ifamily::{Date, Error, Identifier};
//!
//! let date = Date::parse("2024-02-29").unwrap();
//! assert_eq!(date.to_string(), "2024-02-29");
//!
//! assert!(matches!(Date::parse("not-a-date"), Err(Error::TypeMismatch { .. })));
//!
//! let id = Identifier::new();
//! assert_eq!(id.to_string().len(), 36);
//! ```

use crate::{Error, Result, Value};
use base64::Engine;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATETIME_OFFSET_FORMATS: [&str; 2] =
    ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// A calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date(NaiveDate);

impl Date {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Date(date)
    }

    /// Parses an ISO-8601 `YYYY-MM-DD` date.
    ///
    /// Invalid calendar dates such as `2024-02-30` are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse::<NaiveDate>()
            .map(Date)
            .map_err(|_| Error::type_mismatch("ISO-8601 date", &format!("{:?}", s)))
    }

    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// A calendar date and wall-clock time, optionally anchored by a UTC offset.
///
/// Two values compare equal when they denote the same instant. A value
/// without an offset never equals one with an offset.
#[derive(Clone, Copy, Debug)]
pub struct DateTime {
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl DateTime {
    /// Creates a date-time without a UTC offset.
    #[must_use]
    pub const fn from_naive(naive: NaiveDateTime) -> Self {
        DateTime {
            naive,
            offset: None,
        }
    }

    /// Creates a date-time whose wall-clock reading `naive` is local to `offset`.
    #[must_use]
    pub const fn with_offset(naive: NaiveDateTime, offset: FixedOffset) -> Self {
        DateTime {
            naive,
            offset: Some(offset),
        }
    }

    /// Parses an ISO-8601 combined date-time.
    ///
    /// Accepts a `T` or space separator, optional fractional seconds, an
    /// optional `+HH:MM`/`Z` offset, and a bare date (read as midnight).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ifamily::DateTime;
    ///
    /// let dt = DateTime::parse("2024-05-01T08:30:00+07:00").unwrap();
    /// assert_eq!(dt.to_string(), "2024-05-01T08:30:00+07:00");
    ///
    /// let utc = DateTime::parse("2024-05-01T01:30:00Z").unwrap();
    /// assert_eq!(dt, utc);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(dt) = parse_with_second_offset(s) {
            return Ok(dt);
        }
        for format in DATETIME_OFFSET_FORMATS {
            if let Ok(dt) = chrono::DateTime::parse_from_str(s, format) {
                return Ok(DateTime::from(dt));
            }
        }
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
            return Ok(DateTime::from(dt));
        }
        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(DateTime::from_naive(naive));
            }
        }
        if let Some(midnight) = s
            .parse::<NaiveDate>()
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(DateTime::from_naive(midnight));
        }
        Err(Error::type_mismatch(
            "ISO-8601 date-time",
            &format!("{:?}", s),
        ))
    }

    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    #[must_use]
    pub const fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    fn instant(&self) -> Option<chrono::DateTime<FixedOffset>> {
        self.offset
            .and_then(|offset| offset.from_local_datetime(&self.naive).single())
    }

    /// Key shared by every pair of equal date-times.
    pub(crate) fn equality_key(&self) -> (bool, Option<NaiveDateTime>) {
        match self.offset {
            Some(_) => (true, self.instant().map(|dt| dt.naive_utc())),
            None => (false, Some(self.naive)),
        }
    }
}

// chrono's `%:z` stops at minutes, so `+HH:MM:SS` offsets are split off by hand.
fn parse_with_second_offset(s: &str) -> Option<DateTime> {
    let split = s.len().checked_sub(9)?;
    let (head, tail) = (s.get(..split)?, s.get(split..)?);
    let sign = match tail.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let field = |range: std::ops::Range<usize>| {
        tail.get(range)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<i32>().ok())
    };
    if tail.as_bytes()[3] != b':' || tail.as_bytes()[6] != b':' {
        return None;
    }
    let (hours, minutes, seconds) = (field(1..3)?, field(4..6)?, field(7..9)?);
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60 + seconds))?;
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(head, format).ok())
        .map(|naive| DateTime::with_offset(naive, offset))
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: FixedOffset) -> fmt::Result {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    if seconds == 0 {
        write!(f, "{}{:02}:{:02}", sign, hours, minutes)
    } else {
        write!(f, "{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        match (self.offset, other.offset) {
            (None, None) => self.naive == other.naive,
            (Some(_), Some(_)) => self.instant() == other.instant(),
            _ => false,
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naive.format("%Y-%m-%dT%H:%M:%S%.f"))?;
        if let Some(offset) = self.offset {
            write_offset(f, offset)?;
        }
        Ok(())
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DateTime::parse(s)
    }
}

impl From<NaiveDateTime> for DateTime {
    fn from(naive: NaiveDateTime) -> Self {
        DateTime::from_naive(naive)
    }
}

impl From<chrono::DateTime<FixedOffset>> for DateTime {
    fn from(dt: chrono::DateTime<FixedOffset>) -> Self {
        DateTime::with_offset(dt.naive_local(), *dt.offset())
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(dt: chrono::DateTime<Utc>) -> Self {
        DateTime::from(dt.fixed_offset())
    }
}

/// An arbitrary byte sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Binary(bytes.into())
    }

    /// Decodes standard (padded) base64 text.
    pub fn from_base64(s: &str) -> Result<Self> {
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map(Binary)
            .map_err(|e| Error::type_mismatch("base64 data", &e.to_string()))
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Binary(bytes.to_vec())
    }
}

/// A 128-bit identifier (UUID).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Uuid);

impl Identifier {
    /// Generates a fresh random (version 4) identifier.
    #[must_use]
    pub fn new() -> Self {
        Identifier(Uuid::new_v4())
    }

    /// Parses a textual UUID.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Identifier)
            .map_err(|_| Error::type_mismatch("UUID", &format!("{:?}", s)))
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Identifier::parse(s)
    }
}

impl From<Uuid> for Identifier {
    fn from(uuid: Uuid) -> Self {
        Identifier(uuid)
    }
}

// Native atom or string accepted; anything else is a mismatch.
impl TryFrom<&Value> for Date {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(*d),
            Value::String(s) => Date::parse(s),
            other => Err(Error::type_mismatch("date or string", other.kind())),
        }
    }
}

impl TryFrom<&Value> for DateTime {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            Value::String(s) => DateTime::parse(s),
            other => Err(Error::type_mismatch("datetime or string", other.kind())),
        }
    }
}

impl TryFrom<&Value> for Identifier {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Uuid(id) => Ok(*id),
            Value::String(s) => Identifier::parse(s),
            other => Err(Error::type_mismatch("uuid or string", other.kind())),
        }
    }
}

impl TryFrom<&Value> for Binary {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Binary(b) => Ok(b.clone()),
            other => Err(Error::type_mismatch("binary", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_rejects_invalid_calendar_date() {
        assert!(Date::parse("2024-02-29").is_ok());
        assert!(matches!(
            Date::parse("2024-02-30"),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(Date::parse("not-a-date").is_err());
    }

    #[test]
    fn test_datetime_fractional_seconds_preserved() {
        let dt = DateTime::parse("2023-11-05T14:03:09.123456").unwrap();
        assert_eq!(dt.to_string(), "2023-11-05T14:03:09.123456");
        assert!(dt.offset().is_none());
    }

    #[test]
    fn test_datetime_space_separator_and_bare_date() {
        let spaced = DateTime::parse("2023-11-05 14:03:09").unwrap();
        assert_eq!(spaced.to_string(), "2023-11-05T14:03:09");

        let midnight = DateTime::parse("2023-11-05").unwrap();
        assert_eq!(midnight.to_string(), "2023-11-05T00:00:00");
    }

    #[test]
    fn test_datetime_equality_is_by_instant() {
        let a = DateTime::parse("2024-01-01T12:00:00+02:00").unwrap();
        let b = DateTime::parse("2024-01-01T10:00:00+00:00").unwrap();
        let naive = DateTime::parse("2024-01-01T10:00:00").unwrap();
        assert_eq!(a, b);
        assert_ne!(b, naive);
    }

    #[test]
    fn test_datetime_offset_with_seconds() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for seconds in [3661, -3661, 45, -50_399] {
            let dt = DateTime::with_offset(naive, FixedOffset::east_opt(seconds).unwrap());
            let text = dt.to_string();
            let back = DateTime::parse(&text).unwrap();
            assert_eq!(back, dt, "offset {} rendered as {}", seconds, text);
            assert_eq!(back.offset(), dt.offset());
        }
        assert_eq!(
            DateTime::with_offset(naive, FixedOffset::east_opt(3661).unwrap()).to_string(),
            "2024-01-01T00:00:00+01:01:01"
        );
        assert!(DateTime::parse("2024-01-01T00:00:00+01:01:61").is_err());
    }

    #[test]
    fn test_binary_base64() {
        let bin = Binary::new(vec![0x00u8, 0x01, 0xff]);
        assert_eq!(bin.to_base64(), "AAH/");
        assert_eq!(Binary::from_base64("AAH/").unwrap(), bin);
        assert!(Binary::from_base64("!!!").is_err());
    }

    #[test]
    fn test_identifier_canonical_form() {
        let id = Identifier::parse("550E8400-E29B-41D4-A716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_fresh_identifiers_are_v4_and_distinct() {
        let a = Identifier::new();
        let b = Identifier::new();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_try_from_value() {
        let date = Date::try_from(&Value::from("2020-06-15")).unwrap();
        assert_eq!(date.to_string(), "2020-06-15");
        assert!(matches!(
            Date::try_from(&Value::from(42)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(Identifier::try_from(&Value::Bool(true)).is_err());
    }
}
