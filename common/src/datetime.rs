//! Date and time utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, UtcOffset};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: time::OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::Range)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the calendar date of this [`DateTime`] in `YYYY-MM-DD` format.
    #[must_use]
    pub fn to_date_string(&self) -> String {
        let date = self.inner.date();
        format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day(),
        )
    }

    /// Returns the [`YearMonth`] this [`DateTime`] falls into.
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.inner.year(),
            month: self.inner.month().into(),
        }
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] cannot be represented.
    Range(RangeError),
}

/// Error of converting a [`time::OffsetDateTime`] into a [`DateTime`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum RangeError {
    /// Date and time falls out of the supported range once moved to UTC.
    #[display("date and time is out of range in UTC")]
    OutOfUtc,

    /// Date and time has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = RangeError;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.checked_to_offset(UtcOffset::UTC)
            .ok_or(RangeError::OutOfUtc)?
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
            .map_err(RangeError::ComponentRange)
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::OffsetDateTime::from_sql(ty, raw)?
            .try_into()
            .map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

/// Calendar month of a specific year, in UTC.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YearMonth {
    /// Year of this [`YearMonth`].
    year: i32,

    /// Month of this [`YearMonth`], in `1..=12` range.
    month: u8,
}

impl YearMonth {
    /// Creates a new [`YearMonth`] if the provided `year` is in `0..=9999`
    /// range and `month` is in `1..=12` range.
    #[must_use]
    pub fn new(year: i32, month: u8) -> Option<Self> {
        ((0..=9999).contains(&year) && (1..=12).contains(&month))
            .then_some(Self { year, month })
    }

    /// Returns the year of this [`YearMonth`].
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month of this [`YearMonth`], in `1..=12` range.
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Checks whether the provided [`DateTimeOf`] falls into this
    /// [`YearMonth`].
    #[must_use]
    pub fn contains<Of: ?Sized>(&self, dt: &DateTimeOf<Of>) -> bool {
        dt.year_month() == *self
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or("expected `YYYY-MM`")?;
        if year.len() != 4 || month.len() != 2 {
            return Err("expected `YYYY-MM`");
        }
        let year = year.parse().map_err(|_| "invalid year")?;
        let month = month.parse().map_err(|_| "invalid month")?;
        Self::new(year, month).ok_or("year or month is out of range")
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    use super::DateTimeOf;

    pub mod rfc3339 {
        //! Module providing serialization and deserialization of [`DateTimeOf`]
        //! as an [RFC 3339] string.
        //!
        //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

        use serde::{de::Error, Deserialize as _, Deserializer, Serializer};

        use super::DateTimeOf;

        /// Serializes the [`DateTimeOf`] as an [RFC 3339] string.
        ///
        /// # Errors
        ///
        /// Never errors on its own, only propagates `serializer` errors.
        ///
        /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_str(&dt.to_rfc3339())
        }

        /// Deserializes an [RFC 3339] string into a [`DateTimeOf`].
        ///
        /// # Errors
        ///
        /// Returns an error if the string is not a valid [RFC 3339] date and
        /// time.
        ///
        /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            let s = String::deserialize(deserializer)?;
            DateTimeOf::from_rfc3339(&s).map_err(|e| {
                Error::custom(format!("invalid RFC 3339 date and time: {e}"))
            })
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in a [RFC 3339] format with a microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `DateTime` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_rfc3339(s).map_err(|e| {
                        format!("Cannot parse `DateTime` input scalar: {e}")
                    })
                })
        }
    }

    /// Calendar month in a `YYYY-MM` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type YearMonth = crate::YearMonth;

    impl YearMonth {
        fn to_output<S: ScalarValue>(ym: &YearMonth) -> Value<S> {
            Value::scalar(ym.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `YearMonth` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `YearMonth` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use rstest::rstest;

    use super::{DateTime, ParseError, RangeError, YearMonth};

    #[rstest]
    #[case("2024-01", Some((2024, 1)))]
    #[case("2024-12", Some((2024, 12)))]
    #[case("0999-03", Some((999, 3)))]
    #[case("2024-13", None)]
    #[case("2024-00", None)]
    #[case("2024-1", None)]
    #[case("24-01", None)]
    #[case("2024/01", None)]
    #[case("", None)]
    fn parses_year_month(
        #[case] input: &str,
        #[case] expected: Option<(i32, u8)>,
    ) {
        assert_eq!(
            input.parse::<YearMonth>().ok().map(|m| (m.year(), m.month())),
            expected,
        );
    }

    #[test]
    fn prints_year_month() {
        assert_eq!(YearMonth::new(2024, 3).unwrap().to_string(), "2024-03");
        assert_eq!(YearMonth::new(7, 11).unwrap().to_string(), "0007-11");
    }

    #[test]
    fn takes_year_month_in_utc() {
        let dt = DateTime::from_rfc3339("2024-02-29T23:30:00-02:00").unwrap();

        assert_eq!(dt.year_month(), YearMonth::new(2024, 3).unwrap());
        assert!(YearMonth::new(2024, 3).unwrap().contains(&dt));
        assert!(!YearMonth::new(2024, 2).unwrap().contains(&dt));
    }

    #[test]
    fn formats_date_string() {
        let dt = DateTime::from_rfc3339("2023-07-04T10:00:00Z").unwrap();

        assert_eq!(dt.to_date_string(), "2023-07-04");
    }

    #[test]
    fn rfc3339_round_trip_keeps_instant() {
        let dt = DateTime::from_rfc3339("2023-07-04T10:00:00.123456Z").unwrap();

        assert_eq!(DateTime::from_rfc3339(&dt.to_rfc3339()).unwrap(), dt);
    }

    #[test]
    fn rejects_instant_beyond_utc_range() {
        let res = DateTime::from_rfc3339("9999-12-31T23:00:00-05:00");

        assert!(matches!(
            res,
            Err(ParseError::Range(RangeError::OutOfUtc)),
        ));
    }
}
