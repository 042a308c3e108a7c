//! Built-in opaque composite types.
//!
//! These types have internal structure but are always parsed from a single
//! string. Their parsers live in the [`Parsers`] registry so a host can
//! replace them; the `EnvValue` impls below only supply kind labels and zero
//! checks.
//!
//! Timestamps use the field's layout (a `chrono` strftime pattern) when one is
//! declared, RFC 3339 otherwise. A layout without an offset is read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::coerce::{ParseContext, Parsers, short_type_name};
use crate::error::{BoxError, ParseError};
use crate::value::EnvValue;

/// Default layout for `NaiveDate` fields.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

pub(crate) fn register_builtins(parsers: &mut Parsers) {
    parsers
        .register::<DateTime<Utc>, _>(parse_utc)
        .register::<DateTime<FixedOffset>, _>(parse_fixed)
        .register::<NaiveDateTime, _>(parse_naive)
        .register::<NaiveDate, _>(parse_date)
        .register::<Url, _>(|raw, _| Ok(Url::parse(raw)?))
        .register::<Tz, _>(|raw, _| raw.parse::<Tz>().map_err(|e| e.to_string().into()));
}

fn parse_fixed(raw: &str, layout: Option<&str>) -> Result<DateTime<FixedOffset>, BoxError> {
    let Some(layout) = layout else {
        return Ok(DateTime::parse_from_rfc3339(raw)?);
    };
    match DateTime::parse_from_str(raw, layout) {
        Ok(dt) => Ok(dt),
        Err(offset_err) => NaiveDateTime::parse_from_str(raw, layout)
            .map(|naive| Utc.from_utc_datetime(&naive).into())
            .map_err(|_| offset_err.into()),
    }
}

fn parse_utc(raw: &str, layout: Option<&str>) -> Result<DateTime<Utc>, BoxError> {
    parse_fixed(raw, layout).map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(raw: &str, layout: Option<&str>) -> Result<NaiveDateTime, BoxError> {
    match layout {
        Some(layout) => Ok(NaiveDateTime::parse_from_str(raw, layout)?),
        None => Ok(DateTime::parse_from_rfc3339(raw)?.naive_utc()),
    }
}

fn parse_date(raw: &str, layout: Option<&str>) -> Result<NaiveDate, BoxError> {
    Ok(NaiveDate::parse_from_str(raw, layout.unwrap_or(DATE_LAYOUT))?)
}

macro_rules! opaque_value {
    ($($ty:ty => $zero:expr),* $(,)?) => {$(
        impl EnvValue for $ty {
            fn kind() -> String {
                short_type_name::<$ty>()
            }

            // Only reached with a registry that lacks the built-ins.
            fn parse_env(_: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
                Err(ParseError::UnsupportedType(Self::kind()))
            }

            fn is_zero(&self) -> bool {
                let zero: fn(&$ty) -> bool = $zero;
                zero(self)
            }
        }
    )*};
}

opaque_value!(
    DateTime<Utc> => |v| *v == DateTime::<Utc>::default(),
    DateTime<FixedOffset> => |v| *v == DateTime::<FixedOffset>::default(),
    NaiveDateTime => |v| *v == NaiveDateTime::default(),
    NaiveDate => |v| *v == NaiveDate::default(),
    Url => |_| false,
    Tz => |_| false,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::DEFAULT_SEPARATOR;
    use chrono::{Datelike, Timelike};

    fn parse<T: EnvValue>(raw: &str, layout: Option<&str>) -> Result<T, ParseError> {
        let parsers = Parsers::default();
        ParseContext::new(&parsers, DEFAULT_SEPARATOR, layout).parse(raw)
    }

    #[test]
    fn rfc3339_by_default() {
        let dt: DateTime<Utc> = parse("2012-04-23T18:25:43.511Z", None).unwrap();
        assert_eq!(dt.timestamp_millis(), 1_335_205_543_511);
    }

    #[test]
    fn offset_is_kept_for_fixed_offset() {
        let dt: DateTime<FixedOffset> = parse("2012-04-23T18:25:43+02:00", None).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(dt.hour(), 18);
    }

    #[test]
    fn layout_without_offset_is_utc() {
        let dt: DateTime<Utc> =
            parse("Thu Mar 10 11:11:11 2011", Some("%a %b %e %H:%M:%S %Y")).unwrap();
        assert_eq!(dt.year(), 2011);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 10);
        assert_eq!(dt.hour(), 11);
    }

    #[test]
    fn layout_with_offset() {
        let dt: DateTime<Utc> =
            parse("2020-01-02 03:04:05 +0100", Some("%Y-%m-%d %H:%M:%S %z")).unwrap();
        assert_eq!(dt.hour(), 2);
    }

    #[test]
    fn layout_mismatch_fails() {
        assert!(parse::<DateTime<Utc>>("2012-04-23T18:25:43Z", Some("%d/%m/%Y")).is_err());
        assert!(parse::<DateTime<Utc>>("yesterday", None).is_err());
    }

    #[test]
    fn naive_types() {
        let dt: NaiveDateTime = parse("2012-04-23 18:25", Some("%Y-%m-%d %H:%M")).unwrap();
        assert_eq!(dt.minute(), 25);
        let date: NaiveDate = parse("2024-02-29", None).unwrap();
        assert_eq!(date.day(), 29);
        let date: NaiveDate = parse("29/02/2024", Some("%d/%m/%Y")).unwrap();
        assert_eq!(date.month(), 2);
    }

    #[test]
    fn urls() {
        let url: Url = parse("https://images.cdn/", None).unwrap();
        assert_eq!(url.as_str(), "https://images.cdn/");
        assert!(parse::<Url>("not a url", None).is_err());
    }

    #[test]
    fn time_zones() {
        let tz: Tz = parse("UTC", None).unwrap();
        assert_eq!(tz, Tz::UTC);
        let tz: Tz = parse("Europe/Berlin", None).unwrap();
        assert_eq!(tz, Tz::Europe__Berlin);
        assert!(parse::<Tz>("Mars/Olympus", None).is_err());
    }

    #[test]
    fn unregistered_opaque_type_is_unsupported() {
        let parsers = Parsers::empty();
        let cx = ParseContext::new(&parsers, DEFAULT_SEPARATOR, None);
        let err = cx.parse::<Url>("https://example.com").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedType(_)));
    }

    #[test]
    fn replaced_parser_wins() {
        let mut parsers = Parsers::default();
        parsers.register::<Url, _>(|raw, _| Ok(Url::parse(&format!("https://{raw}/"))?));
        let cx = ParseContext::new(&parsers, DEFAULT_SEPARATOR, None);
        let url: Url = cx.parse("example.org").unwrap();
        assert_eq!(url.as_str(), "https://example.org/");
    }

    #[test]
    fn timestamp_zero_is_epoch() {
        assert!(DateTime::<Utc>::default().is_zero());
        let dt: DateTime<Utc> = parse("2012-04-23T18:25:43Z", None).unwrap();
        assert!(!dt.is_zero());
    }
}
