//! Built-in scalar coercions.
//!
//! [`EnvValue`] is implemented for `bool`, every integer width, `f32`/`f64`,
//! `String`, `PathBuf`, `std::time::Duration` and `Option<T>`. Sequences and
//! mappings live in [`composite`](crate::composite); timestamps, URLs and time
//! zones in [`opaque`](crate::opaque).

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use crate::coerce::ParseContext;
use crate::error::ParseError;

/// A type that can be coerced from a raw environment string.
///
/// Implement this for your own types to use them with
/// [`Fields::field`](crate::Fields::field) and inside `Vec`/map fields. For
/// foreign types, use [`Fields::parsed`](crate::Fields::parsed) (any `FromStr`)
/// or register a parser in [`Parsers`](crate::Parsers) instead.
pub trait EnvValue: Sized + 'static {
    /// Type label shown in descriptions.
    fn kind() -> String;

    /// Parse `raw`. Element coercion inside composites must go through
    /// [`ParseContext::parse`] so registered parsers are honoured.
    fn parse_env(raw: &str, cx: &ParseContext<'_>) -> Result<Self, ParseError>;

    /// Whether the value is the type's zero value. Defaults and required
    /// checks only apply to zero-valued fields.
    fn is_zero(&self) -> bool;
}

impl EnvValue for String {
    fn kind() -> String {
        "String".into()
    }

    fn parse_env(raw: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
        Ok(raw.to_string())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl EnvValue for PathBuf {
    fn kind() -> String {
        "PathBuf".into()
    }

    fn parse_env(raw: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
        Ok(PathBuf::from(raw))
    }

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`; anything
/// else is rejected.
impl EnvValue for bool {
    fn kind() -> String {
        "bool".into()
    }

    fn parse_env(raw: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ParseError::invalid("bool", raw, "expected true or false")),
        }
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

/// Split an integer literal into sign+digits and radix.
///
/// `0x`/`0X` is hexadecimal, `0o`/`0O` or a bare leading `0` octal,
/// `0b`/`0B` binary, anything else decimal. Underscores may separate digits
/// or follow a base prefix; misplaced ones are left in so parsing fails.
fn split_radix(raw: &str) -> (String, u32) {
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'-') | Some(b'+') => raw.split_at(1),
        _ => ("", raw),
    };
    let (digits, radix, prefixed) = match rest.get(..2) {
        Some("0x") | Some("0X") => (&rest[2..], 16, true),
        Some("0o") | Some("0O") => (&rest[2..], 8, true),
        Some("0b") | Some("0B") => (&rest[2..], 2, true),
        Some(_) if rest.starts_with('0') => (&rest[1..], 8, true),
        _ => (rest, 10, false),
    };
    // A second sign after the prefix ("0x-1") must not be accepted.
    if digits.starts_with(['-', '+']) {
        return (format!("{sign}{rest}"), 10);
    }
    (format!("{sign}{}", strip_underscores(digits, prefixed)), radix)
}

fn strip_underscores(digits: &str, prefixed: bool) -> Cow<'_, str> {
    if !digits.contains('_') {
        return Cow::Borrowed(digits);
    }
    let placed_well = !digits.ends_with('_')
        && !digits.contains("__")
        && (prefixed || !digits.starts_with('_'));
    if placed_well {
        Cow::Owned(digits.replace('_', ""))
    } else {
        Cow::Borrowed(digits)
    }
}

macro_rules! int_value {
    ($($ty:ty),* $(,)?) => {$(
        impl EnvValue for $ty {
            fn kind() -> String {
                stringify!($ty).into()
            }

            fn parse_env(raw: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
                let (digits, radix) = split_radix(raw);
                <$ty>::from_str_radix(&digits, radix)
                    .map_err(|e| ParseError::invalid(stringify!($ty), raw, e))
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

int_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_value {
    ($($ty:ty),* $(,)?) => {$(
        impl EnvValue for $ty {
            fn kind() -> String {
                stringify!($ty).into()
            }

            fn parse_env(raw: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
                raw.parse::<$ty>()
                    .map_err(|e| ParseError::invalid(stringify!($ty), raw, e))
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }
        }
    )*};
}

float_value!(f32, f64);

/// Duration literals such as `1h 5m 10s`, `250ms` or `2days`.
impl EnvValue for Duration {
    fn kind() -> String {
        "Duration".into()
    }

    fn parse_env(raw: &str, _: &ParseContext<'_>) -> Result<Self, ParseError> {
        humantime::parse_duration(raw).map_err(|e| ParseError::invalid("Duration", raw, e))
    }

    fn is_zero(&self) -> bool {
        Duration::is_zero(self)
    }
}

/// `None` is the zero value; any raw value produces `Some`.
impl<T: EnvValue> EnvValue for Option<T> {
    fn kind() -> String {
        T::kind()
    }

    fn parse_env(raw: &str, cx: &ParseContext<'_>) -> Result<Self, ParseError> {
        cx.parse::<T>(raw).map(Some)
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}
