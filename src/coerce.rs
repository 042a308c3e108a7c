//! Coercion dispatch: turn a raw string into a field's value.
//!
//! Dispatch has two tiers:
//!
//! 1. The [`Parsers`] registry, keyed by the concrete target type. It holds
//!    the built-in opaque composites (timestamps, URLs, time zones) and
//!    anything the host registers. A registry hit always wins.
//! 2. The capability the field was declared with: [`EnvValue`] for built-in
//!    shapes and composites, `FromStr`, the [`Setter`] hook, or nothing at all
//!    for opaque fields (which then fail with
//!    [`ParseError::UnsupportedType`]).
//!
//! Composite coercions re-enter tier 1 for each element through
//! [`ParseContext::parse`], so `Vec<DateTime<Utc>>` honours a registered
//! timestamp parser.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{BoxError, ParseError};
use crate::opaque;
use crate::value::EnvValue;

/// Separator used by composite coercion when a field declares none.
pub const DEFAULT_SEPARATOR: &str = ",";

type ParseFn = Arc<dyn Fn(&str, Option<&str>) -> Result<Box<dyn Any>, BoxError> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    name: &'static str,
    parse: ParseFn,
}

/// Registry of parsers for opaque composite types.
///
/// [`Parsers::default()`] contains the built-ins: `chrono` timestamps
/// (`DateTime<Utc>`, `DateTime<FixedOffset>`, `NaiveDateTime`, `NaiveDate`),
/// `url::Url` and `chrono_tz::Tz`. Parsers receive the raw string and the
/// field's layout override.
#[derive(Clone)]
pub struct Parsers {
    table: HashMap<TypeId, Entry>,
}

impl Parsers {
    /// A registry without any entries, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Register (or replace) the parser for `T`.
    pub fn register<T, F>(&mut self, parse: F) -> &mut Self
    where
        T: Any,
        F: Fn(&str, Option<&str>) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let parse: ParseFn = Arc::new(move |raw: &str, layout: Option<&str>| {
            parse(raw, layout).map(|value| Box::new(value) as Box<dyn Any>)
        });
        self.table.insert(
            TypeId::of::<T>(),
            Entry {
                name: type_name::<T>(),
                parse,
            },
        );
        self
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.table.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Run the registered parser for `T`, if there is one.
    pub(crate) fn parse<T: Any>(
        &self,
        raw: &str,
        layout: Option<&str>,
    ) -> Option<Result<T, ParseError>> {
        let entry = self.table.get(&TypeId::of::<T>())?;
        let result = (entry.parse)(raw, layout)
            .map_err(|e| ParseError::invalid(short_type_name::<T>(), raw, e))
            .and_then(|value| {
                value
                    .downcast::<T>()
                    .map(|value| *value)
                    .map_err(|_| ParseError::UnsupportedType(entry.name.to_string()))
            });
        Some(result)
    }
}

impl Default for Parsers {
    fn default() -> Self {
        let mut parsers = Self::empty();
        opaque::register_builtins(&mut parsers);
        parsers
    }
}

impl fmt::Debug for Parsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.table.values().map(|e| e.name).collect();
        names.sort_unstable();
        f.debug_struct("Parsers").field("types", &names).finish()
    }
}

/// Per-field coercion settings plus access to the registry.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'p> {
    parsers: &'p Parsers,
    separator: &'p str,
    layout: Option<&'p str>,
}

impl<'p> ParseContext<'p> {
    pub fn new(parsers: &'p Parsers, separator: &'p str, layout: Option<&'p str>) -> Self {
        Self {
            parsers,
            separator,
            layout,
        }
    }

    pub fn separator(&self) -> &'p str {
        self.separator
    }

    pub fn layout(&self) -> Option<&'p str> {
        self.layout
    }

    /// Coerce `raw` into `T`: registry first, then `T`'s own coercion.
    pub fn parse<T: EnvValue>(&self, raw: &str) -> Result<T, ParseError> {
        match self.registered::<T>(raw) {
            Some(result) => result,
            None => T::parse_env(raw, self),
        }
    }

    pub(crate) fn registered<T: Any>(&self, raw: &str) -> Option<Result<T, ParseError>> {
        self.parsers.parse(raw, self.layout)
    }
}

/// Text-to-value hook for types that update themselves in place.
///
/// ```ignore
/// impl Setter for Roles {
///     fn set_value(&mut self, raw: &str) -> Result<(), BoxError> {
///         self.0 = raw.split_whitespace().map(String::from).collect();
///         Ok(())
///     }
/// }
/// ```
pub trait Setter {
    fn set_value(&mut self, raw: &str) -> Result<(), BoxError>;
}

/// Write handle to one field of a record.
pub(crate) trait Slot {
    fn assign(&mut self, raw: &str, cx: &ParseContext<'_>) -> Result<(), ParseError>;

    fn is_zero(&self) -> bool;

    /// Type label for descriptions.
    fn kind(&self) -> String;
}

pub(crate) struct ValueSlot<'a, T>(pub(crate) &'a mut T);

impl<T: EnvValue> Slot for ValueSlot<'_, T> {
    fn assign(&mut self, raw: &str, cx: &ParseContext<'_>) -> Result<(), ParseError> {
        *self.0 = cx.parse::<T>(raw)?;
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn kind(&self) -> String {
        T::kind()
    }
}

pub(crate) struct FromStrSlot<'a, T>(pub(crate) &'a mut T);

impl<T> Slot for FromStrSlot<'_, T>
where
    T: FromStr + Default + PartialEq + 'static,
    T::Err: fmt::Display,
{
    fn assign(&mut self, raw: &str, cx: &ParseContext<'_>) -> Result<(), ParseError> {
        *self.0 = match cx.registered::<T>(raw) {
            Some(result) => result?,
            None => raw
                .parse::<T>()
                .map_err(|e| ParseError::invalid(short_type_name::<T>(), raw, e))?,
        };
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self.0 == T::default()
    }

    fn kind(&self) -> String {
        short_type_name::<T>()
    }
}

pub(crate) struct SetterSlot<'a, T>(pub(crate) &'a mut T);

impl<T> Slot for SetterSlot<'_, T>
where
    T: Setter + Default + PartialEq + 'static,
{
    fn assign(&mut self, raw: &str, cx: &ParseContext<'_>) -> Result<(), ParseError> {
        match cx.registered::<T>(raw) {
            Some(result) => *self.0 = result?,
            None => self.0.set_value(raw).map_err(ParseError::Custom)?,
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self.0 == T::default()
    }

    fn kind(&self) -> String {
        short_type_name::<T>()
    }
}

pub(crate) struct OpaqueSlot<'a, T>(pub(crate) &'a mut T);

impl<T> Slot for OpaqueSlot<'_, T>
where
    T: Default + PartialEq + 'static,
{
    fn assign(&mut self, raw: &str, cx: &ParseContext<'_>) -> Result<(), ParseError> {
        match cx.registered::<T>(raw) {
            Some(result) => {
                *self.0 = result?;
                Ok(())
            }
            None => Err(ParseError::UnsupportedType(type_name::<T>().to_string())),
        }
    }

    fn is_zero(&self) -> bool {
        *self.0 == T::default()
    }

    fn kind(&self) -> String {
        short_type_name::<T>()
    }
}

/// `type_name` without module paths: `core::option::Option<u8>` → `Option<u8>`.
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }
    out.push_str(&segment);
    out
}
