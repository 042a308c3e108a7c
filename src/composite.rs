//! Sequence and mapping coercions.
//!
//! Both split the raw string on the field's separator and coerce every piece
//! through [`ParseContext::parse`]. A raw value that is empty after trimming
//! yields an empty container. Pieces themselves are not trimmed.
//!
//! `Vec<u8>` is the exception: the raw string is taken as bytes verbatim and
//! the separator is ignored.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::coerce::ParseContext;
use crate::error::ParseError;
use crate::value::EnvValue;

impl<T: EnvValue> EnvValue for Vec<T> {
    fn kind() -> String {
        if is_byte::<T>() {
            "bytes".into()
        } else {
            format!("Vec<{}>", T::kind())
        }
    }

    fn parse_env(raw: &str, cx: &ParseContext<'_>) -> Result<Self, ParseError> {
        if is_byte::<T>() {
            let bytes: Box<dyn Any> = Box::new(raw.as_bytes().to_vec());
            if let Ok(bytes) = bytes.downcast::<Vec<T>>() {
                return Ok(*bytes);
            }
        }
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        raw.split(cx.separator())
            .map(|item| cx.parse::<T>(item))
            .collect()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

fn is_byte<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<u8>()
}

/// Split `raw` into `key:value` pairs. Each pair splits on its first `:`
/// only, so values may contain colons.
fn parse_pairs<K, V>(raw: &str, cx: &ParseContext<'_>) -> Result<Vec<(K, V)>, ParseError>
where
    K: EnvValue,
    V: EnvValue,
{
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(cx.separator())
        .map(|pair| {
            let (key, value) = pair
                .split_once(':')
                .ok_or_else(|| ParseError::MalformedPair(pair.to_string()))?;
            Ok((cx.parse::<K>(key)?, cx.parse::<V>(value)?))
        })
        .collect()
}

impl<K, V> EnvValue for HashMap<K, V>
where
    K: EnvValue + Eq + Hash,
    V: EnvValue,
{
    fn kind() -> String {
        format!("HashMap<{}, {}>", K::kind(), V::kind())
    }

    fn parse_env(raw: &str, cx: &ParseContext<'_>) -> Result<Self, ParseError> {
        parse_pairs(raw, cx).map(|pairs| pairs.into_iter().collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> EnvValue for BTreeMap<K, V>
where
    K: EnvValue + Ord,
    V: EnvValue,
{
    fn kind() -> String {
        format!("BTreeMap<{}, {}>", K::kind(), V::kind())
    }

    fn parse_env(raw: &str, cx: &ParseContext<'_>) -> Result<Self, ParseError> {
        parse_pairs(raw, cx).map(|pairs| pairs.into_iter().collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{DEFAULT_SEPARATOR, Parsers};
    use chrono::{DateTime, Utc};

    fn parse_with<T: EnvValue>(raw: &str, sep: &str) -> Result<T, ParseError> {
        let parsers = Parsers::default();
        ParseContext::new(&parsers, sep, None).parse(raw)
    }

    fn parse<T: EnvValue>(raw: &str) -> Result<T, ParseError> {
        parse_with(raw, DEFAULT_SEPARATOR)
    }

    #[test]
    fn int_sequence() {
        assert_eq!(parse::<Vec<i32>>("1,2,3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn string_sequence_keeps_order_and_spaces() {
        assert_eq!(
            parse::<Vec<String>>("c,a, b").unwrap(),
            vec!["c".to_string(), "a".into(), " b".into()]
        );
    }

    #[test]
    fn empty_raw_gives_empty_containers() {
        assert_eq!(parse::<Vec<i32>>("").unwrap(), Vec::<i32>::new());
        assert_eq!(parse::<Vec<i32>>("   ").unwrap(), Vec::<i32>::new());
        assert!(parse::<HashMap<String, i32>>(" ").unwrap().is_empty());
        assert!(parse::<BTreeMap<String, i32>>("").unwrap().is_empty());
    }

    #[test]
    fn custom_separator() {
        assert_eq!(parse_with::<Vec<u16>>("80|443", "|").unwrap(), vec![80, 443]);
        assert!(parse_with::<Vec<u16>>("80,443", "|").is_err());
    }

    #[test]
    fn element_error_propagates() {
        let err = parse::<Vec<i32>>("1,x,3").unwrap_err();
        assert!(err.to_string().contains("\"x\""));
    }

    #[test]
    fn bytes_are_verbatim() {
        assert_eq!(parse::<Vec<u8>>("a,b").unwrap(), b"a,b".to_vec());
        assert_eq!(parse_with::<Vec<u8>>("x|y", "|").unwrap(), b"x|y".to_vec());
        assert_eq!(parse::<Vec<u8>>("").unwrap(), Vec::<u8>::new());
        assert_eq!(Vec::<u8>::kind(), "bytes");
    }

    #[test]
    fn string_int_mapping() {
        let map = parse::<HashMap<String, i32>>("a:1,b:2").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], 1);
        assert_eq!(map["b"], 2);
    }

    #[test]
    fn mapping_splits_on_first_colon() {
        let map = parse::<BTreeMap<String, String>>("db:postgres://h:5432,x:y").unwrap();
        assert_eq!(map["db"], "postgres://h:5432");
        assert_eq!(map["x"], "y");
    }

    #[test]
    fn mapping_last_write_wins() {
        let map = parse::<HashMap<String, u8>>("a:1,a:2").unwrap();
        assert_eq!(map["a"], 2);
    }

    #[test]
    fn malformed_pair_is_named() {
        let err = parse::<HashMap<String, i32>>("a:1,bad").unwrap_err();
        assert!(matches!(err, ParseError::MalformedPair(ref pair) if pair == "bad"));
    }

    #[test]
    fn mapping_coerces_keys() {
        let map = parse::<BTreeMap<u16, bool>>("80:true,443:false").unwrap();
        assert_eq!(map.get(&80), Some(&true));
        assert_eq!(map.get(&443), Some(&false));
        assert!(parse::<BTreeMap<u16, bool>>("http:true").is_err());
    }

    #[test]
    fn timestamps_inside_composites_use_registry() {
        let times = parse_with::<Vec<DateTime<Utc>>>(
            "2012-04-23T18:25:43Z|2013-01-01T00:00:00Z",
            "|",
        )
        .unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times[1].to_rfc3339(), "2013-01-01T00:00:00+00:00");

        let by_name =
            parse_with::<HashMap<String, DateTime<Utc>>>("start:2012-04-23T18:25:43Z", "|")
                .unwrap();
        assert_eq!(by_name["start"].timestamp(), 1_335_205_543);
    }

    #[test]
    fn kinds_nest() {
        assert_eq!(Vec::<i64>::kind(), "Vec<i64>");
        assert_eq!(HashMap::<String, i32>::kind(), "HashMap<String, i32>");
    }
}
