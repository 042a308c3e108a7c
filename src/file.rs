//! Config file loading.
//!
//! The format is picked from the file extension. Structured formats (YAML,
//! JSON, TOML, EDN) are decoded into a value tree and merged over the
//! record's current contents, so keys the file omits keep whatever the record
//! already held and several files can be layered into one record. A dotenv
//! file does not touch the record at all: its pairs are written into the
//! environment store, where the following population pass picks them up.

use std::path::Path;

use edn_rs::Edn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use crate::env::EnvStore;
use crate::error::{DecodeError, EnvfigError};
use crate::merge::deep_merge;
use crate::types::{self, Format};

/// What a file decoded into.
#[derive(Debug)]
pub(crate) enum Decoded {
    Tree(Json),
    Vars(Vec<(String, String)>),
}

/// Read `path` and decode it according to its extension.
pub(crate) fn read_file(path: &Path) -> Result<Decoded, EnvfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| EnvfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let Some(format) = Format::from_path(path) else {
        return Err(EnvfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            ext: types::extension(path),
        });
    };

    let decoded = decode(format, &content).map_err(|e| decode_error(path, e))?;
    tracing::debug!(path = %path.display(), %format, "config file decoded");
    Ok(decoded)
}

/// Read `path` into `cfg` or `env`, depending on its format.
pub(crate) fn load_into<C, E>(path: &Path, cfg: &mut C, env: &mut E) -> Result<(), EnvfigError>
where
    C: Serialize + DeserializeOwned,
    E: EnvStore + ?Sized,
{
    match read_file(path)? {
        Decoded::Tree(tree) => {
            let current = serde_json::to_value(&*cfg).map_err(|e| decode_error(path, e))?;
            *cfg = serde_json::from_value(deep_merge(current, tree))
                .map_err(|e| decode_error(path, e))?;
        }
        Decoded::Vars(vars) => {
            for (key, value) in &vars {
                env.set(key, value);
            }
        }
    }
    Ok(())
}

fn decode_error(path: &Path, source: impl Into<DecodeError>) -> EnvfigError {
    EnvfigError::Decode {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

pub(crate) fn decode(format: Format, text: &str) -> Result<Decoded, DecodeError> {
    let tree = match format {
        Format::Yaml => serde_yaml::from_str(text)?,
        Format::Json => serde_json::from_str(text)?,
        Format::Toml => toml::from_str(text)?,
        Format::Edn => {
            let edn = text
                .parse::<Edn>()
                .map_err(|e| DecodeError::Edn(format!("{e:?}")))?;
            edn_to_json(edn)?
        }
        Format::Dotenv => {
            let vars = dotenvy::from_read_iter(text.as_bytes()).collect::<Result<Vec<_>, _>>()?;
            return Ok(Decoded::Vars(vars));
        }
    };
    Ok(Decoded::Tree(tree))
}

/// Map EDN onto the JSON data model so the record's serde impl can read it.
/// Keywords lose their leading `:` and string keys their quotes, so both
/// `{:port 80}` and `{"port" 80}` fill a `port` field. `#inst` and `#uuid`
/// unwrap to their string; other tagged values are rejected.
fn edn_to_json(edn: Edn) -> Result<Json, DecodeError> {
    Ok(match edn {
        Edn::Map(map) => Json::Object(
            map.to_map()
                .into_iter()
                .map(|(key, value)| Ok((map_key(&key).to_string(), edn_to_json(value)?)))
                .collect::<Result<_, DecodeError>>()?,
        ),
        Edn::Vector(items) => edn_array(items.to_vec())?,
        Edn::List(items) => edn_array(items.to_vec())?,
        Edn::Set(items) => edn_array(items.to_set())?,
        Edn::Key(key) => Json::String(map_key(&key).to_string()),
        Edn::Symbol(sym) => Json::String(sym),
        Edn::Str(s) => Json::String(s),
        Edn::Int(n) => Json::from(n),
        Edn::UInt(n) => Json::from(n),
        Edn::Bool(b) => Json::Bool(b),
        Edn::Char(c) => Json::String(c.to_string()),
        Edn::Nil => Json::Null,
        Edn::Tagged(tag, value) if tag == "inst" || tag == "uuid" => edn_to_json(*value)?,
        other => match other.to_float() {
            Some(n) => Json::from(n),
            None => return Err(DecodeError::Edn(format!("unsupported EDN value {other:?}"))),
        },
    })
}

fn edn_array(items: impl IntoIterator<Item = Edn>) -> Result<Json, DecodeError> {
    items
        .into_iter()
        .map(edn_to_json)
        .collect::<Result<_, _>>()
        .map(Json::Array)
}

fn map_key(key: &str) -> &str {
    if let Some(keyword) = key.strip_prefix(':') {
        return keyword;
    }
    key.strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .unwrap_or(key)
}
