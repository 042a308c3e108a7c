//! Error types.
//!
//! [`EnvfigError`] is what every public operation returns. Coercion failures
//! are described by [`ParseError`] and wrapped with the field path and the
//! environment variable that produced the raw value. Declaration mistakes that
//! the type system cannot catch surface as [`SchemaError`], and file decoding
//! failures as [`DecodeError`].

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error used by user hooks and registered parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum EnvfigError {
    /// A required field resolved no value and still holds its zero value.
    #[error("field '{path}' is required but the value is not provided")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envfig::required),
            help("set one of the field's environment variables")
        )
    )]
    Required {
        path: String,
        /// Primary environment variable of the field, if it declares any.
        env: Option<String>,
    },

    /// A raw value could not be converted into the field's type.
    ///
    /// `env` is the variable the value was read from, or empty when the value
    /// came from the field's default.
    #[error("parsing field '{path}' env '{env}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envfig::parse)))]
    Parse {
        path: String,
        env: String,
        source: ParseError,
    },

    #[error(transparent)]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envfig::schema)))]
    Schema(#[from] SchemaError),

    #[error("config file parsing error: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envfig::decode)))]
    Decode { path: PathBuf, source: DecodeError },

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envfig::io)))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file format '{ext}' of {path} is not supported by the parser")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envfig::format),
            help("use one of: .yaml, .yml, .json, .toml, .edn, .env")
        )
    )]
    UnsupportedFormat { path: PathBuf, ext: String },

    /// The record's [`refresh`](crate::Configure::refresh) hook failed.
    #[error("config refresh failed: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envfig::refresh)))]
    Refresh(#[source] BoxError),

    #[error("Failed to write usage: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envfig::output)))]
    Output(#[from] std::io::Error),
}

/// A raw string could not be coerced into the target type.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid {kind} value {value:?}: {reason}")]
    Invalid {
        kind: String,
        value: String,
        reason: String,
    },

    /// A mapping entry without the `:` delimiter.
    #[error("invalid map item: {0:?}")]
    MalformedPair(String),

    /// No registered parser and no built-in coercion for the target type.
    #[error("unsupported type {0}")]
    UnsupportedType(String),

    /// Error returned by a user parser, `Setter` or `FromStr` implementation.
    #[error(transparent)]
    Custom(BoxError),
}

impl ParseError {
    pub(crate) fn invalid(kind: impl Into<String>, value: &str, reason: impl ToString) -> Self {
        ParseError::Invalid {
            kind: kind.into(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A field declaration that cannot be used for population.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field '{field}' declares an empty environment variable name")]
    EmptySourceName { field: String },

    #[error("field '{field}' declares an empty separator")]
    EmptySeparator { field: String },
}

/// Failure reported by a structured file decoder.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Edn(String),

    #[error(transparent)]
    Dotenv(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_formats_field_path() {
        let err = EnvfigError::Required {
            path: "database.host".into(),
            env: Some("DB_HOST".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("database.host"));
        assert!(msg.contains("required"));
    }

    #[test]
    fn parse_formats_path_env_and_cause() {
        let err = EnvfigError::Parse {
            path: "port".into(),
            env: "PORT".into(),
            source: ParseError::invalid("u16", "abc", "invalid digit found in string"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'port'"));
        assert!(msg.contains("'PORT'"));
        assert!(msg.contains("\"abc\""));
    }

    #[test]
    fn malformed_pair_names_the_pair() {
        let err = ParseError::MalformedPair("bad".into());
        assert_eq!(err.to_string(), "invalid map item: \"bad\"");
    }

    #[test]
    fn decode_error_has_parsing_prefix() {
        let source = serde_json::from_str::<u8>("{").unwrap_err();
        let err = EnvfigError::Decode {
            path: "cfg.json".into(),
            source: DecodeError::Json(source),
        };
        assert!(err.to_string().starts_with("config file parsing error:"));
    }

    #[test]
    fn schema_error_is_transparent() {
        let err: EnvfigError = SchemaError::EmptySeparator {
            field: "hosts".into(),
        }
        .into();
        assert_eq!(err.to_string(), "field 'hosts' declares an empty separator");
    }
}
