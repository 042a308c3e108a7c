//! Fill typed configuration records from config files and environment
//! variables. Declare the fields once, point at the environment, and go.
//!
//! ```ignore
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct AppConfig {
//!     port: u16,
//!     database: DbConfig,
//! }
//!
//! impl Configure for AppConfig {
//!     fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
//!         f.field("port", &mut self.port).env("PORT").default("8080");
//!         f.group("database", &mut self.database).prefix("DB_");
//!     }
//! }
//!
//! let mut cfg = AppConfig::default();
//! envfig::read_config("config.yml", &mut cfg)?;
//! ```
//!
//! That call decodes `config.yml` into the record, then overlays every field
//! that has an environment variable set, fills zero-valued fields from their
//! defaults, and fails if a required field is still empty.
//!
//! # Declaring fields
//!
//! Rust has no struct tags, so a record describes itself by implementing
//! [`Configure`]. The [`Fields`] collector takes a mutable reference to each
//! field plus its metadata:
//!
//! | Builder method | Meaning |
//! |----------------|---------|
//! | `.env("A,B")` | variable names, highest priority first; `A` is primary |
//! | `.default("x")` | raw value used when no variable is set and the field is zero |
//! | `.required()` | fail when no variable is set and the field is zero |
//! | `.separator(";")` | element separator for sequences and maps (default `,`) |
//! | `.layout("%d/%m/%Y")` | `chrono` strftime layout for timestamps (default RFC 3339) |
//! | `.updatable()` | include the field in [`update_env`] passes |
//! | `.description("…")` | text for [`describe`] |
//!
//! Nested records are declared with [`Fields::group`]; `.prefix("DB_")`
//! prepends to the names of every field inside, after the prefixes of the
//! enclosing groups. Leaves of a record are visited before the leaves of its
//! groups.
//!
//! # Coercion
//!
//! How a raw string becomes a value is picked when the field is declared:
//!
//! - **[`field`](Fields::field)**: any [`EnvValue`]. Built in for `bool`
//!   (`1 t T TRUE true True` / `0 f F FALSE false False`), every integer width
//!   (`0x` hex, `0o` or a leading `0` octal, `0b` binary, `_` between
//!   digits), floats, `String`, `PathBuf`,
//!   `Duration` (`1h 30m`), `Option<T>`, `Vec<T>`, `HashMap`/`BTreeMap`
//!   (`key:value` pairs), `Vec<u8>` (raw bytes), `chrono` timestamps,
//!   `url::Url` and `chrono_tz::Tz`.
//! - **[`parsed`](Fields::parsed)**: any `FromStr` type.
//! - **[`setter`](Fields::setter)**: types implementing [`Setter`], which
//!   update themselves in place.
//! - **[`opaque`](Fields::opaque)**: anything else. Only a registered parser
//!   can populate it.
//!
//! A parser registered in [`Parsers`] for the exact target type always wins,
//! including for elements of sequences and maps. Register your own with
//! [`EnvfigBuilder::parser`].
//!
//! # Precedence
//!
//! ```text
//! Value already in the record   (zero value counts as unset)
//!        ↑ overridden by
//! Config file                   read_config() only
//!        ↑ overridden by
//! Environment variable          first set name in the field's list wins
//! ```
//!
//! Defaults only fill fields that are still zero after the file, so a
//! default never overrides a file value. A variable set to the empty string
//! is still set.
//!
//! # Config files
//!
//! The extension picks the format: `.yaml`/`.yml`, `.json`, `.toml`, `.edn`,
//! or `.env`. Structured formats are merged over the record's current values
//! through serde, so keys the file omits keep what the record held and
//! several files can be read into one record in turn. Mark the record
//! `#[serde(default)]` so partial files deserialize. A dotenv
//! file is different: its pairs are written into the environment store and
//! picked up by the population pass that follows.
//!
//! # Environment stores
//!
//! Population reads through an [`EnvStore`]. [`Envfig::builder()`] uses the
//! process environment; tests and embedders can swap in a [`MapEnv`] with
//! [`env_store()`](EnvfigBuilder::env_store).
//!
//! # Help output
//!
//! [`describe`] renders one entry per variable, with alternatives pointing
//! at their primary name and defaults quoted. [`write_usage`] appends it to
//! your own usage text. With the `clap` feature (on by default),
//! [`env_help()`] attaches it to a `clap::Command`, and [`EnvArgs`] adds
//! `--config` and `--env-help` flags.
//!
//! # Error handling
//!
//! All fallible operations return [`EnvfigError`]. Parse failures carry the
//! field path and the variable that supplied the value; see the [`error`]
//! module for the full set. Population stops at the first failure; fields
//! assigned before it keep their new values.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod composite;
mod describe;
mod env;
mod file;
mod merge;
mod opaque;
mod populate;
mod schema;
mod value;

#[cfg(test)]
mod fixtures;

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use builder::{Envfig, EnvfigBuilder};
#[cfg(feature = "clap")]
pub use cli::{EnvArgs, env_help};
pub use coerce::{DEFAULT_SEPARATOR, ParseContext, Parsers, Setter};
pub use describe::DEFAULT_HEADER;
pub use env::{EnvStore, MapEnv, ProcessEnv};
pub use error::{BoxError, EnvfigError};
pub use opaque::DATE_LAYOUT;
pub use schema::{Configure, FieldBuilder, Fields, GroupBuilder};
pub use types::{EnvAction, EnvResult, Format, Pass};
pub use value::EnvValue;

/// Read `path` into `cfg`, then overlay the process environment.
pub fn read_config<C>(path: impl AsRef<Path>, cfg: &mut C) -> Result<(), EnvfigError>
where
    C: Configure + Serialize + DeserializeOwned,
{
    Envfig::builder().read_config(path, cfg)
}

/// Populate `cfg` from the process environment.
pub fn read_env<C: Configure>(cfg: &mut C) -> Result<(), EnvfigError> {
    Envfig::builder().read_env(cfg)
}

/// Re-read only the fields declared `updatable`.
pub fn update_env<C: Configure>(cfg: &mut C) -> Result<(), EnvfigError> {
    Envfig::builder().update_env(cfg)
}

/// Describe the variables `cfg` reads, under `header` or the default one.
pub fn describe<C: Configure>(cfg: &mut C, header: Option<&str>) -> Result<String, EnvfigError> {
    let builder = Envfig::builder();
    match header {
        Some(header) => builder.header(header).describe(cfg),
        None => builder.describe(cfg),
    }
}

/// Write `preamble`, a blank line and the description of `cfg` to `w`.
pub fn write_usage<C, W>(w: &mut W, cfg: &mut C, preamble: Option<&str>) -> Result<(), EnvfigError>
where
    C: Configure,
    W: Write + ?Sized,
{
    Envfig::builder().write_usage(w, cfg, preamble)
}
