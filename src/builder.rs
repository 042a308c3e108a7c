//! The [`Envfig`] entry point and its [`EnvfigBuilder`].
//!
//! The builder carries everything an operation needs besides the record:
//! the environment store, the parser registry, the root prefix and the
//! description header. Each operation borrows the builder, so one builder
//! can load, refresh and describe the same record.

use std::any::Any;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::coerce::Parsers;
use crate::describe;
use crate::env::{EnvStore, ProcessEnv};
use crate::error::{BoxError, EnvfigError};
use crate::file;
use crate::populate;
use crate::schema::Configure;
use crate::types::{EnvAction, EnvResult, Pass};

/// Entry point for building an envfig loader.
pub struct Envfig;

impl Envfig {
    /// A loader over the process environment with the built-in parsers.
    pub fn builder() -> EnvfigBuilder<ProcessEnv> {
        EnvfigBuilder::new(ProcessEnv)
    }
}

/// Loader settings shared by every operation:
///
/// - **Store**: [`env_store()`](Self::env_store): where variables are read
///   from and where dotenv files write to.
/// - **Namespace**: [`prefix()`](Self::prefix): prepended to every variable
///   name of the record.
/// - **Coercion**: [`parser()`](Self::parser): extra or replacement parsers.
pub struct EnvfigBuilder<E: EnvStore = ProcessEnv> {
    env: E,
    parsers: Parsers,
    prefix: String,
    header: Option<String>,
}

impl<E: EnvStore> EnvfigBuilder<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            parsers: Parsers::default(),
            prefix: String::new(),
            header: None,
        }
    }

    /// Replace the environment store, keeping every other setting.
    pub fn env_store<F: EnvStore>(self, env: F) -> EnvfigBuilder<F> {
        EnvfigBuilder {
            env,
            parsers: self.parsers,
            prefix: self.prefix,
            header: self.header,
        }
    }

    /// Root namespace, e.g. `SERVICE1_`. Group prefixes are appended to it.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Register a parser for `T`, replacing a built-in one if present.
    pub fn parser<T, F>(mut self, parse: F) -> Self
    where
        T: Any,
        F: Fn(&str, Option<&str>) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.parsers.register::<T, F>(parse);
        self
    }

    /// Replace the whole parser registry.
    pub fn parsers(mut self, parsers: Parsers) -> Self {
        self.parsers = parsers;
        self
    }

    /// Header line of [`describe()`](Self::describe) output
    /// (default `Environment variables:`).
    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_env(self) -> E {
        self.env
    }

    /// Load `path` into `cfg`, then populate it from the environment.
    ///
    /// Structured files are merged over the record's current values, so
    /// several files can be layered; dotenv files write their pairs into the
    /// store. Variables always win over file values.
    pub fn read_config<C>(&mut self, path: impl AsRef<Path>, cfg: &mut C) -> Result<(), EnvfigError>
    where
        C: Configure + Serialize + DeserializeOwned,
    {
        file::load_into(path.as_ref(), cfg, &mut self.env)?;
        self.read_env(cfg)
    }

    /// Populate every field of `cfg` from the environment.
    pub fn read_env<C: Configure>(&self, cfg: &mut C) -> Result<(), EnvfigError> {
        populate::populate(cfg, &self.env, &self.parsers, &self.prefix, Pass::Full)
    }

    /// Populate only the fields declared `updatable`.
    pub fn update_env<C: Configure>(&self, cfg: &mut C) -> Result<(), EnvfigError> {
        populate::populate(cfg, &self.env, &self.parsers, &self.prefix, Pass::UpdateOnly)
    }

    /// The environment variable listing for `cfg`. Empty when the record
    /// reads no variables.
    pub fn describe<C: Configure>(&self, cfg: &mut C) -> Result<String, EnvfigError> {
        describe::render(cfg, &self.prefix, self.header.as_deref())
    }

    /// One row per field with its primary variable, type, default, whether
    /// it is required, and its description.
    pub fn describe_table<C: Configure>(&self, cfg: &mut C) -> Result<String, EnvfigError> {
        describe::render_table(cfg, &self.prefix)
    }

    /// Write `preamble` (typically the application's own usage text), a blank
    /// line, and the description.
    pub fn write_usage<C, W>(
        &self,
        w: &mut W,
        cfg: &mut C,
        preamble: Option<&str>,
    ) -> Result<(), EnvfigError>
    where
        C: Configure,
        W: Write + ?Sized,
    {
        describe::write_usage(w, cfg, &self.prefix, self.header.as_deref(), preamble)
    }

    /// Handle an [`EnvAction`] and print the result to stdout.
    pub fn handle_and_print<C>(&mut self, action: &EnvAction, cfg: &mut C) -> Result<(), EnvfigError>
    where
        C: Configure + Serialize + DeserializeOwned,
    {
        let result = self.handle(action, cfg)?;
        print!("{result}");
        Ok(())
    }

    /// Handle an [`EnvAction`] (load / describe).
    pub fn handle<C>(&mut self, action: &EnvAction, cfg: &mut C) -> Result<EnvResult, EnvfigError>
    where
        C: Configure + Serialize + DeserializeOwned,
    {
        match action {
            EnvAction::Load { file: Some(path) } => self.read_config(path, cfg)?,
            EnvAction::Load { file: None } => self.read_env(cfg)?,
            EnvAction::Describe => return self.describe(cfg).map(EnvResult::Description),
        }
        Ok(EnvResult::Loaded)
    }
}
