//! Clap adapter for envfig.
//!
//! Compiled only with the `clap` Cargo feature (on by default). It offers two
//! things:
//!
//! - [`EnvArgs`], a derive struct to flatten into your `#[derive(Parser)]`
//!   struct. It adds `--config <FILE>` and `--env-help`, and converts into a
//!   framework-agnostic [`EnvAction`](crate::EnvAction) via
//!   [`EnvArgs::into_action()`].
//! - [`env_help()`], which appends the environment variable listing to a
//!   [`clap::Command`]'s help output.

use std::path::PathBuf;

use clap::{Args, Command};

use crate::builder::EnvfigBuilder;
use crate::describe;
use crate::env::EnvStore;
use crate::error::EnvfigError;
use crate::schema::Configure;
use crate::types::EnvAction;

/// Clap-derived flags for loading configuration.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     env: EnvArgs,
/// }
/// ```
#[derive(Debug, Args)]
pub struct EnvArgs {
    /// Read configuration from this file before the environment.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the environment variables the application reads and exit.
    #[arg(long)]
    pub env_help: bool,
}

impl EnvArgs {
    /// Convert clap-parsed args into an `EnvAction`. `--env-help` wins over
    /// `--config`.
    pub fn into_action(self) -> EnvAction {
        if self.env_help {
            EnvAction::Describe
        } else {
            EnvAction::Load { file: self.config }
        }
    }
}

/// Append the description of `cfg` to `cmd`'s help text.
///
/// A record without environment variables leaves the command unchanged.
pub fn env_help<C: Configure>(
    cmd: Command,
    cfg: &mut C,
    header: Option<&str>,
) -> Result<Command, EnvfigError> {
    let text = describe::render(cfg, "", header)?;
    Ok(attach(cmd, text))
}

impl<E: EnvStore> EnvfigBuilder<E> {
    /// Like [`env_help()`], using this builder's prefix and header.
    pub fn env_help<C: Configure>(&self, cmd: Command, cfg: &mut C) -> Result<Command, EnvfigError> {
        let text = self.describe(cfg)?;
        Ok(attach(cmd, text))
    }
}

fn attach(cmd: Command, text: String) -> Command {
    if text.is_empty() {
        return cmd;
    }
    cmd.after_help(text)
}
