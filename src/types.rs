use std::fmt;
use std::path::{Path, PathBuf};

/// Structured file formats understood by [`read_config`](crate::read_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.yaml` / `.yml`
    Yaml,
    Json,
    Toml,
    Edn,
    /// `.env`: pairs are written into the environment store, not the record.
    Dotenv,
}

impl Format {
    /// Format for a file extension, compared case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "edn" => Some(Format::Edn),
            "env" => Some(Format::Dotenv),
            _ => None,
        }
    }

    /// Format for a path. A bare dotfile such as `.env` counts as its own
    /// extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&extension(path))
    }
}

/// Lowercase extension of `path`, empty when it has none.
pub(crate) fn extension(path: &Path) -> String {
    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy(),
        None => match path.file_name().map(|name| name.to_string_lossy()) {
            Some(name) if name.len() > 1 && name.starts_with('.') => {
                return name[1..].to_ascii_lowercase();
            }
            _ => return String::new(),
        },
    };
    ext.to_ascii_lowercase()
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Edn => "edn",
            Format::Dotenv => "env",
        };
        f.write_str(name)
    }
}

/// Which fields a population pass touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pass {
    /// Every field.
    #[default]
    Full,
    /// Only fields declared [`updatable`](crate::FieldBuilder::updatable).
    UpdateOnly,
}

/// An environment operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvAction {
    /// Populate the record, reading `file` first when given.
    Load { file: Option<PathBuf> },
    /// Render the environment variable description.
    Describe,
}

/// Outcome of [`EnvfigBuilder::handle`](crate::EnvfigBuilder::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum EnvResult {
    Loaded,
    Description(String),
}

impl fmt::Display for EnvResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvResult::Loaded => Ok(()),
            EnvResult::Description(text) => writeln!(f, "{text}"),
        }
    }
}
