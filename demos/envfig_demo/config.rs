//! Configuration records for the envfig demo application.
//!
//! The root [`DemoConfig`] holds two groups, [`ServerConfig`] and
//! [`DisplayConfig`]. With the root prefix `ENVFIG_DEMO_` set by the demo,
//! variables map like this:
//!
//! | Env var                            | Field                    |
//! |------------------------------------|--------------------------|
//! | `ENVFIG_DEMO_NAME`                 | `name`                   |
//! | `ENVFIG_DEMO_VERBOSE`              | `verbose`                |
//! | `ENVFIG_DEMO_SERVER_HOST`          | `server.host`            |
//! | `ENVFIG_DEMO_SERVER_PORT`          | `server.port`            |
//! | `ENVFIG_DEMO_SERVER_LISTEN_PORT`   | `server.port` (fallback) |
//! | `ENVFIG_DEMO_SERVER_TIMEOUT`       | `server.timeout`         |
//! | `ENVFIG_DEMO_SERVER_ALLOWED`       | `server.allowed`         |
//! | `ENVFIG_DEMO_DISPLAY_COLOR`        | `display.color`          |
//! | `ENVFIG_DEMO_DISPLAY_ZONE`         | `display.zone`           |

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use envfig::{Configure, Fields};

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct DemoConfig {
    pub name: String,
    pub verbose: bool,
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

impl Configure for DemoConfig {
    fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
        f.field("name", &mut self.name)
            .env("NAME")
            .default("envfig-demo")
            .description("Application name shown in the echo banner");
        f.field("verbose", &mut self.verbose)
            .env("VERBOSE")
            .updatable()
            .description("Enable verbose output");
        f.group("server", &mut self.server).prefix("SERVER_");
        f.group("display", &mut self.display).prefix("DISPLAY_");
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(with = "duration_text")]
    pub timeout: Duration,
    pub allowed: Vec<String>,
}

impl Configure for ServerConfig {
    fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
        f.field("host", &mut self.host)
            .env("HOST")
            .default("127.0.0.1")
            .description("Hostname to bind to");
        f.field("port", &mut self.port)
            .env("PORT,LISTEN_PORT")
            .default("3000")
            .description("Port number");
        f.field("timeout", &mut self.timeout)
            .env("TIMEOUT")
            .default("30s")
            .updatable()
            .description("Request timeout");
        f.field("allowed", &mut self.allowed)
            .env("ALLOWED")
            .separator(";")
            .description("Allowed client networks, separated by ';'");
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: String,
    pub zone: Option<Tz>,
}

impl Configure for DisplayConfig {
    fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
        f.field("color", &mut self.color)
            .env("COLOR")
            .default("yellow")
            .description("Terminal color for the echo command output");
        f.field("zone", &mut self.zone)
            .env("ZONE")
            .description("Time zone used for the timestamp in the banner");
    }
}

/// Durations in config files are written the same way as in variables.
mod duration_text {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(D::Error::custom)
    }
}
