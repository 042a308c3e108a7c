//! # envfig demo application
//!
//! A sample CLI tool that shows how to wire [envfig](https://docs.rs/envfig)
//! into a real application. It does nothing useful on its own; it exists to
//! demonstrate and manually verify envfig's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example envfig_demo -- echo
//! cargo run --example envfig_demo -- --env-help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                 | How to exercise it                                                         |
//! |-------------------------|----------------------------------------------------------------------------|
//! | Defaults                | `cargo run --example envfig_demo -- echo`                                  |
//! | Env var override        | `ENVFIG_DEMO_DISPLAY_COLOR=red cargo run --example envfig_demo -- echo`    |
//! | Alternative name        | `ENVFIG_DEMO_SERVER_LISTEN_PORT=9999 cargo run --example envfig_demo -- echo` |
//! | Custom separator        | `ENVFIG_DEMO_SERVER_ALLOWED='10.0.0.0/8;127.0.0.1' cargo run ... -- echo`  |
//! | Time zone parsing       | `ENVFIG_DEMO_DISPLAY_ZONE=Europe/Paris cargo run ... -- echo`              |
//! | Config file             | `cargo run --example envfig_demo -- --config demo.yaml echo`               |
//! | Dotenv file             | `cargo run --example envfig_demo -- --config .env echo`                    |
//! | Help listing            | `cargo run --example envfig_demo -- --help`                                |
//! | `--env-help`            | `cargo run --example envfig_demo -- --env-help`                            |
//! | Table listing           | `cargo run --example envfig_demo -- vars`                                  |
//! | Single key echo         | `cargo run --example envfig_demo -- echo --key server.port`                |

mod config;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use envfig::{EnvArgs, EnvResult, Envfig, EnvfigError};

use config::DemoConfig;

const PREFIX: &str = "ENVFIG_DEMO_";

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// envfig demo: a sample CLI app for showcasing envfig integration.
#[derive(Parser, Debug)]
#[command(name = "envfig-demo")]
struct Cli {
    /// Enable verbose output regardless of ENVFIG_DEMO_VERBOSE.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(flatten)]
    env: EnvArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print resolved configuration values (colored by display.color).
    Echo {
        /// Print only this dotted key instead of all values.
        #[arg(long)]
        key: Option<String>,
    },
    /// List the environment variables as a table.
    Vars,
}

// ---------------------------------------------------------------------------
// ANSI color helpers
// ---------------------------------------------------------------------------

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn entries(config: &DemoConfig) -> Vec<(&'static str, String)> {
    vec![
        ("name", config.name.clone()),
        ("verbose", config.verbose.to_string()),
        ("server.host", config.server.host.clone()),
        ("server.port", config.server.port.to_string()),
        (
            "server.timeout",
            humantime::format_duration(config.server.timeout).to_string(),
        ),
        ("server.allowed", config.server.allowed.join(";")),
        ("display.color", config.display.color.clone()),
        (
            "display.zone",
            config
                .display
                .zone
                .map(|tz| tz.name().to_string())
                .unwrap_or_default(),
        ),
    ]
}

fn banner(config: &DemoConfig) {
    let color = ansi_color_code(&config.display.color);
    let now = chrono::Utc::now();
    let stamp = match config.display.zone {
        Some(tz) => now.with_timezone(&tz).to_rfc3339(),
        None => now.to_rfc3339(),
    };
    println!("{color}[verbose] {} at {stamp}{RESET}", config.name);
    println!();
}

fn echo_all(config: &DemoConfig) {
    let color = ansi_color_code(&config.display.color);
    if config.verbose {
        banner(config);
    }

    let entries = entries(config);
    let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &entries {
        println!("{color}{key:<max_key_len$}{RESET}  {value}");
    }
}

fn echo_key(config: &DemoConfig, key: &str) {
    let color = ansi_color_code(&config.display.color);
    match entries(config).into_iter().find(|(k, _)| *k == key) {
        Some((key, value)) => println!("{color}{key}{RESET}  {value}"),
        None => {
            eprintln!("Unknown key: {key}");
            std::process::exit(1);
        }
    }
}

fn exit_with(context: &str, err: EnvfigError) -> ! {
    eprintln!("{context}:\n{err}");
    std::process::exit(1);
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let mut builder = Envfig::builder().prefix(PREFIX);

    let cmd = builder
        .env_help(Cli::command(), &mut DemoConfig::default())
        .unwrap_or_else(|e| exit_with("Invalid config declaration", e));
    let cli = Cli::from_arg_matches(&cmd.get_matches()).unwrap_or_else(|e| e.exit());

    if let Some(Commands::Vars) = cli.command {
        let table = builder
            .describe_table(&mut DemoConfig::default())
            .unwrap_or_else(|e| exit_with("Invalid config declaration", e));
        print!("{table}");
        return;
    }

    let mut config = DemoConfig::default();
    let result = builder
        .handle(&cli.env.into_action(), &mut config)
        .unwrap_or_else(|e| exit_with("Failed to load config", e));
    if let EnvResult::Description(_) = result {
        print!("{result}");
        return;
    }
    config.verbose |= cli.verbose;

    match cli.command {
        Some(Commands::Echo { key: Some(key) }) => echo_key(&config, &key),
        _ => echo_all(&config),
    }
}
