//! Command-line interface for tau.
//!
//! `tau replay` drives the full session pipeline from a recorded notification
//! stream; `tau encode-key` prints the editor notation for one key press.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tau_input::{Modifiers, encode_key};

/// tau - redraw-protocol interpreter and cell-grid compositor
#[derive(Parser)]
#[command(name = "tau")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ~/.config/tau/config.yaml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded notification stream (one JSON notification per line)
    Replay {
        /// JSON-lines file of `["method", [params...]]` notifications
        file: PathBuf,

        /// Write the presented frame (with cursor) to this PNG file
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Viewport width in pixels (overrides config)
        #[arg(long)]
        width: Option<u32>,

        /// Viewport height in pixels (overrides config)
        #[arg(long)]
        height: Option<u32>,

        /// Font family to rasterize with (overrides config)
        #[arg(long)]
        font: Option<String>,
    },

    /// Print the editor notation for a key press
    EncodeKey {
        /// Raw key name (`a`, `Enter`, `ArrowUp`, ` `)
        key: String,

        #[arg(long)]
        alt: bool,

        #[arg(long)]
        shift: bool,

        #[arg(long)]
        ctrl: bool,
    },
}

/// Options for a replay run.
#[derive(Clone, Debug, Default)]
pub struct ReplayOptions {
    pub file: PathBuf,
    /// PNG destination for the final frame
    pub out: Option<PathBuf>,
    /// Viewport overrides in pixels
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub font_family: Option<String>,
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub replay: ReplayOptions,
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with a replay run
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();

    match cli.command {
        Commands::EncodeKey {
            key,
            alt,
            shift,
            ctrl,
        } => match encode_key(&key, Modifiers::new(alt, shift, ctrl)) {
            Ok(encoded) => {
                println!("{encoded}");
                CliResult::Exit(0)
            }
            Err(e) => {
                eprintln!("tau: {e}");
                CliResult::Exit(1)
            }
        },
        Commands::Replay {
            file,
            out,
            width,
            height,
            font,
        } => {
            CliResult::Continue(RuntimeOptions {
                replay: ReplayOptions {
                    file,
                    out,
                    width,
                    height,
                    font_family: font,
                },
                config_path: cli.config,
                log_level: cli.log_level.map(|l| l.to_level_filter()),
            })
        }
    }
}
