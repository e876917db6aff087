//! Configuration system for the tau editor front-end.
//!
//! This crate provides configuration loading, saving, and default values
//! for the grid front-end. It includes:
//!
//! - `Config`, the YAML-backed settings file
//! - `Color`, the 24-bit RGB type shared by config and renderer
//! - `LogLevel` for the debug log bridge
//! - Default value functions used by serde

pub mod color;
pub mod config;
pub mod defaults;
mod types;

pub use color::{Color, ParseColorError};
pub use config::Config;
pub use types::LogLevel;
