//! recreport client library.
//!
//! The binary is a thin wrapper around these modules:
//!
//! - [`cli`] - Command-line interface definition
//! - [`config`] - TOML configuration loading
//! - [`commands`] - The report generation workflow
//! - [`sink`] - CSV report writing
//! - [`error`] - Client error types

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod sink;
