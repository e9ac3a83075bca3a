//! # errcheck Demo Library
//!
//! Simulated device bring-up written with checked calls. Every fallible
//! step is one line; the first failure ends the sequence and the
//! diagnostic slot names the cause.
//!
//! # Module Structure
//!
//! - [`codes`] - The [`InitError`](codes::InitError) code set
//! - [`hardware`] - Simulated peripherals and the board holding them
//! - [`sites`] - Build-time forced sites selected by `inject-*` features
//! - [`scenarios`] - Bring-up sequences and the periodic radio loop
//! - [`controller`] - Runtime injection controllers (schedule, console)
//! - [`config`] - TOML configuration for the binary
//! - [`error`] - Infrastructure errors

pub mod codes;
pub mod config;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod scenarios;
pub mod sites;

pub use crate::codes::InitError;
pub use crate::config::DemoConfig;
pub use crate::error::DemoError;
pub use crate::hardware::Board;
