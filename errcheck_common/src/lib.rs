//! errcheck Common Library
//!
//! This crate provides the constants and configuration loading utilities
//! shared by the errcheck workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Failure sentinel, raw code values and fixed bounds
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use errcheck_common::consts::FAILURE_SENTINEL;
//! use errcheck_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
