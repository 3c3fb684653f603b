//! Teteu Core - Shared customization types.
//!
//! This crate provides the domain shared by all storefront components:
//! - `storefront` - Public customization site and maintenance panel
//! - `cli` - Command-line tools for migrations and record maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Database encoding is available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Customization records, options, identifiers and validation
//! - [`preview`] - Mapping from a selection to its preview image path

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod preview;
pub mod types;

pub use types::*;
