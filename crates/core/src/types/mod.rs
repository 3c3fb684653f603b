//! Core types for the customization storefront.
//!
//! This module provides type-safe wrappers for the customization domain.

pub mod customization;
pub mod id;
pub mod options;

pub use customization::{
    CustomizationRecord, CustomizationStats, NewCustomization, ValidationError, expires_at,
    retention_cutoff, sanitize_label,
};
pub use id::{CustomizationId, CustomizationIdError};
pub use options::{Color, Hardware, OptionParseError};
