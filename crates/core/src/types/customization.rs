//! Customization records and the validation applied before one is created.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::id::CustomizationId;
use super::options::{Color, Hardware};
use crate::preview;

/// Wire values accepted for `color`, as listed in error messages.
const AVAILABLE_COLORS: &str = "black, brown, light-brown";

/// Wire values accepted for `hardware`, as listed in error messages.
const AVAILABLE_HARDWARE: &str = "silver, gold";

/// Characters stripped from free-text labels submitted by browsers.
const UNSAFE_LABEL_CHARS: &[char] = &['<', '>', '"', '\'', '&'];

/// Errors that can occur when validating a customization request.
///
/// Messages are safe to show to shoppers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The product label is empty after trimming.
    #[error("product is required")]
    EmptyProduct,
    /// A required option was left blank.
    #[error("the {0} field is required")]
    MissingField(&'static str),
    /// The color is not one of the enumerated colors.
    #[error(
        "color '{0}' is not valid. Available colors: {available}",
        available = AVAILABLE_COLORS
    )]
    InvalidColor(String),
    /// The hardware is not one of the enumerated finishes.
    #[error(
        "hardware '{0}' is not valid. Available hardware: {available}",
        available = AVAILABLE_HARDWARE
    )]
    InvalidHardware(String),
}

/// Remove markup-significant characters from a free-text label and trim it.
///
/// ```
/// use teteu_core::sanitize_label;
///
/// assert_eq!(sanitize_label("  <b>Urban Tote</b> "), "bUrban Tote/b");
/// assert_eq!(sanitize_label("Tom's \"Classic\" Wallet"), "Toms Classic Wallet");
/// ```
#[must_use]
pub fn sanitize_label(input: &str) -> String {
    input
        .chars()
        .filter(|c| !UNSAFE_LABEL_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// A validated request to create a customization record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomization {
    product: String,
    color: Color,
    hardware: Hardware,
}

impl NewCustomization {
    /// Validate raw input.
    ///
    /// The product label is trimmed; color and hardware are trimmed and must
    /// match a wire value exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn parse(product: &str, color: &str, hardware: &str) -> Result<Self, ValidationError> {
        let product = product.trim();
        if product.is_empty() {
            return Err(ValidationError::EmptyProduct);
        }

        let color = color.trim();
        if color.is_empty() {
            return Err(ValidationError::MissingField("color"));
        }
        let hardware = hardware.trim();
        if hardware.is_empty() {
            return Err(ValidationError::MissingField("hardware"));
        }

        let color = color
            .parse::<Color>()
            .map_err(|_| ValidationError::InvalidColor(color.to_owned()))?;
        let hardware = hardware
            .parse::<Hardware>()
            .map_err(|_| ValidationError::InvalidHardware(hardware.to_owned()))?;

        Ok(Self {
            product: product.to_owned(),
            color,
            hardware,
        })
    }

    /// Build directly from typed options.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the product label is empty.
    pub fn new(product: &str, color: Color, hardware: Hardware) -> Result<Self, ValidationError> {
        Self::parse(product, color.as_str(), hardware.as_str())
    }

    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn hardware(&self) -> Hardware {
        self.hardware
    }

    /// Turn the request into an active record with the given identity.
    #[must_use]
    pub fn into_record(self, id: CustomizationId, created_at: DateTime<Utc>) -> CustomizationRecord {
        CustomizationRecord {
            id,
            product: self.product,
            color: self.color,
            hardware: self.hardware,
            created_at,
            active: true,
        }
    }
}

/// One shopper's product/color/hardware selection.
///
/// Records are never edited after creation. The only transition is
/// `active` going from `true` to `false` (soft delete or expiry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CustomizationRecord {
    pub id: CustomizationId,
    pub product: String,
    pub color: Color,
    pub hardware: Hardware,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl CustomizationRecord {
    /// Whether the record is older than `retention_days` at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, retention_days: u32) -> bool {
        retention_cutoff(now, retention_days).is_some_and(|cutoff| self.created_at < cutoff)
    }

    /// Preview image path for this combination.
    #[must_use]
    pub fn image_path(&self) -> String {
        preview::resolve(&self.product, self.color.as_str(), self.hardware.as_str())
    }

    /// Generic image for the record's model, used when the composed image is missing.
    #[must_use]
    pub fn default_image_path(&self) -> &'static str {
        preview::default_image(&self.product)
    }
}

/// Records created strictly before the returned instant are expired.
///
/// `None` when the window reaches past the earliest representable instant,
/// in which case nothing can be old enough to expire.
#[must_use]
pub fn retention_cutoff(now: DateTime<Utc>, retention_days: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(TimeDelta::days(i64::from(retention_days)))
}

/// Last instant a record created at `created_at` is still live, or `None` if
/// the window outlasts the calendar.
#[must_use]
pub fn expires_at(created_at: DateTime<Utc>, retention_days: u32) -> Option<DateTime<Utc>> {
    created_at.checked_add_signed(TimeDelta::days(i64::from(retention_days)))
}

/// Counts of active records per option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationStats {
    pub total_active: u64,
    pub by_color: BTreeMap<Color, u64>,
    pub by_hardware: BTreeMap<Hardware, u64>,
}

impl CustomizationStats {
    /// Tally the active records in `records`; inactive ones are skipped.
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a CustomizationRecord>) -> Self {
        let mut stats = Self::default();
        for record in records.into_iter().filter(|r| r.active) {
            stats.total_active += 1;
            *stats.by_color.entry(record.color).or_default() += 1;
            *stats.by_hardware.entry(record.hardware).or_default() += 1;
        }
        stats
    }

    /// Number of active records with `color`.
    #[must_use]
    pub fn color_count(&self, color: Color) -> u64 {
        self.by_color.get(&color).copied().unwrap_or(0)
    }

    /// Number of active records with `hardware`.
    #[must_use]
    pub fn hardware_count(&self, hardware: Hardware) -> u64 {
        self.by_hardware.get(&hardware).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let new = NewCustomization::parse("Classic Wallet", "light-brown", "gold").unwrap();
        assert_eq!(new.product(), "Classic Wallet");
        assert_eq!(new.color(), Color::LightBrown);
        assert_eq!(new.hardware(), Hardware::Gold);
    }

    #[test]
    fn test_parse_trims_fields() {
        let new = NewCustomization::parse("  Urban Tote ", " brown ", "silver\n").unwrap();
        assert_eq!(new.product(), "Urban Tote");
        assert_eq!(new.color(), Color::Brown);
        assert_eq!(new.hardware(), Hardware::Silver);
    }

    #[test]
    fn test_parse_empty_product() {
        assert_eq!(
            NewCustomization::parse("   ", "black", "gold"),
            Err(ValidationError::EmptyProduct)
        );
    }

    #[test]
    fn test_parse_accepts_long_product_labels() {
        let long = "Classic Wallet ".repeat(10);
        let new = NewCustomization::parse(&long, "black", "gold").unwrap();
        assert_eq!(new.product(), long.trim());
    }

    #[test]
    fn test_parse_missing_fields() {
        assert_eq!(
            NewCustomization::parse("Wallet", "", "gold"),
            Err(ValidationError::MissingField("color"))
        );
        assert_eq!(
            NewCustomization::parse("Wallet", "black", " "),
            Err(ValidationError::MissingField("hardware"))
        );
    }

    #[test]
    fn test_parse_invalid_options() {
        let err = NewCustomization::parse("Wallet", "purple", "gold").unwrap_err();
        assert_eq!(
            err.to_string(),
            "color 'purple' is not valid. Available colors: black, brown, light-brown"
        );

        let err = NewCustomization::parse("Wallet", "black", "bronze").unwrap_err();
        assert_eq!(
            err.to_string(),
            "hardware 'bronze' is not valid. Available hardware: silver, gold"
        );
    }

    #[test]
    fn test_available_lists_match_enums() {
        let colors: Vec<_> = Color::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(colors.join(", "), AVAILABLE_COLORS);

        let hardware: Vec<_> = Hardware::ALL.iter().map(|h| h.as_str()).collect();
        assert_eq!(hardware.join(", "), AVAILABLE_HARDWARE);
    }

    #[test]
    fn test_into_record_is_active() {
        let now = Utc::now();
        let id = CustomizationId::generate();
        let record = NewCustomization::parse("Urban Tote", "brown", "gold")
            .unwrap()
            .into_record(id, now);

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, now);
        assert!(record.active);
        assert_eq!(record.image_path(), "/static/model2_brown_gold.jpg");
        assert_eq!(record.default_image_path(), "/static/model2.jpg");
    }

    #[test]
    fn test_is_expired_boundary() {
        let now = Utc::now();
        let record = NewCustomization::parse("Wallet", "black", "silver")
            .unwrap()
            .into_record(CustomizationId::generate(), now - TimeDelta::days(30));

        // Exactly at the window is not expired; one second past is.
        assert!(!record.is_expired(now, 30));
        assert!(record.is_expired(now + TimeDelta::seconds(1), 30));
    }

    #[test]
    fn test_huge_window_expires_nothing() {
        let now = Utc::now();
        let record = NewCustomization::parse("Wallet", "black", "silver")
            .unwrap()
            .into_record(CustomizationId::generate(), DateTime::<Utc>::MIN_UTC);

        assert_eq!(retention_cutoff(now, u32::MAX), None);
        assert!(!record.is_expired(now, u32::MAX));
        assert!(!record.is_expired(now, 200_000_000));
    }

    #[test]
    fn test_expires_at() {
        let created = Utc::now();
        assert_eq!(expires_at(created, 30), Some(created + TimeDelta::days(30)));
        assert_eq!(expires_at(DateTime::<Utc>::MAX_UTC, 1), None);
    }

    #[test]
    fn test_stats_tally_skips_inactive() {
        let now = Utc::now();
        let mut records = vec![
            NewCustomization::parse("A", "black", "gold")
                .unwrap()
                .into_record(CustomizationId::generate(), now),
            NewCustomization::parse("B", "black", "silver")
                .unwrap()
                .into_record(CustomizationId::generate(), now),
            NewCustomization::parse("C", "brown", "gold")
                .unwrap()
                .into_record(CustomizationId::generate(), now),
        ];
        records[2].active = false;

        let stats = CustomizationStats::tally(&records);
        assert_eq!(stats.total_active, 2);
        assert_eq!(stats.color_count(Color::Black), 2);
        assert_eq!(stats.color_count(Color::Brown), 0);
        assert_eq!(stats.hardware_count(Hardware::Gold), 1);
        assert_eq!(stats.hardware_count(Hardware::Silver), 1);
    }
}
