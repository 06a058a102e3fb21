//! # Domain Types
//!
//! Core domain types used by the product editor.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   PriceField    │   │    VatRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  SaleNet        │   │  id             │       │
//! │  │  2300 = 23%     │   │  SaleGross      │   │  rate (TaxRate) │       │
//! │  └─────────────────┘   │  PurchaseNet    │   │  description    │       │
//! │                        │  PurchaseGross  │   └─────────────────┘       │
//! │  ┌─────────────────┐   └─────────────────┘   ┌─────────────────┐       │
//! │  │   Percentage    │                         │  ProductMeta    │       │
//! │  │  bps (i64)      │                         │  name, code,    │       │
//! │  │  margin/markup  │                         │  barcode, ...   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{decimal_to_hundredths, parse_decimal};
use crate::pricing::ProductPriceState;
use crate::validation::ValidationResult;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. 2300 bps = 23%, the standard VAT rate.
/// Valid rates are `0..=10000` (0% to 100%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// 100% in basis points.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, rounded to 2 decimal places.
    ///
    /// ## Errors
    /// `ValidationError::TaxRateOutOfRange` unless `0 <= percent <= 100`.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockroom_core::types::TaxRate;
    ///
    /// let rate = TaxRate::from_percent(Decimal::new(23, 0)).unwrap();
    /// assert_eq!(rate.bps(), 2300);
    /// assert!(TaxRate::from_percent(Decimal::new(101, 0)).is_err());
    /// ```
    pub fn from_percent(percent: Decimal) -> ValidationResult<Self> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(ValidationError::TaxRateOutOfRange);
        }
        let bps = decimal_to_hundredths(percent).ok_or(ValidationError::TaxRateOutOfRange)?;
        Ok(TaxRate(bps as u32))
    }

    /// Parses typed percentage text (`"23"`, `"5,5"`).
    ///
    /// ## Errors
    /// `InvalidFormat` for text that is not a number, `TaxRateOutOfRange`
    /// outside `[0, 100]`.
    pub fn parse_percent(raw: &str) -> ValidationResult<Self> {
        let percent = parse_decimal(raw).ok_or_else(|| ValidationError::InvalidFormat {
            field: "taxRate".to_string(),
            reason: "must be a number".to_string(),
        })?;
        Self::from_percent(percent)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a 2-decimal percentage (`23.00`).
    #[inline]
    pub fn percent(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks the `[0, 100]` bound. Only rates built with `from_bps` can
    /// fail this.
    #[inline]
    pub const fn is_in_range(&self) -> bool {
        self.0 <= Self::MAX_BPS
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_VAT_BPS)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent().normalize())
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A signed 2-decimal percentage in basis points (3333 = 33.33%).
///
/// Used for margin and markup, which go negative when selling below cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(i64);

impl Percentage {
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percentage(bps)
    }

    /// Rounds a decimal percentage to 2 places, half away from zero.
    /// Values that do not fit become zero.
    pub fn from_decimal(percent: Decimal) -> Self {
        Percentage(decimal_to_hundredths(percent).unwrap_or(0))
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_decimal())
    }
}

// =============================================================================
// Price Fields
// =============================================================================

/// Which price pair an edit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceSide {
    Sale,
    Purchase,
}

/// Net (tax-exclusive) or gross (tax-inclusive) half of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceKind {
    Net,
    Gross,
}

/// One of the four editable price inputs.
///
/// Every synchronization decision is an exhaustive match on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PriceField {
    SaleNet,
    SaleGross,
    PurchaseNet,
    PurchaseGross,
}

impl PriceField {
    /// All four fields, in form order.
    pub const ALL: [PriceField; 4] = [
        PriceField::SaleNet,
        PriceField::SaleGross,
        PriceField::PurchaseNet,
        PriceField::PurchaseGross,
    ];

    pub const fn new(side: PriceSide, kind: PriceKind) -> Self {
        match (side, kind) {
            (PriceSide::Sale, PriceKind::Net) => PriceField::SaleNet,
            (PriceSide::Sale, PriceKind::Gross) => PriceField::SaleGross,
            (PriceSide::Purchase, PriceKind::Net) => PriceField::PurchaseNet,
            (PriceSide::Purchase, PriceKind::Gross) => PriceField::PurchaseGross,
        }
    }

    pub const fn side(&self) -> PriceSide {
        match self {
            PriceField::SaleNet | PriceField::SaleGross => PriceSide::Sale,
            PriceField::PurchaseNet | PriceField::PurchaseGross => PriceSide::Purchase,
        }
    }

    pub const fn kind(&self) -> PriceKind {
        match self {
            PriceField::SaleNet | PriceField::PurchaseNet => PriceKind::Net,
            PriceField::SaleGross | PriceField::PurchaseGross => PriceKind::Gross,
        }
    }

    /// The other half of this field's pair.
    pub const fn paired(&self) -> PriceField {
        match self {
            PriceField::SaleNet => PriceField::SaleGross,
            PriceField::SaleGross => PriceField::SaleNet,
            PriceField::PurchaseNet => PriceField::PurchaseGross,
            PriceField::PurchaseGross => PriceField::PurchaseNet,
        }
    }

    /// camelCase name used in payloads and error maps.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PriceField::SaleNet => "saleNet",
            PriceField::SaleGross => "saleGross",
            PriceField::PurchaseNet => "purchaseNet",
            PriceField::PurchaseGross => "purchaseGross",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Backend identity of a persisted product.
///
/// Opaque: the admin backend may use numeric or UUID keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// VAT Rate
// =============================================================================

/// An entry of the VAT rate registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatRate {
    pub id: String,
    pub rate: TaxRate,
    pub description: String,
}

impl VatRate {
    pub fn new(id: impl Into<String>, rate: TaxRate, description: impl Into<String>) -> Self {
        VatRate {
            id: id.into(),
            rate,
            description: description.into(),
        }
    }
}

// =============================================================================
// Product Form
// =============================================================================

/// Non-price fields of the product form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    /// Display name, required.
    pub name: String,

    /// Internal product code, optional, at least 3 characters when present.
    #[serde(default)]
    pub product_code: String,

    /// EAN-13 barcode, optional.
    #[serde(default)]
    pub barcode: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub manufacturer_id: Option<String>,

    /// Unit of measure ("szt", "kg", ...).
    #[serde(default)]
    pub unit: Option<String>,
}

/// Text fields of [`ProductMeta`] that the editor can change one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum MetaField {
    Name,
    ProductCode,
    Barcode,
    Description,
    CategoryId,
    ManufacturerId,
    Unit,
}

impl ProductMeta {
    /// Sets one field. Empty values clear the optional fields.
    pub fn set(&mut self, field: MetaField, value: &str) {
        let optional = || {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        match field {
            MetaField::Name => self.name = value.to_string(),
            MetaField::ProductCode => self.product_code = value.trim().to_string(),
            MetaField::Barcode => self.barcode = value.trim().to_string(),
            MetaField::Description => self.description = optional(),
            MetaField::CategoryId => self.category_id = optional(),
            MetaField::ManufacturerId => self.manufacturer_id = optional(),
            MetaField::Unit => self.unit = optional(),
        }
    }
}

/// Everything the save endpoint receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(flatten)]
    pub meta: ProductMeta,

    #[serde(flatten)]
    pub prices: ProductPriceState,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_rate_from_percent() {
        assert_eq!(TaxRate::from_percent(dec!(23)).unwrap().bps(), 2300);
        assert_eq!(TaxRate::from_percent(dec!(5.5)).unwrap().bps(), 550);
        assert_eq!(TaxRate::from_percent(dec!(0)).unwrap().bps(), 0);
        assert_eq!(TaxRate::from_percent(dec!(100)).unwrap().bps(), 10000);
        assert_eq!(TaxRate::from_percent(dec!(8.255)).unwrap().bps(), 826);
    }

    #[test]
    fn test_tax_rate_out_of_range() {
        assert!(matches!(
            TaxRate::from_percent(dec!(-0.01)),
            Err(ValidationError::TaxRateOutOfRange)
        ));
        assert!(TaxRate::from_percent(dec!(100.01)).is_err());
        assert!(!TaxRate::from_bps(10001).is_in_range());
    }

    #[test]
    fn test_tax_rate_parse_percent() {
        assert_eq!(TaxRate::parse_percent(" 8 ").unwrap().bps(), 800);
        assert_eq!(TaxRate::parse_percent("5,5").unwrap().bps(), 550);
        assert_eq!(
            TaxRate::parse_percent("150"),
            Err(ValidationError::TaxRateOutOfRange)
        );
        assert!(matches!(
            TaxRate::parse_percent("abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_tax_rate_default_is_standard_vat() {
        assert_eq!(TaxRate::default().bps(), 2300);
        assert_eq!(TaxRate::default().to_string(), "23%");
        assert_eq!(TaxRate::from_bps(550).to_string(), "5.5%");
    }

    #[test]
    fn test_percentage_from_decimal() {
        assert_eq!(Percentage::from_decimal(dec!(33.333)).bps(), 3333);
        assert_eq!(Percentage::from_decimal(dec!(-12.345)).bps(), -1235);
        assert_eq!(Percentage::from_bps(5000).to_string(), "50.00%");
    }

    #[test]
    fn test_price_field_structure() {
        for field in PriceField::ALL {
            assert_eq!(PriceField::new(field.side(), field.kind()), field);
            assert_eq!(field.paired().paired(), field);
            assert_eq!(field.paired().side(), field.side());
            assert_ne!(field.paired().kind(), field.kind());
        }
    }

    #[test]
    fn test_price_field_serializes_camel_case() {
        let json = serde_json::to_string(&PriceField::PurchaseGross).unwrap();
        assert_eq!(json, "\"purchaseGross\"");
        assert_eq!(PriceField::SaleNet.to_string(), "saleNet");
    }

    #[test]
    fn test_meta_set_clears_optional_fields() {
        let mut meta = ProductMeta::default();
        meta.set(MetaField::Unit, "kg");
        assert_eq!(meta.unit.as_deref(), Some("kg"));
        meta.set(MetaField::Unit, "  ");
        assert_eq!(meta.unit, None);

        meta.set(MetaField::Barcode, " 5901234123457 ");
        assert_eq!(meta.barcode, "5901234123457");
    }
}
