//! # Validation Module
//!
//! The form gate run before a product is saved.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Edit time                                                    │
//! │  ├── Tax rate bounds (TaxRate::from_percent)                           │
//! │  └── Editing a field clears that field's error                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit time                                                  │
//! │  └── THIS MODULE: validate_form → FieldErrors                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Rejections surface as a single general error                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_barcode, validate_form};
//! use stockroom_core::{ProductMeta, ProductPriceState};
//!
//! assert!(validate_barcode("5901234123457").is_ok());
//!
//! let meta = ProductMeta { name: "Cola 330ml".into(), ..Default::default() };
//! assert!(validate_form(&ProductPriceState::default(), &meta).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::ProductPriceState;
use crate::types::{MetaField, PriceField, ProductMeta, TaxRate};
use crate::{BARCODE_LEN, MAX_NAME_LEN, MIN_PRODUCT_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Form Fields
// =============================================================================

/// Keys of the field error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    ProductCode,
    Barcode,
    TaxRate,
    SaleNet,
    SaleGross,
    PurchaseNet,
    PurchaseGross,
}

impl FormField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::ProductCode => "productCode",
            FormField::Barcode => "barcode",
            FormField::TaxRate => "taxRate",
            FormField::SaleNet => "saleNet",
            FormField::SaleGross => "saleGross",
            FormField::PurchaseNet => "purchaseNet",
            FormField::PurchaseGross => "purchaseGross",
        }
    }

    /// The error key of a meta field, if that field is validated at all.
    pub const fn for_meta(field: MetaField) -> Option<FormField> {
        match field {
            MetaField::Name => Some(FormField::Name),
            MetaField::ProductCode => Some(FormField::ProductCode),
            MetaField::Barcode => Some(FormField::Barcode),
            MetaField::Description
            | MetaField::CategoryId
            | MetaField::ManufacturerId
            | MetaField::Unit => None,
        }
    }
}

impl From<PriceField> for FormField {
    fn from(field: PriceField) -> Self {
        match field {
            PriceField::SaleNet => FormField::SaleNet,
            PriceField::SaleGross => FormField::SaleGross,
            PriceField::PurchaseNet => FormField::PurchaseNet,
            PriceField::PurchaseGross => FormField::PurchaseGross,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// `field -> message` map shown next to the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error, replacing any earlier one for the same field.
    pub fn insert(&mut self, field: FormField, error: &ValidationError) {
        self.0.insert(field, error.to_string());
    }

    /// Records `result`'s error, if any.
    pub fn check(&mut self, field: FormField, result: ValidationResult<()>) {
        if let Err(err) = result {
            self.insert(field, &err);
        }
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

// =============================================================================
// Form Gate
// =============================================================================

/// Checks every field of the product form.
///
/// An empty result means the form is valid.
pub fn validate_form(prices: &ProductPriceState, meta: &ProductMeta) -> FieldErrors {
    let mut errors = FieldErrors::new();

    errors.check(FormField::Name, validate_product_name(&meta.name));
    errors.check(FormField::ProductCode, validate_product_code(&meta.product_code));
    errors.check(FormField::Barcode, validate_barcode(&meta.barcode));
    errors.check(FormField::TaxRate, validate_tax_rate(prices.tax_rate));

    for field in PriceField::ALL {
        errors.check(field.into(), validate_price(field, prices.get(field)));
    }

    errors
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product code. Empty is allowed.
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    if !code.is_empty() && code.chars().count() < MIN_PRODUCT_CODE_LEN {
        return Err(ValidationError::TooShort {
            field: "productCode".to_string(),
            min: MIN_PRODUCT_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates an EAN-13 barcode. Empty is allowed.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_barcode;
///
/// assert!(validate_barcode("").is_ok());
/// assert!(validate_barcode("590123412345").is_err());
/// assert!(validate_barcode("59012341234AB").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    if barcode.is_empty() {
        return Ok(());
    }

    if barcode.len() != BARCODE_LEN || !barcode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: format!("must be exactly {BARCODE_LEN} digits"),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Prices may be zero but never negative.
pub fn validate_price(field: PriceField, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Tax rate must lie in `[0, 100]`.
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if !rate.is_in_range() {
        return Err(ValidationError::TaxRateOutOfRange);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
