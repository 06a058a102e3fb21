//! # stockroom-core: Pure Pricing Logic for the Stockroom Admin
//!
//! This crate holds the business rules of the product editor as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stockroom Admin Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Admin frontend / console                        │   │
//! │  │    Product form ──► price inputs ──► margin panel ──► Save     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           apps/admin (edit session + commands)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        stockroom-client (REST, margin strategies, VAT)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐     │   │
//! │  │   │  money   │  │ pricing  │  │  margin  │  │ validation │     │   │
//! │  │   │  Money   │  │ reducer  │  │ formulas │  │ FieldErrors│     │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TaxRate, PriceField, VatRate, ProductMeta, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Net/gross synchronization reducer
//! - [`margin`] - Local margin/markup/profit formula
//! - [`validation`] - Form validation gate
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{Money, PriceSide, ProductPriceState, TaxRate};
//!
//! let state = ProductPriceState::with_tax_rate(TaxRate::from_bps(2300))
//!     .set_net(PriceSide::Sale, Money::from_cents(10000));
//!
//! assert_eq!(state.gross_sale.cents(), 12300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod margin;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use margin::{local_margin, CalculationMethod, MarginInputs, MarginResult};
pub use money::{parse_amount, Money};
pub use pricing::{PairingPolicy, PriceAction, ProductPriceState};
pub use types::*;
pub use validation::{validate_form, FieldErrors, FormField};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Standard VAT rate in basis points (23%).
///
/// Used as the initial tax rate of a new product and as the registry default.
pub const DEFAULT_VAT_BPS: u32 = 2300;

/// Maximum length of a product name.
pub const MAX_NAME_LEN: usize = 200;

/// Minimum length of a non-empty product code.
pub const MIN_PRODUCT_CODE_LEN: usize = 3;

/// Length of an EAN-13 barcode.
pub const BARCODE_LEN: usize = 13;
