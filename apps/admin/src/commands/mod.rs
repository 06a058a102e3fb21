//! # Commands Module
//!
//! Editor commands and the console protocol that drives them.
//!
//! ## Command Categories
//! - **Session**: `open_editor`, `cancel`
//! - **Fields**: `edit_price`, `edit_tax_rate`, `select_vat_rate`, `edit_meta`
//! - **Margin**: `refresh_margin`
//! - **Submission**: `submit`
//! - **Lookups**: `load_vat_rates`

pub mod console;
pub mod product;

pub use product::*;
