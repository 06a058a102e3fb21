//! # REST Protocol
//!
//! Request and response bodies exchanged with the admin backend.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Admin REST Endpoints                             │
//! │                                                                         │
//! │  GET  /vat-rates              ◄── { rates: [{ id, rate, description }] }│
//! │  POST /margin/calculate       ──► { sellPrice, buyPrice }               │
//! │                               ◄── { marginPercent, markupPercent,       │
//! │                                     profitAmount }                      │
//! │  POST /products/{id}/margin   ──► { sellPrice }                         │
//! │                               ◄── { ..., calculationMethod }            │
//! │  GET  /products/{id}          ◄── ProductPayload                        │
//! │  PUT  /products/{id}          ──► ProductPayload                        │
//! │  POST /products               ──► ProductPayload  ◄── { id }            │
//! │                                                                         │
//! │  Any non-2xx                  ◄── { message }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! JSON, camelCase keys. Amounts are decimal numbers in major units
//! (`123.45`), tax rates and percentages are plain percent numbers (`23`).
//! Conversion to `Money` / `TaxRate` / `Percentage` happens here and nowhere
//! else.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use stockroom_core::{
    CalculationMethod, MarginResult, Money, Percentage, ProductForm, ProductId, ProductMeta,
    ProductPriceState, TaxRate, VatRate,
};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Identifiers
// =============================================================================

/// Backends disagree on whether ids are numbers or strings; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

// =============================================================================
// Error Body
// =============================================================================

/// Body of every non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// VAT Rates
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct VatRatesResponse {
    pub rates: Vec<VatRateDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VatRateDto {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Percent, e.g. `23`.
    pub rate: Decimal,

    #[serde(default)]
    pub description: String,
}

impl TryFrom<VatRateDto> for VatRate {
    type Error = ClientError;

    fn try_from(dto: VatRateDto) -> ClientResult<Self> {
        let rate = TaxRate::from_percent(dto.rate).map_err(|_| {
            ClientError::InvalidPayload(format!("VAT rate {} out of range: {}", dto.id, dto.rate))
        })?;
        Ok(VatRate::new(dto.id, rate, dto.description))
    }
}

// =============================================================================
// Margin
// =============================================================================

/// Body of `POST /margin/calculate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginCalculateRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_price: Decimal,
}

/// Body of `POST /products/{id}/margin`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMarginRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
}

/// Response of both margin endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginResponse {
    pub margin_percent: Decimal,
    pub markup_percent: Decimal,
    pub profit_amount: Decimal,

    /// Only the product endpoint reports this; informational.
    #[serde(default)]
    pub calculation_method: Option<String>,
}

impl From<MarginResponse> for MarginResult {
    /// Anything the backend computed is tagged `remote`, whatever it reports.
    fn from(response: MarginResponse) -> Self {
        MarginResult {
            margin_percent: Percentage::from_decimal(response.margin_percent),
            markup_percent: Percentage::from_decimal(response.markup_percent),
            profit_amount: Money::from_decimal(response.profit_amount),
            calculation_method: CalculationMethod::Remote,
            error: None,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Wire form of [`ProductForm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub product_code: String,

    #[serde(default)]
    pub barcode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    pub category_id: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    pub manufacturer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float")]
    pub net_sale: Decimal,

    #[serde(default, with = "rust_decimal::serde::float")]
    pub gross_sale: Decimal,

    #[serde(default, with = "rust_decimal::serde::float")]
    pub net_purchase: Decimal,

    #[serde(default, with = "rust_decimal::serde::float")]
    pub gross_purchase: Decimal,

    /// Percent, e.g. `23`.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,
}

impl ProductPayload {
    /// Builds the save body. `id` is omitted for new products.
    pub fn from_form(id: Option<&ProductId>, form: &ProductForm) -> Self {
        let meta = &form.meta;
        let prices = &form.prices;
        ProductPayload {
            id: id.map(|id| id.as_str().to_string()),
            name: meta.name.trim().to_string(),
            product_code: meta.product_code.clone(),
            barcode: meta.barcode.clone(),
            description: meta.description.clone(),
            category_id: meta.category_id.clone(),
            manufacturer_id: meta.manufacturer_id.clone(),
            unit: meta.unit.clone(),
            net_sale: prices.net_sale.to_decimal(),
            gross_sale: prices.gross_sale.to_decimal(),
            net_purchase: prices.net_purchase.to_decimal(),
            gross_purchase: prices.gross_purchase.to_decimal(),
            tax_rate: prices.tax_rate.percent(),
        }
    }

    /// Converts a fetched product into editor form data.
    ///
    /// Stored prices are taken as-is; no net/gross re-derivation happens on
    /// load.
    pub fn into_form(self) -> ClientResult<ProductForm> {
        let tax_rate = TaxRate::from_percent(self.tax_rate).map_err(|_| {
            ClientError::InvalidPayload(format!("tax rate out of range: {}", self.tax_rate))
        })?;

        Ok(ProductForm {
            meta: ProductMeta {
                name: self.name,
                product_code: self.product_code,
                barcode: self.barcode,
                description: self.description,
                category_id: self.category_id,
                manufacturer_id: self.manufacturer_id,
                unit: self.unit,
            },
            prices: ProductPriceState {
                net_sale: Money::from_decimal(self.net_sale),
                gross_sale: Money::from_decimal(self.gross_sale),
                net_purchase: Money::from_decimal(self.net_purchase),
                gross_purchase: Money::from_decimal(self.gross_purchase),
                tax_rate,
            },
        })
    }
}

/// Response of `POST /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}
