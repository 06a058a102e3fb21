//! # Margin Module
//!
//! Profitability metrics of a sell/buy price pair.
//!
//! ## Margin vs Markup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell = 150.00, buy = 100.00                                            │
//! │                                                                         │
//! │  margin  = (sell - buy) / sell × 100 = 33.33%   (share of the price)    │
//! │  markup  = (sell - buy) / buy  × 100 = 50.00%   (added on top of cost)  │
//! │  profit  =  sell - buy               = 50.00                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both percentages are always reported side by side and labelled.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{div_round_half_away, Money, BPS_SCALE};
use crate::pricing::ProductPriceState;
use crate::types::Percentage;

// =============================================================================
// Inputs
// =============================================================================

/// A sell/buy pair known to be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginInputs {
    sell: Money,
    buy: Money,
}

impl MarginInputs {
    /// ## Errors
    /// `CoreError::InsufficientMarginData` if either price is not positive.
    pub fn new(sell: Money, buy: Money) -> CoreResult<Self> {
        if !sell.is_positive() || !buy.is_positive() {
            return Err(CoreError::InsufficientMarginData);
        }
        Ok(MarginInputs { sell, buy })
    }

    /// Picks the sell and buy prices out of an edit session, net first.
    pub fn from_state(state: &ProductPriceState) -> CoreResult<Self> {
        Self::new(state.sell_price(), state.buy_price())
    }

    pub fn sell(&self) -> Money {
        self.sell
    }

    pub fn buy(&self) -> Money {
        self.buy
    }
}

// =============================================================================
// Result
// =============================================================================

/// Where a margin figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMethod {
    Remote,
    Local,
}

/// Margin, markup and profit as displayed in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MarginResult {
    pub margin_percent: Percentage,
    pub markup_percent: Percentage,
    pub profit_amount: Money,
    pub calculation_method: CalculationMethod,

    /// Why a remote calculation was replaced by the local one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarginResult {
    /// Same figures, with a degradation note attached.
    pub fn with_error(mut self, note: impl Into<String>) -> Self {
        self.error = Some(note.into());
        self
    }
}

// =============================================================================
// Local Formula
// =============================================================================

/// Computes margin, markup and profit locally.
///
/// Percentages are rounded to 2 decimals, half away from zero.
///
/// ## Example
/// ```rust
/// use stockroom_core::{local_margin, MarginInputs, Money};
///
/// let inputs = MarginInputs::new(Money::from_cents(15000), Money::from_cents(10000)).unwrap();
/// let result = local_margin(inputs);
/// assert_eq!(result.margin_percent.bps(), 3333);
/// assert_eq!(result.markup_percent.bps(), 5000);
/// assert_eq!(result.profit_amount.cents(), 5000);
/// ```
pub fn local_margin(inputs: MarginInputs) -> MarginResult {
    let sell = inputs.sell.cents() as i128;
    let buy = inputs.buy.cents() as i128;
    let profit = sell - buy;

    let margin = div_round_half_away(profit * BPS_SCALE, sell);
    let markup = div_round_half_away(profit * BPS_SCALE, buy);

    MarginResult {
        margin_percent: Percentage::from_bps(saturate(margin)),
        markup_percent: Percentage::from_bps(saturate(markup)),
        profit_amount: Money::from_cents(saturate(profit)),
        calculation_method: CalculationMethod::Local,
        error: None,
    }
}

fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceSide, TaxRate};

    #[test]
    fn test_local_margin_standard_case() {
        // Scenario D
        let inputs = MarginInputs::new(Money::from_cents(15000), Money::from_cents(10000)).unwrap();
        let result = local_margin(inputs);

        assert_eq!(result.margin_percent.bps(), 3333);
        assert_eq!(result.markup_percent.bps(), 5000);
        assert_eq!(result.profit_amount.cents(), 5000);
        assert_eq!(result.calculation_method, CalculationMethod::Local);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_local_margin_selling_below_cost() {
        let inputs = MarginInputs::new(Money::from_cents(8000), Money::from_cents(10000)).unwrap();
        let result = local_margin(inputs);

        assert_eq!(result.margin_percent.bps(), -2500);
        assert_eq!(result.markup_percent.bps(), -2000);
        assert_eq!(result.profit_amount.cents(), -2000);
    }

    #[test]
    fn test_inputs_require_positive_prices() {
        // Scenario E
        assert!(matches!(
            MarginInputs::new(Money::zero(), Money::from_cents(10000)),
            Err(CoreError::InsufficientMarginData)
        ));
        assert!(MarginInputs::new(Money::from_cents(100), Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_inputs_from_state_fall_back_to_gross() {
        let mut state = ProductPriceState::with_tax_rate(TaxRate::from_bps(2300))
            .set_gross(PriceSide::Purchase, Money::from_cents(12300));
        state.net_purchase = Money::zero();
        state.gross_sale = Money::from_cents(20000);

        let inputs = MarginInputs::from_state(&state).unwrap();
        assert_eq!(inputs.sell().cents(), 20000);
        assert_eq!(inputs.buy().cents(), 12300);
    }

    #[test]
    fn test_result_serializes_method_lowercase() {
        let inputs = MarginInputs::new(Money::from_cents(200), Money::from_cents(100)).unwrap();
        let json = serde_json::to_value(local_margin(inputs).with_error("offline")).unwrap();
        assert_eq!(json["calculationMethod"], "local");
        assert_eq!(json["marginPercent"], 5000);
        assert_eq!(json["error"], "offline");
    }
}
