//! # Price Synchronization
//!
//! Keeps net and gross prices consistent under a mutable tax rate.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PriceAction → ProductPriceState                      │
//! │                                                                         │
//! │  Set { SaleNet, v > 0 }        net = v,  gross = round2(v × (1 + r))    │
//! │  Set { SaleGross, v > 0 }      gross = v, net = round2(v / (1 + r))     │
//! │  Set { field, v <= 0 }         field = v, pair per PairingPolicy        │
//! │  SetTaxRate(r')                both gross = round2(net × (1 + r'))      │
//! │                                nets never change                        │
//! │                                                                         │
//! │  Purchase fields behave exactly like sale fields.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state is `Copy` and every transition returns a new value, so the
//! reducer is testable without any session around it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{PriceField, PriceKind, PriceSide, TaxRate};

// =============================================================================
// Pairing Policy
// =============================================================================

/// What happens to the paired field when a price is edited to zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Leave the paired field at its previous value.
    #[default]
    KeepPaired,

    /// Zero the paired field as well.
    ZeroPaired,
}

// =============================================================================
// Actions
// =============================================================================

/// A single edit applied to the price state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceAction {
    /// The user typed `value` into `field`.
    Set { field: PriceField, value: Money },

    /// The user changed the tax rate.
    SetTaxRate(TaxRate),
}

// =============================================================================
// Price State
// =============================================================================

/// The four prices and the tax rate of one product edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceState {
    pub net_sale: Money,
    pub gross_sale: Money,
    pub net_purchase: Money,
    pub gross_purchase: Money,
    pub tax_rate: TaxRate,
}

impl ProductPriceState {
    /// Empty prices under the given tax rate.
    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        ProductPriceState {
            tax_rate,
            ..Self::default()
        }
    }

    /// Reads one of the four price fields.
    pub fn get(&self, field: PriceField) -> Money {
        match field {
            PriceField::SaleNet => self.net_sale,
            PriceField::SaleGross => self.gross_sale,
            PriceField::PurchaseNet => self.net_purchase,
            PriceField::PurchaseGross => self.gross_purchase,
        }
    }

    fn slot(&mut self, field: PriceField) -> &mut Money {
        match field {
            PriceField::SaleNet => &mut self.net_sale,
            PriceField::SaleGross => &mut self.gross_sale,
            PriceField::PurchaseNet => &mut self.net_purchase,
            PriceField::PurchaseGross => &mut self.gross_purchase,
        }
    }

    /// Applies one action under the default [`PairingPolicy`].
    pub fn apply(self, action: PriceAction) -> Self {
        self.apply_with(action, PairingPolicy::default())
    }

    /// Applies one action.
    pub fn apply_with(self, action: PriceAction, policy: PairingPolicy) -> Self {
        match action {
            PriceAction::Set { field, value } => self.set_field(field, value, policy),
            PriceAction::SetTaxRate(rate) => self.set_tax_rate(rate),
        }
    }

    /// Sets a net price and derives its gross counterpart.
    pub fn set_net(self, which: PriceSide, value: Money) -> Self {
        self.apply(PriceAction::Set {
            field: PriceField::new(which, PriceKind::Net),
            value,
        })
    }

    /// Sets a gross price and derives its net counterpart.
    pub fn set_gross(self, which: PriceSide, value: Money) -> Self {
        self.apply(PriceAction::Set {
            field: PriceField::new(which, PriceKind::Gross),
            value,
        })
    }

    /// Changes the tax rate and recomputes both gross prices from their nets.
    pub fn set_tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate = rate;
        self.gross_sale = self.net_sale.with_tax(rate);
        self.gross_purchase = self.net_purchase.with_tax(rate);
        self
    }

    fn set_field(mut self, field: PriceField, value: Money, policy: PairingPolicy) -> Self {
        *self.slot(field) = value;

        let paired = field.paired();
        if value.is_positive() {
            let derived = match field.kind() {
                PriceKind::Net => value.with_tax(self.tax_rate),
                PriceKind::Gross => value.without_tax(self.tax_rate),
            };
            *self.slot(paired) = derived;
        } else if policy == PairingPolicy::ZeroPaired {
            *self.slot(paired) = Money::zero();
        }

        self
    }

    /// Sell price for margin purposes: net preferred, gross otherwise.
    pub fn sell_price(&self) -> Money {
        if self.net_sale.is_positive() {
            self.net_sale
        } else {
            self.gross_sale
        }
    }

    /// Buy price for margin purposes: net preferred, gross otherwise.
    pub fn buy_price(&self) -> Money {
        if self.net_purchase.is_positive() {
            self.net_purchase
        } else {
            self.gross_purchase
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
