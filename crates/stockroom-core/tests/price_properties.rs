//! Property tests for net/gross synchronization and the local margin formula.

use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use stockroom_core::{
    local_margin, MarginInputs, Money, PriceField, PriceKind, PriceSide, ProductPriceState,
    TaxRate,
};

/// Reference `round2(net × (1 + rate/100))` computed in decimal arithmetic.
fn reference_gross(net_cents: i64, bps: u32) -> i64 {
    let net = Decimal::new(net_cents, 2);
    let factor = Decimal::ONE + Decimal::new(bps as i64, 4);
    let gross = (net * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    (gross * Decimal::ONE_HUNDRED).to_i64().unwrap()
}

fn cents() -> impl Strategy<Value = i64> {
    1i64..100_000_000
}

fn rate() -> impl Strategy<Value = u32> {
    0u32..=10_000
}

fn side() -> impl Strategy<Value = PriceSide> {
    prop_oneof![Just(PriceSide::Sale), Just(PriceSide::Purchase)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        ..ProptestConfig::default()
    })]

    /// Property: a positive net edit derives gross = round2(net × (1 + r)).
    #[test]
    fn net_edit_matches_reference(net in cents(), bps in rate(), which in side()) {
        let state = ProductPriceState::with_tax_rate(TaxRate::from_bps(bps))
            .set_net(which, Money::from_cents(net));

        let gross = state.get(PriceField::new(which, PriceKind::Gross));
        prop_assert_eq!(gross.cents(), reference_gross(net, bps));
    }

    /// Property: gross → derived net → gross lands within one cent.
    #[test]
    fn gross_round_trip_within_one_cent(gross in cents(), bps in rate()) {
        let rate = TaxRate::from_bps(bps);
        let derived = ProductPriceState::with_tax_rate(rate)
            .set_gross(PriceSide::Sale, Money::from_cents(gross));
        let again = ProductPriceState::with_tax_rate(rate)
            .set_net(PriceSide::Sale, derived.net_sale);

        prop_assert!((again.gross_sale.cents() - gross).abs() <= 1);
    }

    /// Property: a tax change recomputes both grosses and never touches nets.
    #[test]
    fn tax_change_keeps_nets(
        sale in cents(),
        purchase in cents(),
        before in rate(),
        after in rate(),
    ) {
        let state = ProductPriceState::with_tax_rate(TaxRate::from_bps(before))
            .set_net(PriceSide::Sale, Money::from_cents(sale))
            .set_net(PriceSide::Purchase, Money::from_cents(purchase));
        let changed = state.set_tax_rate(TaxRate::from_bps(after));

        prop_assert_eq!(changed.net_sale, state.net_sale);
        prop_assert_eq!(changed.net_purchase, state.net_purchase);
        prop_assert_eq!(changed.gross_sale.cents(), reference_gross(sale, after));
        prop_assert_eq!(changed.gross_purchase.cents(), reference_gross(purchase, after));
    }

    /// Property: non-positive edits leave the paired field alone.
    #[test]
    fn non_positive_edit_keeps_pair(net in cents(), bad in -100_000i64..=0, bps in rate()) {
        let state = ProductPriceState::with_tax_rate(TaxRate::from_bps(bps))
            .set_net(PriceSide::Sale, Money::from_cents(net));
        let edited = state.set_net(PriceSide::Sale, Money::from_cents(bad));

        prop_assert_eq!(edited.net_sale.cents(), bad);
        prop_assert_eq!(edited.gross_sale, state.gross_sale);
    }

    /// Property: margin inputs exist only when sell and buy are both positive.
    #[test]
    fn margin_needs_positive_prices(sell in -1_000i64..1_000, buy in -1_000i64..1_000) {
        let inputs = MarginInputs::new(Money::from_cents(sell), Money::from_cents(buy));
        prop_assert_eq!(inputs.is_ok(), sell > 0 && buy > 0);
    }

    /// Property: profit is sell - buy and margin never exceeds markup for a profit.
    #[test]
    fn margin_not_above_markup(sell in cents(), buy in cents()) {
        let inputs = MarginInputs::new(Money::from_cents(sell), Money::from_cents(buy)).unwrap();
        let result = local_margin(inputs);

        prop_assert_eq!(result.profit_amount.cents(), sell - buy);
        if sell >= buy {
            prop_assert!(result.margin_percent <= result.markup_percent);
        }
    }
}
