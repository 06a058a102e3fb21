//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    100.00 × 1.23 = 123.00000000000001  ❌ WRONG!                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10000 cents × (10000 + 2300) bps / 10000 = 12300 cents              │
//! │    Every stored amount is exactly 2-decimal by construction            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Typed input ("123,45", "99.999") and wire numbers enter through
//! [`Money::from_decimal`] / [`parse_amount`] and are rounded to the cent
//! exactly once, half away from zero. Their magnitude is capped at
//! [`Money::MAX`], so a gross derived at any valid tax rate still fits.
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//! use stockroom_core::types::TaxRate;
//!
//! let net = Money::from_cents(10000); // 100.00
//! let gross = net.with_tax(TaxRate::from_bps(2300)); // 23%
//! assert_eq!(gross.cents(), 12300);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::types::TaxRate;

/// Basis points in 100%.
pub(crate) const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Rounding
// =============================================================================

/// Integer division rounding half away from zero.
///
/// `den` must be non-zero. Used for every cent/basis-point rounding in the
/// crate so that `round2` behaves the same in all formulas.
pub(crate) fn div_round_half_away(num: i128, den: i128) -> i128 {
    debug_assert!(den != 0, "division by zero");
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let quotient = num / den;
    let remainder = num % den;
    if remainder.abs() * 2 >= den {
        quotient + num.signum()
    } else {
        quotient
    }
}

/// Rounds a decimal to 2 places (half away from zero) and scales it to an
/// integer count of hundredths. Returns `None` when it does not fit in `i64`.
pub(crate) fn decimal_to_hundredths(value: Decimal) -> Option<i64> {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a user can type a negative price; validation rejects
///   it at submit time, the synchronizer must still hold it
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as cents** for the frontend, like every other amount
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Typed "100,00" ──► parse_amount ──► net sale ──► with_tax ──► gross    │
/// │                                                                         │
/// │  net/gross sale + purchase ──► MarginInputs ──► profit / margin        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from text or the wire: 999 999 999 999.99.
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates Money from a decimal amount in major units, rounding half away
    /// from zero to the cent.
    ///
    /// Amounts beyond [`Money::MAX`] in either direction are clamped to it.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_decimal(Decimal::new(12345, 3)); // 12.345
    /// assert_eq!(price.cents(), 1235);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let max = Money::MAX.0;
        let cents = match decimal_to_hundredths(amount) {
            Some(cents) => cents.clamp(-max, max),
            None if amount.is_sign_negative() => -max,
            None => max,
        };
        Money(cents)
    }

    /// Converts an intermediate i128 result, saturating at the `i64` range.
    fn saturating(cents: i128) -> Self {
        Money(i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Returns the amount as a 2-decimal `Decimal` in major units.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the gross amount for this net amount:
    /// `round2(net × (1 + rate/100))`.
    ///
    /// Integer math, half away from zero. A result outside the `i64` range
    /// saturates; amounts within [`Money::MAX`] never get there.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    /// use stockroom_core::types::TaxRate;
    ///
    /// let net = Money::from_cents(10000);
    /// assert_eq!(net.with_tax(TaxRate::from_bps(800)).cents(), 10800);
    /// ```
    pub fn with_tax(&self, rate: TaxRate) -> Money {
        let gross = div_round_half_away(
            self.0 as i128 * (BPS_SCALE + rate.bps() as i128),
            BPS_SCALE,
        );
        Money::saturating(gross)
    }

    /// Returns the net amount contained in this gross amount:
    /// `round2(gross / (1 + rate/100))`.
    ///
    /// A zero rate leaves the amount unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    /// use stockroom_core::types::TaxRate;
    ///
    /// let gross = Money::from_cents(12300);
    /// assert_eq!(gross.without_tax(TaxRate::from_bps(2300)).cents(), 10000);
    /// ```
    pub fn without_tax(&self, rate: TaxRate) -> Money {
        if rate.is_zero() {
            return *self;
        }
        let net = div_round_half_away(
            self.0 as i128 * BPS_SCALE,
            BPS_SCALE + rate.bps() as i128,
        );
        Money::saturating(net)
    }
}

/// Parses a typed amount.
///
/// Accepts `.` or `,` as the decimal separator and surrounding whitespace.
/// Anything that does not parse as a decimal number is treated as zero.
///
/// ## Example
/// ```rust
/// use stockroom_core::money::parse_amount;
///
/// assert_eq!(parse_amount("123,45").cents(), 12345);
/// assert_eq!(parse_amount(" 99.999 ").cents(), 10000);
/// assert_eq!(parse_amount("abc").cents(), 0);
/// ```
pub fn parse_amount(raw: &str) -> Money {
    parse_decimal(raw).map(Money::from_decimal).unwrap_or_default()
}

/// Parses typed decimal text, accepting `,` as the decimal separator.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain 2-decimal rendering (`-5.50`); currency symbols are a frontend
/// concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(12300).to_string(), "123.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_div_round_half_away() {
        assert_eq!(div_round_half_away(5, 2), 3);
        assert_eq!(div_round_half_away(-5, 2), -3);
        assert_eq!(div_round_half_away(4, 3), 1);
        assert_eq!(div_round_half_away(5, 3), 2);
        assert_eq!(div_round_half_away(-5, 3), -2);
        assert_eq!(div_round_half_away(5, -2), -3);
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(12.345)).cents(), 1235);
        assert_eq!(Money::from_decimal(dec!(12.344)).cents(), 1234);
        assert_eq!(Money::from_decimal(dec!(-12.345)).cents(), -1235);
        assert_eq!(Money::from_decimal(dec!(0.005)).cents(), 1);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(12345).to_decimal(), dec!(123.45));
    }

    #[test]
    fn test_from_decimal_clamps_to_max() {
        assert_eq!(Money::from_decimal(dec!(999999999999.99)), Money::MAX);
        assert_eq!(Money::from_decimal(dec!(1000000000000)), Money::MAX);
        assert_eq!(Money::from_decimal(dec!(-1000000000000)).cents(), -Money::MAX.cents());
        // beyond i64 cents entirely
        assert_eq!(Money::from_decimal(Decimal::MAX), Money::MAX);
        assert_eq!(parse_amount("92233720368547758"), Money::MAX);
    }

    #[test]
    fn test_with_tax_at_max_amount() {
        let gross = Money::MAX.with_tax(TaxRate::from_bps(TaxRate::MAX_BPS));
        assert_eq!(gross.cents(), 199_999_999_999_998);
        assert_eq!(gross.without_tax(TaxRate::from_bps(TaxRate::MAX_BPS)), Money::MAX);
    }

    #[test]
    fn test_tax_math_saturates_instead_of_wrapping() {
        let huge = Money::from_cents(i64::MAX);
        assert_eq!(huge.with_tax(TaxRate::from_bps(2300)).cents(), i64::MAX);

        let huge_negative = Money::from_cents(i64::MIN);
        assert_eq!(huge_negative.with_tax(TaxRate::from_bps(2300)).cents(), i64::MIN);
    }

    #[test]
    fn test_with_tax() {
        let net = Money::from_cents(10000);
        assert_eq!(net.with_tax(TaxRate::from_bps(2300)).cents(), 12300);
        assert_eq!(net.with_tax(TaxRate::from_bps(800)).cents(), 10800);
        assert_eq!(net.with_tax(TaxRate::zero()).cents(), 10000);
        // 0.01 × 1.05 = 0.0105 → 0.01
        assert_eq!(Money::from_cents(1).with_tax(TaxRate::from_bps(500)).cents(), 1);
    }

    #[test]
    fn test_without_tax() {
        let gross = Money::from_cents(12300);
        assert_eq!(gross.without_tax(TaxRate::from_bps(2300)).cents(), 10000);
        assert_eq!(gross.without_tax(TaxRate::zero()).cents(), 12300);
        // 10.00 / 1.23 = 8.1300813 → 8.13
        assert_eq!(Money::from_cents(1000).without_tax(TaxRate::from_bps(2300)).cents(), 813);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").cents(), 10000);
        assert_eq!(parse_amount("123.45").cents(), 12345);
        assert_eq!(parse_amount("123,45").cents(), 12345);
        assert_eq!(parse_amount("  7.5 ").cents(), 750);
        assert_eq!(parse_amount("-3").cents(), -300);
    }

    #[test]
    fn test_parse_amount_garbage_is_zero() {
        assert!(parse_amount("").is_zero());
        assert!(parse_amount("abc").is_zero());
        assert!(parse_amount("1.2.3").is_zero());
        assert!(parse_amount("12zł").is_zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
