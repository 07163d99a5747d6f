//! Commission fee calculation using rust_decimal for precision
//!
//! Every completed transaction carries a 3% commission on each side: the
//! buyer pays the agreed amount plus 3%, the seller receives the agreed
//! amount minus 3%, and both fees together are platform revenue. All
//! arithmetic is done in `Decimal`; amounts cross the API boundary as
//! decimal strings and are only converted to integer minor units (paise)
//! at the payment gateway boundary.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Commission rate applied independently to buyer and seller (3%)
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Fee attribution for a single transaction.
///
/// Invariant: `platform_fee == buyer_fee + seller_fee` holds exactly in
/// stored form because the per-side fee is rounded once and reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub buyer_fee: Decimal,
    pub seller_fee: Decimal,
    pub platform_fee: Decimal,
    pub buyer_total: Decimal,
    pub seller_receives: Decimal,
}

/// Round a monetary value to 2 decimal places, half away from zero.
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the fee breakdown for an agreed amount.
///
/// The fee is rounded to the currency's minor unit before any derived value
/// is computed, so the stored fields always reconcile.
pub fn calculate_fees(amount: Decimal) -> FeeBreakdown {
    let amount = round_money(amount);
    let fee = round_money(amount * COMMISSION_RATE);

    FeeBreakdown {
        buyer_fee: fee,
        seller_fee: fee,
        platform_fee: fee + fee,
        buyer_total: amount + fee,
        seller_receives: amount - fee,
    }
}

/// Convert a rupee amount to integer paise for the payment gateway.
///
/// Returns `None` when the amount does not fit in an `i64` after scaling.
/// The ×100 conversion lives here and nowhere else.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Convert integer paise back to a rupee amount (inverse check for the
/// conversion tests; production code only ever crosses the boundary in
/// the rupee -> paise direction).
#[cfg(test)]
pub fn from_minor_units(paise: i64) -> Decimal {
    Decimal::new(paise, 2).normalize()
}

#[cfg(test)]
mod tests;
