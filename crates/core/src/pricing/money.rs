use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits every derived currency amount carries.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds half-up to cents and pins the scale so `200` is reported as `200.00`.
///
/// Amounts reaching this function are non-negative, where half-up and
/// away-from-zero agree.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

pub fn clamp_percent(percent: Decimal) -> Decimal {
    percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// `amount * percent / 100`, unrounded. `None` on overflow.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Option<Decimal> {
    amount.checked_mul(percent)?.checked_div(Decimal::ONE_HUNDRED)
}
