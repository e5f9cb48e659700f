//! Daily-rate costing for assignments.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::BudgetError;

/// Largest magnitude accepted for a stored rate, price or quantity.
///
/// Products of two capped values over any date range stay far below
/// `Decimal::MAX`, so costing and rollups cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Rejects a rate, price or quantity outside `-MAX_AMOUNT..=MAX_AMOUNT`.
///
/// # Errors
///
/// Returns `AmountOutOfRange` naming `field`.
pub fn check_amount(field: &'static str, value: Option<Decimal>) -> Result<(), BudgetError> {
    match value {
        Some(v) if v.abs() > MAX_AMOUNT => Err(BudgetError::AmountOutOfRange(field)),
        _ => Ok(()),
    }
}

/// Rounds a money amount to cents.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

/// Picks the estimate rate: the price override when set and non-zero,
/// otherwise the resource's estimate, otherwise zero.
#[must_use]
pub fn effective_estimate_rate(
    price_override: Option<Decimal>,
    resource_estimate: Option<Decimal>,
) -> Decimal {
    non_zero(price_override)
        .or_else(|| non_zero(resource_estimate))
        .unwrap_or(Decimal::ZERO)
}

/// Picks the actual rate. The price override only affects estimates.
#[must_use]
pub fn actual_rate(resource_actual: Option<Decimal>) -> Option<Decimal> {
    non_zero(resource_actual)
}

/// Cost figures for one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentCost {
    /// Billable days.
    pub working_days: i64,
    /// Daily rate used for the estimate.
    pub rate_estimate: Decimal,
    /// Daily rate used for the actual, if any.
    pub rate_actual: Option<Decimal>,
    /// `working_days * rate_estimate`, rounded to cents.
    pub amount_estimate: Decimal,
    /// `working_days * rate_actual`, rounded to cents.
    pub amount_actual: Option<Decimal>,
}

/// Costs `working_days` at the given rates.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use shootlogix_core::budget::cost_assignment;
///
/// let cost = cost_assignment(31, dec!(250), None);
/// assert_eq!(cost.amount_estimate, dec!(7750));
/// assert!(cost.amount_actual.is_none());
/// ```
#[must_use]
pub fn cost_assignment(
    working_days: i64,
    rate_estimate: Decimal,
    rate_actual: Option<Decimal>,
) -> AssignmentCost {
    let days = Decimal::from(working_days);
    // Saturates on rates stored before the cap existed.
    AssignmentCost {
        working_days,
        rate_estimate,
        rate_actual,
        amount_estimate: round_money(days.saturating_mul(rate_estimate)),
        amount_actual: rate_actual.map(|rate| round_money(days.saturating_mul(rate))),
    }
}

