// src/pricing/engine.rs
use crate::domain::models::{
    CatalogEntry, PaymentSelection, QuoteResult, AREA_PER_ASSEMBLY_DAY, SHIPPING_RATE_PER_TONNE,
    TURN_KEY_MULTIPLIER,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const KG_PER_TONNE: Decimal = Decimal::ONE_THOUSAND;

/// Compute every derived figure for a kit.
///
/// The discount is taken as given; bounding it by the payment method is
/// the caller's job.
pub fn compute_quote(entry: &CatalogEntry, selection: &PaymentSelection) -> QuoteResult {
    let discount = Decimal::from(selection.discount_percent) / Decimal::ONE_HUNDRED;
    let discounted_price = entry.cash_price * (Decimal::ONE - discount);

    let shipping_estimate = shipping_estimate(entry.unit_weight);
    let turn_key_estimate = entry.cash_price * TURN_KEY_MULTIPLIER;

    QuoteResult {
        cash_price: entry.cash_price,
        discounted_price,
        shipping_estimate,
        total_with_shipping: discounted_price + shipping_estimate,
        turn_key_estimate,
        assembly_days_estimate: entry.total_area.and_then(assembly_days),
    }
}

/// Freight for a kit of the given weight in kilograms
pub fn shipping_estimate(unit_weight: Decimal) -> Decimal {
    (unit_weight / KG_PER_TONNE) * SHIPPING_RATE_PER_TONNE
}

/// Working days to assemble a kit; `None` for a zero or negative area.
///
/// Ties round to even.
pub fn assembly_days(total_area: Decimal) -> Option<u32> {
    if total_area <= Decimal::ZERO {
        return None;
    }

    (total_area / AREA_PER_ASSEMBLY_DAY)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u32()
}
