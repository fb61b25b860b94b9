// src/domain/models.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::str::FromStr;

/// Highest discount allowed for upfront cash payment, in percent
pub const MAX_CASH_DISCOUNT: u8 = 12;

/// Highest discount allowed for credit card payment, in percent
pub const MAX_CARD_DISCOUNT: u8 = 5;

/// Shipping rate charged by the carrier, in BRL per tonne
pub const SHIPPING_RATE_PER_TONNE: Decimal = dec!(1150);

/// Multiplier from kit price to a fully finished house
pub const TURN_KEY_MULTIPLIER: Decimal = dec!(2.20);

/// Square metres assembled per working day
pub const AREA_PER_ASSEMBLY_DAY: Decimal = dec!(12);

/// Largest price (BRL) or weight (kg) a catalog row may carry. Every derived
/// quote figure stays well inside `Decimal` range below it.
pub const MAX_CATALOG_AMOUNT: Decimal = dec!(1000000000000000000);

/// One prefabricated house kit as read from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub description: String,
    pub cash_price: Decimal,
    /// Kit weight in kilograms
    pub unit_weight: Decimal,
    pub model_link: String,
    /// Total built area in square metres, when the catalog has it
    pub total_area: Option<Decimal>,
}

impl CatalogEntry {
    pub fn new(description: &str, cash_price: Decimal, unit_weight: Decimal, model_link: &str) -> Self {
        Self {
            description: description.to_string(),
            cash_price,
            unit_weight,
            model_link: model_link.to_string(),
            total_area: None,
        }
    }

    pub fn with_area(mut self, area: Decimal) -> Self {
        self.total_area = Some(area);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    /// Largest discount percent this payment method accepts
    pub fn max_discount(&self) -> u8 {
        match self {
            PaymentMethod::Cash => MAX_CASH_DISCOUNT,
            PaymentMethod::Card => MAX_CARD_DISCOUNT,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "À Vista",
            PaymentMethod::Card => "Cartão de Crédito",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "avista" | "à vista" | "a vista" | "vista" | "cash" => Ok(PaymentMethod::Cash),
            "cartao" | "cartão" | "cartão de crédito" | "cartao de credito" | "card" => {
                Ok(PaymentMethod::Card)
            }
            other => Err(format!("Unknown payment method: {}", other)),
        }
    }
}

/// Payment parameters chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    pub discount_percent: u8,
}

impl PaymentSelection {
    /// Build a selection, clamping the discount to the method's maximum
    pub fn clamped(method: PaymentMethod, discount_percent: u8) -> Self {
        Self {
            method,
            discount_percent: discount_percent.min(method.max_discount()),
        }
    }
}

/// Figures derived from one catalog entry and one payment selection
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResult {
    pub cash_price: Decimal,
    pub discounted_price: Decimal,
    pub shipping_estimate: Decimal,
    pub total_with_shipping: Decimal,
    pub turn_key_estimate: Decimal,
    pub assembly_days_estimate: Option<u32>,
}
