//! Tour catalog models consumed by the pricing pipeline.
//!
//! These mirror the tour/variant/rule graph loaded by the booking layer.
//! Field names on the wire follow the booking API (`tour_variant_pax_type_prices`,
//! `tour_price_rules`, `tour_rule_pax_type_prices`).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weekday mask selecting every day of the week.
pub const ALL_WEEKDAYS: u8 = 0b111_1111;

fn all_weekdays() -> u8 {
    ALL_WEEKDAYS
}

/// Passenger category (Adult, Child, Infant, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaxType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub min_age: Option<i32>,
    #[serde(default)]
    pub max_age: Option<i32>,
}

/// Tour with its variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variants: Vec<TourVariant>,
}

impl Tour {
    /// Copy of this tour where every variant keeps only the rules that
    /// apply on `date`.
    ///
    /// The pricing steps never look at rule dates, so callers pricing a
    /// specific travel date run this first.
    pub fn with_rules_applicable_on(&self, date: NaiveDate) -> Tour {
        let variants = self
            .variants
            .iter()
            .map(|variant| TourVariant {
                price_rules: variant
                    .price_rules
                    .iter()
                    .filter(|rule| rule.applies_on(date))
                    .cloned()
                    .collect(),
                ..variant.clone()
            })
            .collect();

        Tour {
            id: self.id,
            name: self.name.clone(),
            variants,
        }
    }

    /// Variants that participate in pricing.
    pub fn active_variants(&self) -> Vec<TourVariant> {
        self.variants
            .iter()
            .filter(|v| v.is_active())
            .cloned()
            .collect()
    }
}

/// Variant lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    Active,
    Inactive,
}

/// One purchasable configuration of a tour (Standard, Private, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourVariant {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub status: VariantStatus,
    #[serde(default, rename = "tour_variant_pax_type_prices")]
    pub base_prices: Vec<BasePaxTypePrice>,
    #[serde(default, rename = "tour_price_rules")]
    pub price_rules: Vec<PriceRule>,
}

impl TourVariant {
    pub fn is_active(&self) -> bool {
        self.status == VariantStatus::Active
    }
}

/// Default price of a variant for one pax type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasePaxTypePrice {
    pub pax_type_id: i64,
    pub price: Decimal,
    #[serde(default)]
    pub pax_type: Option<PaxType>,
}

/// How a rule's pax prices are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Replaces the base price outright
    Absolute,
    /// Signed adjustment added to the base price
    Delta,
}

/// Date/weekday scoped price override on a variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRule {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Bit `n` selects the weekday with `num_days_from_sunday() == n`.
    #[serde(default = "all_weekdays")]
    pub weekday_mask: u8,
    pub price_type: PriceType,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, rename = "tour_rule_pax_type_prices")]
    pub pax_type_prices: Vec<RulePaxTypePrice>,
}

impl PriceRule {
    /// Check if the rule applies on the given date (inclusive bounds)
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        self.weekday_mask & weekday_bit(date) != 0
    }
}

/// Mask bit for the weekday of `date`
pub fn weekday_bit(date: NaiveDate) -> u8 {
    1 << date.weekday().num_days_from_sunday()
}

/// Rule price for one pax type. Absent price means "not set".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulePaxTypePrice {
    pub pax_type_id: i64,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub pax_type: Option<PaxType>,
}
