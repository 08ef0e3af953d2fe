//! Per-request pricing context passed through the pipeline steps.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::checked_sum;
use super::models::{PaxType, PriceType, RulePaxTypePrice, Tour, TourVariant};

/// Chargeable item for the generic commerce pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceItem {
    pub sku: String,
    pub qty: i64,
    pub unit_price: Decimal,
}

/// Named line of the running price breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLine {
    pub code: String,
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl PriceLine {
    pub fn new(code: &str, label: &str, amount: Decimal) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            amount,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.meta.insert(key.to_string(), value.to_string());
        self
    }
}

/// Cheapest active-variant price for a pax type
#[derive(Debug, Clone, PartialEq)]
pub struct BasePriceEntry {
    pub price: Decimal,
    pub pax_type: Option<PaxType>,
}

/// Rule that produced a rule price
#[derive(Debug, Clone, PartialEq)]
pub struct WinningRule {
    pub id: i64,
    pub price_type: PriceType,
    pub priority: i32,
}

/// Winning rule price for a pax type
#[derive(Debug, Clone)]
pub struct RulePriceEntry {
    pub effective_price: Decimal,
    pub rule: WinningRule,
    pub rule_price: RulePaxTypePrice,
}

/// Where the final price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    RuleAbsolute,
    RuleDelta,
    Base,
    None,
}

/// Which pricing layer won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceLayer {
    Rule,
    Base,
    None,
}

/// Final price for one pax type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaxTypePriceResult {
    pub pax_type_id: i64,
    pub pax_type_name: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub base_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub rule_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub final_price: Option<Decimal>,
    pub price_source: PriceSource,
    pub price_layer: PriceLayer,
}

/// Values handed from one step to the next.
///
/// `None` means no step has produced the value yet.
#[derive(Debug, Clone, Default)]
pub struct PriceMeta {
    pub tour: Option<Tour>,
    pub active_variants: Option<Vec<TourVariant>>,
    pub base_price_map: Option<HashMap<i64, BasePriceEntry>>,
    pub rule_map: Option<HashMap<i64, RulePriceEntry>>,
    pub price_result: Option<Vec<PaxTypePriceResult>>,
}

/// Context carried through a single pricing run
#[derive(Debug, Clone, Default)]
pub struct PriceContext {
    pub items: Vec<PriceItem>,
    pub breakdown: Vec<PriceLine>,
    pub meta: PriceMeta,
}

impl PriceContext {
    /// Context for pricing a tour
    pub fn for_tour(tour: Tour) -> Self {
        Self {
            meta: PriceMeta {
                tour: Some(tour),
                ..PriceMeta::default()
            },
            ..Self::default()
        }
    }

    /// Context for pricing a flat item list
    pub fn for_items(items: Vec<PriceItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Sum of all breakdown lines so far, `None` if it leaves the decimal range
    pub fn subtotal(&self) -> Option<Decimal> {
        checked_sum(self.breakdown.iter().map(|line| line.amount))
    }

    /// Price table produced by the tour pipeline, empty if none was assembled
    pub fn price_result(&self) -> &[PaxTypePriceResult] {
        self.meta.price_result.as_deref().unwrap_or(&[])
    }
}
