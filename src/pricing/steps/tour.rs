//! Tour price resolution steps.
//!
//! Base prices come from the cheapest active variant per pax type, rules
//! override them per pax type (highest priority wins), and the assemble step
//! merges both layers into the per-pax-type price table.
//!
//! Rules are not filtered by date here. Callers pass a tour whose rules were
//! already restricted to the travel date (see `Tour::with_rules_applicable_on`).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use crate::pricing::calculators::is_positive_price;
use crate::pricing::context::{
    BasePriceEntry, PaxTypePriceResult, PriceContext, PriceLayer, PriceSource, RulePriceEntry,
    WinningRule,
};
use crate::pricing::models::{PaxType, PriceType, TourVariant};
use crate::pricing::step::{PriceStep, PricingError};

/// Resolves active variants and the tour-wide minimum base price per pax type.
pub struct TourBasePriceStep;

#[async_trait]
impl PriceStep for TourBasePriceStep {
    fn name(&self) -> &'static str {
        "tour_base_price"
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, mut ctx: PriceContext) -> Result<PriceContext, PricingError> {
        let Some(tour) = ctx.meta.tour.as_ref() else {
            debug!("No tour in context, skipping base price resolution");
            return Ok(ctx);
        };

        let active_variants = tour.active_variants();
        let base_price_map = resolve_base_prices(&active_variants);

        debug!(
            tour_id = tour.id,
            active_variants = active_variants.len(),
            pax_types = base_price_map.len(),
            "Resolved base prices"
        );

        ctx.meta.active_variants = Some(active_variants);
        ctx.meta.base_price_map = Some(base_price_map);
        Ok(ctx)
    }
}

/// Cheapest positive price per pax type across the given variants.
///
/// On equal prices the first entry seen is kept.
pub fn resolve_base_prices(variants: &[TourVariant]) -> HashMap<i64, BasePriceEntry> {
    let mut map: HashMap<i64, BasePriceEntry> = HashMap::new();

    for variant in variants {
        for base in &variant.base_prices {
            if base.price <= Decimal::ZERO {
                continue;
            }

            let cheaper = match map.get(&base.pax_type_id) {
                Some(current) => base.price < current.price,
                None => true,
            };

            if cheaper {
                map.insert(
                    base.pax_type_id,
                    BasePriceEntry {
                        price: base.price,
                        pax_type: base.pax_type.clone(),
                    },
                );
            }
        }
    }

    map
}

/// Picks the winning rule price per pax type.
pub struct TourRulePriceStep;

#[async_trait]
impl PriceStep for TourRulePriceStep {
    fn name(&self) -> &'static str {
        "tour_rule_price"
    }

    fn priority(&self) -> i32 {
        20
    }

    async fn execute(&self, mut ctx: PriceContext) -> Result<PriceContext, PricingError> {
        if ctx.meta.active_variants.is_none() && ctx.meta.tour.is_none() {
            debug!("No variants in context, skipping rule resolution");
            return Ok(ctx);
        }

        let derived;
        let variants: &[TourVariant] = match (&ctx.meta.active_variants, &ctx.meta.tour) {
            (Some(variants), _) => variants,
            (None, Some(tour)) => {
                derived = tour.active_variants();
                &derived
            }
            (None, None) => &[],
        };

        let no_base = HashMap::new();
        let base_price_map = ctx.meta.base_price_map.as_ref().unwrap_or(&no_base);
        let rule_map = resolve_rule_prices(variants, base_price_map)?;

        debug!(pax_types = rule_map.len(), "Resolved rule prices");

        ctx.meta.rule_map = Some(rule_map);
        Ok(ctx)
    }
}

/// Effective price of a rule entry for a pax type.
///
/// Absolute rules stand alone. Delta rules need a base price to adjust and
/// yield nothing without one. Non-positive results mean the rule does not
/// apply. A delta that pushes the base out of the decimal range is an error.
pub fn effective_rule_price(
    price_type: PriceType,
    rule_price: Option<Decimal>,
    base_price: Option<Decimal>,
) -> Result<Option<Decimal>, PricingError> {
    let effective = match price_type {
        PriceType::Absolute => rule_price,
        PriceType::Delta => match (base_price, rule_price) {
            (Some(base), Some(delta)) => {
                Some(base.checked_add(delta).ok_or_else(|| PricingError::Overflow {
                    step: TourRulePriceStep.name().to_string(),
                })?)
            }
            _ => None,
        },
    };

    Ok(effective.filter(|price| is_positive_price(Some(*price))))
}

/// Highest-priority applicable rule price per pax type.
///
/// A later rule replaces the stored one only with a strictly higher priority,
/// so equal priorities resolve to the first rule in variant/rule order.
pub fn resolve_rule_prices(
    variants: &[TourVariant],
    base_price_map: &HashMap<i64, BasePriceEntry>,
) -> Result<HashMap<i64, RulePriceEntry>, PricingError> {
    let mut map: HashMap<i64, RulePriceEntry> = HashMap::new();

    for variant in variants {
        for rule in &variant.price_rules {
            for rule_price in &rule.pax_type_prices {
                let base_price = base_price_map
                    .get(&rule_price.pax_type_id)
                    .map(|entry| entry.price);

                let Some(effective_price) =
                    effective_rule_price(rule.price_type, rule_price.price, base_price)?
                else {
                    continue;
                };

                let wins = match map.get(&rule_price.pax_type_id) {
                    Some(current) => rule.priority > current.rule.priority,
                    None => true,
                };

                if wins {
                    map.insert(
                        rule_price.pax_type_id,
                        RulePriceEntry {
                            effective_price,
                            rule: WinningRule {
                                id: rule.id,
                                price_type: rule.price_type,
                                priority: rule.priority,
                            },
                            rule_price: rule_price.clone(),
                        },
                    );
                }
            }
        }
    }

    Ok(map)
}

/// Merges base and rule layers into the final price table.
pub struct TourAssemblePriceStep;

#[async_trait]
impl PriceStep for TourAssemblePriceStep {
    fn name(&self) -> &'static str {
        "tour_assemble_price"
    }

    fn priority(&self) -> i32 {
        30
    }

    async fn execute(&self, mut ctx: PriceContext) -> Result<PriceContext, PricingError> {
        let no_base = HashMap::new();
        let no_rules = HashMap::new();
        let base_price_map = ctx.meta.base_price_map.as_ref().unwrap_or(&no_base);
        let rule_map = ctx.meta.rule_map.as_ref().unwrap_or(&no_rules);
        let variants = ctx.meta.active_variants.as_deref().unwrap_or(&[]);

        let price_result = assemble_price_table(base_price_map, rule_map, variants);

        debug!(entries = price_result.len(), "Assembled price table");

        ctx.meta.price_result = Some(price_result);
        Ok(ctx)
    }
}

/// Builds one result per pax type present in either map, sorted by pax type id.
///
/// A valid rule price always wins over the base price. Display metadata comes
/// from the base entry's pax type, else from the first rule reference to that
/// pax type across `variants`.
pub fn assemble_price_table(
    base_price_map: &HashMap<i64, BasePriceEntry>,
    rule_map: &HashMap<i64, RulePriceEntry>,
    variants: &[TourVariant],
) -> Vec<PaxTypePriceResult> {
    let pax_type_ids: HashSet<i64> = base_price_map
        .keys()
        .chain(rule_map.keys())
        .copied()
        .collect();

    let mut results: Vec<PaxTypePriceResult> = pax_type_ids
        .into_iter()
        .map(|pax_type_id| {
            let base_entry = base_price_map.get(&pax_type_id);
            let rule_entry = rule_map.get(&pax_type_id);

            let base_price = base_entry
                .map(|entry| entry.price)
                .filter(|price| *price > Decimal::ZERO);
            let winning_rule = rule_entry.filter(|entry| entry.effective_price > Decimal::ZERO);

            let (final_price, price_source, price_layer) = match (winning_rule, base_price) {
                (Some(entry), _) => {
                    let source = match entry.rule.price_type {
                        PriceType::Absolute => PriceSource::RuleAbsolute,
                        PriceType::Delta => PriceSource::RuleDelta,
                    };
                    (Some(entry.effective_price), source, PriceLayer::Rule)
                }
                (None, Some(price)) => (Some(price), PriceSource::Base, PriceLayer::Base),
                (None, None) => (None, PriceSource::None, PriceLayer::None),
            };

            let pax_type = base_entry
                .and_then(|entry| entry.pax_type.as_ref())
                .or_else(|| find_rule_pax_type(variants, pax_type_id));

            PaxTypePriceResult {
                pax_type_id,
                pax_type_name: pax_type.map(|p| p.name.clone()),
                min_age: pax_type.and_then(|p| p.min_age),
                max_age: pax_type.and_then(|p| p.max_age),
                base_price,
                rule_price: rule_entry.map(|entry| entry.effective_price),
                final_price,
                price_source,
                price_layer,
            }
        })
        .collect();

    results.sort_by_key(|result| result.pax_type_id);
    results
}

fn find_rule_pax_type(variants: &[TourVariant], pax_type_id: i64) -> Option<&PaxType> {
    variants
        .iter()
        .flat_map(|variant| &variant.price_rules)
        .flat_map(|rule| &rule.pax_type_prices)
        .filter_map(|rule_price| rule_price.pax_type.as_ref())
        .find(|pax_type| pax_type.id == pax_type_id)
}
