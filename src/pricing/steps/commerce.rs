//! Generic commerce steps over a flat item list.
//!
//! Not part of tour pricing; see `pipeline::commerce_pricing_pipeline`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::calculators::{line_total, percentage_of};
use crate::pricing::context::{PriceContext, PriceLine};
use crate::pricing::step::{PriceStep, PricingError};

/// Default flat tax rate (10%)
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.10);

/// Breakdown line code written by `TaxStep`
pub const TAX_LINE_CODE: &str = "tax";

/// Sums `qty * unit_price` over all items into a single "base" line.
pub struct BasePriceStep;

#[async_trait]
impl PriceStep for BasePriceStep {
    fn name(&self) -> &'static str {
        "base_price"
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, mut ctx: PriceContext) -> Result<PriceContext, PricingError> {
        let mut total = Decimal::ZERO;

        for item in &ctx.items {
            if item.qty < 0 {
                return Err(PricingError::InvalidItem {
                    sku: item.sku.clone(),
                    reason: "quantity must not be negative".to_string(),
                });
            }
            if item.unit_price < Decimal::ZERO {
                return Err(PricingError::InvalidItem {
                    sku: item.sku.clone(),
                    reason: "unit price must not be negative".to_string(),
                });
            }
            total = line_total(item.qty, item.unit_price)
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| PricingError::InvalidItem {
                    sku: item.sku.clone(),
                    reason: "amount out of range".to_string(),
                })?;
        }

        ctx.breakdown
            .push(PriceLine::new("base", "Base price", total).with_meta("items", ctx.items.len()));
        Ok(ctx)
    }
}

/// Adds a flat-rate tax line computed on the running breakdown subtotal.
pub struct TaxStep {
    rate: Decimal,
}

impl TaxStep {
    pub fn new(rate: Decimal) -> Result<Self, PricingError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(PricingError::InvalidTaxRate(rate));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

impl Default for TaxStep {
    fn default() -> Self {
        Self {
            rate: DEFAULT_TAX_RATE,
        }
    }
}

#[async_trait]
impl PriceStep for TaxStep {
    fn name(&self) -> &'static str {
        TAX_LINE_CODE
    }

    fn priority(&self) -> i32 {
        90
    }

    async fn execute(&self, mut ctx: PriceContext) -> Result<PriceContext, PricingError> {
        let out_of_range = || PricingError::Overflow {
            step: self.name().to_string(),
        };

        let subtotal = ctx.subtotal().ok_or_else(out_of_range)?;
        let tax = percentage_of(subtotal, self.rate).ok_or_else(out_of_range)?;
        subtotal.checked_add(tax).ok_or_else(out_of_range)?;

        ctx.breakdown
            .push(PriceLine::new(TAX_LINE_CODE, "Tax", tax).with_meta("rate", self.rate));
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::context::PriceItem;

    fn item(sku: &str, qty: i64, unit_price: Decimal) -> PriceItem {
        PriceItem {
            sku: sku.to_string(),
            qty,
            unit_price,
        }
    }

    #[tokio::test]
    async fn test_base_price_sums_items() {
        let ctx = PriceContext::for_items(vec![
            item("SNORKEL", 2, dec!(15.50)),
            item("LUNCH", 3, dec!(8)),
        ]);

        let ctx = BasePriceStep.execute(ctx).await.unwrap();
        assert_eq!(ctx.breakdown.len(), 1);
        assert_eq!(ctx.breakdown[0].code, "base");
        assert_eq!(ctx.breakdown[0].amount, dec!(55.00));
        assert_eq!(ctx.breakdown[0].meta.get("items").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_base_price_empty_items() {
        let ctx = BasePriceStep.execute(PriceContext::default()).await.unwrap();
        assert_eq!(ctx.breakdown[0].amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_base_price_rejects_negative_quantity() {
        let ctx = PriceContext::for_items(vec![item("SNORKEL", -1, dec!(15))]);
        let err = BasePriceStep.execute(ctx).await.unwrap_err();
        assert!(matches!(err, PricingError::InvalidItem { ref sku, .. } if sku == "SNORKEL"));
    }

    #[tokio::test]
    async fn test_base_price_rejects_negative_unit_price() {
        let ctx = PriceContext::for_items(vec![
            item("SNORKEL", 1, dec!(15)),
            item("VOUCHER", 1, dec!(-0.01)),
        ]);
        let err = BasePriceStep.execute(ctx).await.unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidItem {
                sku: "VOUCHER".to_string(),
                reason: "unit price must not be negative".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_base_price_rejects_line_out_of_range() {
        let ctx = PriceContext::for_items(vec![item(
            "CHARTER",
            9_000_000_000_000_000_000,
            dec!(79228162514264337593543950),
        )]);
        let err = BasePriceStep.execute(ctx).await.unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidItem {
                sku: "CHARTER".to_string(),
                reason: "amount out of range".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_base_price_rejects_total_out_of_range() {
        let ctx = PriceContext::for_items(vec![
            item("CHARTER", 1, Decimal::MAX),
            item("LUNCH", 1, dec!(1)),
        ]);
        let err = BasePriceStep.execute(ctx).await.unwrap_err();
        assert!(matches!(err, PricingError::InvalidItem { ref sku, .. } if sku == "LUNCH"));
    }

    #[tokio::test]
    async fn test_tax_on_running_subtotal() {
        let mut ctx = PriceContext::default();
        ctx.breakdown.push(PriceLine::new("base", "Base price", dec!(200)));
        ctx.breakdown.push(PriceLine::new("fee", "Booking fee", dec!(5)));

        let ctx = TaxStep::default().execute(ctx).await.unwrap();
        let tax = ctx.breakdown.last().unwrap();
        assert_eq!(tax.code, TAX_LINE_CODE);
        assert_eq!(tax.amount, dec!(20.50));
        assert_eq!(ctx.subtotal(), Some(dec!(225.50)));
    }

    #[tokio::test]
    async fn test_tax_out_of_range_fails() {
        let mut ctx = PriceContext::default();
        ctx.breakdown.push(PriceLine::new("base", "Base price", Decimal::MAX));

        let err = TaxStep::default().execute(ctx).await.unwrap_err();
        assert_eq!(
            err,
            PricingError::Overflow {
                step: "tax".to_string()
            }
        );
    }

    #[test]
    fn test_tax_rate_validation() {
        assert!(TaxStep::new(dec!(0)).is_ok());
        assert!(TaxStep::new(dec!(1)).is_ok());
        assert_eq!(
            TaxStep::new(dec!(-0.01)).err(),
            Some(PricingError::InvalidTaxRate(dec!(-0.01)))
        );
        assert!(TaxStep::new(dec!(1.01)).is_err());
        assert_eq!(TaxStep::default().rate(), dec!(0.10));
    }
}
