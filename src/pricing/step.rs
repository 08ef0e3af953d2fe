//! Pricing step contract and step errors.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::context::PriceContext;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid item {sku}: {reason}")]
    InvalidItem { sku: String, reason: String },

    #[error("Invalid tax rate {0}: must be between 0 and 1")]
    InvalidTaxRate(Decimal),

    #[error("Step {step} failed: {message}")]
    StepFailed { step: String, message: String },

    #[error("Amount out of range in step {step}")]
    Overflow { step: String },
}

impl PricingError {
    /// Stable identifier used in error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidItem { .. } => "invalid_item",
            PricingError::InvalidTaxRate(_) => "invalid_tax_rate",
            PricingError::StepFailed { .. } => "step_failed",
            PricingError::Overflow { .. } => "overflow",
        }
    }
}

/// A unit of work in a pricing pipeline.
///
/// Steps run in ascending `priority`. A step reads what earlier steps left in
/// the context but must cope with any of it being absent, since each call
/// site assembles its own step set.
#[async_trait]
pub trait PriceStep: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32;

    async fn execute(&self, ctx: PriceContext) -> Result<PriceContext, PricingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidItem {
            sku: "KAYAK-1".to_string(),
            reason: "quantity must not be negative".to_string(),
        };
        assert!(err.to_string().contains("KAYAK-1"));
        assert_eq!(err.error_type(), "invalid_item");

        let err = PricingError::InvalidTaxRate(dec!(1.5));
        assert!(err.to_string().contains("1.5"));

        let err = PricingError::StepFailed {
            step: "fx".to_string(),
            message: "rate unavailable".to_string(),
        };
        assert!(err.to_string().contains("rate unavailable"));
        assert_eq!(err.error_type(), "step_failed");

        let err = PricingError::Overflow {
            step: "tour_rule_price".to_string(),
        };
        assert!(err.to_string().contains("tour_rule_price"));
        assert_eq!(err.error_type(), "overflow");
    }
}
