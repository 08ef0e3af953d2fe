//! Pipeline assembly for each pricing use case.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::services::PricingService;
use super::step::{PriceStep, PricingError};
use super::steps::{
    BasePriceStep, TaxStep, TourAssemblePriceStep, TourBasePriceStep, TourRulePriceStep,
};

/// Collects steps for a `PricingService`.
#[derive(Default)]
pub struct PipelineBuilder {
    steps: Vec<Arc<dyn PriceStep>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step<S: PriceStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn shared_step(mut self, step: Arc<dyn PriceStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> PricingService {
        PricingService::new(self.steps)
    }
}

/// Tour price table: base, rules, assemble.
pub fn tour_pricing_pipeline() -> PricingService {
    PipelineBuilder::new()
        .step(TourBasePriceStep)
        .step(TourRulePriceStep)
        .step(TourAssemblePriceStep)
        .build()
}

/// Flat item pricing: base line plus flat-rate tax.
pub fn commerce_pricing_pipeline(tax_rate: Decimal) -> Result<PricingService, PricingError> {
    Ok(PipelineBuilder::new()
        .step(BasePriceStep)
        .step(TaxStep::new(tax_rate)?)
        .build())
}
