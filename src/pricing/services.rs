//! Pricing service orchestrating the configured steps.

use std::sync::Arc;

use tracing::{debug, warn};

use super::context::PriceContext;
use super::step::{PriceStep, PricingError};

/// Runs a fixed set of pricing steps in ascending priority order.
///
/// Steps sharing a priority run in the order they were supplied.
#[derive(Clone)]
pub struct PricingService {
    steps: Vec<Arc<dyn PriceStep>>,
}

impl PricingService {
    pub fn new(mut steps: Vec<Arc<dyn PriceStep>>) -> Self {
        // sort_by_key is stable
        steps.sort_by_key(|step| step.priority());
        Self { steps }
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step over a working copy of `initial`.
    ///
    /// The first failing step aborts the run and its error is returned as is.
    pub async fn calculate(&self, initial: &PriceContext) -> Result<PriceContext, PricingError> {
        let mut ctx = initial.clone();

        for step in &self.steps {
            debug!(step = step.name(), priority = step.priority(), "Running pricing step");

            ctx = step.execute(ctx).await.map_err(|e| {
                warn!(step = step.name(), error = %e, "Pricing step failed");
                e
            })?;
        }

        Ok(ctx)
    }
}
