//! Tour pricing service.
//!
//! Exposes the tour pricing pipeline and a generic item quote pipeline over
//! a small JSON API.

pub mod config;
pub mod error;
pub mod pricing;

use std::sync::Arc;

use axum::{routing::get, Router};
use rust_decimal::Decimal;
use tower_http::trace::TraceLayer;

use crate::pricing::{
    commerce_pricing_pipeline, tour_pricing_pipeline, PricingError, PricingService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub tour_pricing: Arc<PricingService>,
    pub commerce_pricing: Arc<PricingService>,
}

impl AppState {
    pub fn new(tax_rate: Decimal) -> Result<Self, PricingError> {
        Ok(Self {
            tour_pricing: Arc::new(tour_pricing_pipeline()),
            commerce_pricing: Arc::new(commerce_pricing_pipeline(tax_rate)?),
        })
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/pricing", pricing::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
