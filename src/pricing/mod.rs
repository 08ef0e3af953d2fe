//! Tour pricing engine.
//!
//! A pricing run is a `PriceContext` passed through an ordered list of
//! `PriceStep`s by the `PricingService`. `pipeline` assembles the step sets
//! for tour pricing and for flat item quotes.

pub mod calculators;
pub mod context;
pub mod models;
pub mod pipeline;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod step;
pub mod steps;

// Re-export commonly used items
pub use calculators::round_money;
pub use context::{PaxTypePriceResult, PriceContext, PriceLayer, PriceSource};
pub use pipeline::{commerce_pricing_pipeline, tour_pricing_pipeline, PipelineBuilder};
pub use routes::router;
pub use services::PricingService;
pub use step::{PriceStep, PricingError};
