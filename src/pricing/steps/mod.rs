//! Pricing steps available to pipeline assembly.

pub mod commerce;
pub mod tour;

pub use commerce::{BasePriceStep, TaxStep, DEFAULT_TAX_RATE, TAX_LINE_CODE};
pub use tour::{TourAssemblePriceStep, TourBasePriceStep, TourRulePriceStep};
