//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use super::context::PriceItem;
use super::models::Tour;

/// Request to price a tour per pax type
#[derive(Debug, Deserialize)]
pub struct TourPriceRequest {
    pub tour: Tour,
    /// When set, only rules applicable on this date are considered
    #[serde(default)]
    pub travel_date: Option<NaiveDate>,
}

/// Request to quote a flat item list
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<PriceItem>,
}
