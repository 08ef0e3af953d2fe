//! Response DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::checked_sum;
use super::context::{PaxTypePriceResult, PriceContext, PriceLine};
use super::step::PricingError;
use super::steps::TAX_LINE_CODE;

/// Response for tour pricing
#[derive(Debug, Serialize)]
pub struct TourPriceResponse {
    pub tour_id: i64,
    pub travel_date: Option<NaiveDate>,
    pub prices: Vec<PaxTypePriceResult>,
}

/// Response for an item quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub lines: Vec<PriceLine>,
    /// Sum of all lines except tax
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

impl TryFrom<PriceContext> for QuoteResponse {
    type Error = PricingError;

    fn try_from(ctx: PriceContext) -> Result<Self, Self::Error> {
        let out_of_range = || PricingError::Overflow {
            step: "quote_totals".to_string(),
        };

        let total = ctx.subtotal().ok_or_else(out_of_range)?;
        let subtotal = checked_sum(
            ctx.breakdown
                .iter()
                .filter(|line| line.code != TAX_LINE_CODE)
                .map(|line| line.amount),
        )
        .ok_or_else(out_of_range)?;

        Ok(Self {
            lines: ctx.breakdown,
            subtotal,
            total,
        })
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
