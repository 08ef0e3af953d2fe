//! Pricing API route handlers.

use axum::{extract::State, routing::post, Json, Router};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::AppState;

use super::context::{PriceContext, PriceItem};
use super::requests::{QuoteRequest, TourPriceRequest};
use super::responses::{QuoteResponse, TourPriceResponse};

/// Pricing routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tours/price", post(price_tour))
        .route("/quote", post(quote))
}

/// Price a tour per pax type
pub async fn price_tour(
    State(state): State<AppState>,
    Json(request): Json<TourPriceRequest>,
) -> Result<Json<TourPriceResponse>> {
    let tour_id = request.tour.id;
    let tour = match request.travel_date {
        Some(date) => request.tour.with_rules_applicable_on(date),
        None => request.tour,
    };

    debug!(tour_id, travel_date = ?request.travel_date, "Pricing tour");

    let ctx = state
        .tour_pricing
        .calculate(&PriceContext::for_tour(tour))
        .await?;

    Ok(Json(TourPriceResponse {
        tour_id,
        travel_date: request.travel_date,
        prices: ctx.price_result().to_vec(),
    }))
}

/// Quote a flat list of items with tax
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let items: Vec<PriceItem> = request.items;
    if items.is_empty() {
        return Err(AppError::BadRequest(
            "Quote requires at least one item".to_string(),
        ));
    }
    debug!(items = items.len(), "Quoting items");

    let ctx = state
        .commerce_pricing
        .calculate(&PriceContext::for_items(items))
        .await?;

    Ok(Json(QuoteResponse::try_from(ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::context::{PriceLayer, PriceSource};
    use crate::pricing::models::{
        BasePaxTypePrice, PaxType, PriceRule, PriceType, RulePaxTypePrice, Tour, TourVariant,
        VariantStatus,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn weekend_tour() -> Tour {
        Tour {
            id: 42,
            name: "Mekong Delta".to_string(),
            variants: vec![TourVariant {
                id: 1,
                name: "Standard".to_string(),
                status: VariantStatus::Active,
                base_prices: vec![BasePaxTypePrice {
                    pax_type_id: 1,
                    price: dec!(500000),
                    pax_type: Some(PaxType {
                        id: 1,
                        name: "Adult".to_string(),
                        min_age: Some(12),
                        max_age: None,
                    }),
                }],
                price_rules: vec![PriceRule {
                    id: 9,
                    name: Some("Weekend surcharge".to_string()),
                    start_date: None,
                    end_date: None,
                    // Saturday and Sunday
                    weekday_mask: (1 << 6) | 1,
                    price_type: PriceType::Delta,
                    priority: 10,
                    pax_type_prices: vec![RulePaxTypePrice {
                        pax_type_id: 1,
                        price: Some(dec!(100000)),
                        pax_type: None,
                    }],
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_price_tour_applies_rules_for_travel_date() {
        let state = AppState::new(dec!(0.10)).unwrap();

        // Saturday
        let request = TourPriceRequest {
            tour: weekend_tour(),
            travel_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        let Json(body) = price_tour(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(body.tour_id, 42);
        assert_eq!(body.prices[0].final_price, Some(dec!(600000)));
        assert_eq!(body.prices[0].price_source, PriceSource::RuleDelta);

        // Monday
        let request = TourPriceRequest {
            tour: weekend_tour(),
            travel_date: NaiveDate::from_ymd_opt(2024, 6, 3),
        };
        let Json(body) = price_tour(State(state), Json(request)).await.unwrap();
        assert_eq!(body.prices[0].final_price, Some(dec!(500000)));
        assert_eq!(body.prices[0].price_layer, PriceLayer::Base);
    }

    #[tokio::test]
    async fn test_price_tour_without_date_uses_all_rules() {
        let state = AppState::new(dec!(0.10)).unwrap();
        let request = TourPriceRequest {
            tour: weekend_tour(),
            travel_date: None,
        };

        let Json(body) = price_tour(State(state), Json(request)).await.unwrap();
        assert_eq!(body.travel_date, None);
        assert_eq!(body.prices[0].final_price, Some(dec!(600000)));
    }

    #[tokio::test]
    async fn test_quote_with_tax() {
        let state = AppState::new(dec!(0.10)).unwrap();
        let request = QuoteRequest {
            items: vec![PriceItem {
                sku: "BOAT-SEAT".to_string(),
                qty: 3,
                unit_price: dec!(33.33),
            }],
        };

        let Json(body) = quote(State(state), Json(request)).await.unwrap();
        assert_eq!(body.subtotal, dec!(99.99));
        assert_eq!(body.total, dec!(109.99));
    }

    #[tokio::test]
    async fn test_quote_rejects_invalid_item() {
        let state = AppState::new(dec!(0.10)).unwrap();
        let request = QuoteRequest {
            items: vec![PriceItem {
                sku: "BOAT-SEAT".to_string(),
                qty: -3,
                unit_price: dec!(10),
            }],
        };

        let err = quote(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::Pricing(_)));
    }

    #[tokio::test]
    async fn test_quote_requires_items() {
        let state = AppState::new(dec!(0.10)).unwrap();
        let request = QuoteRequest { items: vec![] };

        let err = quote(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
