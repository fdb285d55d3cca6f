//! Endpoints that talk to the live provider directly. They keep the
//! provider's JSON error contract: failures come back as HTTP 200 with an
//! `error: true` payload, so the frontend can degrade in place.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use volara_core::{
    AirportSuggestion, CabinClass, SearchCriteria, TripType, DEFAULT_MAX_RESULTS,
};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/live/search", get(live_search))
        .route("/v1/live/price-analysis", get(price_analysis))
        .route("/v1/airports/suggest", get(airport_suggestions))
}

#[derive(Debug, Deserialize)]
struct LiveSearchParams {
    origin: Option<String>,
    destination: Option<String>,
    depart_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    trip_type: Option<TripType>,
    cabin: Option<CabinClass>,
    passengers: Option<u32>,
}

fn error_payload(message: &str) -> Value {
    json!({
        "error": true,
        "message": message,
        "flights": [],
    })
}

async fn live_search(
    State(state): State<AppState>,
    Query(params): Query<LiveSearchParams>,
) -> Result<Json<Value>, ApiError> {
    let (Some(origin), Some(destination), Some(depart_date)) =
        (params.origin, params.destination, params.depart_date)
    else {
        return Ok(Json(error_payload(
            "Please provide origin, destination and depart_date",
        )));
    };

    let trip_type = params.trip_type.unwrap_or_default();
    let criteria = SearchCriteria {
        origin: origin.to_uppercase(),
        destination: destination.to_uppercase(),
        depart_date,
        return_date: if trip_type == TripType::RoundTrip {
            params.return_date
        } else {
            None
        },
        trip_type,
        cabin: params.cabin.unwrap_or_default(),
        passengers: params.passengers.unwrap_or(1),
        max_results: DEFAULT_MAX_RESULTS,
    };

    // Both codes must be known locally so the page has places to render.
    let origin_place = state.places.find_by_code(&criteria.origin).await?;
    let destination_place = state.places.find_by_code(&criteria.destination).await?;
    let (Some(origin_place), Some(destination_place)) = (origin_place, destination_place) else {
        return Ok(Json(error_payload("Invalid airport codes provided")));
    };

    match state.provider.search_offers(&criteria).await {
        Ok(batch) => Ok(Json(json!({
            "error": false,
            "source": "amadeus",
            "flights": batch.flights,
            "count": batch.count,
            "origin": origin_place,
            "destination": destination_place,
        }))),
        Err(err) => {
            warn!("Live search failed: {err}");
            Ok(Json(error_payload(&format!("Flight search failed: {err}"))))
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceAnalysisParams {
    origin: Option<String>,
    destination: Option<String>,
    depart_date: Option<NaiveDate>,
}

async fn price_analysis(
    State(state): State<AppState>,
    Query(params): Query<PriceAnalysisParams>,
) -> Result<Json<Value>, ApiError> {
    let (Some(origin), Some(destination), Some(depart_date)) =
        (params.origin, params.destination, params.depart_date)
    else {
        return Err(ApiError::ValidationError(
            "Missing required parameters".to_string(),
        ));
    };

    match state
        .provider
        .price_analysis(
            &origin.to_uppercase(),
            &destination.to_uppercase(),
            &depart_date.to_string(),
        )
        .await
    {
        Ok(analysis) => Ok(Json(json!({
            "error": false,
            "currency": analysis.currency,
            "price_metrics": analysis.price_metrics,
        }))),
        Err(err) => {
            warn!("Price analysis failed: {err}");
            Ok(Json(json!({ "error": true, "message": err.to_string() })))
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestQuery {
    #[serde(default)]
    q: String,
}

async fn airport_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestQuery>,
) -> Json<Vec<AirportSuggestion>> {
    Json(state.suggestions.suggest(&params.q).await)
}
