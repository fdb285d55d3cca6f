use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use volara_core::{
    CabinClass, Place, SearchCriteria, TripType, UnifiedSearchResult, DEFAULT_MAX_RESULTS,
};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/search", get(unified_search))
        .route("/v1/places", get(query_places))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    origin: Option<String>,
    destination: Option<String>,
    depart_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    trip_type: Option<TripType>,
    cabin: Option<CabinClass>,
    passengers: Option<u32>,
    include_live: Option<bool>,
}

impl SearchParams {
    /// Required parameters are checked here so a missing value surfaces as
    /// a 400 with a message instead of a bare rejection.
    fn into_criteria(self) -> Result<(SearchCriteria, bool), ApiError> {
        let (Some(origin), Some(destination), Some(depart_date)) =
            (self.origin, self.destination, self.depart_date)
        else {
            return Err(ApiError::ValidationError(
                "Please provide origin, destination and depart_date".to_string(),
            ));
        };

        let include_live = self.include_live.unwrap_or(true);
        let trip_type = self.trip_type.unwrap_or_default();
        let criteria = SearchCriteria {
            origin: origin.to_uppercase(),
            destination: destination.to_uppercase(),
            depart_date,
            // A return date without trip_type=round_trip is ignored, not an
            // error, same as the live endpoint.
            return_date: if trip_type == TripType::RoundTrip {
                self.return_date
            } else {
                None
            },
            trip_type,
            cabin: self.cabin.unwrap_or_default(),
            passengers: self.passengers.unwrap_or(1),
            max_results: DEFAULT_MAX_RESULTS,
        };
        Ok((criteria, include_live))
    }
}

async fn unified_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<UnifiedSearchResult>, ApiError> {
    let (criteria, include_live) = params.into_criteria()?;
    info!(
        "Unified search {} -> {} on {}",
        criteria.origin, criteria.destination, criteria.depart_date
    );

    let result = state.search.search(criteria, include_live).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct PlaceQuery {
    q: String,
}

async fn query_places(
    State(state): State<AppState>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<Vec<Place>>, ApiError> {
    let places = state.places.search(&params.q).await?;
    Ok(Json(places))
}
