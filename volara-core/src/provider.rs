use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::search::SearchCriteria;

/// Offer-level pricing copied onto every segment emitted from that offer.
/// `fees` and `taxes` pass through as the provider sent them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightPrice {
    pub total: f64,
    pub currency: String,
    pub base: f64,
    pub fees: Value,
    pub taxes: Value,
}

/// Canonical shape of one external flight segment after normalization.
///
/// Price fields are duplicated from the owning offer across all of its
/// segments; `offer_id` and `itinerary` let consumers group them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedFlight {
    pub offer_id: Option<String>,
    pub segment_id: Option<String>,
    pub airline_code: String,
    pub airline_name: String,
    pub flight_number: String,
    pub aircraft: String,
    pub origin_code: Option<String>,
    pub origin_terminal: Option<String>,
    pub departure_time: Option<String>,
    pub destination_code: Option<String>,
    pub destination_terminal: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
    pub price: FlightPrice,
    pub available_seats: i32,
    pub booking_class: Option<String>,
    /// Index of the itinerary within its offer (0 = outbound).
    pub itinerary: usize,
    pub stops: usize,
    pub is_direct: bool,
    pub source: String,
}

/// Successful normalization of a whole provider response. Normalization is
/// all-or-nothing: a failed batch never yields a partial flight list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedBatch {
    pub flights: Vec<NormalizedFlight>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportSuggestion {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAnalysis {
    pub currency: String,
    pub price_metrics: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider error {code}: {description}")]
    Api { code: String, description: String },
    #[error("Provider transport failure: {0}")]
    Transport(String),
    #[error("Error processing flight data: {0}")]
    Normalization(String),
}

/// The external flight-data provider. Every call site must tolerate both a
/// structured error and a transport failure.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Live offer search, already run through the normalizer.
    async fn search_offers(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<NormalizedBatch, ProviderError>;

    async fn airport_suggestions(
        &self,
        keyword: &str,
    ) -> Result<Vec<AirportSuggestion>, ProviderError>;

    async fn price_analysis(
        &self,
        origin: &str,
        destination: &str,
        depart_date: &str,
    ) -> Result<PriceAnalysis, ProviderError>;
}
