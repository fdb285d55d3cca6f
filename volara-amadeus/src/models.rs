use serde::Deserialize;
use serde_json::Value;

/// One priced itinerary bundle from the flight-offers response. Field names
/// follow the provider's camelCase wire format; everything is optional
/// because the payload arrives from outside our control.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffer {
    pub id: Option<String>,
    #[serde(default)]
    pub itineraries: Vec<RawItinerary>,
    pub price: Option<RawPrice>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItinerary {
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    pub id: Option<String>,
    pub carrier_code: Option<String>,
    pub number: Option<String>,
    pub aircraft: Option<RawAircraft>,
    pub departure: Option<RawEndpoint>,
    pub arrival: Option<RawEndpoint>,
    pub duration: Option<String>,
    pub number_of_bookable_seats: Option<i32>,
    pub booking_class: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAircraft {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEndpoint {
    pub iata_code: Option<String>,
    pub terminal: Option<String>,
    /// Provider-local ISO timestamp.
    pub at: Option<String>,
}

/// Offer-level price block. `total` and `base` come over the wire as
/// strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    pub total: Option<String>,
    pub base: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub fees: Value,
    #[serde(default)]
    pub taxes: Value,
}

/// Wrapper around the provider's `{"data": [...]}` envelope.
#[derive(Debug, Deserialize)]
pub struct OffersResponse {
    #[serde(default)]
    pub data: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub data: Vec<RawLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub iata_code: Option<String>,
    pub name: Option<String>,
    pub sub_type: Option<String>,
    pub address: Option<RawAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    pub city_name: Option<String>,
    pub country_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceMetricsResponse {
    #[serde(default)]
    pub data: Vec<RawPriceMetrics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceMetrics {
    pub currency_code: Option<String>,
    #[serde(default)]
    pub price_metrics: Value,
}

/// Structured error body the provider returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub errors: Vec<ProviderErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorEntry {
    pub status: Option<i64>,
    pub code: Option<i64>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("offer {offer} carries a malformed {field} price: {value:?}")]
    BadPrice {
        offer: String,
        field: &'static str,
        value: String,
    },
}
