use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use volara_core::{
    AirportSuggestion, CarrierDirectory, FlightProvider, NormalizedBatch, PriceAnalysis,
    ProviderError, SearchCriteria, TripType,
};

use crate::models::{
    LocationsResponse, NormalizeError, OffersResponse, PriceMetricsResponse, ProviderErrorBody,
};
use crate::normalize::normalize_offers;

const HTTP_TIMEOUT_SECS: u64 = 30;
/// Refresh the OAuth token slightly before the provider expires it.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 30;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Flight-offers client against the Amadeus self-service API. One token is
/// fetched via the client-credentials grant and reused in-process until it
/// expires.
pub struct AmadeusClient {
    http: Client,
    config: AmadeusConfig,
    carriers: Arc<dyn CarrierDirectory>,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig, carriers: Arc<dyn CarrierDirectory>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        info!("Initializing Amadeus client for {}", config.base_url);

        Self {
            http,
            config,
            carriers,
            token: RwLock::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Fetching new Amadeus access token");
        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(structured_error(response).await);
        }

        let token: TokenResponse = response.json().await.map_err(transport)?;
        let margin = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        let access_token = token.access_token.clone();
        *self.token.write().await = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(margin),
        });

        Ok(access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(structured_error(response).await);
        }

        response.json::<T>().await.map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.to_string())
}

/// Maps a non-2xx response onto the provider's machine-readable error
/// code/description when the body carries one.
async fn structured_error(response: reqwest::Response) -> ProviderError {
    let status = response.status();
    match response.json::<ProviderErrorBody>().await {
        Ok(body) if !body.errors.is_empty() => {
            let entry = &body.errors[0];
            let code = entry
                .code
                .or(entry.status)
                .map(|c| c.to_string())
                .unwrap_or_else(|| status.as_u16().to_string());
            let description = match (&entry.title, &entry.detail) {
                (Some(title), Some(detail)) => format!("{title}: {detail}"),
                (Some(title), None) => title.clone(),
                (None, Some(detail)) => detail.clone(),
                (None, None) => status.to_string(),
            };
            ProviderError::Api { code, description }
        }
        _ => ProviderError::Api {
            code: status.as_u16().to_string(),
            description: status.to_string(),
        },
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    async fn search_offers(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<NormalizedBatch, ProviderError> {
        let mut query = vec![
            ("originLocationCode", criteria.origin.clone()),
            ("destinationLocationCode", criteria.destination.clone()),
            ("departureDate", criteria.depart_date.to_string()),
            ("adults", criteria.passengers.to_string()),
            ("travelClass", criteria.cabin.provider_code().to_string()),
            ("max", criteria.capped_results().to_string()),
        ];
        if criteria.trip_type == TripType::RoundTrip {
            if let Some(return_date) = criteria.return_date {
                query.push(("returnDate", return_date.to_string()));
            }
        }

        debug!(
            origin = %criteria.origin,
            destination = %criteria.destination,
            date = %criteria.depart_date,
            "Searching live flight offers"
        );

        let response: OffersResponse = self
            .get_json("/v2/shopping/flight-offers", &query)
            .await?;
        info!("Provider returned {} flight offers", response.data.len());

        normalize_offers(&response.data, self.carriers.as_ref()).map_err(
            |err: NormalizeError| {
                warn!("Failed to normalize provider payload: {err}");
                ProviderError::Normalization(err.to_string())
            },
        )
    }

    async fn airport_suggestions(
        &self,
        keyword: &str,
    ) -> Result<Vec<AirportSuggestion>, ProviderError> {
        let query = [
            ("keyword", keyword.to_string()),
            ("subType", "AIRPORT,CITY".to_string()),
        ];
        let response: LocationsResponse = self
            .get_json("/v1/reference-data/locations", &query)
            .await?;

        Ok(response
            .data
            .into_iter()
            .map(|location| AirportSuggestion {
                code: location.iata_code.unwrap_or_default(),
                name: location.name.clone().unwrap_or_default(),
                city: location
                    .address
                    .as_ref()
                    .and_then(|a| a.city_name.clone())
                    .unwrap_or_default(),
                country: location
                    .address
                    .as_ref()
                    .and_then(|a| a.country_name.clone())
                    .unwrap_or_default(),
                kind: location.sub_type.unwrap_or_default(),
            })
            .collect())
    }

    async fn price_analysis(
        &self,
        origin: &str,
        destination: &str,
        depart_date: &str,
    ) -> Result<PriceAnalysis, ProviderError> {
        let query = [
            ("originIataCode", origin.to_string()),
            ("destinationIataCode", destination.to_string()),
            ("departureDate", depart_date.to_string()),
        ];
        let response: PriceMetricsResponse = self
            .get_json("/v1/analytics/itinerary-price-metrics", &query)
            .await?;

        let first = response.data.into_iter().next();
        Ok(PriceAnalysis {
            currency: first
                .as_ref()
                .and_then(|m| m.currency_code.clone())
                .unwrap_or_else(|| "USD".to_string()),
            price_metrics: first
                .map(|m| m.price_metrics)
                .unwrap_or(serde_json::Value::Array(Vec::new())),
        })
    }
}
