use std::sync::Arc;

use tracing::{debug, warn};

use volara_core::{AirportSuggestion, FlightProvider, SuggestionCache};

/// Entries live for an hour; the cache is advisory so a miss or a cache
/// fault just re-queries the provider.
pub const SUGGESTION_TTL_SECS: u64 = 3600;
const MIN_KEYWORD_LEN: usize = 2;

/// Provider-backed airport autocomplete with a short-lived lookup cache.
/// Provider faults degrade to an empty suggestion list, never an error.
pub struct SuggestionService {
    provider: Arc<dyn FlightProvider>,
    cache: Arc<dyn SuggestionCache>,
}

impl SuggestionService {
    pub fn new(provider: Arc<dyn FlightProvider>, cache: Arc<dyn SuggestionCache>) -> Self {
        Self { provider, cache }
    }

    pub async fn suggest(&self, keyword: &str) -> Vec<AirportSuggestion> {
        if keyword.len() < MIN_KEYWORD_LEN {
            return Vec::new();
        }

        let key = cache_key(keyword);
        match self.cache.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str(&cached) {
                Ok(suggestions) => {
                    debug!("Suggestion cache hit for {key}");
                    return suggestions;
                }
                Err(err) => warn!("Discarding undecodable cache entry {key}: {err}"),
            },
            Ok(None) => {}
            Err(err) => warn!("Suggestion cache read failed: {err}"),
        }

        let suggestions = match self.provider.airport_suggestions(keyword).await {
            Ok(raw) => raw
                .into_iter()
                // Only entries with IATA codes are usable downstream.
                .filter(|s| !s.code.is_empty())
                .collect(),
            Err(err) => {
                warn!("Airport suggestion lookup failed: {err}");
                return Vec::new();
            }
        };

        if let Ok(serialized) = serde_json::to_string(&suggestions) {
            if let Err(err) = self
                .cache
                .set(&key, &serialized, SUGGESTION_TTL_SECS)
                .await
            {
                warn!("Suggestion cache write failed: {err}");
            }
        }

        suggestions
    }
}

fn cache_key(keyword: &str) -> String {
    format!(
        "amadeus_airports_{}",
        keyword.to_lowercase().replace(' ', "_")
    )
}
