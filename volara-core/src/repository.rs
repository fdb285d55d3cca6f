use async_trait::async_trait;
use chrono::Weekday;
use uuid::Uuid;

use crate::flight::{CabinClass, FlightRecord, Place};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Reference-data access for airports.
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<Place>, StoreError>;

    /// Case-insensitive substring match over code, airport, city and country.
    async fn search(&self, query: &str) -> Result<Vec<Place>, StoreError>;
}

/// Query access to the local flight schedule.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<FlightRecord>, StoreError>;

    /// Flights on the route operating on `day` whose fare for `cabin` is
    /// non-zero, ordered by that fare ascending.
    async fn flights_on(
        &self,
        origin: &str,
        destination: &str,
        day: Weekday,
        cabin: CabinClass,
    ) -> Result<Vec<FlightRecord>, StoreError>;

    /// Distinct weekday names with service on the route in `cabin`, used to
    /// suggest alternate days when the exact-day query is empty.
    async fn available_days(
        &self,
        origin: &str,
        destination: &str,
        cabin: CabinClass,
    ) -> Result<Vec<String>, StoreError>;
}

/// Advisory TTL cache for provider lookups. A miss or a fault simply means
/// the caller re-queries; no locking discipline is required beyond what the
/// backing store already gives.
#[async_trait]
pub trait SuggestionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError>;
}
