//! In-memory store implementations, used by tests and local development
//! without a database.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Weekday;
use uuid::Uuid;

use volara_booking::{Ticket, TicketRepository};
use volara_core::{
    weekday_name, CabinClass, FlightRecord, FlightRepository, Place, PlaceRepository, StoreError,
    SuggestionCache,
};

pub struct InMemoryPlaceRepository {
    places: Vec<Place>,
}

impl InMemoryPlaceRepository {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }
}

#[async_trait]
impl PlaceRepository for InMemoryPlaceRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Place>, StoreError> {
        Ok(self.places.iter().find(|p| p.code == code).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<Place>, StoreError> {
        let q = query.to_lowercase();
        Ok(self
            .places
            .iter()
            .filter(|p| {
                p.code.to_lowercase().contains(&q)
                    || p.airport.to_lowercase().contains(&q)
                    || p.city.to_lowercase().contains(&q)
                    || p.country.to_lowercase().contains(&q)
            })
            .cloned()
            .collect())
    }
}

pub struct InMemoryFlightRepository {
    flights: Vec<FlightRecord>,
}

impl InMemoryFlightRepository {
    pub fn new(flights: Vec<FlightRecord>) -> Self {
        Self { flights }
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn get(&self, id: Uuid) -> Result<Option<FlightRecord>, StoreError> {
        Ok(self.flights.iter().find(|f| f.id == id).cloned())
    }

    async fn flights_on(
        &self,
        origin: &str,
        destination: &str,
        day: Weekday,
        cabin: CabinClass,
    ) -> Result<Vec<FlightRecord>, StoreError> {
        let day = weekday_name(day);
        let mut matches: Vec<_> = self
            .flights
            .iter()
            .filter(|f| {
                f.origin == origin
                    && f.destination == destination
                    && f.depart_day == day
                    && f.offers_cabin(cabin)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| cabin.fare_of(a).total_cmp(&cabin.fare_of(b)));
        Ok(matches)
    }

    async fn available_days(
        &self,
        origin: &str,
        destination: &str,
        cabin: CabinClass,
    ) -> Result<Vec<String>, StoreError> {
        let mut days = Vec::new();
        for flight in &self.flights {
            if flight.origin == origin
                && flight.destination == destination
                && flight.offers_cabin(cabin)
                && !days.contains(&flight.depart_day)
            {
                days.push(flight.depart_day.clone());
            }
        }
        Ok(days)
    }
}

#[derive(Default)]
pub struct InMemoryTicketRepository {
    by_ref: Mutex<HashMap<String, Ticket>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.by_ref
            .lock()
            .unwrap()
            .insert(ticket.ref_no.clone(), ticket.clone());
        Ok(())
    }

    async fn get_by_ref(&self, ref_no: &str) -> Result<Option<Ticket>, StoreError> {
        Ok(self.by_ref.lock().unwrap().get(ref_no).cloned())
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.by_ref
            .lock()
            .unwrap()
            .insert(ticket.ref_no.clone(), ticket.clone());
        Ok(())
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Ticket>, StoreError> {
        let mut tickets: Vec<_> = self
            .by_ref
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.contact_email == email)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }
}

/// TTL map standing in for Redis outside production.
#[derive(Default)]
pub struct InMemorySuggestionCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemorySuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuggestionCache for InMemorySuggestionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (
                value.to_string(),
                Instant::now() + Duration::from_secs(ttl_seconds),
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_cache_entries_read_as_misses() {
        let cache = InMemorySuggestionCache::new();
        cache.set("k", "v", 0).await.unwrap();
        // TTL of zero expires immediately.
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn place_search_matches_any_field() {
        let repo = InMemoryPlaceRepository::new(vec![Place {
            code: "LHR".to_string(),
            airport: "Heathrow".to_string(),
            city: "London".to_string(),
            country: "United Kingdom".to_string(),
        }]);
        assert_eq!(repo.search("lond").await.unwrap().len(), 1);
        assert_eq!(repo.search("heath").await.unwrap().len(), 1);
        assert_eq!(repo.search("tokyo").await.unwrap().len(), 0);
    }
}
