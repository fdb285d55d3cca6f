use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, warn};

use volara_core::{
    CabinClass, FlightProvider, FlightRepository, LegResult, Place, PlaceRepository, PriceRange,
    SearchCriteria, SearchError, TripType, UnifiedSearchResult,
};

/// Produces one combined, filterable result set from the local schedule and
/// the external provider.
///
/// The failure contract: only invalid input, an unknown airport code or a
/// local-storage fault surface as errors. A provider fault of any kind is
/// downgraded to an advisory message on the result, with the local side
/// intact.
pub struct UnifiedSearch {
    places: Arc<dyn PlaceRepository>,
    flights: Arc<dyn FlightRepository>,
    provider: Arc<dyn FlightProvider>,
}

impl UnifiedSearch {
    pub fn new(
        places: Arc<dyn PlaceRepository>,
        flights: Arc<dyn FlightRepository>,
        provider: Arc<dyn FlightProvider>,
    ) -> Self {
        Self {
            places,
            flights,
            provider,
        }
    }

    pub async fn search(
        &self,
        criteria: SearchCriteria,
        include_live: bool,
    ) -> Result<UnifiedSearchResult, SearchError> {
        // 1. Input invariants, before touching any store.
        criteria.validate()?;

        // 2. Resolve codes to place records; unknown code stops the search.
        let origin = self.resolve_place(&criteria.origin).await?;
        let destination = self.resolve_place(&criteria.destination).await?;

        // 3. Local outbound leg on the departure date's weekday.
        let outbound_flights = self
            .flights
            .flights_on(
                &origin.code,
                &destination.code,
                criteria.depart_date.weekday(),
                criteria.cabin,
            )
            .await?;
        let outbound_days = if outbound_flights.is_empty() {
            self.flights
                .available_days(&origin.code, &destination.code, criteria.cabin)
                .await?
        } else {
            Vec::new()
        };

        // 4. Round trip repeats the query with the endpoints swapped and the
        // return date's weekday.
        let inbound = match (criteria.trip_type, criteria.return_date) {
            (TripType::RoundTrip, Some(return_date)) => {
                let flights = self
                    .flights
                    .flights_on(
                        &destination.code,
                        &origin.code,
                        return_date.weekday(),
                        criteria.cabin,
                    )
                    .await?;
                let available_days = if flights.is_empty() {
                    self.flights
                        .available_days(&destination.code, &origin.code, criteria.cabin)
                        .await?
                } else {
                    Vec::new()
                };
                let price_range =
                    PriceRange::from_prices(local_fares(&flights, criteria.cabin));
                Some(LegResult {
                    origin: destination.clone(),
                    destination: origin.clone(),
                    flights,
                    available_days,
                    price_range,
                })
            }
            _ => None,
        };

        // 5. Live search is opt-in and never fatal.
        let (external_flights, external_error) = if include_live {
            match self.provider.search_offers(&criteria).await {
                Ok(batch) => {
                    debug!("Live search contributed {} flights", batch.count);
                    (batch.flights, None)
                }
                Err(err) => {
                    warn!("Live flight search unavailable: {err}");
                    (Vec::new(), Some(err.to_string()))
                }
            }
        } else {
            (Vec::new(), None)
        };

        // 6.-7. Outbound bounds union local fares with external totals.
        let outbound_prices = local_fares(&outbound_flights, criteria.cabin)
            .chain(external_flights.iter().map(|f| f.price.total));
        let outbound = LegResult {
            origin,
            destination,
            price_range: PriceRange::from_prices(outbound_prices),
            flights: outbound_flights,
            available_days: outbound_days,
        };

        Ok(UnifiedSearchResult {
            criteria,
            outbound,
            inbound,
            external_flights,
            external_error,
        })
    }

    async fn resolve_place(&self, code: &str) -> Result<Place, SearchError> {
        self.places
            .find_by_code(&code.to_uppercase())
            .await?
            .ok_or_else(|| SearchError::UnknownPlace(code.to_uppercase()))
    }
}

fn local_fares<'a>(
    flights: &'a [volara_core::FlightRecord],
    cabin: CabinClass,
) -> impl Iterator<Item = f64> + 'a {
    flights.iter().map(move |f| cabin.fare_of(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;
    use volara_core::{
        AirportSuggestion, FlightPrice, FlightRecord, NormalizedBatch, NormalizedFlight,
        PriceAnalysis, ProviderError, StoreError,
    };

    struct FixedPlaces;

    #[async_trait]
    impl PlaceRepository for FixedPlaces {
        async fn find_by_code(&self, code: &str) -> Result<Option<Place>, StoreError> {
            let known = [
                ("LAX", "Los Angeles International", "Los Angeles", "USA"),
                ("JFK", "John F. Kennedy International", "New York", "USA"),
            ];
            Ok(known
                .iter()
                .find(|(c, _, _, _)| *c == code)
                .map(|(c, airport, city, country)| Place {
                    code: c.to_string(),
                    airport: airport.to_string(),
                    city: city.to_string(),
                    country: country.to_string(),
                }))
        }

        async fn search(&self, _query: &str) -> Result<Vec<Place>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingFlights {
        flights: Vec<FlightRecord>,
        queries: Mutex<Vec<(String, String, Weekday)>>,
    }

    #[async_trait]
    impl FlightRepository for RecordingFlights {
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
            self.queries
                .lock()
                .unwrap()
                .push((origin.to_string(), destination.to_string(), day));
            let mut matches: Vec<_> = self
                .flights
                .iter()
                .filter(|f| {
                    f.origin == origin
                        && f.destination == destination
                        && f.depart_day == volara_core::weekday_name(day)
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
            let mut days: Vec<String> = self
                .flights
                .iter()
                .filter(|f| {
                    f.origin == origin && f.destination == destination && f.offers_cabin(cabin)
                })
                .map(|f| f.depart_day.clone())
                .collect();
            days.dedup();
            Ok(days)
        }
    }

    enum Script {
        Flights(Vec<f64>),
        Fail,
    }

    struct ScriptedProvider {
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn flights(totals: Vec<f64>) -> Self {
            Self {
                script: Script::Flights(totals),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                script: Script::Fail,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn external_flight(total: f64) -> NormalizedFlight {
        NormalizedFlight {
            offer_id: Some("1".to_string()),
            segment_id: None,
            airline_code: "DL".to_string(),
            airline_name: "Delta Air Lines".to_string(),
            flight_number: "423".to_string(),
            aircraft: "321".to_string(),
            origin_code: Some("LAX".to_string()),
            origin_terminal: None,
            departure_time: None,
            destination_code: Some("JFK".to_string()),
            destination_terminal: None,
            arrival_time: None,
            duration: None,
            price: FlightPrice {
                total,
                currency: "USD".to_string(),
                base: total,
                fees: serde_json::Value::Array(Vec::new()),
                taxes: serde_json::Value::Array(Vec::new()),
            },
            available_seats: 5,
            booking_class: None,
            itinerary: 0,
            stops: 0,
            is_direct: true,
            source: "amadeus".to_string(),
        }
    }

    #[async_trait]
    impl FlightProvider for ScriptedProvider {
        async fn search_offers(
            &self,
            _criteria: &SearchCriteria,
        ) -> Result<NormalizedBatch, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Flights(totals) => {
                    let flights: Vec<_> = totals.iter().map(|t| external_flight(*t)).collect();
                    let count = flights.len();
                    Ok(NormalizedBatch { flights, count })
                }
                Script::Fail => Err(ProviderError::Api {
                    code: "38190".to_string(),
                    description: "Invalid access token".to_string(),
                }),
            }
        }

        async fn airport_suggestions(
            &self,
            _keyword: &str,
        ) -> Result<Vec<AirportSuggestion>, ProviderError> {
            Ok(Vec::new())
        }

        async fn price_analysis(
            &self,
            _origin: &str,
            _destination: &str,
            _depart_date: &str,
        ) -> Result<PriceAnalysis, ProviderError> {
            Err(ProviderError::Transport("not scripted".to_string()))
        }
    }

    fn local_flight(
        origin: &str,
        destination: &str,
        day: &str,
        economy: f64,
    ) -> FlightRecord {
        FlightRecord {
            id: Uuid::new_v4(),
            carrier: "Volara Air".to_string(),
            flight_number: "VL100".to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            depart_day: day.to_string(),
            depart_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 330,
            economy_fare: economy,
            business_fare: economy * 3.0,
            first_fare: 0.0,
        }
    }

    // 2026-09-07 is a Monday, 2026-09-14 the following Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
    }

    fn merger_with(
        flights: Vec<FlightRecord>,
        provider: Arc<ScriptedProvider>,
    ) -> UnifiedSearch {
        UnifiedSearch::new(
            Arc::new(FixedPlaces),
            Arc::new(RecordingFlights {
                flights,
                queries: Mutex::new(Vec::new()),
            }),
            provider,
        )
    }

    #[tokio::test]
    async fn live_flag_off_skips_the_provider() {
        let provider = Arc::new(ScriptedProvider::flights(vec![300.0]));
        let merger = merger_with(
            vec![local_flight("LAX", "JFK", "Monday", 250.0)],
            provider.clone(),
        );

        let result = merger
            .search(SearchCriteria::one_way("LAX", "JFK", monday()), false)
            .await
            .unwrap();

        assert!(result.external_flights.is_empty());
        assert!(result.external_error.is_none());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_keeps_local_results() {
        let provider = Arc::new(ScriptedProvider::failing());
        let merger = merger_with(
            vec![local_flight("LAX", "JFK", "Monday", 250.0)],
            provider.clone(),
        );

        let result = merger
            .search(SearchCriteria::one_way("LAX", "JFK", monday()), true)
            .await
            .unwrap();

        assert_eq!(result.outbound.flights.len(), 1);
        assert!(result.external_flights.is_empty());
        let message = result.external_error.expect("advisory message expected");
        assert!(message.contains("38190"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn combined_range_unions_local_and_external_prices() {
        let provider = Arc::new(ScriptedProvider::flights(vec![180.0, 720.0]));
        let merger = merger_with(
            vec![
                local_flight("LAX", "JFK", "Monday", 250.0),
                local_flight("LAX", "JFK", "Monday", 430.0),
            ],
            provider,
        );

        let result = merger
            .search(SearchCriteria::one_way("LAX", "JFK", monday()), true)
            .await
            .unwrap();

        // 180 floors to 100, 720 ceils to 800.
        assert_eq!(result.outbound.price_range.min, 100.0);
        assert_eq!(result.outbound.price_range.max, 800.0);
    }

    #[tokio::test]
    async fn round_trip_swaps_route_and_uses_return_weekday() {
        let provider = Arc::new(ScriptedProvider::flights(Vec::new()));
        let flights = Arc::new(RecordingFlights {
            flights: vec![
                local_flight("LAX", "JFK", "Monday", 250.0),
                local_flight("JFK", "LAX", "Friday", 310.0),
            ],
            queries: Mutex::new(Vec::new()),
        });
        let merger = UnifiedSearch::new(Arc::new(FixedPlaces), flights.clone(), provider);

        let mut criteria = SearchCriteria::one_way("LAX", "JFK", monday());
        criteria.trip_type = TripType::RoundTrip;
        // 2026-09-11 is a Friday.
        criteria.return_date = NaiveDate::from_ymd_opt(2026, 9, 11);

        let result = merger.search(criteria, false).await.unwrap();

        let inbound = result.inbound.expect("round trip returns an inbound leg");
        assert_eq!(inbound.origin.code, "JFK");
        assert_eq!(inbound.destination.code, "LAX");
        assert_eq!(inbound.flights.len(), 1);

        let queries = flights.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(
            queries[1],
            ("JFK".to_string(), "LAX".to_string(), Weekday::Fri)
        );
    }

    #[tokio::test]
    async fn empty_day_reports_alternate_service_days() {
        let provider = Arc::new(ScriptedProvider::flights(Vec::new()));
        let merger = merger_with(
            vec![local_flight("LAX", "JFK", "Wednesday", 250.0)],
            provider,
        );

        let result = merger
            .search(SearchCriteria::one_way("LAX", "JFK", monday()), false)
            .await
            .unwrap();

        assert!(result.outbound.flights.is_empty());
        assert_eq!(result.outbound.available_days, vec!["Wednesday".to_string()]);
        // Both sources empty: the placeholder range, not 0..0.
        assert_eq!(result.outbound.price_range, PriceRange::PLACEHOLDER);
    }

    #[tokio::test]
    async fn unknown_code_is_a_hard_error() {
        let provider = Arc::new(ScriptedProvider::flights(vec![300.0]));
        let merger = merger_with(Vec::new(), provider.clone());

        let result = merger
            .search(SearchCriteria::one_way("LAX", "ZZZ", monday()), true)
            .await;

        assert!(matches!(result, Err(SearchError::UnknownPlace(code)) if code == "ZZZ"));
        // Validation failed before any provider call.
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn lowercase_codes_resolve() {
        let provider = Arc::new(ScriptedProvider::flights(Vec::new()));
        let merger = merger_with(
            vec![local_flight("LAX", "JFK", "Monday", 250.0)],
            provider,
        );

        let result = merger
            .search(SearchCriteria::one_way("lax", "jfk", monday()), false)
            .await
            .unwrap();
        assert_eq!(result.outbound.origin.code, "LAX");
        assert_eq!(result.outbound.flights.len(), 1);
    }
}
