use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::flight::{CabinClass, FlightRecord, Place};
use crate::provider::NormalizedFlight;
use crate::repository::StoreError;

pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const MAX_RESULT_CAP: u32 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl Default for TripType {
    fn default() -> Self {
        TripType::OneWay
    }
}

/// What the caller wants searched. Validated before any store or provider
/// access happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub trip_type: TripType,
    #[serde(default)]
    pub cabin: CabinClass,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_passengers() -> u32 {
    1
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

impl SearchCriteria {
    pub fn one_way(origin: &str, destination: &str, depart_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_uppercase(),
            destination: destination.to_uppercase(),
            depart_date,
            return_date: None,
            trip_type: TripType::OneWay,
            cabin: CabinClass::Economy,
            passengers: 1,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Checks the input invariants: distinct route endpoints and a return
    /// date present exactly when the trip is a round trip.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(SearchError::InvalidInput(
                "origin and destination are required".to_string(),
            ));
        }
        if self.origin.eq_ignore_ascii_case(&self.destination) {
            return Err(SearchError::InvalidInput(
                "origin and destination must differ".to_string(),
            ));
        }
        if self.passengers == 0 {
            return Err(SearchError::InvalidInput(
                "at least one passenger is required".to_string(),
            ));
        }
        match (self.trip_type, self.return_date) {
            (TripType::RoundTrip, None) => Err(SearchError::InvalidInput(
                "return date is required for a round trip".to_string(),
            )),
            (TripType::OneWay, Some(_)) => Err(SearchError::InvalidInput(
                "return date given for a one-way trip".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Result cap clamped to what the provider accepts.
    pub fn capped_results(&self) -> u32 {
        self.max_results.clamp(1, MAX_RESULT_CAP)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search input: {0}")]
    InvalidInput(String),
    #[error("Unknown airport code: {0}")]
    UnknownPlace(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Combined fare bounds, rounded outward to the nearest 100 so the filter
/// UI gets stable endpoints. When no source contributed a price the range
/// falls back to 0..1000 instead of a degenerate 0..0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub const PLACEHOLDER: PriceRange = PriceRange {
        min: 0.0,
        max: 1000.0,
    };

    /// Union of all supplied prices, min floored and max ceiled to 100.
    pub fn from_prices<I>(prices: I) -> PriceRange
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for p in prices {
            min = Some(min.map_or(p, |m: f64| m.min(p)));
            max = Some(max.map_or(p, |m: f64| m.max(p)));
        }
        match (min, max) {
            (Some(lo), Some(hi)) => PriceRange {
                min: (lo / 100.0).floor() * 100.0,
                max: (hi / 100.0).ceil() * 100.0,
            },
            _ => PriceRange::PLACEHOLDER,
        }
    }

    pub fn contains(&self, other: &PriceRange) -> bool {
        self.min <= other.min && self.max >= other.max
    }
}

/// One leg of the local search: flights ordered by ascending active-cabin
/// fare, plus alternate service days when the exact day came back empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegResult {
    pub origin: Place,
    pub destination: Place,
    pub flights: Vec<FlightRecord>,
    pub available_days: Vec<String>,
    pub price_range: PriceRange,
}

/// The merged local + external search outcome. External failure never
/// empties the local side; it only populates `external_error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedSearchResult {
    pub criteria: SearchCriteria,
    /// Outbound leg; its price range is the union of local fares and
    /// external offer totals.
    pub outbound: LegResult,
    /// Inbound leg for round trips, priced from local fares only.
    pub inbound: Option<LegResult>,
    pub external_flights: Vec<NormalizedFlight>,
    pub external_error: Option<String>,
}
