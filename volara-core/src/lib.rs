pub mod carriers;
pub mod flight;
pub mod provider;
pub mod repository;
pub mod search;

pub use carriers::{CarrierDirectory, StaticCarrierDirectory};
pub use flight::{weekday_name, CabinClass, FlightRecord, Place};
pub use provider::{
    AirportSuggestion, FlightPrice, FlightProvider, NormalizedBatch, NormalizedFlight,
    PriceAnalysis, ProviderError,
};
pub use repository::{FlightRepository, PlaceRepository, StoreError, SuggestionCache};
pub use search::{
    LegResult, PriceRange, SearchCriteria, SearchError, TripType, UnifiedSearchResult,
    DEFAULT_MAX_RESULTS, MAX_RESULT_CAP,
};
