use std::sync::Arc;

use volara_booking::BookingManager;
use volara_core::{FlightProvider, PlaceRepository};
use volara_search::{SuggestionService, UnifiedSearch};
use volara_store::app_config::BusinessRules;
use volara_store::RedisClient;

#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlaceRepository>,
    pub search: Arc<UnifiedSearch>,
    pub suggestions: Arc<SuggestionService>,
    pub provider: Arc<dyn FlightProvider>,
    pub bookings: Arc<BookingManager>,
    /// Absent outside production; the rate limiter fails open without it.
    pub redis: Option<Arc<RedisClient>>,
    pub business_rules: BusinessRules,
}
