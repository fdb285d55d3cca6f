use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volara_amadeus::{AmadeusClient, AmadeusConfig};
use volara_api::{app, AppState};
use volara_booking::BookingManager;
use volara_core::StaticCarrierDirectory;
use volara_search::{SuggestionService, UnifiedSearch};
use volara_store::{
    seed, DbClient, PostgresFlightRepository, PostgresPlaceRepository, PostgresTicketRepository,
    RedisClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volara_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = volara_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Volara API on port {}", config.server.port);

    // Postgres Connection
    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");
    seed::seed_reference_data(&db.pool)
        .await
        .expect("Failed to seed reference data");

    // Redis Connection
    let redis_client = RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");
    let redis_arc = Arc::new(redis_client);

    // Live provider + injectable carrier table
    let carriers = Arc::new(StaticCarrierDirectory::new());
    let provider = Arc::new(AmadeusClient::new(
        AmadeusConfig {
            base_url: config.amadeus.base_url.clone(),
            client_id: config.amadeus.client_id.clone(),
            client_secret: config.amadeus.client_secret.clone(),
        },
        carriers,
    ));

    let places = Arc::new(PostgresPlaceRepository::new(db.pool.clone()));
    let flights = Arc::new(PostgresFlightRepository::new(db.pool.clone()));
    let tickets = Arc::new(PostgresTicketRepository::new(db.pool.clone()));

    let app_state = AppState {
        places: places.clone(),
        search: Arc::new(UnifiedSearch::new(places, flights.clone(), provider.clone())),
        suggestions: Arc::new(SuggestionService::new(provider.clone(), redis_arc.clone())),
        provider,
        bookings: Arc::new(BookingManager::new(
            flights,
            tickets,
            config.business_rules.booking_fee,
        )),
        redis: Some(redis_arc),
        business_rules: config.business_rules.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
