pub mod app_config;
pub mod database;
pub mod flight_repo;
pub mod memory;
pub mod place_repo;
pub mod redis_repo;
pub mod seed;
pub mod ticket_repo;

pub use database::DbClient;
pub use flight_repo::PostgresFlightRepository;
pub use place_repo::PostgresPlaceRepository;
pub use redis_repo::RedisClient;
pub use ticket_repo::PostgresTicketRepository;
