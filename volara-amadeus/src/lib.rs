pub mod client;
pub mod models;
pub mod normalize;

pub use client::{AmadeusClient, AmadeusConfig};
pub use models::{NormalizeError, RawOffer};
pub use normalize::normalize_offers;
