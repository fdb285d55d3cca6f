use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use volara_core::{CabinClass, StoreError};

/// Ticket status in the booking lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "PENDING",
            TicketStatus::Confirmed => "CONFIRMED",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

/// One booked leg. Route fields are denormalized from the flight at booking
/// time so the ticket stays readable even if the schedule changes.
/// Status only moves through the booking manager's transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    /// Human booking reference, six uppercase alphanumerics.
    pub ref_no: String,
    pub flight_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub travel_date: NaiveDate,
    pub cabin: CabinClass,
    pub passengers: Vec<Passenger>,
    pub contact_email: String,
    pub contact_phone: String,
    pub country_code: String,
    /// Cabin fare × passenger count + booking fee, fixed at creation.
    pub total_fare: f64,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub booked_at: Option<DateTime<Utc>>,
}

const REF_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REF_LEN: usize = 6;

/// Mints a fresh booking reference.
pub fn mint_reference() -> String {
    let mut rng = rand::thread_rng();
    (0..REF_LEN)
        .map(|_| REF_CHARSET[rng.gen_range(0..REF_CHARSET.len())] as char)
        .collect()
}

/// Repository trait for ticket persistence
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &Ticket) -> Result<(), StoreError>;

    async fn get_by_ref(&self, ref_no: &str) -> Result<Option<Ticket>, StoreError>;

    async fn update(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Tickets for a contact email, newest first.
    async fn list_by_email(&self, email: &str) -> Result<Vec<Ticket>, StoreError>;
}
