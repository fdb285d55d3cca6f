use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use volara_core::{CabinClass, FlightRecord, FlightRepository, StoreError};

use crate::models::{mint_reference, Gender, Passenger, Ticket, TicketRepository, TicketStatus};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("Flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("Cabin {cabin} is not offered on flight {flight}")]
    CabinNotOffered { flight: Uuid, cabin: String },

    #[error("Invalid booking request: {0}")]
    InvalidInput(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassengerInput {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: Uuid,
    pub travel_date: NaiveDate,
    pub cabin: CabinClass,
    /// Round-trip bookings name a second flight; both return fields must be
    /// present together.
    pub return_flight_id: Option<Uuid>,
    pub return_date: Option<NaiveDate>,
    pub passengers: Vec<PassengerInput>,
    pub contact_email: String,
    pub contact_phone: String,
    pub country_code: String,
}

/// Manages ticket lifecycle and state transitions
///
/// PENDING → CONFIRMED (payment) and PENDING/CONFIRMED → CANCELLED are the
/// only moves; re-confirming a confirmed ticket and re-cancelling a
/// cancelled one are idempotent no-ops.
pub struct BookingManager {
    flights: Arc<dyn FlightRepository>,
    tickets: Arc<dyn TicketRepository>,
    booking_fee: f64,
}

impl BookingManager {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        tickets: Arc<dyn TicketRepository>,
        booking_fee: f64,
    ) -> Self {
        Self {
            flights,
            tickets,
            booking_fee,
        }
    }

    /// Creates one PENDING ticket per leg. A round trip yields two tickets
    /// sharing contact data, each priced from its own flight.
    pub async fn create(&self, req: CreateBookingRequest) -> Result<Vec<Ticket>, BookingError> {
        if req.passengers.is_empty() {
            return Err(BookingError::InvalidInput(
                "at least one passenger is required".to_string(),
            ));
        }

        let mut legs = vec![(req.flight_id, req.travel_date)];
        match (req.return_flight_id, req.return_date) {
            (Some(flight_id), Some(date)) => legs.push((flight_id, date)),
            (None, None) => {}
            _ => {
                return Err(BookingError::InvalidInput(
                    "return flight and return date must be given together".to_string(),
                ))
            }
        }

        let passengers: Vec<Passenger> = req
            .passengers
            .iter()
            .map(|p| Passenger {
                first_name: p.first_name.clone(),
                last_name: p.last_name.clone(),
                gender: p.gender,
            })
            .collect();

        let mut tickets = Vec::with_capacity(legs.len());
        for (flight_id, travel_date) in legs {
            let flight = self
                .flights
                .get(flight_id)
                .await?
                .ok_or(BookingError::FlightNotFound(flight_id))?;
            let ticket = self
                .build_ticket(&flight, travel_date, req.cabin, &passengers, &req)
                .await?;
            self.tickets.insert(&ticket).await?;
            info!("Ticket {} created for flight {}", ticket.ref_no, flight_id);
            tickets.push(ticket);
        }

        Ok(tickets)
    }

    async fn build_ticket(
        &self,
        flight: &FlightRecord,
        travel_date: NaiveDate,
        cabin: CabinClass,
        passengers: &[Passenger],
        req: &CreateBookingRequest,
    ) -> Result<Ticket, BookingError> {
        if !flight.offers_cabin(cabin) {
            return Err(BookingError::CabinNotOffered {
                flight: flight.id,
                cabin: cabin.provider_code().to_string(),
            });
        }

        let total_fare = cabin.fare_of(flight) * passengers.len() as f64 + self.booking_fee;

        Ok(Ticket {
            id: Uuid::new_v4(),
            ref_no: mint_reference(),
            flight_id: flight.id,
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            travel_date,
            cabin,
            passengers: passengers.to_vec(),
            contact_email: req.contact_email.clone(),
            contact_phone: req.contact_phone.clone(),
            country_code: req.country_code.clone(),
            total_fare,
            status: TicketStatus::Pending,
            created_at: Utc::now(),
            booked_at: None,
        })
    }

    /// Transition: PENDING → CONFIRMED (the payment step). Idempotent when
    /// the ticket is already confirmed.
    pub async fn confirm(&self, ref_no: &str) -> Result<Ticket, BookingError> {
        let mut ticket = self.get(ref_no).await?;
        match ticket.status {
            TicketStatus::Confirmed => Ok(ticket),
            TicketStatus::Pending => {
                ticket.status = TicketStatus::Confirmed;
                ticket.booked_at = Some(Utc::now());
                self.tickets.update(&ticket).await?;
                info!("Ticket {} confirmed", ticket.ref_no);
                Ok(ticket)
            }
            TicketStatus::Cancelled => Err(BookingError::InvalidTransition {
                from: "CANCELLED".to_string(),
                to: "CONFIRMED".to_string(),
            }),
        }
    }

    /// Transition: PENDING or CONFIRMED → CANCELLED. Idempotent when the
    /// ticket is already cancelled.
    pub async fn cancel(&self, ref_no: &str) -> Result<Ticket, BookingError> {
        let mut ticket = self.get(ref_no).await?;
        if ticket.status != TicketStatus::Cancelled {
            ticket.status = TicketStatus::Cancelled;
            self.tickets.update(&ticket).await?;
            info!("Ticket {} cancelled", ticket.ref_no);
        }
        Ok(ticket)
    }

    pub async fn get(&self, ref_no: &str) -> Result<Ticket, BookingError> {
        self.tickets
            .get_by_ref(ref_no)
            .await?
            .ok_or_else(|| BookingError::NotFound(ref_no.to_string()))
    }

    pub async fn list_for_contact(&self, email: &str) -> Result<Vec<Ticket>, BookingError> {
        Ok(self.tickets.list_by_email(email).await?)
    }
}
