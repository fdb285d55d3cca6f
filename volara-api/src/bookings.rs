use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use volara_booking::{CreateBookingRequest, Ticket};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{ref_no}", get(ticket_data))
        .route("/v1/bookings/{ref_no}/confirm", post(confirm_booking))
        .route("/v1/bookings/{ref_no}/cancel", post(cancel_booking))
}

#[derive(Debug, Serialize)]
struct TicketSummary {
    ref_no: String,
    flight_id: Uuid,
    origin: String,
    destination: String,
    travel_date: chrono::NaiveDate,
    total_fare: f64,
    status: String,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            ref_no: ticket.ref_no.clone(),
            flight_id: ticket.flight_id,
            origin: ticket.origin.clone(),
            destination: ticket.destination.clone(),
            travel_date: ticket.travel_date,
            total_fare: ticket.total_fare,
            status: ticket.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    tickets: Vec<TicketSummary>,
    total_fare: f64,
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let tickets = state.bookings.create(req).await?;
    info!(
        "Booking created: {:?}",
        tickets.iter().map(|t| &t.ref_no).collect::<Vec<_>>()
    );

    let total_fare = tickets.iter().map(|t| t.total_fare).sum();
    let response = BookingResponse {
        tickets: tickets.iter().map(TicketSummary::from).collect(),
        total_fare,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

fn ticket_json(ticket: &Ticket) -> Value {
    json!({
        "ref": ticket.ref_no,
        "from": ticket.origin,
        "to": ticket.destination,
        "flight_id": ticket.flight_id,
        "flight_date": ticket.travel_date,
        "cabin": ticket.cabin,
        "passengers": ticket.passengers,
        "passenger_count": ticket.passengers.len(),
        "contact_email": ticket.contact_email,
        "total_fare": ticket.total_fare,
        "status": ticket.status,
        "booked_at": ticket.booked_at,
    })
}

async fn ticket_data(
    State(state): State<AppState>,
    Path(ref_no): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let ticket = state.bookings.get(&ref_no).await?;
    Ok(Json(ticket_json(&ticket)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    email: String,
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let tickets = state.bookings.list_for_contact(&params.email).await?;
    Ok(Json(tickets.iter().map(ticket_json).collect()))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Path(ref_no): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let ticket = state.bookings.confirm(&ref_no).await?;
    Ok(Json(ticket_json(&ticket)))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(ref_no): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let ticket = state.bookings.cancel(&ref_no).await?;
    Ok(Json(ticket_json(&ticket)))
}
