use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use volara_booking::{Gender, Passenger, Ticket, TicketRepository, TicketStatus};
use volara_core::{CabinClass, StoreError};

pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn passengers_for(&self, ticket_id: Uuid) -> Result<Vec<Passenger>, StoreError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT first_name, last_name, gender FROM passengers WHERE ticket_id = $1 ORDER BY id",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|(first_name, last_name, gender)| {
                Ok(Passenger {
                    first_name,
                    last_name,
                    gender: gender_from_str(&gender)?,
                })
            })
            .collect()
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    ref_no: String,
    flight_id: Uuid,
    origin: String,
    destination: String,
    travel_date: chrono::NaiveDate,
    cabin: String,
    contact_email: String,
    contact_phone: String,
    country_code: String,
    total_fare: f64,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    booked_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TicketRow {
    fn into_ticket(self, passengers: Vec<Passenger>) -> Result<Ticket, StoreError> {
        Ok(Ticket {
            id: self.id,
            ref_no: self.ref_no,
            flight_id: self.flight_id,
            origin: self.origin,
            destination: self.destination,
            travel_date: self.travel_date,
            cabin: cabin_from_str(&self.cabin)?,
            passengers,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            country_code: self.country_code,
            total_fare: self.total_fare,
            status: status_from_str(&self.status)?,
            created_at: self.created_at,
            booked_at: self.booked_at,
        })
    }
}

fn cabin_to_str(cabin: CabinClass) -> &'static str {
    match cabin {
        CabinClass::Economy => "economy",
        CabinClass::Business => "business",
        CabinClass::First => "first",
    }
}

fn cabin_from_str(s: &str) -> Result<CabinClass, StoreError> {
    match s {
        "economy" => Ok(CabinClass::Economy),
        "business" => Ok(CabinClass::Business),
        "first" => Ok(CabinClass::First),
        other => Err(StoreError::Serialization(format!(
            "unknown cabin class: {other}"
        ))),
    }
}

fn gender_to_str(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
        Gender::Other => "other",
    }
}

fn gender_from_str(s: &str) -> Result<Gender, StoreError> {
    match s {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        other => Err(StoreError::Serialization(format!("unknown gender: {other}"))),
    }
}

fn status_from_str(s: &str) -> Result<TicketStatus, StoreError> {
    match s {
        "PENDING" => Ok(TicketStatus::Pending),
        "CONFIRMED" => Ok(TicketStatus::Confirmed),
        "CANCELLED" => Ok(TicketStatus::Cancelled),
        other => Err(StoreError::Serialization(format!(
            "unknown ticket status: {other}"
        ))),
    }
}

const TICKET_COLUMNS: &str = "id, ref_no, flight_id, origin, destination, travel_date, cabin, \
     contact_email, contact_phone, country_code, total_fare, status, created_at, booked_at";

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO tickets
                (id, ref_no, flight_id, origin, destination, travel_date, cabin,
                 contact_email, contact_phone, country_code, total_fare, status,
                 created_at, booked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.ref_no)
        .bind(ticket.flight_id)
        .bind(&ticket.origin)
        .bind(&ticket.destination)
        .bind(ticket.travel_date)
        .bind(cabin_to_str(ticket.cabin))
        .bind(&ticket.contact_email)
        .bind(&ticket.contact_phone)
        .bind(&ticket.country_code)
        .bind(ticket.total_fare)
        .bind(ticket.status.as_str())
        .bind(ticket.created_at)
        .bind(ticket.booked_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        for passenger in &ticket.passengers {
            sqlx::query(
                "INSERT INTO passengers (ticket_id, first_name, last_name, gender) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(ticket.id)
            .bind(&passenger.first_name)
            .bind(&passenger.last_name)
            .bind(gender_to_str(passenger.gender))
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn get_by_ref(&self, ref_no: &str) -> Result<Option<Ticket>, StoreError> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE ref_no = $1");
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ref_no)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match row {
            Some(row) => {
                let passengers = self.passengers_for(row.id).await?;
                Ok(Some(row.into_ticket(passengers)?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), StoreError> {
        sqlx::query("UPDATE tickets SET status = $1, booked_at = $2 WHERE id = $3")
            .bind(ticket.status.as_str())
            .bind(ticket.booked_at)
            .bind(ticket.id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Ticket>, StoreError> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE contact_email = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut tickets = Vec::with_capacity(rows.len());
        for row in rows {
            let passengers = self.passengers_for(row.id).await?;
            tickets.push(row.into_ticket(passengers)?);
        }
        Ok(tickets)
    }
}
