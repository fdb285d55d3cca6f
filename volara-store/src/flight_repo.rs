use async_trait::async_trait;
use chrono::Weekday;
use sqlx::PgPool;
use uuid::Uuid;

use volara_core::{weekday_name, CabinClass, FlightRecord, FlightRepository, StoreError};

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    carrier: String,
    flight_number: String,
    origin: String,
    destination: String,
    depart_day: String,
    depart_time: chrono::NaiveTime,
    duration_minutes: i32,
    economy_fare: f64,
    business_fare: f64,
    first_fare: f64,
}

impl From<FlightRow> for FlightRecord {
    fn from(row: FlightRow) -> Self {
        FlightRecord {
            id: row.id,
            carrier: row.carrier,
            flight_number: row.flight_number,
            origin: row.origin,
            destination: row.destination,
            depart_day: row.depart_day,
            depart_time: row.depart_time,
            duration_minutes: row.duration_minutes,
            economy_fare: row.economy_fare,
            business_fare: row.business_fare,
            first_fare: row.first_fare,
        }
    }
}

const FLIGHT_COLUMNS: &str = "id, carrier, flight_number, origin, destination, depart_day, \
     depart_time, duration_minutes, economy_fare, business_fare, first_fare";

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn get(&self, id: Uuid) -> Result<Option<FlightRecord>, StoreError> {
        let sql = format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1");
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(FlightRecord::from))
    }

    async fn flights_on(
        &self,
        origin: &str,
        destination: &str,
        day: Weekday,
        cabin: CabinClass,
    ) -> Result<Vec<FlightRecord>, StoreError> {
        // The fare column comes from the cabin enum, never from user input.
        let fare = cabin.fare_column();
        let sql = format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights \
             WHERE origin = $1 AND destination = $2 AND depart_day = $3 AND {fare} > 0 \
             ORDER BY {fare} ASC"
        );
        let rows = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(origin)
            .bind(destination)
            .bind(weekday_name(day))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(FlightRecord::from).collect())
    }

    async fn available_days(
        &self,
        origin: &str,
        destination: &str,
        cabin: CabinClass,
    ) -> Result<Vec<String>, StoreError> {
        let fare = cabin.fare_column();
        let sql = format!(
            "SELECT DISTINCT depart_day FROM flights \
             WHERE origin = $1 AND destination = $2 AND {fare} > 0"
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql)
            .bind(origin)
            .bind(destination)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(day,)| day).collect())
    }
}
