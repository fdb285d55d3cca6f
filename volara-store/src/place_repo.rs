use async_trait::async_trait;
use sqlx::PgPool;

use volara_core::{Place, PlaceRepository, StoreError};

pub struct PostgresPlaceRepository {
    pool: PgPool,
}

impl PostgresPlaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct PlaceRow {
    code: String,
    airport: String,
    city: String,
    country: String,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            code: row.code,
            airport: row.airport,
            city: row.city,
            country: row.country,
        }
    }
}

#[async_trait]
impl PlaceRepository for PostgresPlaceRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Place>, StoreError> {
        let row = sqlx::query_as::<_, PlaceRow>(
            "SELECT code, airport, city, country FROM places WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(Place::from))
    }

    async fn search(&self, query: &str) -> Result<Vec<Place>, StoreError> {
        let pattern = format!("%{}%", query.to_lowercase());
        let rows = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT code, airport, city, country FROM places
            WHERE LOWER(code) LIKE $1
               OR LOWER(airport) LIKE $1
               OR LOWER(city) LIKE $1
               OR LOWER(country) LIKE $1
            ORDER BY code
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Place::from).collect())
    }
}
