//! Explicit, idempotent reference-data seeding. Called once at startup,
//! never as an import side effect: places upsert with ON CONFLICT DO
//! NOTHING, and the demo schedule is only generated while the flights
//! table is empty.

use rand::Rng;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use volara_core::Place;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const CARRIERS: [(&str, &str); 6] = [
    ("VL", "Volara Air"),
    ("AA", "American Airlines"),
    ("DL", "Delta Air Lines"),
    ("UA", "United Airlines"),
    ("BA", "British Airways"),
    ("EK", "Emirates"),
];

pub fn default_places() -> Vec<Place> {
    let rows = [
        ("LAX", "Los Angeles International", "Los Angeles", "USA"),
        ("JFK", "John F. Kennedy International", "New York", "USA"),
        ("ORD", "O'Hare International", "Chicago", "USA"),
        ("SFO", "San Francisco International", "San Francisco", "USA"),
        ("SEA", "Seattle-Tacoma International", "Seattle", "USA"),
        ("MIA", "Miami International", "Miami", "USA"),
        ("DEN", "Denver International", "Denver", "USA"),
        ("LHR", "Heathrow", "London", "United Kingdom"),
        ("CDG", "Charles de Gaulle", "Paris", "France"),
        ("FRA", "Frankfurt am Main", "Frankfurt", "Germany"),
        ("DXB", "Dubai International", "Dubai", "United Arab Emirates"),
        ("SIN", "Changi", "Singapore", "Singapore"),
        ("DEL", "Indira Gandhi International", "New Delhi", "India"),
        ("BOM", "Chhatrapati Shivaji Maharaj International", "Mumbai", "India"),
        ("HND", "Haneda", "Tokyo", "Japan"),
        ("SYD", "Kingsford Smith", "Sydney", "Australia"),
    ];
    rows.iter()
        .map(|(code, airport, city, country)| Place {
            code: code.to_string(),
            airport: airport.to_string(),
            city: city.to_string(),
            country: country.to_string(),
        })
        .collect()
}

/// Domestic and international route pairs the demo schedule covers. Each
/// pair is seeded in both directions.
const ROUTES: [(&str, &str); 12] = [
    ("LAX", "JFK"),
    ("LAX", "SFO"),
    ("JFK", "ORD"),
    ("ORD", "DEN"),
    ("SEA", "SFO"),
    ("MIA", "JFK"),
    ("JFK", "LHR"),
    ("LHR", "CDG"),
    ("FRA", "DXB"),
    ("DXB", "SIN"),
    ("DEL", "BOM"),
    ("SIN", "HND"),
];

pub async fn seed_reference_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    for place in default_places() {
        sqlx::query(
            "INSERT INTO places (code, airport, city, country) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(&place.code)
        .bind(&place.airport)
        .bind(&place.city)
        .bind(&place.country)
        .execute(pool)
        .await?;
    }

    let (flight_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flights")
        .fetch_one(pool)
        .await?;
    if flight_count > 0 {
        info!("Flight schedule already present ({flight_count} rows), skipping generation");
        return Ok(());
    }

    info!("Generating demo flight schedule");
    let mut rng = rand::thread_rng();
    let mut inserted = 0u32;

    for (a, b) in ROUTES {
        for (origin, destination) in [(a, b), (b, a)] {
            for day in WEEKDAYS {
                let (carrier_code, carrier_name) = CARRIERS[rng.gen_range(0..CARRIERS.len())];
                let flight_number = format!("{carrier_code}{}", rng.gen_range(100..999));
                let depart_time = chrono::NaiveTime::from_hms_opt(
                    rng.gen_range(5..22),
                    [0, 15, 30, 45][rng.gen_range(0..4)],
                    0,
                )
                .unwrap();
                let duration_minutes: i32 = rng.gen_range(90..780);
                let economy_fare = rng.gen_range(120.0_f64..600.0).round();
                // Not every flight sells premium cabins; zero fare marks
                // the cabin as not offered.
                let business_fare = if rng.gen_bool(0.7) {
                    (economy_fare * rng.gen_range(2.2..3.5)).round()
                } else {
                    0.0
                };
                let first_fare = if rng.gen_bool(0.3) {
                    (economy_fare * rng.gen_range(4.0..6.0)).round()
                } else {
                    0.0
                };

                sqlx::query(
                    r#"
                    INSERT INTO flights
                        (id, carrier, flight_number, origin, destination, depart_day,
                         depart_time, duration_minutes, economy_fare, business_fare, first_fare)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(carrier_name)
                .bind(&flight_number)
                .bind(origin)
                .bind(destination)
                .bind(day)
                .bind(depart_time)
                .bind(duration_minutes)
                .bind(economy_fare)
                .bind(business_fare)
                .bind(first_fare)
                .execute(pool)
                .await?;
                inserted += 1;
            }
        }
    }

    info!("Seeded {inserted} flights across {} routes", ROUTES.len() * 2);
    Ok(())
}
