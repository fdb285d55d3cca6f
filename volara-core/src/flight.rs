use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference-data row for an airport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Place {
    pub code: String,
    pub airport: String,
    pub city: String,
    pub country: String,
}

/// Fare category. Governs which fare column is used for filtering and
/// sorting, and maps onto the provider's travel-class parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    Business,
    First,
}

impl Default for CabinClass {
    fn default() -> Self {
        CabinClass::Economy
    }
}

impl CabinClass {
    /// Column name used by the flight store.
    pub fn fare_column(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy_fare",
            CabinClass::Business => "business_fare",
            CabinClass::First => "first_fare",
        }
    }

    /// The provider's travel-class code.
    pub fn provider_code(&self) -> &'static str {
        match self {
            CabinClass::Economy => "ECONOMY",
            CabinClass::Business => "BUSINESS",
            CabinClass::First => "FIRST",
        }
    }

    pub fn fare_of(&self, flight: &FlightRecord) -> f64 {
        match self {
            CabinClass::Economy => flight.economy_fare,
            CabinClass::Business => flight.business_fare,
            CabinClass::First => flight.first_fare,
        }
    }
}

/// Immutable snapshot of a scheduled flight. A fare of 0.0 means the cabin
/// is not offered on this flight, never "free".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: Uuid,
    pub carrier: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    /// Weekday of operation, stored by full name (Monday..Sunday).
    pub depart_day: String,
    pub depart_time: NaiveTime,
    pub duration_minutes: i32,
    pub economy_fare: f64,
    pub business_fare: f64,
    pub first_fare: f64,
}

impl FlightRecord {
    pub fn offers_cabin(&self, cabin: CabinClass) -> bool {
        cabin.fare_of(self) > 0.0
    }
}

/// Full weekday name as persisted in the schedule table.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(economy: f64, business: f64, first: f64) -> FlightRecord {
        FlightRecord {
            id: Uuid::new_v4(),
            carrier: "Volara Air".to_string(),
            flight_number: "VL101".to_string(),
            origin: "LAX".to_string(),
            destination: "JFK".to_string(),
            depart_day: "Monday".to_string(),
            depart_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            duration_minutes: 320,
            economy_fare: economy,
            business_fare: business,
            first_fare: first,
        }
    }

    #[test]
    fn zero_fare_means_cabin_not_offered() {
        let f = flight(120.0, 0.0, 900.0);
        assert!(f.offers_cabin(CabinClass::Economy));
        assert!(!f.offers_cabin(CabinClass::Business));
        assert!(f.offers_cabin(CabinClass::First));
    }

    #[test]
    fn cabin_class_deserializes_snake_case() {
        let cabin: CabinClass = serde_json::from_str("\"business\"").unwrap();
        assert_eq!(cabin, CabinClass::Business);
        assert_eq!(cabin.provider_code(), "BUSINESS");
    }

    #[test]
    fn weekday_names_are_full() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
