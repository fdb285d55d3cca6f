use serde_json::Value;

use volara_core::{CarrierDirectory, FlightPrice, NormalizedBatch, NormalizedFlight};

use crate::models::{NormalizeError, RawOffer, RawPrice};

pub const SOURCE_TAG: &str = "amadeus";

/// Flattens a provider offer list into one record per segment.
///
/// All-or-nothing contract: any error mid-batch aborts the whole batch.
/// Callers must treat an `Err` as "no external data available", never as
/// partial data. Price fields are copied from the offer level onto every
/// segment of every itinerary in that offer; records keep their offer id
/// and itinerary index so consumers can group them back per leg.
pub fn normalize_offers(
    offers: &[RawOffer],
    carriers: &dyn CarrierDirectory,
) -> Result<NormalizedBatch, NormalizeError> {
    let mut flights = Vec::new();

    for offer in offers {
        let offer_id = offer.id.clone();
        let price = extract_pricing(offer_id.as_deref().unwrap_or(""), offer.price.as_ref())?;

        for (itinerary_idx, itinerary) in offer.itineraries.iter().enumerate() {
            let segment_count = itinerary.segments.len();
            for segment in &itinerary.segments {
                let airline_code = segment.carrier_code.clone().unwrap_or_default();
                flights.push(NormalizedFlight {
                    offer_id: offer_id.clone(),
                    segment_id: segment.id.clone(),
                    airline_name: carriers.display_name(&airline_code),
                    airline_code,
                    flight_number: segment.number.clone().unwrap_or_default(),
                    aircraft: segment
                        .aircraft
                        .as_ref()
                        .and_then(|a| a.code.clone())
                        .unwrap_or_default(),
                    origin_code: segment.departure.as_ref().and_then(|d| d.iata_code.clone()),
                    origin_terminal: segment.departure.as_ref().and_then(|d| d.terminal.clone()),
                    departure_time: segment.departure.as_ref().and_then(|d| d.at.clone()),
                    destination_code: segment.arrival.as_ref().and_then(|a| a.iata_code.clone()),
                    destination_terminal: segment.arrival.as_ref().and_then(|a| a.terminal.clone()),
                    arrival_time: segment.arrival.as_ref().and_then(|a| a.at.clone()),
                    duration: segment.duration.clone(),
                    price: price.clone(),
                    available_seats: segment.number_of_bookable_seats.unwrap_or(0),
                    booking_class: segment.booking_class.clone(),
                    itinerary: itinerary_idx,
                    stops: segment_count.saturating_sub(1),
                    is_direct: segment_count == 1,
                    source: SOURCE_TAG.to_string(),
                });
            }
        }
    }

    let count = flights.len();
    Ok(NormalizedBatch { flights, count })
}

/// Absent price fields default to 0 / USD; a present but unparseable number
/// is a normalization error.
fn extract_pricing(offer_id: &str, price: Option<&RawPrice>) -> Result<FlightPrice, NormalizeError> {
    let Some(price) = price else {
        return Ok(FlightPrice {
            total: 0.0,
            currency: "USD".to_string(),
            base: 0.0,
            fees: Value::Array(Vec::new()),
            taxes: Value::Array(Vec::new()),
        });
    };

    Ok(FlightPrice {
        total: parse_amount(offer_id, "total", price.total.as_deref())?,
        base: parse_amount(offer_id, "base", price.base.as_deref())?,
        currency: price.currency.clone().unwrap_or_else(|| "USD".to_string()),
        fees: or_empty(&price.fees),
        taxes: or_empty(&price.taxes),
    })
}

fn parse_amount(
    offer_id: &str,
    field: &'static str,
    raw: Option<&str>,
) -> Result<f64, NormalizeError> {
    match raw {
        None => Ok(0.0),
        Some(s) => s.parse::<f64>().map_err(|_| NormalizeError::BadPrice {
            offer: offer_id.to_string(),
            field,
            value: s.to_string(),
        }),
    }
}

fn or_empty(value: &Value) -> Value {
    if value.is_null() {
        Value::Array(Vec::new())
    } else {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volara_core::StaticCarrierDirectory;

    fn offers_from(json: &str) -> Vec<RawOffer> {
        serde_json::from_str(json).unwrap()
    }

    fn two_offer_payload() -> Vec<RawOffer> {
        // One direct offer plus a one-stop offer, the LAX→JFK shape the
        // search page renders.
        offers_from(
            r#"[
                {
                    "id": "1",
                    "itineraries": [
                        {
                            "duration": "PT5H20M",
                            "segments": [
                                {
                                    "id": "s1",
                                    "carrierCode": "DL",
                                    "number": "423",
                                    "aircraft": {"code": "321"},
                                    "departure": {"iataCode": "LAX", "terminal": "2", "at": "2026-09-07T08:15:00"},
                                    "arrival": {"iataCode": "JFK", "terminal": "4", "at": "2026-09-07T16:35:00"},
                                    "duration": "PT5H20M",
                                    "numberOfBookableSeats": 9
                                }
                            ]
                        }
                    ],
                    "price": {"total": "412.30", "base": "350.00", "currency": "USD"}
                },
                {
                    "id": "2",
                    "itineraries": [
                        {
                            "duration": "PT8H05M",
                            "segments": [
                                {
                                    "id": "s2",
                                    "carrierCode": "UA",
                                    "number": "1512",
                                    "departure": {"iataCode": "LAX", "at": "2026-09-07T06:00:00"},
                                    "arrival": {"iataCode": "DEN", "at": "2026-09-07T09:25:00"},
                                    "numberOfBookableSeats": 4
                                },
                                {
                                    "id": "s3",
                                    "carrierCode": "UA",
                                    "number": "208",
                                    "departure": {"iataCode": "DEN", "at": "2026-09-07T10:40:00"},
                                    "arrival": {"iataCode": "JFK", "at": "2026-09-07T14:05:00"},
                                    "numberOfBookableSeats": 4
                                }
                            ]
                        }
                    ],
                    "price": {"total": "298.90", "base": "255.10", "currency": "USD"}
                }
            ]"#,
        )
    }

    #[test]
    fn emits_one_record_per_segment() {
        let batch = normalize_offers(&two_offer_payload(), &StaticCarrierDirectory::new()).unwrap();
        assert_eq!(batch.count, 3);
        assert_eq!(batch.flights.len(), 3);
    }

    #[test]
    fn stop_count_tracks_segments_per_itinerary() {
        let batch = normalize_offers(&two_offer_payload(), &StaticCarrierDirectory::new()).unwrap();

        let direct = &batch.flights[0];
        assert_eq!(direct.stops, 0);
        assert!(direct.is_direct);

        for record in &batch.flights[1..] {
            assert_eq!(record.stops, 1);
            assert!(!record.is_direct);
        }
    }

    #[test]
    fn offer_price_is_shared_across_its_segments() {
        let batch = normalize_offers(&two_offer_payload(), &StaticCarrierDirectory::new()).unwrap();
        let second_offer: Vec<_> = batch
            .flights
            .iter()
            .filter(|f| f.offer_id.as_deref() == Some("2"))
            .collect();
        assert_eq!(second_offer.len(), 2);
        assert_eq!(second_offer[0].price, second_offer[1].price);
        assert_eq!(second_offer[0].price.total, 298.90);
    }

    #[test]
    fn carrier_name_resolved_and_unknown_passes_through() {
        let offers = offers_from(
            r#"[{
                "id": "7",
                "itineraries": [{"segments": [
                    {"carrierCode": "BA", "number": "1"},
                    {"carrierCode": "Z9", "number": "2"}
                ]}],
                "price": {"total": "100.00"}
            }]"#,
        );
        let batch = normalize_offers(&offers, &StaticCarrierDirectory::new()).unwrap();
        assert_eq!(batch.flights[0].airline_name, "British Airways");
        assert_eq!(batch.flights[1].airline_name, "Z9");
    }

    #[test]
    fn missing_price_defaults_to_zero_usd() {
        let offers = offers_from(
            r#"[{"id": "3", "itineraries": [{"segments": [{"carrierCode": "AA", "number": "9"}]}]}]"#,
        );
        let batch = normalize_offers(&offers, &StaticCarrierDirectory::new()).unwrap();
        let price = &batch.flights[0].price;
        assert_eq!(price.total, 0.0);
        assert_eq!(price.base, 0.0);
        assert_eq!(price.currency, "USD");
    }

    #[test]
    fn malformed_price_aborts_the_whole_batch() {
        let mut offers = two_offer_payload();
        let bad = offers_from(
            r#"[{
                "id": "bad",
                "itineraries": [{"segments": [{"carrierCode": "AA", "number": "5"}]}],
                "price": {"total": "not-a-number"}
            }]"#,
        );
        offers.extend(bad);

        let result = normalize_offers(&offers, &StaticCarrierDirectory::new());
        assert!(matches!(result, Err(NormalizeError::BadPrice { .. })));
    }

    #[test]
    fn empty_offer_list_yields_empty_batch() {
        let batch = normalize_offers(&[], &StaticCarrierDirectory::new()).unwrap();
        assert_eq!(batch.count, 0);
        assert!(batch.flights.is_empty());
    }
}
