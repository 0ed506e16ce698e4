//! Order model and booking payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::validation::{ValidationErrors, validate_positive_count};

/// Unstructured key/value payload stored with an order
pub type OrderDetails = Map<String, Value>;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub order_details: Json<OrderDetails>,
    pub created_at: DateTime<Utc>,
}

/// New order creation payload
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub order_details: OrderDetails,
}

/// Order joined with the names a listing page shows.
///
/// Hotels may be removed after an order was placed, so the joined columns
/// are optional.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub order_details: Json<OrderDetails>,
    pub created_at: DateTime<Utc>,
    pub hotel_name: Option<String>,
    pub hotel_country: Option<String>,
    pub username: Option<String>,
}

/// Booking form, shared by the confirmation and order-placed steps
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub hotel_id: Uuid,
    pub date_of_departure: NaiveDate,
    pub nights: u32,
    pub guests: u32,
}

impl BookingRequest {
    /// Reject empty stays, empty parties and departures in the past
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("nights", validate_positive_count(self.nights, "Nights"));
        errors.check("guests", validate_positive_count(self.guests, "Guests"));
        if self.date_of_departure < today {
            errors.push("date_of_departure", "Date of departure cannot be in the past");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn total_cost(&self, cost_per_night: f64) -> f64 {
        cost_per_night * f64::from(self.nights)
    }

    /// Details persisted with the order, priced at the hotel's current rate
    pub fn order_details(&self, cost_per_night: f64) -> OrderDetails {
        let mut details = OrderDetails::new();
        details.insert(
            "date_of_departure".to_string(),
            json!(self.date_of_departure.to_string()),
        );
        details.insert("nights".to_string(), json!(self.nights));
        details.insert("guests".to_string(), json!(self.guests));
        details.insert("cost_per_night".to_string(), json!(cost_per_night));
        details.insert(
            "total_cost".to_string(),
            json!(self.total_cost(cost_per_night)),
        );
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(nights: u32, guests: u32, departure: &str) -> BookingRequest {
        BookingRequest {
            hotel_id: Uuid::nil(),
            date_of_departure: departure.parse().unwrap(),
            nights,
            guests,
        }
    }

    #[test]
    fn test_order_details_are_priced() {
        let request = booking(3, 2, "2031-06-01");
        let details = request.order_details(120.5);

        assert_eq!(details["date_of_departure"], json!("2031-06-01"));
        assert_eq!(details["nights"], json!(3));
        assert_eq!(details["guests"], json!(2));
        assert_eq!(details["total_cost"], json!(361.5));
    }

    #[test]
    fn test_validate_rejects_empty_stay_and_past_departure() {
        let today: NaiveDate = "2031-06-01".parse().unwrap();

        assert!(booking(1, 1, "2031-06-01").validate(today).is_ok());

        let errors = booking(0, 0, "2031-05-31").validate(today).unwrap_err();
        assert_eq!(errors.fields(), vec!["nights", "guests", "date_of_departure"]);
    }

    #[test]
    fn test_booking_request_deserializes() {
        let request: BookingRequest = serde_json::from_value(json!({
            "hotel_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "date_of_departure": "2031-01-15",
            "nights": 2,
            "guests": 4
        }))
        .unwrap();
        assert_eq!(request.nights, 2);
        assert_eq!(request.total_cost(50.0), 100.0);
    }
}
