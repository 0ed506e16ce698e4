//! Hotel model and admin form handling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{
    ValidationErrors, required_text, validate_availability, validate_cost_per_night,
    validate_hotel_name, validate_star_rating,
};

/// Hotel entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Opaque reference returned by the image host
    pub image: Option<String>,
    pub star_rating: i16,
    pub country: String,
    pub cost_per_night: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated hotel ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub star_rating: i16,
    pub country: String,
    pub cost_per_night: f64,
    pub available: bool,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub star_rating: Option<i16>,
    pub country: Option<String>,
    pub cost_per_night: Option<f64>,
    pub available: Option<bool>,
}

/// Raw admin form fields, as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub star_rating: Option<String>,
    pub country: Option<String>,
    pub cost_per_night: Option<String>,
    pub available: Option<String>,
}

impl HotelForm {
    /// Assign a text field by its form name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" | "hotel_name" => &mut self.name,
            "description" | "hotel_description" => &mut self.description,
            "star_rating" => &mut self.star_rating,
            "country" => &mut self.country,
            "cost_per_night" => &mut self.cost_per_night,
            "available" => &mut self.available,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Validate every field as required, for a new listing
    pub fn into_new_hotel(self) -> Result<NewHotel, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", validate_hotel_name(self.name.as_deref()));
        let description = errors.check(
            "description",
            required_text(self.description.as_deref(), "Hotel description"),
        );
        let star_rating = errors.check(
            "star_rating",
            validate_star_rating(self.star_rating.as_deref()),
        );
        let country = errors.check("country", required_text(self.country.as_deref(), "Country"));
        let cost_per_night = errors.check(
            "cost_per_night",
            validate_cost_per_night(self.cost_per_night.as_deref()),
        );
        let available = errors.check(
            "available",
            validate_availability(self.available.as_deref()),
        );

        match (name, description, star_rating, country, cost_per_night, available) {
            (
                Some(name),
                Some(description),
                Some(star_rating),
                Some(country),
                Some(cost_per_night),
                Some(available),
            ) if errors.is_empty() => Ok(NewHotel {
                name,
                description,
                image: None,
                star_rating,
                country,
                cost_per_night,
                available,
            }),
            _ => Err(errors),
        }
    }

    /// Validate only the supplied fields, for a partial update
    pub fn into_changes(self) -> Result<HotelChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut changes = HotelChanges::default();

        if let Some(name) = self.name {
            changes.name = errors.check("name", validate_hotel_name(Some(&name)));
        }
        if let Some(description) = self.description {
            changes.description = errors.check(
                "description",
                required_text(Some(&description), "Hotel description"),
            );
        }
        if let Some(star_rating) = self.star_rating {
            changes.star_rating =
                errors.check("star_rating", validate_star_rating(Some(&star_rating)));
        }
        if let Some(country) = self.country {
            changes.country = errors.check("country", required_text(Some(&country), "Country"));
        }
        if let Some(cost) = self.cost_per_night {
            changes.cost_per_night =
                errors.check("cost_per_night", validate_cost_per_night(Some(&cost)));
        }
        if let Some(available) = self.available {
            changes.available = errors.check("available", validate_availability(Some(&available)));
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }
}
