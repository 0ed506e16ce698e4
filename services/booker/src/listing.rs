//! Listing query engine
//!
//! Translates the browse, search and admin intents of the site into
//! PostgreSQL queries over the `hotels` table. Functions here only compose
//! SQL and bind parameters; [`crate::repositories::HotelRepository`] runs
//! them.
//!
//! Text search relies on the generated `search_document` column (name and
//! country, english configuration, GIN indexed). Case-insensitive name
//! equality relies on the `case_insensitive` ICU collation. Both are created
//! by the migrations in `common`.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{HotelChanges, NewHotel};

/// Columns selected for every [`crate::models::Hotel`] row
pub const HOTEL_COLUMNS: &str = "id, name, description, image, star_rating, country, \
                                 cost_per_night, available, created_at, updated_at";

/// Size of each home page sample
pub const HOME_PAGE_SAMPLE_SIZE: i64 = 10;

/// Direction of the price ordering in search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Search form as posted by the results page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    pub destination: Option<String>,
    pub stars: Option<String>,
    pub sort: Option<String>,
}

/// Normalised search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Matched as one phrase against name and country
    pub destination: String,
    pub min_stars: i32,
    pub sort: SortOrder,
}

impl From<SearchForm> for SearchCriteria {
    /// Missing, non-numeric or zero `stars` means at least one star.
    /// Missing, non-numeric or zero `sort` means ascending; negative values
    /// sort descending.
    fn from(form: SearchForm) -> Self {
        let min_stars = form
            .stars
            .as_deref()
            .and_then(parse_leading_int)
            .filter(|stars| *stars != 0)
            .map(|stars| stars.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
            .unwrap_or(1);

        let sort = match form.sort.as_deref().and_then(parse_leading_int) {
            Some(direction) if direction < 0 => SortOrder::Descending,
            _ => SortOrder::Ascending,
        };

        Self {
            destination: form.destination.unwrap_or_default(),
            min_stars,
            sort,
        }
    }
}

/// Admin lookup form: an id, a name, or both
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupForm {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
}

/// Normalised admin lookup. An absent clause matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupCriteria {
    pub id: Option<Uuid>,
    pub name: Option<String>,
}

impl From<LookupForm> for LookupCriteria {
    fn from(form: LookupForm) -> Self {
        let id = form
            .hotel_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(|id| Uuid::parse_str(id).ok());
        let name = form.hotel_name.filter(|name| !name.is_empty());

        Self { id, name }
    }
}

impl LookupCriteria {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

/// Parse the integer prefix of a string: optional whitespace, optional sign,
/// then digits. `"4 stars"` is 4, `"3.7"` is 3, `"abc"` is nothing.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn select_hotels() -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(HOTEL_COLUMNS).push(" FROM hotels");
    query
}

/// All hotels open for booking
pub fn available_hotels() -> QueryBuilder<'static, Postgres> {
    let mut query = select_hotels();
    query.push(" WHERE available = TRUE");
    query
}

/// Every distinct country, regardless of availability
pub fn distinct_countries() -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new("SELECT DISTINCT country FROM hotels ORDER BY country")
}

/// Up to `size` available hotels in random order
pub fn sample_available_hotels(size: i64) -> QueryBuilder<'static, Postgres> {
    let mut query = available_hotels();
    query.push(" ORDER BY random() LIMIT ").push_bind(size);
    query
}

/// Up to `size` distinct countries in random order
pub fn sample_countries(size: i64) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT country FROM (SELECT DISTINCT country FROM hotels) AS countries \
         ORDER BY random() LIMIT ",
    );
    query.push_bind(size);
    query
}

/// Hotels whose country is exactly `country`, regardless of availability
pub fn hotels_by_country(country: String) -> QueryBuilder<'static, Postgres> {
    let mut query = select_hotels();
    query.push(" WHERE country = ").push_bind(country);
    query
}

pub fn hotel_by_id(id: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut query = select_hotels();
    query.push(" WHERE id = ").push_bind(id);
    query
}

/// Hotels matching the id, or the name under case-insensitive comparison.
///
/// Absent clauses bind `NULL`, and `NULL` equality never holds, so they
/// contribute no rows.
pub fn hotels_by_id_or_name(criteria: LookupCriteria) -> QueryBuilder<'static, Postgres> {
    let mut query = select_hotels();
    query
        .push(" WHERE id = ")
        .push_bind(criteria.id)
        .push(" OR name = ")
        .push_bind(criteria.name)
        .push(" COLLATE case_insensitive");
    query
}

/// Available hotels phrase-matching the destination, at or above the star
/// floor, ordered by nightly cost
pub fn search_hotels(criteria: SearchCriteria) -> QueryBuilder<'static, Postgres> {
    let mut query = select_hotels();
    query
        .push(" WHERE search_document @@ phraseto_tsquery('english', ")
        .push_bind(criteria.destination)
        .push(") AND available = TRUE AND star_rating >= ")
        .push_bind(criteria.min_stars)
        .push(" ORDER BY cost_per_night ")
        .push(criteria.sort.as_sql());
    query
}

pub fn insert_hotel(hotel: NewHotel) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "INSERT INTO hotels (name, description, image, star_rating, country, cost_per_night, available) ",
    );
    query.push_values([hotel], |mut row, hotel| {
        row.push_bind(hotel.name)
            .push_bind(hotel.description)
            .push_bind(hotel.image)
            .push_bind(hotel.star_rating)
            .push_bind(hotel.country)
            .push_bind(hotel.cost_per_night)
            .push_bind(hotel.available);
    });
    query.push(" RETURNING ").push(HOTEL_COLUMNS);
    query
}

/// Overwrite only the supplied fields; an unknown id updates no row
pub fn update_hotel(id: Uuid, changes: HotelChanges) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE hotels SET ");
    let mut assignments = query.separated(", ");

    if let Some(name) = changes.name {
        assignments.push("name = ").push_bind_unseparated(name);
    }
    if let Some(description) = changes.description {
        assignments
            .push("description = ")
            .push_bind_unseparated(description);
    }
    if let Some(image) = changes.image {
        assignments.push("image = ").push_bind_unseparated(image);
    }
    if let Some(star_rating) = changes.star_rating {
        assignments
            .push("star_rating = ")
            .push_bind_unseparated(star_rating);
    }
    if let Some(country) = changes.country {
        assignments
            .push("country = ")
            .push_bind_unseparated(country);
    }
    if let Some(cost_per_night) = changes.cost_per_night {
        assignments
            .push("cost_per_night = ")
            .push_bind_unseparated(cost_per_night);
    }
    if let Some(available) = changes.available {
        assignments
            .push("available = ")
            .push_bind_unseparated(available);
    }
    assignments.push("updated_at = NOW()");

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(HOTEL_COLUMNS);
    query
}

pub fn delete_hotel(id: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("DELETE FROM hotels WHERE id = ");
    query.push_bind(id).push(" RETURNING id");
    query
}
