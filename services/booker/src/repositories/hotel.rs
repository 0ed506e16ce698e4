//! Hotel repository: runs the listing queries against PostgreSQL

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::listing::{self, HOME_PAGE_SAMPLE_SIZE, LookupCriteria, SearchCriteria};
use crate::models::{Hotel, HotelChanges, NewHotel};

/// The two independent random samples shown on the home page
#[derive(Debug, Clone, serde::Serialize)]
pub struct HomePageSample {
    pub hotels: Vec<Hotel>,
    pub countries: Vec<String>,
}

/// Hotel repository for database operations
#[derive(Clone)]
pub struct HotelRepository {
    pool: PgPool,
}

impl HotelRepository {
    /// Create a new hotel repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All hotels flagged as available
    pub async fn list_available(&self) -> DatabaseResult<Vec<Hotel>> {
        listing::available_hotels()
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Distinct countries across every hotel
    pub async fn list_countries(&self) -> DatabaseResult<Vec<String>> {
        listing::distinct_countries()
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Random hotels and countries for the home page.
    ///
    /// Both queries run concurrently; the first failure fails the whole
    /// sample.
    pub async fn home_page_sample(&self) -> DatabaseResult<HomePageSample> {
        let (hotels, countries) = tokio::try_join!(
            self.sample_hotels(HOME_PAGE_SAMPLE_SIZE),
            self.sample_countries(HOME_PAGE_SAMPLE_SIZE),
        )?;

        Ok(HomePageSample { hotels, countries })
    }

    async fn sample_hotels(&self, size: i64) -> DatabaseResult<Vec<Hotel>> {
        listing::sample_available_hotels(size)
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn sample_countries(&self, size: i64) -> DatabaseResult<Vec<String>> {
        listing::sample_countries(size)
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Hotels in exactly this country
    pub async fn list_by_country(&self, country: &str) -> DatabaseResult<Vec<Hotel>> {
        listing::hotels_by_country(country.to_string())
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Find a hotel by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Hotel>> {
        listing::hotel_by_id(id)
            .build_query_as::<Hotel>()
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Admin lookup by id or case-insensitive name. An empty result is a
    /// normal outcome.
    pub async fn find_by_id_or_name(&self, criteria: LookupCriteria) -> DatabaseResult<Vec<Hotel>> {
        info!(
            "Looking up hotels by id {:?} or name {:?}",
            criteria.id, criteria.name
        );

        if criteria.is_empty() {
            return Ok(Vec::new());
        }

        listing::hotels_by_id_or_name(criteria)
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Phrase search over name and country
    pub async fn search(&self, criteria: SearchCriteria) -> DatabaseResult<Vec<Hotel>> {
        info!(
            "Searching hotels for {:?} with at least {} stars ({:?})",
            criteria.destination, criteria.min_stars, criteria.sort
        );

        listing::search_hotels(criteria)
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Create a new hotel
    pub async fn create(&self, hotel: NewHotel) -> DatabaseResult<Hotel> {
        info!("Creating hotel: {}", hotel.name);

        listing::insert_hotel(hotel)
            .build_query_as::<Hotel>()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Apply a partial update. `None` when no hotel has this id.
    pub async fn update(&self, id: Uuid, changes: HotelChanges) -> DatabaseResult<Option<Hotel>> {
        info!("Updating hotel: {}", id);

        listing::update_hotel(id, changes)
            .build_query_as::<Hotel>()
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Delete a hotel, returning the removed id. `None` when no hotel has
    /// this id.
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Uuid>> {
        info!("Deleting hotel: {}", id);

        listing::delete_hotel(id)
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}
