//! Public browsing and search pages

use axum::{
    Form, Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::info;

use super::parse_hotel_id;
use crate::{
    error::{ApiError, ApiResult},
    listing::{SearchCriteria, SearchForm, SortOrder},
    models::Hotel,
    state::AppState,
};

#[derive(Serialize)]
pub struct HomePage {
    pub title: &'static str,
    pub hotels: Vec<Hotel>,
    pub countries: Vec<String>,
}

#[derive(Serialize)]
pub struct HotelListPage {
    pub title: String,
    pub hotels: Vec<Hotel>,
}

#[derive(Serialize)]
pub struct HotelDetailPage {
    pub title: &'static str,
    pub hotel: Hotel,
}

#[derive(Serialize)]
pub struct CountryListPage {
    pub title: &'static str,
    pub countries: Vec<String>,
}

/// Search results, echoing the normalised criteria back to the page
#[derive(Serialize)]
pub struct SearchResultsPage {
    pub title: &'static str,
    pub destination: String,
    pub min_stars: i32,
    pub sort: &'static str,
    pub hotels: Vec<Hotel>,
}

/// Home page: random sample of available hotels and of countries
pub async fn home_page(State(state): State<AppState>) -> ApiResult<Json<HomePage>> {
    let sample = state.hotel_repository.home_page_sample().await?;

    Ok(Json(HomePage {
        title: "Let's Travel",
        hotels: sample.hotels,
        countries: sample.countries,
    }))
}

/// Every available hotel
pub async fn all_hotels(State(state): State<AppState>) -> ApiResult<Json<HotelListPage>> {
    let hotels = state.hotel_repository.list_available().await?;

    Ok(Json(HotelListPage {
        title: "All Hotels".to_string(),
        hotels,
    }))
}

pub async fn hotel_detail(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Json<HotelDetailPage>> {
    let id = parse_hotel_id(&hotel_id)?;
    let hotel = state
        .hotel_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))?;

    Ok(Json(HotelDetailPage {
        title: "Let's Travel",
        hotel,
    }))
}

pub async fn country_list(State(state): State<AppState>) -> ApiResult<Json<CountryListPage>> {
    let countries = state.hotel_repository.list_countries().await?;

    Ok(Json(CountryListPage {
        title: "Browse by country",
        countries,
    }))
}

pub async fn hotels_by_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> ApiResult<Json<HotelListPage>> {
    let hotels = state.hotel_repository.list_by_country(&country).await?;

    Ok(Json(HotelListPage {
        title: format!("Browse by country: {}", country),
        hotels,
    }))
}

/// Text search with a star floor and price ordering
pub async fn search_results(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> ApiResult<Json<SearchResultsPage>> {
    let criteria = SearchCriteria::from(form);
    info!(
        "Searching hotels: destination={:?} min_stars={} sort={:?}",
        criteria.destination, criteria.min_stars, criteria.sort
    );

    let destination = criteria.destination.clone();
    let min_stars = criteria.min_stars;
    let sort = match criteria.sort {
        SortOrder::Ascending => "ascending",
        SortOrder::Descending => "descending",
    };
    let hotels = state.hotel_repository.search(criteria).await?;

    Ok(Json(SearchResultsPage {
        title: "Search results",
        destination,
        min_stars,
        sort,
        hotels,
    }))
}
