//! Administrator pages: hotel management and the order ledger

use axum::{
    Form, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::parse_hotel_id;
use crate::{
    error::{ApiError, ApiResult},
    listing::{LookupCriteria, LookupForm},
    models::{Hotel, HotelForm, OrderSummary},
    state::AppState,
    uploads::{ImageStore, UPLOAD_FAILED_NOTICE, UploadedImage},
};

/// Message shown when an admin lookup matches nothing
pub const NO_MATCHES_MESSAGE: &str = "No matches were found based on your search criteria";

#[derive(Serialize)]
pub struct AdminPage {
    pub title: &'static str,
}

/// Result of a create or update
#[derive(Serialize)]
pub struct HotelSaved {
    pub message: String,
    pub hotel: Hotel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

#[derive(Serialize)]
pub struct LookupPage {
    pub title: &'static str,
    pub hotels: Vec<Hotel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Serialize)]
pub struct HotelFormPage {
    pub title: &'static str,
    pub hotel: Hotel,
}

#[derive(Serialize)]
pub struct HotelDeleted {
    pub message: String,
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct OrdersPage {
    pub title: &'static str,
    pub orders: Vec<OrderSummary>,
}

pub async fn admin_page() -> Json<AdminPage> {
    Json(AdminPage { title: "Admin" })
}

/// Add a hotel from a multipart form with an optional image
pub async fn create_hotel(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<HotelSaved>)> {
    let (form, image) = read_hotel_form(multipart).await?;
    let mut new_hotel = form.into_new_hotel()?;

    let (image_ref, notice) = store_image(&state.images, image).await;
    new_hotel.image = image_ref;

    let hotel = state.hotel_repository.create(new_hotel).await?;
    info!("Created hotel {} ({})", hotel.name, hotel.id);

    Ok((
        StatusCode::CREATED,
        Json(HotelSaved {
            message: format!("{} has been added", hotel.name),
            hotel,
            notice,
        }),
    ))
}

/// Find hotels to edit or remove by id or case-insensitive name
pub async fn edit_remove(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> ApiResult<Json<LookupPage>> {
    let criteria = LookupCriteria::from(form);
    let hotels = state.hotel_repository.find_by_id_or_name(criteria).await?;
    let message = hotels.is_empty().then_some(NO_MATCHES_MESSAGE);

    Ok(Json(LookupPage {
        title: "Edit/ Remove Hotel",
        hotels,
        message,
    }))
}

pub async fn update_hotel_page(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Json<HotelFormPage>> {
    let hotel = find_hotel(&state, &hotel_id).await?;

    Ok(Json(HotelFormPage {
        title: "Update hotel",
        hotel,
    }))
}

/// Apply the submitted fields; a new image replaces the stored reference.
///
/// The hotel must exist before anything is uploaded for it.
pub async fn update_hotel(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<HotelSaved>> {
    let id = find_hotel(&state, &hotel_id).await?.id;
    let (form, image) = read_hotel_form(multipart).await?;
    let mut changes = form.into_changes()?;

    let (image_ref, notice) = store_image(&state.images, image).await;
    if image_ref.is_some() {
        changes.image = image_ref;
    }

    let hotel = state
        .hotel_repository
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))?;
    info!("Updated hotel {}", hotel.id);

    Ok(Json(HotelSaved {
        message: format!("{} has been updated", hotel.name),
        hotel,
        notice,
    }))
}

pub async fn delete_hotel_page(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Json<HotelFormPage>> {
    let hotel = find_hotel(&state, &hotel_id).await?;

    Ok(Json(HotelFormPage {
        title: "Delete hotel",
        hotel,
    }))
}

pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Json<HotelDeleted>> {
    let id = parse_hotel_id(&hotel_id)?;
    let id = state
        .hotel_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))?;
    info!("Deleted hotel {}", id);

    Ok(Json(HotelDeleted {
        message: format!("Hotel {} has been deleted", id),
        id,
    }))
}

/// Every order, newest first
pub async fn all_orders(State(state): State<AppState>) -> ApiResult<Json<OrdersPage>> {
    let orders = state.order_repository.list_all().await?;

    Ok(Json(OrdersPage {
        title: "All orders",
        orders,
    }))
}

async fn find_hotel(state: &AppState, raw_id: &str) -> ApiResult<Hotel> {
    let id = parse_hotel_id(raw_id)?;
    state
        .hotel_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))
}

/// Split a multipart submission into text fields and the optional image
async fn read_hotel_form(
    mut multipart: Multipart,
) -> ApiResult<(HotelForm, Option<UploadedImage>)> {
    let mut form = HotelForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid image data: {}", e)))?;

            // An untouched file input still submits an empty part
            if !bytes.is_empty() {
                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid form data: {}", e)))?;
        if !form.set(&name, value) {
            debug!("Ignoring unknown hotel form field: {}", name);
        }
    }

    Ok((form, image))
}

/// Upload the image if one was sent. A failed upload yields no reference and
/// a notice for the admin; the hotel is saved regardless.
async fn store_image(
    images: &ImageStore,
    image: Option<UploadedImage>,
) -> (Option<String>, Option<&'static str>) {
    let Some(image) = image else {
        return (None, None);
    };

    match images.upload(image).await {
        Ok(reference) => (Some(reference), None),
        Err(e) => {
            warn!("Hotel image upload failed: {}", e);
            (None, Some(UPLOAD_FAILED_NOTICE))
        }
    }
}
