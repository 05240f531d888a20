use actix_web::{web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::itinerary::ItineraryView,
    services::itinerary_service::preview_itinerary,
    state::AppState,
    validation::{validate_preview_input, validate_save_input},
};

fn parse_id(operation: &str, raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|err| {
        log::warn!("{} rejected id {:?}: {}", operation, raw, err);
        ApiError::MalformedId
    })
}

fn log_rejection(operation: &str, err: &ApiError) {
    log::warn!("{} rejected request body: {}", operation, err);
}

/*
    POST /api/itinerary/preview
*/
pub async fn preview(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let input =
        validate_preview_input(&body).inspect_err(|err| log_rejection("Preview itinerary", err))?;
    let itinerary = preview_itinerary(&state, &input).await?;
    Ok(HttpResponse::Ok().json(itinerary))
}

/*
    POST /api/itinerary/save
*/
pub async fn save(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new = validate_save_input(&body).inspect_err(|err| log_rejection("Save itinerary", err))?;

    let saved = state.store.insert(new).await.map_err(|err| {
        log::error!("Save itinerary failed: {}", err);
        ApiError::Store("Failed to save itinerary")
    })?;

    Ok(HttpResponse::Created().json(ItineraryView::from(saved)))
}

/*
    GET /api/itinerary
*/
pub async fn get_all(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let itineraries = state.store.list().await.map_err(|err| {
        log::error!("List itineraries failed: {}", err);
        ApiError::Store("Failed to fetch itineraries")
    })?;

    let views: Vec<ItineraryView> = itineraries.into_iter().map(ItineraryView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/*
    GET /api/itinerary/{id}
*/
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id("Get itinerary by ID", &path)?;

    match state.store.find_by_id(id).await {
        Ok(Some(itinerary)) => Ok(HttpResponse::Ok().json(ItineraryView::from(itinerary))),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            log::error!("Get itinerary {} failed: {}", id, err);
            Err(ApiError::Store("Failed to fetch itinerary"))
        }
    }
}

/*
    DELETE /api/itinerary/{id}
*/
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id("Delete itinerary", &path)?;

    match state.store.delete_by_id(id).await {
        Ok(Some(_)) => {
            Ok(HttpResponse::Ok().json(json!({ "message": "Itinerary deleted successfully" })))
        }
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            log::error!("Delete itinerary {} failed: {}", id, err);
            Err(ApiError::Store("Failed to delete itinerary"))
        }
    }
}
