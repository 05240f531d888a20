use actix_cors::Cors;
use actix_web::web;

use crate::error::ApiError;

pub mod health;
pub mod itinerary;

/// Mounts the health check and the `/api/itinerary` group.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/itinerary")
                .route("", web::get().to(itinerary::get_all))
                .route("/preview", web::post().to(itinerary::preview))
                .route("/save", web::post().to(itinerary::save))
                .route("/{id}", web::get().to(itinerary::get_by_id))
                .route("/{id}", web::delete().to(itinerary::delete)),
        );
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Answers unreadable bodies with the same JSON error shape as the handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {}", err);
        ApiError::Validation("Request body must be valid JSON".to_string()).into()
    })
}
