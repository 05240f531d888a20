use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_result = check_store(&state).await;

    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if store_result.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("store".to_string(), store_result);

    HttpResponse::Ok().json(health)
}

async fn check_store(state: &AppState) -> ServiceStatus {
    let backend = state.store.backend();
    match state.store.ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} store reachable", backend)),
        },
        Err(e) => {
            log::error!("Store health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("{} store unreachable", backend)),
            }
        }
    }
}
