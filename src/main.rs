use std::io;

use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use env_logger::Env;

use itinerary_planner_api::{config::AppConfig, routes, state::AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(|err| {
        log::error!("Invalid configuration: {}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;

    let state = AppState::from_config(&config).await.map_err(|err| {
        log::error!("Startup failed: {}", err);
        io::Error::other(err)
    })?;
    let state = web::Data::new(state);

    log::info!(
        "Starting HTTP server on {}:{} (store: {}, city check: {:?}, verify generated: {})",
        config.host,
        config.port,
        state.store.backend(),
        state.preview.city_check_policy,
        state.preview.verify_generated
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors())
            .wrap(NormalizePath::trim())
            .app_data(state.clone())
            .app_data(routes::json_config())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
