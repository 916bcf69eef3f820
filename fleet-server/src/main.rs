#![deny(missing_docs)]
//! Fleet registry server executable.
//!
//! Hosts the ship registry HTTP endpoints on top of PostgreSQL or, when no
//! database is configured, an in-process store.

mod config;
mod db;
mod models;
mod openapi;
mod repository;
mod routes;
mod schema;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use fleet_core::InMemoryShipRepository;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::db::init_pool;
#[cfg(not(test))]
use crate::repository::PgShipRepository;
#[cfg(not(test))]
use crate::routes::AppState;

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    // Pool creation and migrations are blocking; do them before the runtime starts.
    let state = match &config.database_url {
        Some(database_url) => {
            let pool = init_pool(database_url, config.pool_size).map_err(std::io::Error::other)?;
            log::info!("using PostgreSQL ship repository");
            web::Data::new(AppState::new(PgShipRepository::new(pool)))
        }
        None => {
            log::warn!("DATABASE_URL is not set; ships are kept in memory only");
            web::Data::new(AppState::new(InMemoryShipRepository::new()))
        }
    };

    let ServerConfig {
        host,
        port,
        allowed_origins,
        ..
    } = config;
    log::info!("listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(routes::configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
