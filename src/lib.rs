//! # DayScore
//!
//! One journal entry per day: a date, a score from 1 to 5 and an optional
//! note. The crate carries both halves of the system:
//!
//! - [`client`]: the entry store client, the view model that keeps a local
//!   snapshot in step with the store, and the form and list presentation
//!   state the command line renders.
//! - the HTTP store itself ([`app`], [`handlers`], [`db`]) serving
//!   `/api/entries` from Postgres or memory.

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;

use db::EntryRepository;

#[derive(Clone)]
pub struct AppState {
    pub entries: EntryRepository,
}

pub fn app(state: AppState, frontend_url: &str) -> Router {
    let mut allowed_origins = Vec::new();
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => allowed_origins.push(origin),
        Err(_) => tracing::warn!(origin = %frontend_url, "Ignoring invalid CORS origin"),
    }

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::create_entry),
        )
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry)
                .put(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
