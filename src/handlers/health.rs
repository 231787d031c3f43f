use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Whether the entry store can answer right now, and which backend holds it.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub backend: &'static str,
}

pub async fn health_check() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let readiness = Readiness {
        ready: state.entries.ping().await,
        backend: state.entries.backend(),
    };

    if !readiness.ready {
        tracing::warn!(backend = readiness.backend, "Entry store not reachable");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(readiness));
    }

    (StatusCode::OK, Json(readiness))
}
