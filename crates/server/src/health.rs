//! Liveness endpoint: reports whether the process can reach its database.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::server::ServerState;

#[derive(Serialize)]
struct HealthView {
    status: &'static str,
    database: &'static str,
}

pub async fn check(State(state): State<ServerState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthView {
                status: "ok",
                database: "up",
            }),
        ),
        Err(err) => {
            tracing::error!("database ping failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthView {
                    status: "error",
                    database: "down",
                }),
            )
        }
    }
}
