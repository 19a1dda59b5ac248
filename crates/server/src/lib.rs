use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::validate::FieldViolation;
use serde::Serialize;
pub use server::{ServerState, run, run_with_listener, spawn_with_listener};

pub use auth::AuthKeys;

mod auth;
mod health;
mod server;
mod transactions;
mod user;
mod wallet;

pub enum ServerError {
    Engine(EngineError),
    Validation(Vec<FieldViolation>),
    Unauthorized(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

#[derive(Serialize)]
struct ValidationError {
    error: String,
    violations: Vec<FieldViolation>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let error = message_for_engine_error(err);
                (status, Json(Error { error })).into_response()
            }
            ServerError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationError {
                    error: "validation failed".to_string(),
                    violations,
                }),
            )
                .into_response(),
            ServerError::Unauthorized(error) => {
                (StatusCode::UNAUTHORIZED, Json(Error { error })).into_response()
            }
            ServerError::Generic(error) => {
                (StatusCode::BAD_REQUEST, Json(Error { error })).into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_bad_request_maps_to_400() {
        let res = ServerError::from(EngineError::BadRequest("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_error_is_redacted_as_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "secret detail".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::Unauthorized("invalid credentials".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
