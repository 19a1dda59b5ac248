//! User registration endpoint.

use axum::{Json, extract::State, http::StatusCode};

use api_types::{
    user::{UserNew, UserView},
    validate,
};

use crate::{ServerError, auth, server::ServerState};

fn view(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let violations = validate::user_new(&payload);
    if !violations.is_empty() {
        return Err(ServerError::Validation(violations));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state
        .engine
        .create_user(&payload.name, &payload.email, &password_hash)
        .await?;

    Ok((StatusCode::CREATED, Json(view(user))))
}
