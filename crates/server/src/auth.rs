//! Credential handling: argon2 password hashing and JWT bearer tokens.
//!
//! Hashing is an explicit call made before the engine persists anything; the
//! engine itself only ever sees opaque hash strings.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use api_types::{
    auth::{LoginRequest, TokenResponse},
    validate,
};

use crate::{ServerError, server::ServerState};

const TOKEN_TTL_HOURS: i64 = 24;

/// Key material for issuing and verifying bearer tokens.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!("password hashing failed: {err}");
            ServerError::Generic("failed to process credentials".to_string())
        })
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn issue_token(keys: &AuthKeys, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
}

pub(crate) fn decode_token(
    keys: &AuthKeys,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data =
        jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))?;
    Ok(data.claims)
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ServerError> {
    let violations = validate::login(&payload);
    if !violations.is_empty() {
        return Err(ServerError::Validation(violations));
    }

    let user = state
        .engine
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| ServerError::Unauthorized("invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ServerError::Unauthorized("invalid credentials".to_string()));
    }
    if !user.is_active || user.is_blocked {
        return Err(ServerError::Unauthorized(
            "user inactive or blocked".to_string(),
        ));
    }

    let access_token = issue_token(&state.auth, user.id).map_err(|err| {
        tracing::error!("token issuance failed: {err}");
        ServerError::Generic("failed to issue token".to_string())
    })?;

    Ok(Json(TokenResponse { access_token }))
}
