use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use std::sync::Arc;

use crate::{AuthKeys, auth, health, transactions, user, wallet};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub auth: Arc<AuthKeys>,
}

/// Resolves the bearer token to an active user and stores the user in the
/// request extensions for handlers to pick up.
///
/// The engine trusts the id handed to it, so everything credential-shaped
/// stops here.
async fn require_user(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(bearer)) = bearer else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims =
        auth::decode_token(&state.auth, bearer.token()).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = state
        .engine
        .resolve_user(user_id)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    if !user.is_active || user.is_blocked {
        return Err(StatusCode::UNAUTHORIZED);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/wallet/balance", get(wallet::balance))
        .route("/wallet/transactions", get(wallet::transactions))
        .route("/wallet/deposit", post(wallet::deposit))
        .route("/wallet/transfer", post(wallet::transfer))
        .route("/transactions", get(wallet::transactions))
        .route("/transactions/reverse", post(transactions::reverse))
        .route("/transactions/{id}", get(transactions::get_by_id))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/users", post(user::create))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health::check))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, keys: AuthKeys) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, keys, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    keys: AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        auth: Arc::new(keys),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    keys: AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, keys, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db.clone()).build();
        router(ServerState {
            engine: Arc::new(engine),
            db,
            auth: Arc::new(AuthKeys::new("test-secret")),
        })
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(router: &Router, name: &str, email: &str) -> Value {
        let (status, body) = send(
            router,
            "POST",
            "/users",
            None,
            Some(json!({ "name": name, "email": email, "password": "secret@123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn login(router: &Router, email: &str) -> String {
        let (status, body) = send(
            router,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret@123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_database_up() {
        let router = test_router().await;
        let (status, body) = send(&router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "up");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let router = test_router().await;
        let (status, _) = send(&router, "GET", "/wallet/balance", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&router, "GET", "/wallet/balance", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_login_deposit_and_read_balance() {
        let router = test_router().await;
        register(&router, "Alice", "alice@example.com").await;
        let token = login(&router, "alice@example.com").await;

        let (status, tx) = send(
            &router,
            "POST",
            "/wallet/deposit",
            Some(&token),
            Some(json!({ "amount": "100.50" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tx["kind"], "deposit");
        assert_eq!(tx["status"], "completed");
        assert_eq!(tx["amount"], "100.50");

        let (status, body) = send(&router, "GET", "/wallet/balance", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], "100.50");

        let (status, body) =
            send(&router, "GET", "/wallet/transactions", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let router = test_router().await;
        register(&router, "Alice", "alice@example.com").await;

        let (status, _) = send(
            &router,
            "POST",
            "/users",
            None,
            Some(json!({
                "name": "Alice Again",
                "email": "alice@example.com",
                "password": "secret@123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_registration_lists_violations() {
        let router = test_router().await;
        let (status, body) = send(
            &router,
            "POST",
            "/users",
            None,
            Some(json!({ "name": "", "email": "nope", "password": "short" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let router = test_router().await;
        register(&router, "Alice", "alice@example.com").await;

        let (status, _) = send(
            &router,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sub_cent_deposit_is_unprocessable() {
        let router = test_router().await;
        register(&router, "Alice", "alice@example.com").await;
        let token = login(&router, "alice@example.com").await;

        let (status, _) = send(
            &router,
            "POST",
            "/wallet/deposit",
            Some(&token),
            Some(json!({ "amount": "0.001" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn transfer_and_reverse_round_trip() {
        let router = test_router().await;
        let bob = register(&router, "Bob", "bob@example.com").await;
        register(&router, "Alice", "alice@example.com").await;
        let token = login(&router, "alice@example.com").await;

        send(
            &router,
            "POST",
            "/wallet/deposit",
            Some(&token),
            Some(json!({ "amount": "100" })),
        )
        .await;

        let (status, transfer) = send(
            &router,
            "POST",
            "/wallet/transfer",
            Some(&token),
            Some(json!({
                "destination_user_id": bob["id"],
                "amount": "40",
                "description": "rent split"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(transfer["kind"], "transfer");

        let (status, reversal) = send(
            &router,
            "POST",
            "/transactions/reverse",
            Some(&token),
            Some(json!({ "transaction_id": transfer["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reversal["kind"], "reversal");
        assert_eq!(reversal["original_transaction_id"], transfer["id"]);

        let (status, body) = send(&router, "GET", "/wallet/balance", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], "100.00");

        let uri = format!("/transactions/{}", transfer["id"].as_str().unwrap());
        let (status, detail) = send(&router, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["transaction"]["status"], "reversed");
        assert!(detail["source_wallet"].is_object());
        assert!(detail["destination_wallet"].is_object());
    }

    #[tokio::test]
    async fn transfer_to_unknown_user_is_not_found() {
        let router = test_router().await;
        register(&router, "Alice", "alice@example.com").await;
        let token = login(&router, "alice@example.com").await;

        send(
            &router,
            "POST",
            "/wallet/deposit",
            Some(&token),
            Some(json!({ "amount": "10" })),
        )
        .await;

        let (status, _) = send(
            &router,
            "POST",
            "/wallet/transfer",
            Some(&token),
            Some(json!({
                "destination_user_id": "123e4567-e89b-12d3-a456-426614174000",
                "amount": "5"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
