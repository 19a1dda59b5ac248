//! Wallet API endpoints

use axum::{Extension, Json, extract::State, http::StatusCode};

use api_types::{
    transaction::{TransactionListResponse, TransactionView},
    validate,
    wallet::{BalanceView, DepositNew, TransferNew},
};
use engine::Money;

use crate::{ServerError, server::ServerState, transactions};

pub async fn balance(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceView>, ServerError> {
    let balance = state.engine.balance(user.id).await?;
    Ok(Json(BalanceView {
        balance: balance.to_string(),
    }))
}

pub async fn transactions(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let history = state.engine.transactions_for_user(user.id).await?;
    Ok(Json(TransactionListResponse {
        transactions: history.into_iter().map(transactions::view).collect(),
    }))
}

pub async fn deposit(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<DepositNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let violations = validate::deposit_new(&payload);
    if !violations.is_empty() {
        return Err(ServerError::Validation(violations));
    }
    let amount: Money = payload.amount.parse().map_err(ServerError::Engine)?;

    let tx = state
        .engine
        .deposit(user.id, amount, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(transactions::view(tx))))
}

pub async fn transfer(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let violations = validate::transfer_new(&payload);
    if !violations.is_empty() {
        return Err(ServerError::Validation(violations));
    }
    let amount: Money = payload.amount.parse().map_err(ServerError::Engine)?;

    let tx = state
        .engine
        .transfer(
            user.id,
            payload.destination_user_id,
            amount,
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transactions::view(tx))))
}
