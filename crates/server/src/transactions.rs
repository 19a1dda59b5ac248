//! Transactions API endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::transaction::{
    ReverseNew, TransactionDetailResponse, TransactionKind as ApiKind,
    TransactionStatus as ApiStatus, TransactionView, WalletRef,
};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
        engine::TransactionKind::Reversal => ApiKind::Reversal,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
        engine::TransactionStatus::Reversed => ApiStatus::Reversed,
    }
}

pub(crate) fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        status: map_status(tx.status),
        amount: tx.amount.to_string(),
        source_wallet_id: tx.source_wallet_id,
        destination_wallet_id: tx.destination_wallet_id,
        original_transaction_id: tx.original_transaction_id,
        description: tx.description,
        created_at: tx.created_at,
    }
}

fn wallet_ref(wallet: engine::Wallet) -> WalletRef {
    WalletRef {
        id: wallet.id,
        user_id: wallet.user_id,
    }
}

pub async fn reverse(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<ReverseNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .reverse(user.id, payload.transaction_id, payload.reason.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn get_by_id(
    Extension(_user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDetailResponse>, ServerError> {
    let detail = state.engine.transaction_by_id(id).await?;

    Ok(Json(TransactionDetailResponse {
        transaction: view(detail.transaction),
        source_wallet: detail.source_wallet.map(wallet_ref),
        destination_wallet: detail.destination_wallet.map(wallet_ref),
    }))
}
