//! Wire types shared between the server and its clients.
//!
//! Monetary amounts cross the wire as decimal strings ("100.50"); JSON numbers
//! are binary floats and are never used for money.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod validate;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    /// Public view of a user; the password hash never leaves the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub is_active: bool,
        pub created_at: DateTime<Utc>,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub access_token: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        /// Decimal string, minimum "0.01".
        pub amount: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub destination_user_id: Uuid,
        /// Decimal string, minimum "0.01".
        pub amount: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub balance: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Transfer,
        Reversal,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
        Reversed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReverseNew {
        pub transaction_id: Uuid,
        pub reason: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub status: TransactionStatus,
        /// Positive decimal string; direction is carried by the wallet refs.
        pub amount: String,
        pub source_wallet_id: Option<Uuid>,
        pub destination_wallet_id: Option<Uuid>,
        pub original_transaction_id: Option<Uuid>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Wallet reference embedded in a transaction detail.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletRef {
        pub id: Uuid,
        pub user_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDetailResponse {
        pub transaction: TransactionView,
        pub source_wallet: Option<WalletRef>,
        pub destination_wallet: Option<WalletRef>,
    }
}
