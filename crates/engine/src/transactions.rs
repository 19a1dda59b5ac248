//! Transaction primitives.
//!
//! A `Transaction` is the immutable ledger record of one balance-affecting
//! event. The only mutation ever applied after insertion is the
//! `completed -> reversed` status flip on the original of a reversal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, Wallet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Transfer,
    Reversal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Transfer => "transfer",
            Self::Reversal => "reversal",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "transfer" => Ok(Self::Transfer),
            "reversal" => Ok(Self::Reversal),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Lifecycle state of a transaction.
///
/// The engine only ever writes `completed` on insert and flips an original to
/// `reversed` during a reversal. `pending` and `failed` are reserved for a
/// future asynchronous settlement step and have no producers today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Reversed => "reversed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "reversed" => Ok(Self::Reversed),
            other => Err(EngineError::Validation(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

/// A ledger entry.
///
/// `amount` is always a positive magnitude; the direction of the movement is
/// carried by the wallet references, not the sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub status: TransactionStatus,
    /// Wallet debited. `None` for a pure deposit.
    pub source_wallet_id: Option<Uuid>,
    /// Wallet credited.
    pub destination_wallet_id: Option<Uuid>,
    /// Set only on reversals, pointing at the transaction being undone.
    pub original_transaction_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a new `completed` entry. Wallet references are filled in by the
    /// operation that creates it.
    pub fn completed(
        kind: TransactionKind,
        amount: Money,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be at least 0.01".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            status: TransactionStatus::Completed,
            source_wallet_id: None,
            destination_wallet_id: None,
            original_transaction_id: None,
            description,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A transaction together with its resolved wallet references, as returned by
/// the single-transaction lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub source_wallet: Option<Wallet>,
    pub destination_wallet: Option<Wallet>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount: i64,
    pub status: String,
    pub source_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub original_transaction_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::SourceWalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    SourceWallet,
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::DestinationWalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DestinationWallet,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount.cents()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            source_wallet_id: ActiveValue::Set(tx.source_wallet_id.map(|id| id.to_string())),
            destination_wallet_id: ActiveValue::Set(
                tx.destination_wallet_id.map(|id| id.to_string()),
            ),
            original_transaction_id: ActiveValue::Set(
                tx.original_transaction_id.map(|id| id.to_string()),
            ),
            description: ActiveValue::Set(tx.description.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse_opt = |value: Option<String>| {
            value
                .map(|s| {
                    Uuid::parse_str(&s)
                        .map_err(|_| EngineError::NotFound("transaction not found".to_string()))
                })
                .transpose()
        };
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction not found".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: Money::new(model.amount),
            status: TransactionStatus::try_from(model.status.as_str())?,
            source_wallet_id: parse_opt(model.source_wallet_id)?,
            destination_wallet_id: parse_opt(model.destination_wallet_id)?,
            original_transaction_id: parse_opt(model.original_transaction_id)?,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_status_round_trip() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Transfer,
            TransactionKind::Reversal,
        ] {
            assert_eq!(TransactionKind::try_from(kind.as_str()).unwrap(), kind);
        }
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Reversed,
        ] {
            assert_eq!(TransactionStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(TransactionKind::try_from("withdrawal").is_err());
        assert!(TransactionStatus::try_from("settled").is_err());
    }

    #[test]
    fn completed_rejects_non_positive_amounts() {
        assert!(Transaction::completed(TransactionKind::Deposit, Money::ZERO, None).is_err());
        assert!(Transaction::completed(TransactionKind::Deposit, Money::new(-100), None).is_err());
    }
}
