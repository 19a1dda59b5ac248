use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, TransactionStatus, Wallet,
    transactions,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Undoes a prior deposit or transfer.
    ///
    /// This:
    /// - records a `reversal` entry pointing at the original
    /// - inverts the original's balance effects
    /// - flips the original's status to `reversed`
    ///
    /// Only a participant (owner of the original's source or destination
    /// wallet) may reverse it, and only once.
    pub async fn reverse(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        reason: Option<&str>,
    ) -> ResultEngine<Transaction> {
        let reason = normalize_optional_text(reason);

        with_tx!(self, |db_tx| {
            let original = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("transaction {transaction_id} not found"))
                })?;
            let original = Transaction::try_from(original)?;

            if original.status == TransactionStatus::Reversed {
                return Err(EngineError::Conflict(
                    "transaction already reversed".to_string(),
                ));
            }

            let caller = Wallet::try_from(self.require_wallet_by_user(&db_tx, user_id).await?)?;
            let participates = original.source_wallet_id == Some(caller.id)
                || original.destination_wallet_id == Some(caller.id);
            if !participates {
                return Err(EngineError::BadRequest(
                    "not authorized to reverse this transaction".to_string(),
                ));
            }

            let mut reversal = match original.kind {
                TransactionKind::Deposit => {
                    let destination_id = original.destination_wallet_id.ok_or_else(|| {
                        EngineError::NotFound("destination wallet not found".to_string())
                    })?;
                    let destination = Wallet::try_from(
                        self.require_wallet_by_id(&db_tx, destination_id, "destination wallet not found")
                            .await?,
                    )?;
                    if destination.balance < original.amount {
                        return Err(EngineError::BadRequest(
                            "insufficient balance to reverse deposit".to_string(),
                        ));
                    }

                    self.debit_wallet(
                        &db_tx,
                        destination.id,
                        original.amount,
                        "insufficient balance to reverse deposit",
                    )
                    .await?;

                    let mut tx = Transaction::completed(
                        TransactionKind::Reversal,
                        original.amount,
                        Some(reason.unwrap_or_else(|| {
                            format!("Reversal of deposit {}", original.id)
                        })),
                    )?;
                    tx.source_wallet_id = Some(destination.id);
                    tx
                }
                TransactionKind::Transfer => {
                    let source_id = original.source_wallet_id.ok_or_else(|| {
                        EngineError::NotFound("source or destination wallet not found".to_string())
                    })?;
                    let destination_id = original.destination_wallet_id.ok_or_else(|| {
                        EngineError::NotFound("source or destination wallet not found".to_string())
                    })?;
                    let source = Wallet::try_from(
                        self.require_wallet_by_id(
                            &db_tx,
                            source_id,
                            "source or destination wallet not found",
                        )
                        .await?,
                    )?;
                    let destination = Wallet::try_from(
                        self.require_wallet_by_id(
                            &db_tx,
                            destination_id,
                            "source or destination wallet not found",
                        )
                        .await?,
                    )?;
                    if destination.balance < original.amount {
                        return Err(EngineError::BadRequest(
                            "insufficient balance to reverse transfer".to_string(),
                        ));
                    }

                    // Money flows back: the original destination is debited and
                    // the original source credited.
                    self.credit_wallet(&db_tx, source.id, original.amount)
                        .await?;
                    self.debit_wallet(
                        &db_tx,
                        destination.id,
                        original.amount,
                        "insufficient balance to reverse transfer",
                    )
                    .await?;

                    let mut tx = Transaction::completed(
                        TransactionKind::Reversal,
                        original.amount,
                        Some(reason.unwrap_or_else(|| {
                            format!("Reversal of transfer {}", original.id)
                        })),
                    )?;
                    tx.source_wallet_id = Some(destination.id);
                    tx.destination_wallet_id = Some(source.id);
                    tx
                }
                TransactionKind::Reversal => {
                    return Err(EngineError::BadRequest(
                        "transaction type does not support reversal".to_string(),
                    ));
                }
            };

            reversal.original_transaction_id = Some(original.id);
            self.mark_reversed(&db_tx, original.id).await?;
            self.insert_transaction(&db_tx, &reversal).await?;

            tracing::debug!(
                transaction = %reversal.id,
                original = %original.id,
                "reversal recorded"
            );
            Ok(reversal)
        })
    }
}
