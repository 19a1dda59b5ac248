use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, Transaction, TransactionStatus, transactions, wallets,
};

use super::Engine;

impl Engine {
    /// Applies `balance = balance + amount` relationally.
    ///
    /// The delta form makes concurrent credits commute instead of losing one
    /// of the two writes.
    pub(super) async fn credit_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet_id: Uuid,
        amount: Money,
    ) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(amount.cents()),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound("wallet not found".to_string()));
        }
        Ok(())
    }

    /// Applies `balance = balance - amount`, guarded by `balance >= amount` in
    /// the same statement so a concurrent debit cannot drive the balance below
    /// zero between the precondition read and this write.
    pub(super) async fn debit_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet_id: Uuid,
        amount: Money,
        insufficient_msg: &str,
    ) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).sub(amount.cents()),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .filter(wallets::Column::Balance.gte(amount.cents()))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::BadRequest(insufficient_msg.to_string()));
        }
        Ok(())
    }

    /// Flips the original transaction to `reversed`, guarded by
    /// `status != reversed` so two concurrent reversals cannot both win.
    pub(super) async fn mark_reversed<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        let result = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::Status,
                Expr::value(TransactionStatus::Reversed.as_str()),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(transactions::Column::Id.eq(transaction_id.to_string()))
            .filter(transactions::Column::Status.ne(TransactionStatus::Reversed.as_str()))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(
                "transaction already reversed".to_string(),
            ));
        }
        Ok(())
    }

    pub(super) async fn insert_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        transactions::ActiveModel::from(tx).insert(db).await?;
        Ok(())
    }
}
