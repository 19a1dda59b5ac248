use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, users, wallets};

use super::Engine;

impl Engine {
    pub(super) async fn find_wallet_by_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<Option<wallets::Model>> {
        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_wallet_by_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<wallets::Model> {
        self.find_wallet_by_user(db, user_id).await?.ok_or_else(|| {
            EngineError::NotFound(format!("wallet for user {user_id} not found"))
        })
    }

    pub(super) async fn require_wallet_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet_id: Uuid,
        err_msg: &str,
    ) -> ResultEngine<wallets::Model> {
        wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound(err_msg.to_string()))
    }

    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {user_id} not found")))
    }
}
