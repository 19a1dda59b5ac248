use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, Wallet, users, wallets};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a user and their (empty) wallet in one unit of work.
    ///
    /// `password_hash` is produced by the caller; the engine never sees the
    /// plain credential.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> ResultEngine<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation("name must not be empty".to_string()));
        }
        let email = email.trim().to_lowercase();

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict("email already registered".to_string()));
            }

            let user = User::new(name.to_string(), email, password_hash.to_string());
            users::ActiveModel::from(&user).insert(&db_tx).await?;

            let wallet = Wallet::new(user.id);
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;

            tracing::debug!(user = %user.id, wallet = %wallet.id, "user registered");
            Ok(user)
        })
    }

    /// Resolves a user by id (`NotFound` when absent). Used by transfers to
    /// validate the destination and by the auth middleware.
    pub async fn resolve_user(&self, user_id: Uuid) -> ResultEngine<User> {
        User::try_from(self.require_user(&self.database, user_id).await?)
    }

    /// Looks a user up by email for the login path.
    pub async fn find_user_by_email(&self, email: &str) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }
}
