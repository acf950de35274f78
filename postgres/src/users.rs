//! Users table.

use crate::rows::UserRow;
use crate::{PostgresStorage, db_error};
use event_registration_core::storage::{InsertOutcome, StorageResult, UserRepository};
use event_registration_core::types::{User, UserId};
use futures::future::BoxFuture;

impl UserRepository for PostgresStorage {
    fn get_user<'a>(&'a self, user_id: &'a UserId) -> BoxFuture<'a, StorageResult<Option<User>>> {
        Box::pin(async move {
            let row: Option<UserRow> =
                sqlx::query_as("SELECT user_id, name, created_at FROM users WHERE user_id = $1")
                    .bind(user_id.as_str())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error)?;
            Ok(row.map(User::from))
        })
    }

    fn list_users(&self) -> BoxFuture<'_, StorageResult<Vec<User>>> {
        Box::pin(async move {
            let rows: Vec<UserRow> =
                sqlx::query_as("SELECT user_id, name, created_at FROM users ORDER BY user_id")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(db_error)?;
            Ok(rows.into_iter().map(User::from).collect())
        })
    }

    fn insert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, StorageResult<InsertOutcome>> {
        Box::pin(async move {
            let result = sqlx::query(
                r"
                INSERT INTO users (user_id, name, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id) DO NOTHING
                ",
            )
            .bind(user.user_id.as_str())
            .bind(&user.name)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

            Ok(if result.rows_affected() == 0 {
                InsertOutcome::AlreadyExists
            } else {
                InsertOutcome::Inserted
            })
        })
    }
}
