//! Registrations table.

use crate::rows::RegistrationRow;
use crate::{PostgresStorage, db_error, to_db_int};
use event_registration_core::storage::{RegistrationRepository, StorageResult};
use event_registration_core::types::{EventId, Registration, RegistrationStatus, UserId};
use futures::future::BoxFuture;

impl RegistrationRepository for PostgresStorage {
    fn get_registration<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
    ) -> BoxFuture<'a, StorageResult<Option<Registration>>> {
        Box::pin(async move {
            let row: Option<RegistrationRow> = sqlx::query_as(
                r"
                SELECT user_id, event_id, status, position, registered_at
                FROM registrations
                WHERE user_id = $1 AND event_id = $2
                ",
            )
            .bind(user_id.as_str())
            .bind(event_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            row.map(Registration::try_from).transpose()
        })
    }

    fn put_registration<'a>(&'a self, registration: &'a Registration) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let position = registration
                .position
                .map(|position| to_db_int("position", position))
                .transpose()?;

            sqlx::query(
                r"
                INSERT INTO registrations (user_id, event_id, status, position, registered_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (user_id, event_id) DO UPDATE SET
                    status = EXCLUDED.status,
                    position = EXCLUDED.position,
                    registered_at = EXCLUDED.registered_at
                ",
            )
            .bind(registration.user_id.as_str())
            .bind(registration.event_id.as_str())
            .bind(registration.status.as_str())
            .bind(position)
            .bind(registration.registered_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            Ok(())
        })
    }

    fn delete_registration<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
    ) -> BoxFuture<'a, StorageResult<bool>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND event_id = $2")
                .bind(user_id.as_str())
                .bind(event_id.as_str())
                .execute(&self.pool)
                .await
                .map_err(db_error)?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn set_position<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
        position: u32,
    ) -> BoxFuture<'a, StorageResult<bool>> {
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE registrations SET position = $3 WHERE user_id = $1 AND event_id = $2",
            )
            .bind(user_id.as_str())
            .bind(event_id.as_str())
            .bind(to_db_int("position", position)?)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn registrations_for_event<'a>(
        &'a self,
        event_id: &'a EventId,
        status: Option<RegistrationStatus>,
    ) -> BoxFuture<'a, StorageResult<Vec<Registration>>> {
        Box::pin(async move {
            let rows: Vec<RegistrationRow> = sqlx::query_as(
                r"
                SELECT user_id, event_id, status, position, registered_at
                FROM registrations
                WHERE event_id = $1 AND ($2::TEXT IS NULL OR status = $2)
                ",
            )
            .bind(event_id.as_str())
            .bind(status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

            rows.into_iter().map(Registration::try_from).collect()
        })
    }

    fn registrations_for_user<'a>(
        &'a self,
        user_id: &'a UserId,
        status: Option<RegistrationStatus>,
    ) -> BoxFuture<'a, StorageResult<Vec<Registration>>> {
        Box::pin(async move {
            let rows: Vec<RegistrationRow> = sqlx::query_as(
                r"
                SELECT user_id, event_id, status, position, registered_at
                FROM registrations
                WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
                ",
            )
            .bind(user_id.as_str())
            .bind(status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

            rows.into_iter().map(Registration::try_from).collect()
        })
    }
}
