//! Events table.

use crate::rows::{EventRow, non_negative};
use crate::{PostgresStorage, db_error, to_db_int};
use event_registration_core::storage::{EventRepository, StorageResult};
use event_registration_core::types::{Event, EventId, EventUpdate};
use futures::future::BoxFuture;
use sqlx::{Postgres, QueryBuilder};

impl EventRepository for PostgresStorage {
    fn get_event<'a>(&'a self, event_id: &'a EventId) -> BoxFuture<'a, StorageResult<Option<Event>>> {
        Box::pin(async move {
            let row: Option<EventRow> = sqlx::query_as(
                r"
                SELECT event_id, title, description, date, location, capacity,
                       organizer, status, registered_count, has_waitlist
                FROM events
                WHERE event_id = $1
                ",
            )
            .bind(event_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            row.map(Event::try_from).transpose()
        })
    }

    fn list_events<'a>(&'a self, status: Option<&'a str>) -> BoxFuture<'a, StorageResult<Vec<Event>>> {
        Box::pin(async move {
            let rows: Vec<EventRow> = sqlx::query_as(
                r"
                SELECT event_id, title, description, date, location, capacity,
                       organizer, status, registered_count, has_waitlist
                FROM events
                WHERE $1::TEXT IS NULL OR status = $1
                ORDER BY event_id
                ",
            )
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

            rows.into_iter().map(Event::try_from).collect()
        })
    }

    fn put_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO events (
                    event_id, title, description, date, location, capacity,
                    organizer, status, registered_count, has_waitlist
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (event_id) DO UPDATE SET
                    title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    date = EXCLUDED.date,
                    location = EXCLUDED.location,
                    capacity = EXCLUDED.capacity,
                    organizer = EXCLUDED.organizer,
                    status = EXCLUDED.status,
                    registered_count = EXCLUDED.registered_count,
                    has_waitlist = EXCLUDED.has_waitlist
                ",
            )
            .bind(event.event_id.as_str())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.date)
            .bind(&event.location)
            .bind(to_db_int("capacity", event.capacity)?)
            .bind(&event.organizer)
            .bind(&event.status)
            .bind(to_db_int("registered_count", event.registered_count)?)
            .bind(event.has_waitlist)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            Ok(())
        })
    }

    fn update_event<'a>(
        &'a self,
        event_id: &'a EventId,
        update: &'a EventUpdate,
    ) -> BoxFuture<'a, StorageResult<Option<Event>>> {
        Box::pin(async move {
            if update.is_empty() {
                return self.get_event(event_id).await;
            }

            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE events SET ");
            let mut fields = builder.separated(", ");
            if let Some(title) = &update.title {
                fields.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(description) = &update.description {
                fields.push("description = ").push_bind_unseparated(description.clone());
            }
            if let Some(date) = &update.date {
                fields.push("date = ").push_bind_unseparated(date.clone());
            }
            if let Some(location) = &update.location {
                fields.push("location = ").push_bind_unseparated(location.clone());
            }
            if let Some(capacity) = update.capacity {
                fields
                    .push("capacity = ")
                    .push_bind_unseparated(to_db_int("capacity", capacity)?);
            }
            if let Some(organizer) = &update.organizer {
                fields.push("organizer = ").push_bind_unseparated(organizer.clone());
            }
            if let Some(status) = &update.status {
                fields.push("status = ").push_bind_unseparated(status.clone());
            }
            if let Some(has_waitlist) = update.has_waitlist {
                fields.push("has_waitlist = ").push_bind_unseparated(has_waitlist);
            }
            builder
                .push(" WHERE event_id = ")
                .push_bind(event_id.as_str().to_owned())
                .push(
                    " RETURNING event_id, title, description, date, location, capacity, \
                     organizer, status, registered_count, has_waitlist",
                );

            let row: Option<EventRow> = builder
                .build_query_as()
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

            row.map(Event::try_from).transpose()
        })
    }

    fn delete_event<'a>(&'a self, event_id: &'a EventId) -> BoxFuture<'a, StorageResult<bool>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
                .bind(event_id.as_str())
                .execute(&self.pool)
                .await
                .map_err(db_error)?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn adjust_registered_count<'a>(
        &'a self,
        event_id: &'a EventId,
        delta: i32,
    ) -> BoxFuture<'a, StorageResult<Option<u32>>> {
        Box::pin(async move {
            // The CHECK constraint rejects a decrement below zero.
            let count: Option<(i32,)> = sqlx::query_as(
                r"
                UPDATE events
                SET registered_count = registered_count + $2
                WHERE event_id = $1
                RETURNING registered_count
                ",
            )
            .bind(event_id.as_str())
            .bind(delta)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            count
                .map(|(count,)| non_negative("registered_count", count))
                .transpose()
        })
    }

    fn ping(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(db_error)?;
            Ok(())
        })
    }
}
