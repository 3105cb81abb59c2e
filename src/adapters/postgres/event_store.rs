//! PostgreSQL implementation of the EventStore port.
//!
//! Attendees live in a `TEXT[]` column next to a `version` counter. The
//! conditional write is a single `UPDATE ... WHERE version = $n` guarded by
//! the capacity, so the check and the mutation commit together.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::event::{Attendees, Capacity, Event};
use crate::domain::foundation::{EventId, Timestamp, UserId};
use crate::ports::{EventStore, EventStoreError};

/// PostgreSQL implementation of the EventStore port.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresEventStore")
            .field("pool", &"PgPool")
            .finish()
    }
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new event row. Used by fixtures and seeding.
    pub async fn insert(&self, event: &Event) -> Result<(), EventStoreError> {
        let attendees: Vec<String> = event.attendees().iter().map(|u| u.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO events (id, name, creator_id, capacity, attendees, version, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.name())
        .bind(event.creator_id().as_str())
        .bind(event.capacity().get() as i32)
        .bind(&attendees)
        .bind(event.version() as i64)
        .bind(event.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn exists(&self, id: &EventId) -> Result<bool, EventStoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// Internal row type for sqlx query mapping.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: uuid::Uuid,
    name: String,
    creator_id: String,
    capacity: i32,
    attendees: Vec<String>,
    version: i64,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = EventStoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            EventStoreError::Internal(format!("event {}: invalid {}: {}", row.id, what, e))
        };

        let creator_id = UserId::new(&row.creator_id).map_err(|e| corrupt("creator_id", &e))?;
        let capacity = u32::try_from(row.capacity)
            .map_err(|e| corrupt("capacity", &e))
            .and_then(|c| Capacity::new(c).map_err(|e| corrupt("capacity", &e)))?;
        let ids = row
            .attendees
            .iter()
            .map(|s| UserId::new(s.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt("attendee", &e))?;
        let attendees = Attendees::from_ids(ids).map_err(|e| corrupt("attendees", &e))?;
        let version = u64::try_from(row.version).map_err(|e| corrupt("version", &e))?;

        Event::restore(
            EventId::from_uuid(row.id),
            row.name.clone(),
            creator_id,
            capacity,
            attendees,
            version,
            Timestamp::from_datetime(row.updated_at),
        )
        .map_err(|e| corrupt("row", &e))
    }
}

/// Connection-level failures are transient; everything else is internal.
fn map_sqlx_error(err: sqlx::Error) -> EventStoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!("Event store unreachable: {}", err);
            EventStoreError::Unavailable(err.to_string())
        }
        other => {
            tracing::error!("Event store query failed: {}", other);
            EventStoreError::Internal(format!("Database error: {}", other))
        }
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn find_by_id(&self, id: &EventId) -> Result<Event, EventStoreError> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
            SELECT id, name, creator_id, capacity, attendees, version, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.ok_or(EventStoreError::NotFound(*id))?.try_into()
    }

    async fn conditional_update_attendees(
        &self,
        id: &EventId,
        expected_version: u64,
        attendees: Attendees,
    ) -> Result<Event, EventStoreError> {
        let list: Vec<String> = attendees.iter().map(|u| u.to_string()).collect();

        let row: Option<EventRow> = sqlx::query_as(
            r#"
            UPDATE events
            SET
                attendees = $3,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1
              AND version = $2
              AND cardinality($3::text[]) <= capacity
            RETURNING id, name, creator_id, capacity, attendees, version, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(expected_version as i64)
        .bind(&list)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => row.try_into(),
            None if self.exists(id).await? => {
                tracing::debug!(event_id = %id, expected_version, "Attendee update lost the race");
                Err(EventStoreError::Conflict(*id))
            }
            None => Err(EventStoreError::NotFound(*id)),
        }
    }
}
