use crate::database::{model::event::EventRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{
        event::{CreateEvent, DeleteEvent, UpdateEvent},
        Event,
    },
    id::{EventId, UserId},
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

const EVENT_COLUMNS: &str = r#"
    event_id,
    title,
    description,
    event_date,
    location,
    capacity,
    status,
    category_id,
    created_by
"#;

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
                INSERT INTO events
                (event_id, title, description, event_date, location,
                 capacity, status, category_id, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(EventId::new())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(event.status)
        .bind(event.category_id)
        .bind(event.created_by)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
                SELECT {EVENT_COLUMNS}
                FROM events
                ORDER BY event_date ASC
            "#
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn find_by_creator(&self, user_id: UserId) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
                SELECT {EVENT_COLUMNS}
                FROM events
                WHERE created_by = $1
                ORDER BY event_date ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
                SELECT {EVENT_COLUMNS}
                FROM events
                WHERE event_id = $1
            "#
        ))
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Event::from))
    }

    // Partial update. Capacity may be lowered below the current active
    // reservation count; occupancy is derived on read, so existing
    // reservations are left alone (see the strict-confirm knob for the
    // confirm-time consequence).
    async fn update(&self, event: UpdateEvent) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
                UPDATE events
                SET title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    event_date = COALESCE($4, event_date),
                    location = COALESCE($5, location),
                    capacity = COALESCE($6, capacity),
                    status = COALESCE($7, status),
                    category_id = COALESCE($8, category_id),
                    updated_at = NOW()
                WHERE event_id = $1 AND created_by = $9
                RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.event_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(event.status)
        .bind(event.category_id)
        .bind(event.requested_user)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(AppError::EntityNotFound(format!(
                "event ({}) not found",
                event.event_id
            ))),
        }
    }

    async fn delete(&self, event: DeleteEvent) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM events
                WHERE event_id = $1 AND created_by = $2
            "#,
        )
        .bind(event.event_id)
        .bind(event.requested_user)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "event ({}) not found",
                event.event_id
            )));
        }

        Ok(())
    }
}
