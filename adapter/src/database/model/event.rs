use kernel::model::{
    event::{Event, EventStatus},
    id::{CategoryId, EventId, UserId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub status: EventStatus,
    pub category_id: Option<CategoryId>,
    pub created_by: UserId,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            event_id,
            title,
            description,
            event_date,
            location,
            capacity,
            status,
            category_id,
            created_by,
        } = value;
        Event {
            event_id,
            title,
            description,
            event_date,
            location,
            capacity,
            status,
            category_id,
            created_by,
        }
    }
}
