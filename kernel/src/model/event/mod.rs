use crate::model::id::{CategoryId, EventId, UserId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone)]
pub struct Event {
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

/// Event lifecycle. Only PUBLISHED events accept reservations; DRAFT and
/// CANCELED events are never bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "UPPERCASE")]
pub enum EventStatus {
    Draft,
    Published,
    Canceled,
}

impl EventStatus {
    pub fn is_bookable(&self) -> bool {
        matches!(self, EventStatus::Published)
    }
}
