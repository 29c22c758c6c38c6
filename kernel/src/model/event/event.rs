use crate::model::event::EventStatus;
use crate::model::id::{CategoryId, EventId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub status: EventStatus,
    pub category_id: Option<CategoryId>,
    pub created_by: UserId,
}

#[derive(Debug, new)]
pub struct UpdateEvent {
    pub event_id: EventId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
    pub category_id: Option<CategoryId>,
    pub requested_user: UserId,
}

#[derive(Debug, new)]
pub struct DeleteEvent {
    pub event_id: EventId,
    pub requested_user: UserId,
}
