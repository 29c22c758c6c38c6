use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    event::{
        event::{CreateEvent, UpdateEvent},
        Event, EventStatus,
    },
    id::{CategoryId, EventId, UserId},
    reservation::EventOccupancy,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatusName {
    Draft,
    Published,
    Canceled,
}

impl From<EventStatus> for EventStatusName {
    fn from(value: EventStatus) -> Self {
        match value {
            EventStatus::Draft => Self::Draft,
            EventStatus::Published => Self::Published,
            EventStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<EventStatusName> for EventStatus {
    fn from(value: EventStatusName) -> Self {
        match value {
            EventStatusName::Draft => Self::Draft,
            EventStatusName::Published => Self::Published,
            EventStatusName::Canceled => Self::Canceled,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1, max = 255))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub event_date: DateTime<Utc>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    pub status: Option<EventStatusName>,
    #[garde(skip)]
    pub category_id: Option<CategoryId>,
}

#[derive(new)]
pub struct CreateEventRequestWithUser(pub CreateEventRequest, pub UserId);

impl From<CreateEventRequestWithUser> for CreateEvent {
    fn from(value: CreateEventRequestWithUser) -> Self {
        let CreateEventRequestWithUser(
            CreateEventRequest {
                title,
                description,
                event_date,
                location,
                capacity,
                status,
                category_id,
            },
            user_id,
        ) = value;
        CreateEvent {
            title,
            description,
            event_date,
            location,
            capacity,
            status: status.map(EventStatus::from).unwrap_or(EventStatus::Draft),
            category_id,
            created_by: user_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[garde(inner(length(min = 1, max = 255)))]
    pub title: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub event_date: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub capacity: Option<i32>,
    #[garde(skip)]
    pub status: Option<EventStatusName>,
    #[garde(skip)]
    pub category_id: Option<CategoryId>,
}

#[derive(new)]
pub struct UpdateEventRequestWithIds(pub EventId, pub UserId, pub UpdateEventRequest);

impl From<UpdateEventRequestWithIds> for UpdateEvent {
    fn from(value: UpdateEventRequestWithIds) -> Self {
        let UpdateEventRequestWithIds(
            event_id,
            user_id,
            UpdateEventRequest {
                title,
                description,
                event_date,
                location,
                capacity,
                status,
                category_id,
            },
        ) = value;
        UpdateEvent {
            event_id,
            title,
            description,
            event_date,
            location,
            capacity,
            status: status.map(EventStatus::from),
            category_id,
            requested_user: user_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub items: Vec<EventResponse>,
}

impl From<Vec<Event>> for EventsResponse {
    fn from(value: Vec<Event>) -> Self {
        Self {
            items: value.into_iter().map(EventResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub status: EventStatusName,
    pub category_id: Option<CategoryId>,
    pub created_by: UserId,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
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
        Self {
            event_id,
            title,
            description,
            event_date,
            location,
            capacity,
            status: status.into(),
            category_id,
            created_by,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyResponse {
    pub event_id: EventId,
    pub active: i64,
    pub capacity: i32,
    pub ratio: f64,
}

impl From<EventOccupancy> for OccupancyResponse {
    fn from(value: EventOccupancy) -> Self {
        Self {
            event_id: value.event_id,
            active: value.active,
            capacity: value.capacity,
            ratio: value.ratio(),
        }
    }
}
