use crate::model::event::EventStatusName;
use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{EventId, ReservationId, UserId},
    reservation::{Reservation, ReservationEvent, ReservationStatus},
    user::ReservationUser,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatusName {
    Pending,
    Confirmed,
    Canceled,
}

impl From<ReservationStatus> for ReservationStatusName {
    fn from(value: ReservationStatus) -> Self {
        match value {
            ReservationStatus::Pending => Self::Pending,
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<ReservationStatusName> for ReservationStatus {
    fn from(value: ReservationStatusName) -> Self {
        match value {
            ReservationStatusName::Pending => Self::Pending,
            ReservationStatusName::Confirmed => Self::Confirmed,
            ReservationStatusName::Canceled => Self::Canceled,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub event_id: EventId,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusRequest {
    #[garde(skip)]
    pub status: ReservationStatusName,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub status: ReservationStatusName,
    pub created_at: DateTime<Utc>,
    pub user: ReservationUserResponse,
    pub event: ReservationEventResponse,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            status,
            user,
            event,
            created_at,
        } = value;
        Self {
            reservation_id,
            status: status.into(),
            created_at,
            user: user.into(),
            event: event.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}

impl From<ReservationUser> for ReservationUserResponse {
    fn from(value: ReservationUser) -> Self {
        let ReservationUser {
            user_id,
            user_name,
            email,
        } = value;
        Self {
            user_id,
            user_name,
            email,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEventResponse {
    pub event_id: EventId,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub status: EventStatusName,
}

impl From<ReservationEvent> for ReservationEventResponse {
    fn from(value: ReservationEvent) -> Self {
        let ReservationEvent {
            event_id,
            title,
            event_date,
            location,
            capacity,
            status,
        } = value;
        Self {
            event_id,
            title,
            event_date,
            location,
            capacity,
            status: status.into(),
        }
    }
}
