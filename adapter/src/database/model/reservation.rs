use kernel::model::{
    event::EventStatus,
    id::{EventId, ReservationId, UserId},
    reservation::{EventOccupancy, Reservation, ReservationEvent, ReservationStatus},
    user::ReservationUser,
};
use sqlx::types::chrono::{DateTime, Utc};

/// Row shape of the reservation listing joins (reservations x users x
/// events). `event_status` is the aliased `events.status` column.
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub event_id: EventId,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub event_status: EventStatus,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            reservation_id,
            status,
            created_at,
            user_id,
            user_name,
            email,
            event_id,
            title,
            event_date,
            location,
            capacity,
            event_status,
        } = value;
        Reservation {
            reservation_id,
            status,
            created_at,
            user: ReservationUser {
                user_id,
                user_name,
                email,
            },
            event: ReservationEvent {
                event_id,
                title,
                event_date,
                location,
                capacity,
                status: event_status,
            },
        }
    }
}

/// Current state of one reservation, locked during a status transition.
#[derive(sqlx::FromRow)]
pub struct ReservationStateRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub status: ReservationStatus,
}

/// Event columns read under the admission row lock.
#[derive(sqlx::FromRow)]
pub struct EventAdmissionRow {
    pub event_id: EventId,
    pub capacity: i32,
    pub status: EventStatus,
}

#[derive(sqlx::FromRow)]
pub struct OccupancyRow {
    pub event_id: EventId,
    pub active: i64,
    pub capacity: i32,
}

impl From<OccupancyRow> for EventOccupancy {
    fn from(value: OccupancyRow) -> Self {
        let OccupancyRow {
            event_id,
            active,
            capacity,
        } = value;
        EventOccupancy {
            event_id,
            active,
            capacity,
        }
    }
}
