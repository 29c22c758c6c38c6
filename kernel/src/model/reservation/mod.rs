use crate::model::event::EventStatus;
use crate::model::id::{EventId, ReservationId};
use crate::model::user::ReservationUser;
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub user: ReservationUser,
    pub event: ReservationEvent,
    pub created_at: DateTime<Utc>,
}

/// Event projection embedded in reservation listings.
#[derive(Debug, Clone)]
pub struct ReservationEvent {
    pub event_id: EventId,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub status: EventStatus,
}

/// Reservation lifecycle. A reservation is created PENDING by admission,
/// and only PENDING/CONFIRMED rows count against event capacity or block
/// re-booking by the same user. A CANCELED row is dead: re-booking goes
/// through admission again and yields a fresh reservation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl ReservationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    /// Admin transition rules: PENDING and CONFIRMED may move to any
    /// status (CONFIRMED back to PENDING is an explicit admin reset), but
    /// nothing leaves CANCELED on the same record.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        let _ = next;
        match self {
            ReservationStatus::Canceled => false,
            ReservationStatus::Pending | ReservationStatus::Confirmed => true,
        }
    }
}

/// Live occupancy of an event, always derived from a count of active
/// reservations rather than a stored aggregate.
#[derive(Debug, Clone, Copy)]
pub struct EventOccupancy {
    pub event_id: EventId,
    pub active: i64,
    pub capacity: i32,
}

impl EventOccupancy {
    pub fn ratio(&self) -> f64 {
        if self.capacity <= 0 {
            return 0.0;
        }
        self.active as f64 / self.capacity as f64
    }

    pub fn is_full(&self) -> bool {
        self.active >= i64::from(self.capacity)
    }
}
