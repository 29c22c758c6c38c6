use crate::model::id::{EventId, ReservationId, UserId};
use crate::model::reservation::ReservationStatus;
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateReservation {
    pub event_id: EventId,
    pub requested_by: UserId,
}

#[derive(Debug, new)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub requested_by: UserId,
}

#[derive(Debug, new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub requested_by: UserId,
}
