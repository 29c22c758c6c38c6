use crate::model::{
    id::{EventId, ReservationId, UserId},
    reservation::{
        event::{CancelReservation, CreateReservation, UpdateReservationStatus},
        EventOccupancy, Reservation,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Admits a reservation request. The existence, bookability, duplicate
    /// and capacity checks run together with the insert as one atomic unit
    /// against the store; on success the new reservation is PENDING.
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;

    /// Privileged status transition. Transitions out of CANCELED are
    /// rejected; capacity re-validation on confirm is configuration-gated.
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation>;

    /// Self-service cancel. Fails with a not-found error when the
    /// reservation is missing or owned by someone else, without revealing
    /// which of the two it was.
    async fn cancel_own(&self, event: CancelReservation) -> AppResult<Reservation>;

    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;

    /// Live active-count over capacity for one event.
    async fn occupancy(&self, event_id: EventId) -> AppResult<EventOccupancy>;
}
