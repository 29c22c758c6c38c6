use crate::model::{
    event::{
        event::{CreateEvent, DeleteEvent, UpdateEvent},
        Event,
    },
    id::{EventId, UserId},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: CreateEvent) -> AppResult<Event>;
    async fn find_all(&self) -> AppResult<Vec<Event>>;
    async fn find_by_creator(&self, user_id: UserId) -> AppResult<Vec<Event>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    async fn update(&self, event: UpdateEvent) -> AppResult<Event>;
    async fn delete(&self, event: DeleteEvent) -> AppResult<()>;
}
