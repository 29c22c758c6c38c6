use crate::model::{
    category::{
        event::{CreateCategory, DeleteCategory, UpdateCategory},
        Category,
    },
    id::CategoryId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, event: CreateCategory) -> AppResult<Category>;
    async fn find_all(&self) -> AppResult<Vec<Category>>;
    async fn find_by_id(&self, category_id: CategoryId) -> AppResult<Option<Category>>;
    async fn update(&self, event: UpdateCategory) -> AppResult<Category>;
    async fn delete(&self, event: DeleteCategory) -> AppResult<()>;
}
