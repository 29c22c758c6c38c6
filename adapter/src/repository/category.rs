use crate::database::{model::category::CategoryRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    category::{
        event::{CreateCategory, DeleteCategory, UpdateCategory},
        Category,
    },
    id::CategoryId,
};
use kernel::repository::category::CategoryRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct CategoryRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn create(&self, event: CreateCategory) -> AppResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
                INSERT INTO categories (category_id, name)
                VALUES ($1, $2)
                RETURNING category_id, name
            "#,
        )
        .bind(CategoryId::new())
        .bind(&event.name)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::ResourceConflict(format!("category \"{}\" already exists", event.name))
            }
            _ => AppError::SpecificOperationError(e),
        })?;

        Ok(row.into())
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
                SELECT category_id, name
                FROM categories
                ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, category_id: CategoryId) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
                SELECT category_id, name
                FROM categories
                WHERE category_id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Category::from))
    }

    async fn update(&self, event: UpdateCategory) -> AppResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
                UPDATE categories
                SET name = $2
                WHERE category_id = $1
                RETURNING category_id, name
            "#,
        )
        .bind(event.category_id)
        .bind(&event.name)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(AppError::EntityNotFound(format!(
                "category ({}) not found",
                event.category_id
            ))),
        }
    }

    async fn delete(&self, event: DeleteCategory) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM categories
                WHERE category_id = $1
            "#,
        )
        .bind(event.category_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "category ({}) not found",
                event.category_id
            )));
        }

        Ok(())
    }
}
