use crate::{
    extractor::AuthorizedUser,
    model::category::{
        CategoriesResponse, CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    category::event::{CreateCategory, DeleteCategory, UpdateCategory},
    id::CategoryId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_category(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can manage categories".into(),
        ));
    }
    req.validate(&())?;

    registry
        .category_repository()
        .create(CreateCategory::new(req.name))
        .await
        .map(CategoryResponse::from)
        .map(|category| (StatusCode::CREATED, Json(category)))
}

pub async fn show_category_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CategoriesResponse>> {
    registry
        .category_repository()
        .find_all()
        .await
        .map(CategoriesResponse::from)
        .map(Json)
}

pub async fn show_category(
    Path(category_id): Path<CategoryId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CategoryResponse>> {
    registry
        .category_repository()
        .find_by_id(category_id)
        .await
        .and_then(|category| match category {
            Some(category) => Ok(Json(category.into())),
            None => Err(AppError::EntityNotFound(format!(
                "category ({category_id}) not found"
            ))),
        })
}

pub async fn update_category(
    user: AuthorizedUser,
    Path(category_id): Path<CategoryId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can manage categories".into(),
        ));
    }
    req.validate(&())?;

    registry
        .category_repository()
        .update(UpdateCategory::new(category_id, req.name))
        .await
        .map(CategoryResponse::from)
        .map(Json)
}

pub async fn delete_category(
    user: AuthorizedUser,
    Path(category_id): Path<CategoryId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can manage categories".into(),
        ));
    }

    registry
        .category_repository()
        .delete(DeleteCategory::new(category_id))
        .await
        .map(|_| StatusCode::OK)
}
