use garde::Validate;
use kernel::model::{category::Category, id::CategoryId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[garde(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[garde(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub items: Vec<CategoryResponse>,
}

impl From<Vec<Category>> for CategoriesResponse {
    fn from(value: Vec<Category>) -> Self {
        Self {
            items: value.into_iter().map(CategoryResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub category_id: CategoryId,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        let Category { category_id, name } = value;
        Self { category_id, name }
    }
}
