use crate::model::id::CategoryId;
use derive_new::new;

#[derive(new)]
pub struct CreateCategory {
    pub name: String,
}

#[derive(new)]
pub struct UpdateCategory {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(new)]
pub struct DeleteCategory {
    pub category_id: CategoryId,
}
