use crate::model::id::CategoryId;

pub mod event;

#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}
