use crate::model::{id::UserId, role::Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

/// Minimal user projection embedded in reservation listings.
#[derive(Debug, Clone)]
pub struct ReservationUser {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}
