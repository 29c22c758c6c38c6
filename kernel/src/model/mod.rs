pub mod auth;
pub mod category;
pub mod event;
pub mod id;
pub mod reservation;
pub mod role;
pub mod user;
