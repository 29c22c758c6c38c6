pub mod category;
pub mod event;
pub mod health;
pub mod reservation;
pub mod v1;
