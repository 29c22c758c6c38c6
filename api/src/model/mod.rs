pub mod category;
pub mod event;
pub mod reservation;
