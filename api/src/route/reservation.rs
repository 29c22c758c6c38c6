use axum::{
    routing::{get, patch, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    cancel_reservation, register_reservation, show_my_reservations, show_reservation,
    show_reservation_list, update_reservation_status,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", post(register_reservation))
        .route("/", get(show_reservation_list))
        .route("/my-reservations", get(show_my_reservations))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/status", patch(update_reservation_status))
        .route("/:reservation_id/cancel", patch(cancel_reservation));

    Router::new().nest("/reservations", reservation_routers)
}
