use crate::{
    extractor::AuthorizedUser,
    model::event::{
        CreateEventRequest, CreateEventRequestWithUser, EventResponse, EventsResponse,
        OccupancyResponse, UpdateEventRequest, UpdateEventRequestWithIds,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{event::event::DeleteEvent, id::EventId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_event(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can create events".into(),
        ));
    }
    req.validate(&())?;

    registry
        .event_repository()
        .create(CreateEventRequestWithUser::new(req, user.id()).into())
        .await
        .map(EventResponse::from)
        .map(|event| (StatusCode::CREATED, Json(event)))
}

pub async fn show_event_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_all()
        .await
        .map(EventsResponse::from)
        .map(Json)
}

pub async fn show_my_event_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins manage events".into(),
        ));
    }

    registry
        .event_repository()
        .find_by_creator(user.id())
        .await
        .map(EventsResponse::from)
        .map(Json)
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound(format!(
                "event ({event_id}) not found"
            ))),
        })
}

/// Live occupancy, always recomputed from the reservation rows.
pub async fn show_event_occupancy(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<OccupancyResponse>> {
    registry
        .reservation_repository()
        .occupancy(event_id)
        .await
        .map(OccupancyResponse::from)
        .map(Json)
}

pub async fn update_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can update events".into(),
        ));
    }
    req.validate(&())?;

    registry
        .event_repository()
        .update(UpdateEventRequestWithIds::new(event_id, user.id(), req).into())
        .await
        .map(EventResponse::from)
        .map(Json)
}

pub async fn delete_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can delete events".into(),
        ));
    }

    registry
        .event_repository()
        .delete(DeleteEvent::new(event_id, user.id()))
        .await
        .map(|_| StatusCode::OK)
}
