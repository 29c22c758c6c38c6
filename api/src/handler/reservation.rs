use crate::{
    extractor::AuthorizedUser,
    model::reservation::{
        CreateReservationRequest, ReservationResponse, ReservationsResponse,
        UpdateReservationStatusRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    reservation::event::{CancelReservation, CreateReservation, UpdateReservationStatus},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    registry
        .reservation_repository()
        .create(CreateReservation::new(req.event_id, user.id()))
        .await
        .map(ReservationResponse::from)
        .map(|reservation| (StatusCode::CREATED, Json(reservation)))
}

pub async fn show_my_reservations(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_user_id(user.id())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can list all reservations".into(),
        ));
    }

    registry
        .reservation_repository()
        .find_all()
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn update_reservation_status(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationStatusRequest>,
) -> AppResult<Json<ReservationResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only admins can change reservation status".into(),
        ));
    }
    req.validate(&())?;

    registry
        .reservation_repository()
        .update_status(UpdateReservationStatus::new(
            reservation_id,
            req.status.into(),
            user.id(),
        ))
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn cancel_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .cancel_own(CancelReservation::new(reservation_id, user.id()))
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use chrono::Utc;
    use kernel::model::{
        event::EventStatus,
        id::{EventId, ReservationId, UserId},
        reservation::{Reservation, ReservationEvent, ReservationStatus},
        role::Role,
        user::{ReservationUser, User},
    };
    use kernel::repository::{
        auth::MockAuthRepository, category::MockCategoryRepository, event::MockEventRepository,
        health::MockHealthCheckRepository, reservation::MockReservationRepository,
        user::MockUserRepository,
    };
    use registry::AppRegistry;
    use shared::error::AppError;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn fixture_registry(
        reservation: MockReservationRepository,
        role: Role,
        user_id: UserId,
    ) -> AppRegistry {
        let mut auth = MockAuthRepository::new();
        auth.expect_fetch_user_id_from_token()
            .returning(move |_| Ok(Some(user_id)));

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_current_user().returning(move |_| {
            Ok(Some(User {
                user_id,
                user_name: "Test User".into(),
                email: "test@example.com".into(),
                role,
            }))
        });

        AppRegistry::from_parts(
            Arc::new(MockHealthCheckRepository::new()),
            Arc::new(MockCategoryRepository::new()),
            Arc::new(MockEventRepository::new()),
            Arc::new(reservation),
            Arc::new(user_repo),
            Arc::new(auth),
        )
    }

    fn app(registry: AppRegistry) -> Router {
        crate::route::v1::routes().with_state(registry)
    }

    fn sample_reservation(user_id: UserId, event_id: EventId) -> Reservation {
        Reservation {
            reservation_id: ReservationId::new(),
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            user: ReservationUser {
                user_id,
                user_name: "Test User".into(),
                email: "test@example.com".into(),
            },
            event: ReservationEvent {
                event_id,
                title: "Test Event".into(),
                event_date: Utc::now(),
                location: None,
                capacity: 10,
                status: EventStatus::Published,
            },
        }
    }

    fn book_request(event_id: EventId) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/reservations")
            .header("Authorization", "Bearer test-token")
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::json!({ "eventId": event_id }).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn booking_returns_created() {
        let user_id = UserId::new();
        let event_id = EventId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_create()
            .returning(move |_| Ok(sample_reservation(user_id, event_id)));
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let res = app.oneshot(book_request(event_id)).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn full_event_maps_to_bad_request() {
        let user_id = UserId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::UnprocessableEntity("event is full".into())));
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let res = app.oneshot(book_request(EventId::new())).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_reservation_maps_to_conflict() {
        let user_id = UserId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_create().returning(|_| {
            Err(AppError::ResourceConflict(
                "user already has an active reservation".into(),
            ))
        });
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let res = app.oneshot(book_request(EventId::new())).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_event_maps_to_not_found() {
        let user_id = UserId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::EntityNotFound("event not found".into())));
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let res = app.oneshot(book_request(EventId::new())).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn booking_without_token_is_unauthorized() {
        let user_id = UserId::new();
        let app = app(fixture_registry(
            MockReservationRepository::new(),
            Role::Participant,
            user_id,
        ));

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/reservations")
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::json!({ "eventId": EventId::new() }).to_string(),
            ))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn show_reservation_returns_joined_record() {
        let user_id = UserId::new();
        let event_id = EventId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(sample_reservation(user_id, event_id)));
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let req = Request::builder()
            .method("GET")
            .uri(format!("/api/v1/reservations/{}", ReservationId::new()))
            .header("Authorization", "Bearer test-token")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn show_unknown_reservation_maps_to_not_found() {
        let user_id = UserId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(AppError::EntityNotFound("reservation not found".into())));
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let req = Request::builder()
            .method("GET")
            .uri(format!("/api/v1/reservations/{}", ReservationId::new()))
            .header("Authorization", "Bearer test-token")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_update_requires_admin() {
        let user_id = UserId::new();
        // the repository must never be reached
        let app = app(fixture_registry(
            MockReservationRepository::new(),
            Role::Participant,
            user_id,
        ));

        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/api/v1/reservations/{}/status", ReservationId::new()))
            .header("Authorization", "Bearer test-token")
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::json!({ "status": "CONFIRMED" }).to_string(),
            ))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_can_update_status() {
        let user_id = UserId::new();
        let event_id = EventId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_update_status().returning(move |_| {
            let mut reservation = sample_reservation(user_id, event_id);
            reservation.status = ReservationStatus::Confirmed;
            Ok(reservation)
        });
        let app = app(fixture_registry(repo, Role::Admin, user_id));

        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/api/v1/reservations/{}/status", ReservationId::new()))
            .header("Authorization", "Bearer test-token")
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::json!({ "status": "CONFIRMED" }).to_string(),
            ))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listing_all_reservations_requires_admin() {
        let user_id = UserId::new();
        let app = app(fixture_registry(
            MockReservationRepository::new(),
            Role::Participant,
            user_id,
        ));

        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/reservations")
            .header("Authorization", "Bearer test-token")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn cancel_of_foreign_reservation_maps_to_not_found() {
        let user_id = UserId::new();
        let mut repo = MockReservationRepository::new();
        repo.expect_cancel_own()
            .returning(|_| Err(AppError::EntityNotFound("reservation not found".into())));
        let app = app(fixture_registry(repo, Role::Participant, user_id));

        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/api/v1/reservations/{}/cancel", ReservationId::new()))
            .header("Authorization", "Bearer test-token")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
