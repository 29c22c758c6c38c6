use crate::database::{
    model::reservation::{EventAdmissionRow, OccupancyRow, ReservationRow, ReservationStateRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{EventId, ReservationId, UserId},
    reservation::{
        event::{CancelReservation, CreateReservation, UpdateReservationStatus},
        EventOccupancy, Reservation, ReservationStatus,
    },
};
use kernel::repository::reservation::ReservationRepository;
use shared::{
    config::AdmissionConfig,
    error::{AppError, AppResult},
};

const RESERVATION_COLUMNS: &str = r#"
    r.reservation_id,
    r.status,
    r.created_at,
    u.user_id,
    u.user_name,
    u.email,
    e.event_id,
    e.title,
    e.event_date,
    e.location,
    e.capacity,
    e.status AS event_status
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
    admission: AdmissionConfig,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // Lock the event row for the whole check-insert sequence. Two
        // admissions racing for the last seat serialize here, so the loser
        // sees the winner's row and fails the capacity check instead of
        // oversubscribing the event.
        let event_row = sqlx::query_as::<_, EventAdmissionRow>(
            r#"
                SELECT event_id, capacity, status
                FROM events
                WHERE event_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(event_row) = event_row else {
            return Err(AppError::EntityNotFound(format!(
                "event ({}) not found",
                event.event_id
            )));
        };

        if !event_row.status.is_bookable() {
            return Err(AppError::UnprocessableEntity(format!(
                "cannot reserve for event ({})",
                event.event_id
            )));
        }

        // The duplicate check runs before the capacity check on purpose: a
        // full event must not mask the more specific "already reserved"
        // answer. Canceled rows never block re-booking.
        let duplicate = sqlx::query_scalar::<_, ReservationId>(
            r#"
                SELECT reservation_id
                FROM reservations
                WHERE event_id = $1
                  AND user_id = $2
                  AND status IN ('PENDING', 'CONFIRMED')
                LIMIT 1
            "#,
        )
        .bind(event.event_id)
        .bind(event.requested_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if duplicate.is_some() {
            return Err(AppError::ResourceConflict(format!(
                "user already has an active reservation for event ({})",
                event.event_id
            )));
        }

        let active = active_count(&mut tx, event.event_id).await?;
        if active >= i64::from(event_row.capacity) {
            return Err(AppError::UnprocessableEntity(format!(
                "event ({}) is full",
                event.event_id
            )));
        }

        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations (reservation_id, user_id, event_id, status)
                VALUES ($1, $2, $3, 'PENDING')
            "#,
        )
        .bind(reservation_id)
        .bind(event.requested_by)
        .bind(event.event_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }

        let row = fetch_joined_row(&mut tx, reservation_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into())
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, ReservationStateRow>(
            r#"
                SELECT reservation_id, user_id, event_id, status
                FROM reservations
                WHERE reservation_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(current) = current else {
            return Err(AppError::EntityNotFound(format!(
                "reservation ({}) not found",
                event.reservation_id
            )));
        };

        if !current.status.can_transition_to(event.status) {
            return Err(AppError::UnprocessableEntity(format!(
                "reservation ({}) is canceled and cannot change status",
                event.reservation_id
            )));
        }

        // Confirmation does not re-check capacity by default: the gate runs
        // at admission time only, and an admin confirm is treated as an
        // override. The strict knob re-validates under the event lock,
        // which matters once capacity was lowered after admission.
        if event.status == ReservationStatus::Confirmed
            && self.admission.strict_capacity_on_confirm
        {
            let capacity = sqlx::query_scalar::<_, i32>(
                r#"
                    SELECT capacity
                    FROM events
                    WHERE event_id = $1
                    FOR UPDATE
                "#,
            )
            .bind(current.event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let other_active = active_count_excluding(
                &mut tx,
                current.event_id,
                current.reservation_id,
            )
            .await?;
            if other_active + 1 > i64::from(capacity) {
                return Err(AppError::UnprocessableEntity(format!(
                    "event ({}) is full",
                    current.event_id
                )));
            }
        }

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = $2, updated_at = NOW()
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.status)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been updated".into(),
            ));
        }

        let row = fetch_joined_row(&mut tx, event.reservation_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into())
    }

    async fn cancel_own(&self, event: CancelReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // One conditional update covers both "no such reservation" and
        // "owned by someone else", so a caller cannot probe for foreign
        // reservation ids.
        let canceled = sqlx::query_scalar::<_, ReservationId>(
            r#"
                UPDATE reservations
                SET status = 'CANCELED', updated_at = NOW()
                WHERE reservation_id = $1 AND user_id = $2
                RETURNING reservation_id
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.requested_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if canceled.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "reservation ({}) not found",
                event.reservation_id
            )));
        }

        let row = fetch_joined_row(&mut tx, event.reservation_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into())
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations AS r
                INNER JOIN users AS u ON r.user_id = u.user_id
                INNER JOIN events AS e ON r.event_id = e.event_id
                ORDER BY r.created_at ASC
            "#
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations AS r
                INNER JOIN users AS u ON r.user_id = u.user_id
                INNER JOIN events AS e ON r.event_id = e.event_id
                WHERE r.reservation_id = $1
            "#
        ))
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(AppError::EntityNotFound(format!(
                "reservation ({reservation_id}) not found"
            ))),
        }
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations AS r
                INNER JOIN users AS u ON r.user_id = u.user_id
                INNER JOIN events AS e ON r.event_id = e.event_id
                WHERE r.user_id = $1
                ORDER BY r.created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn occupancy(&self, event_id: EventId) -> AppResult<EventOccupancy> {
        let row = sqlx::query_as::<_, OccupancyRow>(
            r#"
                SELECT
                    e.event_id,
                    e.capacity,
                    COUNT(r.reservation_id) FILTER (
                        WHERE r.status IN ('PENDING', 'CONFIRMED')
                    ) AS active
                FROM events AS e
                LEFT JOIN reservations AS r ON r.event_id = e.event_id
                WHERE e.event_id = $1
                GROUP BY e.event_id, e.capacity
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(AppError::EntityNotFound(format!(
                "event ({event_id}) not found"
            ))),
        }
    }
}

async fn active_count(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event_id: EventId,
) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
            SELECT COUNT(*)
            FROM reservations
            WHERE event_id = $1
              AND status IN ('PENDING', 'CONFIRMED')
        "#,
    )
    .bind(event_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)
}

async fn active_count_excluding(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event_id: EventId,
    reservation_id: ReservationId,
) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
            SELECT COUNT(*)
            FROM reservations
            WHERE event_id = $1
              AND reservation_id <> $2
              AND status IN ('PENDING', 'CONFIRMED')
        "#,
    )
    .bind(event_id)
    .bind(reservation_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)
}

async fn fetch_joined_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    reservation_id: ReservationId,
) -> AppResult<ReservationRow> {
    sqlx::query_as::<_, ReservationRow>(&format!(
        r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations AS r
            INNER JOIN users AS u ON r.user_id = u.user_id
            INNER JOIN events AS e ON r.event_id = e.event_id
            WHERE r.reservation_id = $1
        "#
    ))
    .bind(reservation_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kernel::model::event::EventStatus;
    use std::sync::Arc;

    async fn fixture_user(pool: &sqlx::PgPool, name: &str) -> UserId {
        let user_id = UserId::new();
        sqlx::query(
            "INSERT INTO users (user_id, user_name, email, role) VALUES ($1, $2, $3, 'PARTICIPANT')",
        )
        .bind(user_id)
        .bind(name)
        .bind(format!("{user_id}@example.com"))
        .execute(pool)
        .await
        .unwrap();
        user_id
    }

    async fn fixture_event(pool: &sqlx::PgPool, capacity: i32, status: EventStatus) -> EventId {
        let owner = fixture_user(pool, "Owner").await;
        let event_id = EventId::new();
        sqlx::query(
            r#"
                INSERT INTO events
                (event_id, title, description, event_date, location, capacity, status, created_by)
                VALUES ($1, 'Test Event', NULL, $2, NULL, $3, $4, $5)
            "#,
        )
        .bind(event_id)
        .bind(Utc::now())
        .bind(capacity)
        .bind(status)
        .bind(owner)
        .execute(pool)
        .await
        .unwrap();
        event_id
    }

    fn repo(pool: sqlx::PgPool) -> ReservationRepositoryImpl {
        ReservationRepositoryImpl::new(ConnectionPool::new(pool), AdmissionConfig::default())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn admission_creates_pending_reservation(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 2, EventStatus::Published).await;
        let user_id = fixture_user(&pool, "Alice").await;
        let repo = repo(pool);

        let reservation = repo
            .create(CreateReservation::new(event_id, user_id))
            .await?;
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.user.user_id, user_id);
        assert_eq!(reservation.event.event_id, event_id);

        let occupancy = repo.occupancy(event_id).await?;
        assert_eq!(occupancy.active, 1);
        assert_eq!(occupancy.capacity, 2);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn admission_rejects_unknown_event(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool, "Alice").await;
        let repo = repo(pool);

        let res = repo
            .create(CreateReservation::new(EventId::new(), user_id))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn draft_and_canceled_events_are_not_bookable(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let draft = fixture_event(&pool, 10, EventStatus::Draft).await;
        let canceled = fixture_event(&pool, 10, EventStatus::Canceled).await;
        let user_id = fixture_user(&pool, "Alice").await;
        let repo = repo(pool);

        for event_id in [draft, canceled] {
            let res = repo.create(CreateReservation::new(event_id, user_id)).await;
            assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
        }

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn duplicate_active_reservation_conflicts(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 10, EventStatus::Published).await;
        let user_id = fixture_user(&pool, "Alice").await;
        let repo = repo(pool);

        repo.create(CreateReservation::new(event_id, user_id))
            .await?;

        // plenty of capacity left, the duplicate still wins over "full"
        let res = repo.create(CreateReservation::new(event_id, user_id)).await;
        assert!(matches!(res, Err(AppError::ResourceConflict(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn canceled_reservation_does_not_block_rebooking(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 1, EventStatus::Published).await;
        let user_id = fixture_user(&pool, "Alice").await;
        let repo = repo(pool);

        let first = repo
            .create(CreateReservation::new(event_id, user_id))
            .await?;
        repo.cancel_own(CancelReservation::new(first.reservation_id, user_id))
            .await?;

        let second = repo
            .create(CreateReservation::new(event_id, user_id))
            .await?;
        assert_ne!(second.reservation_id, first.reservation_id);
        assert_eq!(second.status, ReservationStatus::Pending);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn capacity_holds_under_parallel_admissions(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 2, EventStatus::Published).await;
        let mut users = Vec::new();
        for i in 0..8 {
            users.push(fixture_user(&pool, &format!("User {i}")).await);
        }
        let repo = Arc::new(repo(pool.clone()));

        let mut handles = Vec::new();
        for user_id in users {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.create(CreateReservation::new(event_id, user_id)).await
            }));
        }

        let mut admitted = 0;
        let mut rejected_full = 0;
        for handle in handles {
            match handle.await? {
                Ok(_) => admitted += 1,
                Err(AppError::UnprocessableEntity(_)) => rejected_full += 1,
                Err(e) => return Err(e.into()),
            }
        }
        assert_eq!(admitted, 2);
        assert_eq!(rejected_full, 6);

        let occupancy = repo.occupancy(event_id).await?;
        assert_eq!(occupancy.active, 2);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn find_by_id_returns_joined_reservation(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 2, EventStatus::Published).await;
        let user_id = fixture_user(&pool, "Alice").await;
        let repo = repo(pool);

        let created = repo
            .create(CreateReservation::new(event_id, user_id))
            .await?;

        let found = repo.find_by_id(created.reservation_id).await?;
        assert_eq!(found.reservation_id, created.reservation_id);
        assert_eq!(found.user.user_id, user_id);
        assert_eq!(found.event.event_id, event_id);

        let res = repo.find_by_id(ReservationId::new()).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn update_status_of_unknown_reservation_is_not_found(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let admin = fixture_user(&pool, "Admin").await;
        let repo = repo(pool);

        let res = repo
            .update_status(UpdateReservationStatus::new(
                ReservationId::new(),
                ReservationStatus::Confirmed,
                admin,
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn canceled_reservation_cannot_change_status(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 1, EventStatus::Published).await;
        let user_id = fixture_user(&pool, "Alice").await;
        let admin = fixture_user(&pool, "Admin").await;
        let repo = repo(pool);

        let reservation = repo
            .create(CreateReservation::new(event_id, user_id))
            .await?;
        repo.cancel_own(CancelReservation::new(reservation.reservation_id, user_id))
            .await?;

        let res = repo
            .update_status(UpdateReservationStatus::new(
                reservation.reservation_id,
                ReservationStatus::Confirmed,
                admin,
            ))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancel_own_by_non_owner_leaves_row_untouched(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 2, EventStatus::Published).await;
        let owner = fixture_user(&pool, "Alice").await;
        let stranger = fixture_user(&pool, "Mallory").await;
        let repo = repo(pool);

        let reservation = repo.create(CreateReservation::new(event_id, owner)).await?;

        let res = repo
            .cancel_own(CancelReservation::new(reservation.reservation_id, stranger))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        let mine = repo.find_by_user_id(owner).await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, ReservationStatus::Pending);

        Ok(())
    }

    // The full lifecycle: book to capacity, fail, confirm, cancel, re-book.
    #[sqlx::test(migrations = "../migrations")]
    async fn seat_freed_by_cancellation_can_be_rebooked(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 1, EventStatus::Published).await;
        let user_a = fixture_user(&pool, "Alice").await;
        let user_b = fixture_user(&pool, "Bob").await;
        let admin = fixture_user(&pool, "Admin").await;
        let repo = repo(pool);

        let reservation_a = repo.create(CreateReservation::new(event_id, user_a)).await?;
        assert_eq!(reservation_a.status, ReservationStatus::Pending);

        let res = repo.create(CreateReservation::new(event_id, user_b)).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        let confirmed = repo
            .update_status(UpdateReservationStatus::new(
                reservation_a.reservation_id,
                ReservationStatus::Confirmed,
                admin,
            ))
            .await?;
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);

        repo.cancel_own(CancelReservation::new(reservation_a.reservation_id, user_a))
            .await?;

        let reservation_b = repo.create(CreateReservation::new(event_id, user_b)).await?;
        assert_eq!(reservation_b.status, ReservationStatus::Pending);

        let occupancy = repo.occupancy(event_id).await?;
        assert_eq!(occupancy.active, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn strict_confirm_rejects_over_capacity(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let event_id = fixture_event(&pool, 2, EventStatus::Published).await;
        let user_a = fixture_user(&pool, "Alice").await;
        let user_b = fixture_user(&pool, "Bob").await;
        let admin = fixture_user(&pool, "Admin").await;

        let lax = ReservationRepositoryImpl::new(
            ConnectionPool::new(pool.clone()),
            AdmissionConfig {
                strict_capacity_on_confirm: false,
            },
        );
        let strict = ReservationRepositoryImpl::new(
            ConnectionPool::new(pool.clone()),
            AdmissionConfig {
                strict_capacity_on_confirm: true,
            },
        );

        let reservation_a = lax.create(CreateReservation::new(event_id, user_a)).await?;
        let reservation_b = lax.create(CreateReservation::new(event_id, user_b)).await?;

        // capacity drops below the admitted count after the fact
        sqlx::query("UPDATE events SET capacity = 1 WHERE event_id = $1")
            .bind(event_id)
            .execute(&pool)
            .await?;

        let res = strict
            .update_status(UpdateReservationStatus::new(
                reservation_a.reservation_id,
                ReservationStatus::Confirmed,
                admin,
            ))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        // no re-check happens unless the knob is set
        let confirmed = lax
            .update_status(UpdateReservationStatus::new(
                reservation_b.reservation_id,
                ReservationStatus::Confirmed,
                admin,
            ))
            .await?;
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);

        Ok(())
    }
}
