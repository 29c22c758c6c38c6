use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::redis::RedisClient;
use adapter::repository::{
    auth::AuthRepositoryImpl, category::CategoryRepositoryImpl, event::EventRepositoryImpl,
    health::HealthCheckRepositoryImpl, reservation::ReservationRepositoryImpl,
    user::UserRepositoryImpl,
};
use kernel::repository::auth::AuthRepository;
use kernel::repository::category::CategoryRepository;
use kernel::repository::event::EventRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    category_repository: Arc<dyn CategoryRepository>,
    event_repository: Arc<dyn EventRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: &AppConfig,
    ) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let category_repository = Arc::new(CategoryRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(
            pool.clone(),
            app_config.admission,
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(redis_client));
        Self {
            health_check_repository,
            category_repository,
            event_repository,
            reservation_repository,
            user_repository,
            auth_repository,
        }
    }

    /// Assembles a registry from pre-built repositories. Handler tests use
    /// this to swap in mocks.
    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        category_repository: Arc<dyn CategoryRepository>,
        event_repository: Arc<dyn EventRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        user_repository: Arc<dyn UserRepository>,
        auth_repository: Arc<dyn AuthRepository>,
    ) -> Self {
        Self {
            health_check_repository,
            category_repository,
            event_repository,
            reservation_repository,
            user_repository,
            auth_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn category_repository(&self) -> Arc<dyn CategoryRepository> {
        self.category_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }
}
