use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::redis::RedisClient;
use adapter::repository::booking::BookingRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::room::RoomRepositoryImpl;
use adapter::repository::session::SessionStoreImpl;
use adapter::user_service::UserProfileServiceImpl;
use kernel::repository::booking::BookingRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::room::RoomRepository;
use kernel::repository::session::SessionStore;
use kernel::repository::user_profile::UserProfileService;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    room_repository: Arc<dyn RoomRepository>,
    session_store: Arc<dyn SessionStore>,
    user_profile_service: Arc<dyn UserProfileService>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, kv: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let room_repository = Arc::new(RoomRepositoryImpl::new(pool.clone()));
        let session_store = Arc::new(SessionStoreImpl::new(
            kv.clone(),
            app_config.session.guest_state_ttl,
        ));
        let user_profile_service = Arc::new(UserProfileServiceImpl::new(&app_config.user_service));
        Self {
            health_check_repository,
            booking_repository,
            room_repository,
            session_store,
            user_profile_service,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room_repository.clone()
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        self.session_store.clone()
    }

    pub fn user_profile_service(&self) -> Arc<dyn UserProfileService> {
        self.user_profile_service.clone()
    }
}
