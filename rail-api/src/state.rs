use std::sync::Arc;

use rail_booking::{BookingEngine, BookingPolicy};
use rail_catalog::TrainCatalog;
use rail_store::app_config::{BusinessRules, RateLimitConfig};
use rail_store::{RedisClient, Repositories};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: Arc<str>,
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self { secret: Arc::from(secret) }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<TrainCatalog>,
    pub booking: Arc<BookingEngine>,
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(repos: Repositories, rules: &BusinessRules, auth: AuthConfig) -> Self {
        let policy = BookingPolicy {
            restore_booked_seat_count: rules.restore_booked_seat_count,
            reject_repeat_cancellation: rules.reject_repeat_cancellation,
        };

        Self {
            catalog: Arc::new(TrainCatalog::new(repos.trains)),
            booking: Arc::new(BookingEngine::new(repos.reservations, repos.tickets, policy)),
            redis: None,
            rate_limit: RateLimitConfig::default(),
            auth,
        }
    }

    pub fn with_rate_limit(mut self, redis: Arc<RedisClient>, config: RateLimitConfig) -> Self {
        self.redis = Some(redis);
        self.rate_limit = config;
        self
    }
}
