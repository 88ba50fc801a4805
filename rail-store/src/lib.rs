pub mod app_config;
pub mod database;
pub mod memory;
pub mod redis_repo;
pub mod reservation;
pub mod seed;
pub mod ticket_repo;
pub mod train_repo;

use std::sync::Arc;

use rail_core::{ReservationStore, StoreError, TicketRepository, TrainRepository};
use tracing::{info, warn};

pub use database::DbClient;
pub use memory::MemoryStore;
pub use redis_repo::RedisClient;
pub use reservation::PgReservationStore;
pub use ticket_repo::PgTicketRepository;
pub use train_repo::PgTrainRepository;

/// The storage seams the services are built on, all backed by one store.
#[derive(Clone)]
pub struct Repositories {
    pub trains: Arc<dyn TrainRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub reservations: Arc<dyn ReservationStore>,
}

impl Repositories {
    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            trains: Arc::new(store.clone()),
            tickets: Arc::new(store.clone()),
            reservations: Arc::new(store),
        }
    }

    pub fn postgres(db: &DbClient) -> Self {
        Self {
            trains: Arc::new(PgTrainRepository::new(db.pool.clone())),
            tickets: Arc::new(PgTicketRepository::new(db.pool.clone())),
            reservations: Arc::new(PgReservationStore::new(db.pool.clone())),
        }
    }

    /// Connects and migrates Postgres when a database url is configured,
    /// otherwise falls back to an empty in-memory store.
    pub async fn connect(config: &app_config::DatabaseConfig) -> Result<Self, StoreError> {
        match &config.url {
            Some(url) => {
                let db = DbClient::new(url, config).await.map_err(StoreError::backend)?;
                db.migrate().await.map_err(StoreError::backend)?;
                info!("Using Postgres storage");
                Ok(Self::postgres(&db))
            }
            None => {
                warn!("No database url configured; using in-memory storage");
                Ok(Self::in_memory(MemoryStore::new()))
            }
        }
    }
}
