use std::sync::Arc;

use rail_core::{StoreError, TrainRepository};
use rail_shared::{Train, TrainRequest};
use tracing::info;
use uuid::Uuid;

/// Owns train records: schedule, route, price and capacity.
pub struct TrainCatalog {
    trains: Arc<dyn TrainRepository>,
}

impl TrainCatalog {
    pub fn new(trains: Arc<dyn TrainRepository>) -> Self {
        Self { trains }
    }

    pub async fn add_train(&self, request: TrainRequest) -> CatalogResult<Train> {
        check_capacity(&request)?;
        let train = Train::new(request);
        self.trains.insert(&train).await?;

        info!("Train added: {} #{} ({} -> {})", train.id, train.number, train.source, train.destination);
        Ok(train)
    }

    pub async fn all_trains(&self) -> CatalogResult<Vec<Train>> {
        Ok(self.trains.find_all().await?)
    }

    /// Absence is a normal outcome here, not an error.
    pub async fn train_by_id(&self, id: Uuid) -> CatalogResult<Option<Train>> {
        Ok(self.trains.find_by_id(id).await?)
    }

    pub async fn trains_by_route(&self, source: &str, destination: &str) -> CatalogResult<Vec<Train>> {
        Ok(self.trains.find_by_route(source, destination).await?)
    }

    /// Overwrites every catalog attribute. The seat counter is not
    /// recomputed when `total_seats` changes.
    pub async fn update_train(&self, id: Uuid, request: TrainRequest) -> CatalogResult<Train> {
        check_capacity(&request)?;
        let train = self
            .trains
            .update_details(id, &request)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        info!("Train updated: {} #{}", train.id, train.number);
        Ok(train)
    }

    /// Tickets that reference the train are left in place.
    pub async fn delete_train(&self, id: Uuid) -> CatalogResult<()> {
        if !self.trains.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        info!("Train deleted: {}", id);
        Ok(())
    }
}

fn check_capacity(request: &TrainRequest) -> CatalogResult<()> {
    if request.total_seats < 1 {
        return Err(CatalogError::InvalidCapacity(request.total_seats));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Train not found with id: {0}")]
    NotFound(Uuid),

    #[error("Total seats must be at least 1, got {0}")]
    InvalidCapacity(i32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
