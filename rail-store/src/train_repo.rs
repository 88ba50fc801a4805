use async_trait::async_trait;
use rail_core::{StoreError, StoreResult, TrainRepository};
use rail_shared::{Train, TrainRequest};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const TRAIN_COLUMNS: &str = "id, name, number, source, destination, departure_time, arrival_time, price, total_seats, available_seats";

#[derive(sqlx::FromRow)]
pub(crate) struct TrainRow {
    id: Uuid,
    name: String,
    number: String,
    source: String,
    destination: String,
    departure_time: String,
    arrival_time: String,
    price: f64,
    total_seats: i32,
    available_seats: i32,
}

impl From<TrainRow> for Train {
    fn from(r: TrainRow) -> Self {
        Train {
            id: r.id,
            name: r.name,
            number: r.number,
            source: r.source,
            destination: r.destination,
            departure_time: r.departure_time,
            arrival_time: r.arrival_time,
            price: r.price,
            total_seats: r.total_seats,
            available_seats: r.available_seats,
        }
    }
}

pub struct PgTrainRepository {
    pool: PgPool,
}

impl PgTrainRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainRepository for PgTrainRepository {
    async fn insert(&self, train: &Train) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO trains (id, name, number, source, destination, departure_time, arrival_time, price, total_seats, available_seats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(train.id)
        .bind(&train.name)
        .bind(&train.number)
        .bind(&train.source)
        .bind(&train.destination)
        .bind(&train.departure_time)
        .bind(&train.arrival_time)
        .bind(train.price)
        .bind(train.total_seats)
        .bind(train.available_seats)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Train>> {
        let rows: Vec<TrainRow> = sqlx::query_as(&format!("SELECT {} FROM trains", TRAIN_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Train>> {
        let row: Option<TrainRow> = sqlx::query_as(&format!("SELECT {} FROM trains WHERE id = $1", TRAIN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_route(&self, source: &str, destination: &str) -> StoreResult<Vec<Train>> {
        let rows: Vec<TrainRow> = sqlx::query_as(&format!(
            "SELECT {} FROM trains WHERE source = $1 AND destination = $2",
            TRAIN_COLUMNS
        ))
        .bind(source)
        .bind(destination)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_details(&self, id: Uuid, details: &TrainRequest) -> StoreResult<Option<Train>> {
        let row: Option<TrainRow> = sqlx::query_as(&format!(
            r#"
            UPDATE trains
            SET name = $1, number = $2, source = $3, destination = $4, departure_time = $5,
                arrival_time = $6, price = $7, total_seats = $8
            WHERE id = $9
            RETURNING {}
            "#,
            TRAIN_COLUMNS
        ))
        .bind(&details.name)
        .bind(&details.number)
        .bind(&details.source)
        .bind(&details.destination)
        .bind(&details.departure_time)
        .bind(&details.arrival_time)
        .bind(details.price)
        .bind(details.total_seats)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM trains WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trains")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(count.max(0) as u64)
    }
}
