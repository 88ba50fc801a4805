use async_trait::async_trait;
use rail_core::{ReservationStore, ReservationUnitOfWork, StoreError, StoreResult};
use rail_shared::{Ticket, Train};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::ticket_repo::{TicketRow, TICKET_COLUMNS};
use crate::train_repo::{TrainRow, TRAIN_COLUMNS};

/// Reservations backed by a Postgres transaction per unit of work. Rows are
/// read `FOR UPDATE`, so concurrent bookings of one train queue on its row.
pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn begin(&self) -> StoreResult<Box<dyn ReservationUnitOfWork>> {
        let tx = self.pool.begin().await.map_err(StoreError::backend)?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Rolled back by sqlx when dropped uncommitted.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReservationUnitOfWork for PgUnitOfWork {
    async fn train_for_update(&mut self, id: Uuid) -> StoreResult<Option<Train>> {
        let row: Option<TrainRow> = sqlx::query_as(&format!(
            "SELECT {} FROM trains WHERE id = $1 FOR UPDATE",
            TRAIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Into::into))
    }

    async fn ticket_for_update(&mut self, id: Uuid) -> StoreResult<Option<Ticket>> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tickets WHERE id = $1 FOR UPDATE",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::backend)?;

        row.map(Ticket::try_from).transpose()
    }

    async fn save_seat_count(&mut self, train: &Train) -> StoreResult<()> {
        sqlx::query("UPDATE trains SET available_seats = $1 WHERE id = $2")
            .bind(train.available_seats)
            .bind(train.id)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn insert_ticket(&mut self, ticket: &Ticket) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets (id, user_id, train_id, passenger_name, seat_number, seat_count, price, booking_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.user_id)
        .bind(ticket.train_id)
        .bind(&ticket.passenger_name)
        .bind(ticket.seat_number)
        .bind(ticket.seat_count)
        .bind(ticket.price)
        .bind(ticket.booking_date)
        .bind(ticket.status.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn save_ticket_status(&mut self, ticket: &Ticket) -> StoreResult<()> {
        sqlx::query("UPDATE tickets SET status = $1 WHERE id = $2")
            .bind(ticket.status.as_str())
            .bind(ticket.id)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await.map_err(StoreError::backend)
    }
}
