use async_trait::async_trait;
use chrono::NaiveDate;
use rail_core::{StoreError, StoreResult, TicketRepository};
use rail_shared::{Ticket, TicketStatus};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const TICKET_COLUMNS: &str = "id, user_id, train_id, passenger_name, seat_number, seat_count, price, booking_date, status";

#[derive(sqlx::FromRow)]
pub(crate) struct TicketRow {
    id: Uuid,
    user_id: String,
    train_id: Uuid,
    passenger_name: String,
    seat_number: i32,
    seat_count: i32,
    price: f64,
    booking_date: NaiveDate,
    status: String,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = StoreError;

    fn try_from(r: TicketRow) -> Result<Self, Self::Error> {
        let status: TicketStatus = r.status.parse().map_err(StoreError::Malformed)?;

        Ok(Ticket {
            id: r.id,
            user_id: r.user_id,
            train_id: r.train_id,
            passenger_name: r.passenger_name,
            seat_number: r.seat_number,
            seat_count: r.seat_count,
            price: r.price,
            booking_date: r.booking_date,
            status,
        })
    }
}

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        let row: Option<TicketRow> = sqlx::query_as(&format!("SELECT {} FROM tickets WHERE id = $1", TICKET_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(Ticket::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!("SELECT {} FROM tickets WHERE user_id = $1", TICKET_COLUMNS))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        rows.into_iter().map(Ticket::try_from).collect()
    }
}
