use async_trait::async_trait;
use rail_shared::{Ticket, Train, TrainRequest};
use uuid::Uuid;

use crate::StoreResult;

/// Repository trait for the train catalog
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TrainRepository: Send + Sync {
    async fn insert(&self, train: &Train) -> StoreResult<()>;

    async fn find_all(&self) -> StoreResult<Vec<Train>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Train>>;

    /// Exact, case-sensitive match on both ends of the route.
    async fn find_by_route(&self, source: &str, destination: &str) -> StoreResult<Vec<Train>>;

    /// Rewrites the catalog attributes of a train and returns the stored
    /// record, or `None` when the id is unknown. Never writes the seat counter.
    async fn update_details(&self, id: Uuid, details: &TrainRequest) -> StoreResult<Option<Train>>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<u64>;
}

/// Read access to tickets outside of a reservation
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Ticket>>;

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Ticket>>;
}

/// Opens units of work for the seat-inventory read-modify-write sequences.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn ReservationUnitOfWork>>;
}

/// One atomic booking or cancellation.
///
/// Records read through `*_for_update` stay locked against other units of
/// work until this one commits or is dropped. Dropping without `commit`
/// discards every write made through it.
#[async_trait]
pub trait ReservationUnitOfWork: Send {
    async fn train_for_update(&mut self, id: Uuid) -> StoreResult<Option<Train>>;

    async fn ticket_for_update(&mut self, id: Uuid) -> StoreResult<Option<Ticket>>;

    /// Persists `available_seats` only.
    async fn save_seat_count(&mut self, train: &Train) -> StoreResult<()>;

    async fn insert_ticket(&mut self, ticket: &Ticket) -> StoreResult<()>;

    /// Persists `status` only.
    async fn save_ticket_status(&mut self, ticket: &Ticket) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_mock_find_by_route() {
        let mut mock = MockTrainRepository::new();
        mock.expect_find_by_route()
            .withf(|s, d| s == "Colombo" && d == "Kandy")
            .returning(|_, _| Ok(vec![]));

        let result = mock.find_by_route("Colombo", "Kandy").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_mock_find_by_user() {
        let mut mock = MockTicketRepository::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        mock.expect_find_by_user()
            .withf(|u| u == "user-1")
            .returning(move |u| {
                Ok(vec![Ticket::booked(u.to_string(), Uuid::new_v4(), "A".into(), 1, 1, 600.0, date)])
            });

        let tickets = mock.find_by_user("user-1").await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].user_id, "user-1");
    }
}
