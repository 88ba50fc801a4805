use std::sync::Arc;

use chrono::Utc;
use rail_catalog::{InventoryError, SeatInventory};
use rail_core::{ReservationStore, StoreError, TicketRepository};
use rail_shared::pii::Masked;
use rail_shared::{Ticket, TicketBookingRequest};
use tracing::{debug, info};
use uuid::Uuid;

use crate::policy::BookingPolicy;

/// Books and cancels tickets against train seat inventory.
///
/// Each booking or cancellation runs in a single reservation unit of work:
/// the train's seat counter and the ticket are written together or not at all.
pub struct BookingEngine {
    reservations: Arc<dyn ReservationStore>,
    tickets: Arc<dyn TicketRepository>,
    policy: BookingPolicy,
}

impl BookingEngine {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        tickets: Arc<dyn TicketRepository>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            reservations,
            tickets,
            policy,
        }
    }

    /// Reserve `number_of_seats` on a train and issue one ticket for them.
    pub async fn book_ticket(&self, user_id: &str, request: TicketBookingRequest) -> BookingResult<Ticket> {
        if request.number_of_seats < 1 {
            return Err(BookingError::InvalidSeatCount(request.number_of_seats));
        }

        let mut uow = self.reservations.begin().await?;

        let mut train = uow
            .train_for_update(request.train_id)
            .await?
            .ok_or(BookingError::TrainNotFound(request.train_id))?;

        let seat_number = train.reserve_seats(request.number_of_seats)?;
        uow.save_seat_count(&train).await?;

        let ticket = Ticket::booked(
            user_id.to_string(),
            train.id,
            request.passenger_name,
            seat_number,
            request.number_of_seats,
            train.price * f64::from(request.number_of_seats),
            Utc::now().date_naive(),
        );
        uow.insert_ticket(&ticket).await?;

        uow.commit().await?;

        info!(
            "Ticket booked: {} on train {} seat {} for {} ({} seat(s))",
            ticket.id,
            train.number,
            ticket.seat_number,
            Masked(&ticket.passenger_name),
            ticket.seat_count
        );
        debug!("Train {} utilization now {:.2}", train.id, train.utilization());

        Ok(ticket)
    }

    pub async fn tickets_for_user(&self, user_id: &str) -> BookingResult<Vec<Ticket>> {
        Ok(self.tickets.find_by_user(user_id).await?)
    }

    /// Cancel a ticket and give its seat back to the train.
    pub async fn cancel_ticket(&self, ticket_id: Uuid) -> BookingResult<Ticket> {
        let mut uow = self.reservations.begin().await?;

        let mut ticket = uow
            .ticket_for_update(ticket_id)
            .await?
            .ok_or(BookingError::TicketNotFound(ticket_id))?;

        if ticket.is_cancelled() && self.policy.reject_repeat_cancellation {
            return Err(BookingError::AlreadyCancelled(ticket_id));
        }

        let mut train = uow
            .train_for_update(ticket.train_id)
            .await?
            .ok_or(BookingError::TrainNotFound(ticket.train_id))?;

        let restored = self.policy.seats_to_restore(&ticket);
        train.release_seats(restored);
        uow.save_seat_count(&train).await?;

        ticket.cancel();
        uow.save_ticket_status(&ticket).await?;

        uow.commit().await?;

        info!(
            "Ticket cancelled: {} on train {} ({} seat(s) restored, {} available)",
            ticket.id, train.number, restored, train.available_seats
        );

        Ok(ticket)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Train not found with id: {0}")]
    TrainNotFound(Uuid),

    #[error("Ticket not found with id: {0}")]
    TicketNotFound(Uuid),

    #[error("Not enough seats available: requested {requested}, available {available}")]
    InsufficientCapacity {
        requested: i32,
        available: i32,
    },

    #[error("Train seat counter is out of range: total {total}, available {available}")]
    InconsistentInventory {
        total: i32,
        available: i32,
    },

    #[error("Number of seats must be at least 1, got {0}")]
    InvalidSeatCount(i32),

    #[error("Ticket {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InventoryError> for BookingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidQuantity(quantity) => BookingError::InvalidSeatCount(quantity),
            InventoryError::InsufficientInventory { requested, available } => {
                BookingError::InsufficientCapacity { requested, available }
            }
            InventoryError::InconsistentCounter { total, available } => {
                BookingError::InconsistentInventory { total, available }
            }
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rail_core::TrainRepository;
    use rail_shared::{TicketStatus, Train, TrainRequest};
    use rail_store::MemoryStore;

    fn ella_odyssey() -> Train {
        Train::new(TrainRequest {
            name: "Ella Odyssey".to_string(),
            number: "1001".to_string(),
            source: "Colombo".to_string(),
            destination: "Ella".to_string(),
            departure_time: "05:00".to_string(),
            arrival_time: "15:00".to_string(),
            price: 4000.0,
            total_seats: 100,
        })
    }

    async fn setup(policy: BookingPolicy) -> (MemoryStore, BookingEngine, Train) {
        let store = MemoryStore::new();
        let train = ella_odyssey();
        store.insert(&train).await.unwrap();

        let engine = BookingEngine::new(Arc::new(store.clone()), Arc::new(store.clone()), policy);
        (store, engine, train)
    }

    fn request(train_id: Uuid, seats: i32) -> TicketBookingRequest {
        TicketBookingRequest {
            train_id,
            passenger_name: "A".to_string(),
            number_of_seats: seats,
        }
    }

    async fn available(store: &MemoryStore, id: Uuid) -> i32 {
        TrainRepository::find_by_id(store, id).await.unwrap().unwrap().available_seats
    }

    #[tokio::test]
    async fn test_book_and_cancel_single_seat() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        let ticket = engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();
        assert_eq!(ticket.seat_number, 1);
        assert_eq!(ticket.price, 4000.0);
        assert_eq!(ticket.status, TicketStatus::Booked);
        assert_eq!(ticket.booking_date, Utc::now().date_naive());
        assert_eq!(available(&store, train.id).await, 99);

        let cancelled = engine.cancel_ticket(ticket.id).await.unwrap();
        assert_eq!(cancelled.status, TicketStatus::Cancelled);
        assert_eq!(available(&store, train.id).await, 100);

        let tickets = engine.tickets_for_user("user-1").await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].status, TicketStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_multi_seat_booking_prices_and_numbers_once() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();
        let ticket = engine.book_ticket("user-1", request(train.id, 3)).await.unwrap();

        assert_eq!(ticket.seat_number, 4);
        assert_eq!(ticket.seat_count, 3);
        assert_eq!(ticket.price, 12000.0);
        assert_eq!(available(&store, train.id).await, 96);
    }

    #[tokio::test]
    async fn test_insufficient_capacity_leaves_inventory_unchanged() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        let err = engine.book_ticket("user-1", request(train.id, 101)).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::InsufficientCapacity { requested: 101, available: 100 }
        ));
        assert_eq!(available(&store, train.id).await, 100);
        assert!(engine.tickets_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_capacity_fails_without_booking() {
        let store = MemoryStore::new();
        let mut train = ella_odyssey();
        train.total_seats = i32::MIN;
        store.insert(&train).await.unwrap();

        let engine = BookingEngine::new(Arc::new(store.clone()), Arc::new(store.clone()), BookingPolicy::default());
        let err = engine.book_ticket("user-1", request(train.id, 1)).await.unwrap_err();

        assert!(matches!(err, BookingError::InconsistentInventory { total: i32::MIN, available: 100 }));
        assert_eq!(available(&store, train.id).await, 100);
        assert!(engine.tickets_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_train_is_not_found() {
        let (_store, engine, _train) = setup(BookingPolicy::default()).await;

        let missing = Uuid::new_v4();
        let err = engine.book_ticket("user-1", request(missing, 1)).await.unwrap_err();
        assert!(matches!(err, BookingError::TrainNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_non_positive_seat_count_is_rejected() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        let err = engine.book_ticket("user-1", request(train.id, 0)).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidSeatCount(0)));
        assert_eq!(available(&store, train.id).await, 100);
    }

    #[tokio::test]
    async fn test_cancel_restores_one_seat_regardless_of_count() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        let ticket = engine.book_ticket("user-1", request(train.id, 4)).await.unwrap();
        assert_eq!(available(&store, train.id).await, 96);

        engine.cancel_ticket(ticket.id).await.unwrap();
        assert_eq!(available(&store, train.id).await, 97);
    }

    #[tokio::test]
    async fn test_restore_booked_seat_count_policy() {
        let policy = BookingPolicy { restore_booked_seat_count: true, ..Default::default() };
        let (store, engine, train) = setup(policy).await;

        let ticket = engine.book_ticket("user-1", request(train.id, 4)).await.unwrap();
        engine.cancel_ticket(ticket.id).await.unwrap();
        assert_eq!(available(&store, train.id).await, 100);
    }

    #[tokio::test]
    async fn test_repeat_cancel_increments_again_by_default() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        let ticket = engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();
        engine.cancel_ticket(ticket.id).await.unwrap();
        let again = engine.cancel_ticket(ticket.id).await.unwrap();

        assert_eq!(again.status, TicketStatus::Cancelled);
        assert_eq!(available(&store, train.id).await, 101);
    }

    #[tokio::test]
    async fn test_repeat_cancel_rejected_by_policy() {
        let policy = BookingPolicy { reject_repeat_cancellation: true, ..Default::default() };
        let (store, engine, train) = setup(policy).await;

        let ticket = engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();
        engine.cancel_ticket(ticket.id).await.unwrap();

        let err = engine.cancel_ticket(ticket.id).await.unwrap_err();
        assert!(matches!(err, BookingError::AlreadyCancelled(id) if id == ticket.id));
        assert_eq!(available(&store, train.id).await, 100);
    }

    #[tokio::test]
    async fn test_cancel_unknown_ticket_is_not_found() {
        let (_store, engine, _train) = setup(BookingPolicy::default()).await;

        let err = engine.cancel_ticket(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, BookingError::TicketNotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_after_train_deleted_is_not_found() {
        let (store, engine, train) = setup(BookingPolicy::default()).await;

        let ticket = engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();
        assert!(store.delete(train.id).await.unwrap());

        let err = engine.cancel_ticket(ticket.id).await.unwrap_err();
        assert!(matches!(err, BookingError::TrainNotFound(id) if id == train.id));

        let tickets = engine.tickets_for_user("user-1").await.unwrap();
        assert_eq!(tickets[0].status, TicketStatus::Booked);
    }

    #[tokio::test]
    async fn test_tickets_are_listed_per_user() {
        let (_store, engine, train) = setup(BookingPolicy::default()).await;

        engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();
        engine.book_ticket("user-2", request(train.id, 1)).await.unwrap();
        engine.book_ticket("user-1", request(train.id, 1)).await.unwrap();

        assert_eq!(engine.tickets_for_user("user-1").await.unwrap().len(), 2);
        assert_eq!(engine.tickets_for_user("user-2").await.unwrap().len(), 1);
        assert!(engine.tickets_for_user("user-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_bookings_never_oversell() {
        let store = MemoryStore::new();
        let mut train = ella_odyssey();
        train.total_seats = 10;
        train.available_seats = 10;
        store.insert(&train).await.unwrap();

        let engine = Arc::new(BookingEngine::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            BookingPolicy::default(),
        ));

        let mut handles = Vec::new();
        for i in 0..25 {
            let engine = engine.clone();
            let train_id = train.id;
            handles.push(tokio::spawn(async move {
                engine.book_ticket(&format!("user-{}", i), request(train_id, 1)).await
            }));
        }

        let mut seats = Vec::new();
        for handle in handles {
            if let Ok(ticket) = handle.await.unwrap() {
                seats.push(ticket.seat_number);
            }
        }

        seats.sort_unstable();
        assert_eq!(seats, (1..=10).collect::<Vec<_>>());
        assert_eq!(available(&store, train.id).await, 0);
    }
}
