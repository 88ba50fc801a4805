use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rail_core::{
    ReservationStore, ReservationUnitOfWork, StoreResult, TicketRepository, TrainRepository,
};
use rail_shared::{Ticket, Train, TrainRequest};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    trains: HashMap<Uuid, Train>,
    tickets: HashMap<Uuid, Ticket>,
}

/// In-process store for running without a database.
///
/// A reservation unit of work holds the store lock for its whole lifetime and
/// stages its writes separately, so concurrent bookings are fully serialized
/// and an uncommitted unit of work leaves no trace.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrainRepository for MemoryStore {
    async fn insert(&self, train: &Train) -> StoreResult<()> {
        self.tables.lock().await.trains.insert(train.id, train.clone());
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Train>> {
        Ok(self.tables.lock().await.trains.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Train>> {
        Ok(self.tables.lock().await.trains.get(&id).cloned())
    }

    async fn find_by_route(&self, source: &str, destination: &str) -> StoreResult<Vec<Train>> {
        Ok(self
            .tables
            .lock()
            .await
            .trains
            .values()
            .filter(|t| t.serves(source, destination))
            .cloned()
            .collect())
    }

    async fn update_details(&self, id: Uuid, details: &TrainRequest) -> StoreResult<Option<Train>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.trains.get_mut(&id).map(|train| {
            train.apply(details);
            train.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.lock().await.trains.remove(&id).is_some())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.tables.lock().await.trains.len() as u64)
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        Ok(self.tables.lock().await.tickets.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Ticket>> {
        Ok(self
            .tables
            .lock()
            .await
            .tickets
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn ReservationUnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            staged: Tables::default(),
        }))
    }
}

/// Holds the store lock; `staged` carries only the rows written through this
/// unit of work and shadows the committed tables until `commit`.
struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

impl MemoryUnitOfWork {
    fn staged_train(&mut self, id: Uuid) -> Option<&mut Train> {
        if !self.staged.trains.contains_key(&id) {
            let committed = self.guard.trains.get(&id)?.clone();
            self.staged.trains.insert(id, committed);
        }
        self.staged.trains.get_mut(&id)
    }

    fn staged_ticket(&mut self, id: Uuid) -> Option<&mut Ticket> {
        if !self.staged.tickets.contains_key(&id) {
            let committed = self.guard.tickets.get(&id)?.clone();
            self.staged.tickets.insert(id, committed);
        }
        self.staged.tickets.get_mut(&id)
    }
}

#[async_trait]
impl ReservationUnitOfWork for MemoryUnitOfWork {
    async fn train_for_update(&mut self, id: Uuid) -> StoreResult<Option<Train>> {
        Ok(self
            .staged
            .trains
            .get(&id)
            .or_else(|| self.guard.trains.get(&id))
            .cloned())
    }

    async fn ticket_for_update(&mut self, id: Uuid) -> StoreResult<Option<Ticket>> {
        Ok(self
            .staged
            .tickets
            .get(&id)
            .or_else(|| self.guard.tickets.get(&id))
            .cloned())
    }

    async fn save_seat_count(&mut self, train: &Train) -> StoreResult<()> {
        if let Some(stored) = self.staged_train(train.id) {
            stored.available_seats = train.available_seats;
        }
        Ok(())
    }

    async fn insert_ticket(&mut self, ticket: &Ticket) -> StoreResult<()> {
        self.staged.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn save_ticket_status(&mut self, ticket: &Ticket) -> StoreResult<()> {
        if let Some(stored) = self.staged_ticket(ticket.id) {
            stored.status = ticket.status;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        guard.trains.extend(staged.trains);
        guard.tickets.extend(staged.tickets);
        Ok(())
    }
}
