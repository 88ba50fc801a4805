use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled service with a fixed route and seat capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub id: Uuid,
    pub name: String,
    pub number: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub total_seats: i32,
    pub available_seats: i32,
}

/// Catalog attributes supplied when adding or editing a train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub name: String,
    pub number: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub total_seats: i32,
}

impl Train {
    /// A fresh train has every seat available.
    pub fn new(request: TrainRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            available_seats: request.total_seats,
            name: request.name,
            number: request.number,
            source: request.source,
            destination: request.destination,
            departure_time: request.departure_time,
            arrival_time: request.arrival_time,
            price: request.price,
            total_seats: request.total_seats,
        }
    }

    /// Overwrite the catalog attributes. `available_seats` is left as is,
    /// even when `total_seats` changes.
    pub fn apply(&mut self, request: &TrainRequest) {
        self.name = request.name.clone();
        self.number = request.number.clone();
        self.source = request.source.clone();
        self.destination = request.destination.clone();
        self.departure_time = request.departure_time.clone();
        self.arrival_time = request.arrival_time.clone();
        self.price = request.price;
        self.total_seats = request.total_seats;
    }

    pub fn serves(&self, source: &str, destination: &str) -> bool {
        self.source == source && self.destination == destination
    }
}
