use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ticket status in the lifecycle. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Booked,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Booked => "BOOKED",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOKED" => Ok(TicketStatus::Booked),
            "CANCELLED" => Ok(TicketStatus::Cancelled),
            other => Err(format!("unknown ticket status: {}", other)),
        }
    }
}

/// A single passenger's reservation against one train's seat inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: String,
    pub train_id: Uuid,
    pub passenger_name: String,
    pub seat_number: i32,
    pub seat_count: i32,
    pub price: f64,
    pub booking_date: NaiveDate,
    pub status: TicketStatus,
}

impl Ticket {
    pub fn booked(
        user_id: String,
        train_id: Uuid,
        passenger_name: String,
        seat_number: i32,
        seat_count: i32,
        price: f64,
        booking_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            train_id,
            passenger_name,
            seat_number,
            seat_count,
            price,
            booking_date,
            status: TicketStatus::Booked,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TicketStatus::Cancelled
    }

    /// Mark as cancelled (never delete, never revert)
    pub fn cancel(&mut self) {
        self.status = TicketStatus::Cancelled;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBookingRequest {
    pub train_id: Uuid,
    pub passenger_name: String,
    pub number_of_seats: i32,
}
