pub mod models;
pub mod pii;

pub use models::{Ticket, TicketBookingRequest, TicketStatus, Train, TrainRequest};
