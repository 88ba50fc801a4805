pub mod ticket;
pub mod train;

pub use ticket::{Ticket, TicketBookingRequest, TicketStatus};
pub use train::{Train, TrainRequest};
