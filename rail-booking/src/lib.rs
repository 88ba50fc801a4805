pub mod engine;
pub mod policy;

pub use engine::{BookingEngine, BookingError, BookingResult};
pub use policy::BookingPolicy;
