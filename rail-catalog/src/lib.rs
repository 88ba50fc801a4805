pub mod catalog;
pub mod inventory;

pub use catalog::{CatalogError, CatalogResult, TrainCatalog};
pub use inventory::{InventoryError, SeatInventory};
