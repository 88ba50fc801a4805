use rail_shared::Train;

/// Seat accounting on a train's available-seat counter.
///
/// Seat numbers are not taken from a seat map: a reservation is numbered by
/// how many seats the train has given out once it is applied.
pub trait SeatInventory {
    /// Take `quantity` seats off the counter and return the seat number
    /// assigned to the reservation.
    fn reserve_seats(&mut self, quantity: i32) -> Result<i32, InventoryError>;

    /// Put `quantity` seats back on the counter. No upper bound is applied.
    fn release_seats(&mut self, quantity: i32);

    /// Share of capacity currently given out, 0.0 to 1.0.
    fn utilization(&self) -> f64;
}

impl SeatInventory for Train {
    fn reserve_seats(&mut self, quantity: i32) -> Result<i32, InventoryError> {
        if quantity < 1 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        if self.available_seats < quantity {
            return Err(InventoryError::InsufficientInventory {
                requested: quantity,
                available: self.available_seats,
            });
        }

        let remaining = self.available_seats - quantity;
        let seat_number = self.total_seats.checked_sub(remaining).ok_or(
            InventoryError::InconsistentCounter {
                total: self.total_seats,
                available: self.available_seats,
            },
        )?;

        self.available_seats = remaining;
        Ok(seat_number)
    }

    fn release_seats(&mut self, quantity: i32) {
        self.available_seats = self.available_seats.saturating_add(quantity);
    }

    fn utilization(&self) -> f64 {
        if self.total_seats <= 0 {
            0.0
        } else {
            1.0 - (self.available_seats as f64 / self.total_seats as f64)
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Seat quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientInventory {
        requested: i32,
        available: i32,
    },

    #[error("Seat counter out of range: total {total}, available {available}")]
    InconsistentCounter {
        total: i32,
        available: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_shared::TrainRequest;

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

    #[test]
    fn test_inventory_lifecycle() {
        let mut train = ella_odyssey();

        assert_eq!(train.reserve_seats(1).unwrap(), 1);
        assert_eq!(train.available_seats, 99);

        // Multi-seat reservations get a single number: the last seat taken
        assert_eq!(train.reserve_seats(3).unwrap(), 4);
        assert_eq!(train.available_seats, 96);

        train.release_seats(1);
        assert_eq!(train.available_seats, 97);

        let utilization = train.utilization();
        assert!((utilization - 0.03).abs() < 0.0001);
    }

    #[test]
    fn test_insufficient_inventory_leaves_counter_alone() {
        let mut train = ella_odyssey();
        train.available_seats = 2;

        let err = train.reserve_seats(3).unwrap_err();
        assert_eq!(err, InventoryError::InsufficientInventory { requested: 3, available: 2 });
        assert_eq!(train.available_seats, 2);
    }

    #[test]
    fn test_last_seat_can_be_taken() {
        let mut train = ella_odyssey();
        train.available_seats = 1;

        assert_eq!(train.reserve_seats(1).unwrap(), 100);
        assert_eq!(train.available_seats, 0);
        assert!(train.reserve_seats(1).is_err());
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut train = ella_odyssey();
        assert_eq!(train.reserve_seats(0), Err(InventoryError::InvalidQuantity(0)));
        assert_eq!(train.reserve_seats(-2), Err(InventoryError::InvalidQuantity(-2)));
        assert_eq!(train.available_seats, 100);
    }

    #[test]
    fn test_out_of_range_capacity_is_an_error_not_an_overflow() {
        let mut train = ella_odyssey();
        train.total_seats = i32::MIN;

        let err = train.reserve_seats(1).unwrap_err();
        assert_eq!(err, InventoryError::InconsistentCounter { total: i32::MIN, available: 100 });
        assert_eq!(train.available_seats, 100);
    }

    #[test]
    fn test_release_saturates() {
        let mut train = ella_odyssey();
        train.available_seats = i32::MAX;
        train.release_seats(1);
        assert_eq!(train.available_seats, i32::MAX);
    }

    #[test]
    fn test_release_can_exceed_capacity() {
        let mut train = ella_odyssey();
        train.release_seats(1);
        assert_eq!(train.available_seats, 101);
    }
}
