use rail_shared::Ticket;

/// Cancellation rules. The defaults reproduce the long-standing behavior:
/// a cancellation always gives back exactly one seat, and cancelling a
/// ticket twice is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingPolicy {
    pub restore_booked_seat_count: bool,
    pub reject_repeat_cancellation: bool,
}

impl BookingPolicy {
    pub fn seats_to_restore(&self, ticket: &Ticket) -> i32 {
        if self.restore_booked_seat_count {
            ticket.seat_count.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn ticket(seat_count: i32) -> Ticket {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        Ticket::booked("user-1".into(), Uuid::new_v4(), "A".into(), 5, seat_count, 1500.0, date)
    }

    #[test]
    fn test_default_restores_one_seat() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.seats_to_restore(&ticket(3)), 1);
        assert!(!policy.reject_repeat_cancellation);
    }

    #[test]
    fn test_restore_booked_count() {
        let policy = BookingPolicy { restore_booked_seat_count: true, ..Default::default() };
        assert_eq!(policy.seats_to_restore(&ticket(3)), 3);
        assert_eq!(policy.seats_to_restore(&ticket(0)), 1);
    }
}
