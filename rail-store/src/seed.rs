use rail_core::{StoreResult, TrainRepository};
use rail_shared::{Train, TrainRequest};
use tracing::info;

/// Reference timetable loaded into an empty catalog.
pub fn reference_trains() -> Vec<TrainRequest> {
    [
        ("Podi Menike", "1005", "Colombo", "Badulla", "05:55", "16:00", 1200.00, 500),
        ("Udarata Menike", "1015", "Colombo", "Badulla", "08:30", "17:30", 1500.00, 400),
        ("Tikiri Menike", "1023", "Colombo", "Hatton", "10:00", "14:00", 800.00, 300),
        ("Senkadagala Menike", "1035", "Colombo", "Kandy", "07:00", "09:30", 600.00, 450),
        ("Yal Devi", "4077", "Colombo", "Jaffna", "05:45", "13:00", 1800.00, 600),
        ("Uttara Devi", "4017", "Colombo", "Jaffna", "11:50", "19:00", 1800.00, 500),
        ("Galu Kumari", "8056", "Colombo", "Matara", "14:00", "17:30", 500.00, 400),
        ("Ruhunu Kumari", "8058", "Matara", "Colombo", "06:05", "09:30", 500.00, 400),
        ("Sagarika", "8096", "Galle", "Colombo", "16:45", "19:15", 400.00, 350),
        ("Sri Devi", "4003", "Colombo", "Trincomalee", "06:05", "13:30", 1600.00, 300),
        ("Night Mail", "1045", "Colombo", "Badulla", "20:00", "07:00", 2000.00, 200),
        ("Ella Odyssey", "1001", "Colombo", "Ella", "05:00", "15:00", 4000.00, 100),
    ]
    .into_iter()
    .map(|(name, number, source, destination, departure, arrival, price, seats)| TrainRequest {
        name: name.to_string(),
        number: number.to_string(),
        source: source.to_string(),
        destination: destination.to_string(),
        departure_time: departure.to_string(),
        arrival_time: arrival.to_string(),
        price,
        total_seats: seats,
    })
    .collect()
}

/// Seeds the reference timetable only when no train exists yet. Returns the
/// number of trains inserted.
pub async fn seed_trains(trains: &dyn TrainRepository) -> StoreResult<usize> {
    if trains.count().await? > 0 {
        return Ok(0);
    }

    let seeded = reference_trains();
    let total = seeded.len();
    for request in seeded {
        trains.insert(&Train::new(request)).await?;
    }

    info!("Seeded {} trains into the catalog.", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_seeds_empty_catalog_once() {
        let store = MemoryStore::new();

        assert_eq!(seed_trains(&store).await.unwrap(), 12);
        assert_eq!(seed_trains(&store).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seeded_route_lookup() {
        let store = MemoryStore::new();
        seed_trains(&store).await.unwrap();

        let kandy = store.find_by_route("Colombo", "Kandy").await.unwrap();
        assert_eq!(kandy.len(), 1);
        assert_eq!(kandy[0].name, "Senkadagala Menike");
        assert_eq!(kandy[0].number, "1035");

        let badulla = store.find_by_route("Colombo", "Badulla").await.unwrap();
        assert_eq!(badulla.len(), 3);
        assert!(badulla.iter().all(|t| t.available_seats == t.total_seats));
    }
}
