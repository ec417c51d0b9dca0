// SQLite FlightStore Implementation

use crate::queries;
use async_trait::async_trait;
use flightbook_core::domain::{Flight, FlightColumn, FlightId, NewFlight, SetClause, WhereClause};
use flightbook_core::error::Result;
use flightbook_core::port::FlightStore;
use sqlx::SqlitePool;
use tracing::{debug, info};

pub struct SqliteFlightStore {
    pool: SqlitePool,
}

impl SqliteFlightStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlightStore for SqliteFlightStore {
    async fn save(&self, flight: NewFlight) -> Result<Flight> {
        let saved = queries::insert_flight(&self.pool, flight).await?;
        info!(flight_id = saved.id, flight_no = %saved.flight_no, "Flight saved");
        Ok(saved)
    }

    async fn find_by_id(&self, id: FlightId) -> Result<Option<Flight>> {
        queries::find_flight(&self.pool, id).await
    }

    async fn find_all(&self) -> Result<Vec<Flight>> {
        let flights = queries::find_all_flights(&self.pool).await?;
        debug!(count = flights.len(), "Found flights");
        Ok(flights)
    }

    async fn update(&self, flight: &Flight) -> Result<bool> {
        queries::update_flight(&self.pool, flight).await
    }

    async fn delete_by_id(&self, id: FlightId) -> Result<bool> {
        // Tickets of the flight are left in place
        let deleted = queries::delete_flight(&self.pool, id).await?;
        info!(flight_id = id, deleted, "Flight delete");
        Ok(deleted)
    }

    async fn apply_filtered_update(
        &self,
        set: &SetClause<FlightColumn>,
        filter: &WhereClause<FlightColumn>,
    ) -> Result<u64> {
        queries::filtered_update(&self.pool, set, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, PoolConfig};
    use chrono::NaiveDate;
    use flightbook_core::domain::{build_set_clause, status, FlightUpdate};

    async fn setup_store() -> SqliteFlightStore {
        let pool = create_pool(&PoolConfig::new("sqlite::memory:")).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteFlightStore::new(pool)
    }

    fn new_flight(flight_no: &str) -> NewFlight {
        let departure = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        NewFlight {
            flight_no: flight_no.to_string(),
            departure_date: departure,
            departure_airport_code: "MNK".to_string(),
            arrival_date: departure + chrono::Duration::hours(2),
            arrival_airport_code: "LDN".to_string(),
            aircraft_id: 2,
            status: status::SCHEDULED.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_round_trips() {
        let store = setup_store().await;

        let saved = store.save(new_flight("MP3000")).await.unwrap();
        let other = store.save(new_flight("MP3001")).await.unwrap();
        assert_ne!(saved.id, other.id);

        let found = store.find_by_id(saved.id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_missing() {
        let store = setup_store().await;
        assert!(store.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_full_update() {
        let store = setup_store().await;
        let mut flight = store.save(new_flight("MP3000")).await.unwrap();

        flight.status = status::CANCELLED.to_string();
        flight.aircraft_id = 1;
        assert!(store.update(&flight).await.unwrap());

        let found = store.find_by_id(flight.id).await.unwrap().unwrap();
        assert_eq!(found.status, status::CANCELLED);
        assert_eq!(found.aircraft_id, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = setup_store().await;
        let flight = store.save(new_flight("MP3000")).await.unwrap();

        assert!(store.delete_by_id(flight.id).await.unwrap());
        assert!(!store.delete_by_id(flight.id).await.unwrap());
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filtered_update_leaves_absent_fields() {
        let store = setup_store().await;
        let flight = store.save(new_flight("MP3000")).await.unwrap();

        let set =
            build_set_clause(&FlightUpdate::new().status(status::DEPARTED).to_spec()).unwrap();
        let affected = store
            .apply_filtered_update(&set, &WhereClause::by_id(FlightColumn::Id, flight.id))
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let found = store.find_by_id(flight.id).await.unwrap().unwrap();
        assert_eq!(found.status, status::DEPARTED);
        assert_eq!(found.flight_no, "MP3000");
        assert_eq!(found.departure_date, flight.departure_date);
    }
}
