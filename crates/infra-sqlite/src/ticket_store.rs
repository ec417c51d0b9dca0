// SQLite TicketStore Implementation

use crate::queries;
use async_trait::async_trait;
use flightbook_core::domain::{
    FlightId, NewTicket, PassengerTicketCount, SetClause, Ticket, TicketColumn, TicketId,
    WhereClause,
};
use flightbook_core::error::Result;
use flightbook_core::port::TicketStore;
use sqlx::SqlitePool;
use tracing::{debug, info};

pub struct SqliteTicketStore {
    pool: SqlitePool,
}

impl SqliteTicketStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn save(&self, ticket: NewTicket) -> Result<Ticket> {
        let saved = queries::insert_ticket(&self.pool, ticket).await?;
        info!(ticket_id = saved.id, flight_id = saved.flight_id, "Ticket saved");
        Ok(saved)
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>> {
        queries::find_ticket(&self.pool, id).await
    }

    async fn find_all(&self) -> Result<Vec<Ticket>> {
        let tickets = queries::find_all_tickets(&self.pool).await?;
        debug!(count = tickets.len(), "Found tickets");
        Ok(tickets)
    }

    async fn find_by_flight_id(&self, flight_id: FlightId) -> Result<Vec<Ticket>> {
        queries::find_tickets_by_flight(&self.pool, flight_id).await
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool> {
        queries::update_ticket(&self.pool, ticket).await
    }

    async fn delete_by_id(&self, id: TicketId) -> Result<bool> {
        queries::delete_ticket(&self.pool, id).await
    }

    async fn apply_filtered_update(
        &self,
        set: &SetClause<TicketColumn>,
        filter: &WhereClause<TicketColumn>,
    ) -> Result<u64> {
        queries::filtered_update(&self.pool, set, filter).await
    }

    async fn most_common_first_names(&self, limit: u32) -> Result<Vec<String>> {
        queries::most_common_first_names(&self.pool, limit).await
    }

    async fn passenger_ticket_counts(&self) -> Result<Vec<PassengerTicketCount>> {
        queries::passenger_ticket_counts(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, PoolConfig};
    use flightbook_core::domain::{
        build_set_clause, build_where_clause, FilterMode, TicketFilter, TicketUpdate,
    };
    use flightbook_core::error::{AppError, StoreError};

    async fn setup_store() -> SqliteTicketStore {
        let pool = create_pool(&PoolConfig::new("sqlite::memory:")).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteTicketStore::new(pool)
    }

    fn new_ticket(name: &str, passport_no: &str, flight_id: i64, seat_no: &str) -> NewTicket {
        NewTicket {
            passport_no: passport_no.to_string(),
            passenger_name: name.to_string(),
            flight_id,
            seat_no: seat_no.to_string(),
            cost: 100,
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let store = setup_store().await;

        let mut ticket = store
            .save(new_ticket("Ivan Ivanov", "123567", 8, "B1"))
            .await
            .unwrap();

        ticket.cost = 1500;
        ticket.passenger_name = "Nikolay Nikolaev".to_string();
        assert!(store.update(&ticket).await.unwrap());

        let found = store.find_by_id(ticket.id).await.unwrap().unwrap();
        assert_eq!(found.cost, 1500);
        assert_eq!(found.passenger_name, "Nikolay Nikolaev");

        assert!(store.delete_by_id(ticket.id).await.unwrap());
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_cost_violates_check() {
        let store = setup_store().await;
        let mut ticket = new_ticket("Ivan Ivanov", "123567", 8, "B1");
        ticket.cost = -1;

        let err = store.save(ticket).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::CheckViolation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_seat_on_flight() {
        let store = setup_store().await;
        store.save(new_ticket("A B", "1", 8, "B1")).await.unwrap();

        let err = store.save(new_ticket("C D", "2", 8, "B1")).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::UniqueViolation(_))));

        // Same seat on another flight is fine
        store.save(new_ticket("C D", "2", 9, "B1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_filtered_update_by_passenger() {
        let store = setup_store().await;
        store.save(new_ticket("Ivan Ivanov", "111", 8, "A1")).await.unwrap();
        store.save(new_ticket("Ivan Ivanov", "111", 9, "A1")).await.unwrap();
        store.save(new_ticket("Petr Petrov", "222", 8, "A2")).await.unwrap();

        let set = build_set_clause(&TicketUpdate::new().passenger_name("Ivan Sidorov").to_spec())
            .unwrap();
        let filter = build_where_clause(
            &TicketFilter::new().passport_no("111").to_spec(),
            FilterMode::RequireRestriction,
        )
        .unwrap();

        assert_eq!(store.apply_filtered_update(&set, &filter).await.unwrap(), 2);

        let renamed: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.passenger_name == "Ivan Sidorov")
            .collect();
        assert_eq!(renamed.len(), 2);
    }

    #[tokio::test]
    async fn test_unrestricted_update_touches_every_row() {
        let store = setup_store().await;
        store.save(new_ticket("A B", "1", 8, "A1")).await.unwrap();
        store.save(new_ticket("C D", "2", 9, "A1")).await.unwrap();

        let set = build_set_clause(&TicketUpdate::new().cost(0).to_spec()).unwrap();
        let filter =
            build_where_clause(&TicketFilter::new().to_spec(), FilterMode::AllowUnrestricted)
                .unwrap();

        assert_eq!(store.apply_filtered_update(&set, &filter).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reports() {
        let store = setup_store().await;
        store.save(new_ticket("Ivan Ivanov", "111", 1, "A1")).await.unwrap();
        store.save(new_ticket("Ivan Petrov", "222", 1, "A2")).await.unwrap();
        store.save(new_ticket("Anna Smirnova", "333", 1, "A3")).await.unwrap();
        store.save(new_ticket("Ivan Ivanov", "111", 2, "A1")).await.unwrap();
        store.save(new_ticket("Cher", "444", 2, "A2")).await.unwrap();

        let names = store.most_common_first_names(2).await.unwrap();
        assert_eq!(names, vec!["Ivan".to_string(), "Anna".to_string()]);

        let counts = store.passenger_ticket_counts().await.unwrap();
        assert_eq!(counts[0].passport_no, "111");
        assert_eq!(counts[0].ticket_count, 2);
        assert_eq!(counts.len(), 4);

        let by_flight = store.find_by_flight_id(2).await.unwrap();
        assert_eq!(by_flight.len(), 2);
    }
}
