// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use async_trait::async_trait;
use flightbook_core::domain::{
    Flight, FlightColumn, FlightId, NewFlight, NewTicket, SetClause, Ticket, TicketColumn,
    TicketId, WhereClause,
};
use flightbook_core::error::Result;
use flightbook_core::port::{BookingTransaction, Transaction, TransactionalBookingStore};
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};
use tracing::debug;

/// Opens booking transactions, one pooled connection each
pub struct SqliteBookingStore {
    pool: SqlitePool,
}

impl SqliteBookingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Write lock is taken at BEGIN, so a read-then-write sequence waits on the
/// busy timeout instead of failing with `SQLITE_BUSY_SNAPSHOT`
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

#[async_trait]
impl TransactionalBookingStore for SqliteBookingStore {
    async fn begin_transaction(&self) -> Result<Box<dyn BookingTransaction>> {
        let tx = self
            .pool
            .begin_with(BEGIN_WRITE)
            .await
            .map_err(map_sqlx_error)?;
        debug!("Transaction opened");
        Ok(Box::new(SqliteBookingTransaction::new(tx)))
    }
}

/// Statements on one connection inside a caller-owned transaction
///
/// If dropped without `commit`, sqlx rolls the transaction back.
pub struct SqliteBookingTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteBookingTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteBookingTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        debug!("Transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl BookingTransaction for SqliteBookingTransaction<'_> {
    async fn update_flights(
        &mut self,
        set: &SetClause<FlightColumn>,
        filter: &WhereClause<FlightColumn>,
    ) -> Result<u64> {
        queries::filtered_update(&mut *self.tx, set, filter).await
    }

    async fn update_tickets(
        &mut self,
        set: &SetClause<TicketColumn>,
        filter: &WhereClause<TicketColumn>,
    ) -> Result<u64> {
        queries::filtered_update(&mut *self.tx, set, filter).await
    }

    async fn save_flight(&mut self, flight: NewFlight) -> Result<Flight> {
        queries::insert_flight(&mut *self.tx, flight).await
    }

    async fn find_flight(&mut self, id: FlightId) -> Result<Option<Flight>> {
        queries::find_flight(&mut *self.tx, id).await
    }

    async fn find_all_flights(&mut self) -> Result<Vec<Flight>> {
        queries::find_all_flights(&mut *self.tx).await
    }

    async fn update_flight(&mut self, flight: &Flight) -> Result<bool> {
        queries::update_flight(&mut *self.tx, flight).await
    }

    async fn delete_flight(&mut self, id: FlightId) -> Result<bool> {
        queries::delete_flight(&mut *self.tx, id).await
    }

    async fn insert_ticket(&mut self, ticket: NewTicket) -> Result<Ticket> {
        queries::insert_ticket(&mut *self.tx, ticket).await
    }

    async fn find_ticket(&mut self, id: TicketId) -> Result<Option<Ticket>> {
        queries::find_ticket(&mut *self.tx, id).await
    }

    async fn find_all_tickets(&mut self) -> Result<Vec<Ticket>> {
        queries::find_all_tickets(&mut *self.tx).await
    }

    async fn find_tickets_by_flight(&mut self, flight_id: FlightId) -> Result<Vec<Ticket>> {
        queries::find_tickets_by_flight(&mut *self.tx, flight_id).await
    }

    async fn update_ticket(&mut self, ticket: &Ticket) -> Result<bool> {
        queries::update_ticket(&mut *self.tx, ticket).await
    }

    async fn delete_ticket(&mut self, id: TicketId) -> Result<bool> {
        queries::delete_ticket(&mut *self.tx, id).await
    }
}
