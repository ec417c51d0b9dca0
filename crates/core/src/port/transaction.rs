// Transaction port for atomic operations

use crate::domain::{
    Flight, FlightColumn, FlightId, NewFlight, NewTicket, SetClause, Ticket, TicketColumn,
    TicketId, WhereClause,
};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
///
/// Dropping a transaction without calling `commit` rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Opens caller-owned transactions over the flight and ticket tables
#[async_trait]
pub trait TransactionalBookingStore: Send + Sync {
    /// Begin a new transaction on its own connection
    async fn begin_transaction(&self) -> Result<Box<dyn BookingTransaction>>;
}

/// Record store operations within a transaction. Nothing here commits.
///
/// Mirrors [`crate::port::FlightStore`] and [`crate::port::TicketStore`] so a
/// caller can mix reads and writes on both tables before deciding to commit.
#[async_trait]
pub trait BookingTransaction: Transaction {
    /// Filtered update on `flight` (within transaction)
    async fn update_flights(
        &mut self,
        set: &SetClause<FlightColumn>,
        filter: &WhereClause<FlightColumn>,
    ) -> Result<u64>;

    /// Filtered update on `ticket` (within transaction)
    async fn update_tickets(
        &mut self,
        set: &SetClause<TicketColumn>,
        filter: &WhereClause<TicketColumn>,
    ) -> Result<u64>;

    async fn save_flight(&mut self, flight: NewFlight) -> Result<Flight>;

    /// Find flight (within transaction)
    async fn find_flight(&mut self, id: FlightId) -> Result<Option<Flight>>;

    async fn find_all_flights(&mut self) -> Result<Vec<Flight>>;

    async fn update_flight(&mut self, flight: &Flight) -> Result<bool>;

    /// Tickets of the flight are left in place
    async fn delete_flight(&mut self, id: FlightId) -> Result<bool>;

    /// Insert ticket (within transaction)
    async fn insert_ticket(&mut self, ticket: NewTicket) -> Result<Ticket>;

    async fn find_ticket(&mut self, id: TicketId) -> Result<Option<Ticket>>;

    async fn find_all_tickets(&mut self) -> Result<Vec<Ticket>>;

    async fn find_tickets_by_flight(&mut self, flight_id: FlightId) -> Result<Vec<Ticket>>;

    async fn update_ticket(&mut self, ticket: &Ticket) -> Result<bool>;

    async fn delete_ticket(&mut self, id: TicketId) -> Result<bool>;
}
