// Ticket Store Port (Interface)

use crate::domain::{
    FlightId, NewTicket, PassengerTicketCount, SetClause, Ticket, TicketColumn, TicketId,
    WhereClause,
};
use crate::error::Result;
use async_trait::async_trait;

/// Record store for the `ticket` table
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a ticket and return it with its assigned id.
    /// Does not check that the flight exists; see `TicketingService::book`.
    async fn save(&self, ticket: NewTicket) -> Result<Ticket>;

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>>;

    /// All tickets ordered by id
    async fn find_all(&self) -> Result<Vec<Ticket>>;

    async fn find_by_flight_id(&self, flight_id: FlightId) -> Result<Vec<Ticket>>;

    async fn update(&self, ticket: &Ticket) -> Result<bool>;

    async fn delete_by_id(&self, id: TicketId) -> Result<bool>;

    async fn apply_filtered_update(
        &self,
        set: &SetClause<TicketColumn>,
        filter: &WhereClause<TicketColumn>,
    ) -> Result<u64>;

    /// First word of the passenger name, most frequent first, ties by name
    async fn most_common_first_names(&self, limit: u32) -> Result<Vec<String>>;

    /// Tickets per passport and name, largest count first
    async fn passenger_ticket_counts(&self) -> Result<Vec<PassengerTicketCount>>;
}
