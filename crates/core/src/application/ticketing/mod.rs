// Ticketing Service - booking with application-level flight reference checks

pub mod book;

pub use book::validate_ticket;

use crate::domain::{NewTicket, Ticket};
use crate::error::Result;
use crate::port::TransactionalBookingStore;
use std::sync::Arc;

pub struct TicketingService {
    store: Arc<dyn TransactionalBookingStore>,
}

impl TicketingService {
    pub fn new(store: Arc<dyn TransactionalBookingStore>) -> Self {
        Self { store }
    }

    /// Book a ticket on an existing flight
    pub async fn book(&self, ticket: NewTicket) -> Result<Ticket> {
        book::execute(self.store.as_ref(), ticket).await
    }
}
