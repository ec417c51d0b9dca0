// Flight Update Service - coordinated flight + ticket updates

pub mod cascade;

pub use cascade::{CascadeOutcome, CoordinatorState};

use crate::domain::{FlightId, FlightUpdate, TicketUpdate};
use crate::error::Result;
use crate::port::TransactionalBookingStore;
use std::sync::Arc;

/// Coordinates the two-table flight update
///
/// Each call opens its own transaction, so concurrent calls never share a
/// connection. Rows are not locked against writers outside the coordinator.
pub struct BookingUpdateCoordinator {
    store: Arc<dyn TransactionalBookingStore>,
}

impl BookingUpdateCoordinator {
    pub fn new(store: Arc<dyn TransactionalBookingStore>) -> Self {
        Self { store }
    }

    /// Update a flight and reprice every ticket booked on it, all or nothing
    ///
    /// Pass an empty `ticket_update` to change only the flight.
    #[tracing::instrument(skip(self, flight_update, ticket_update))]
    pub async fn update_flight_and_cascade_ticket_pricing(
        &self,
        flight_id: FlightId,
        flight_update: &FlightUpdate,
        ticket_update: &TicketUpdate,
    ) -> Result<CascadeOutcome> {
        cascade::execute(self.store.as_ref(), flight_id, flight_update, ticket_update).await
    }
}
