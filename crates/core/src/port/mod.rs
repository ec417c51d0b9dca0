// Port Layer - Interfaces for external dependencies

pub mod flight_store;
pub mod ticket_store;
pub mod transaction;

// Re-exports
pub use flight_store::FlightStore;
pub use ticket_store::TicketStore;
pub use transaction::{BookingTransaction, Transaction, TransactionalBookingStore};
