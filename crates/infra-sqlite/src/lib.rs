// Flightbook Infrastructure - SQLite Adapter
// Implements: FlightStore, TicketStore, TransactionalBookingStore

mod connection;
mod error;
mod flight_store;
mod migration;
mod queries;
mod ticket_store;
mod transaction;

pub use connection::{create_pool, PoolConfig, DEFAULT_MAX_CONNECTIONS};
pub use flight_store::SqliteFlightStore;
pub use migration::run_migrations;
pub use ticket_store::SqliteTicketStore;
pub use transaction::{SqliteBookingStore, SqliteBookingTransaction};

// Note: sqlx::Error conversion is handled by error::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
