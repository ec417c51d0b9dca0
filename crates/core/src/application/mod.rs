// Application Layer - Use Cases and Business Logic

pub mod flight_update;
pub mod ticketing;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use flight_update::{BookingUpdateCoordinator, CascadeOutcome, CoordinatorState};
pub use ticketing::TicketingService;
