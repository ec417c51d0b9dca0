// Domain Layer - Entities, partial update specs and clause rendering

pub mod clause;
pub mod flight;
pub mod spec;
pub mod ticket;

// Re-exports
pub use clause::{build_set_clause, build_where_clause, FilterMode, SetClause, WhereClause};
pub use flight::{status, Flight, FlightColumn, FlightId, FlightUpdate, NewFlight};
pub use spec::{Column, FilterSpec, PartialUpdateSpec, SqlValue};
pub use ticket::{
    NewTicket, PassengerTicketCount, Ticket, TicketColumn, TicketFilter, TicketId, TicketUpdate,
};
