// Table rendering for the human-readable output mode

use colored::Colorize;
use flightbook_core::domain::{Flight, PassengerTicketCount, Ticket};
use flightbook_core::{AppError, FailureOutcome};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FlightRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Flight")]
    flight_no: String,
    #[tabled(rename = "From")]
    departure_airport_code: String,
    #[tabled(rename = "Departure")]
    departure_date: String,
    #[tabled(rename = "To")]
    arrival_airport_code: String,
    #[tabled(rename = "Arrival")]
    arrival_date: String,
    #[tabled(rename = "Aircraft")]
    aircraft_id: i64,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Flight> for FlightRow {
    fn from(flight: &Flight) -> Self {
        Self {
            id: flight.id,
            flight_no: flight.flight_no.clone(),
            departure_airport_code: flight.departure_airport_code.clone(),
            departure_date: flight.departure_date.format("%Y-%m-%d %H:%M").to_string(),
            arrival_airport_code: flight.arrival_airport_code.clone(),
            arrival_date: flight.arrival_date.format("%Y-%m-%d %H:%M").to_string(),
            aircraft_id: flight.aircraft_id,
            status: flight.status.clone(),
        }
    }
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Passport")]
    passport_no: String,
    #[tabled(rename = "Passenger")]
    passenger_name: String,
    #[tabled(rename = "Flight")]
    flight_id: i64,
    #[tabled(rename = "Seat")]
    seat_no: String,
    #[tabled(rename = "Cost")]
    cost: i32,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            passport_no: ticket.passport_no.clone(),
            passenger_name: ticket.passenger_name.clone(),
            flight_id: ticket.flight_id,
            seat_no: ticket.seat_no.clone(),
            cost: ticket.cost,
        }
    }
}

#[derive(Tabled)]
struct PassengerRow {
    #[tabled(rename = "Passport")]
    passport_no: String,
    #[tabled(rename = "Passenger")]
    passenger_name: String,
    #[tabled(rename = "Tickets")]
    ticket_count: i64,
}

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "First name")]
    name: String,
}

pub fn flights_table(flights: &[Flight]) -> String {
    Table::new(flights.iter().map(FlightRow::from)).to_string()
}

pub fn tickets_table(tickets: &[Ticket]) -> String {
    Table::new(tickets.iter().map(TicketRow::from)).to_string()
}

pub fn passengers_table(counts: &[PassengerTicketCount]) -> String {
    Table::new(counts.iter().map(|c| PassengerRow {
        passport_no: c.passport_no.clone(),
        passenger_name: c.passenger_name.clone(),
        ticket_count: c.ticket_count,
    }))
    .to_string()
}

pub fn names_table(names: &[String]) -> String {
    Table::new(names.iter().enumerate().map(|(i, name)| NameRow {
        rank: i + 1,
        name: name.clone(),
    }))
    .to_string()
}

/// Lines shown under a failed repricing. The error itself is printed by the caller.
pub fn failure_details(err: &AppError) -> Vec<String> {
    let mut lines = Vec::new();
    if let AppError::TransactionFailure {
        rollback_error: Some(rollback),
        ..
    } = err
    {
        lines.push(format!("  {} {}", "Rollback:".bold(), rollback));
    }
    let hint = match err.outcome() {
        FailureOutcome::NothingChanged => "No changes were stored".yellow(),
        FailureOutcome::Indeterminate => "Stored state is unknown, re-read before retrying".red(),
    };
    lines.push(format!("  {}", hint));
    lines
}
