// Ticket Domain Model

use crate::domain::flight::FlightId;
use crate::domain::spec::{Column, FilterSpec, PartialUpdateSpec};
use serde::{Deserialize, Serialize};

/// Store-assigned ticket row id
pub type TicketId = i64;

/// Ticket Entity
///
/// `flight_id` is checked against existing flights by the ticketing service,
/// not by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub passport_no: String,
    pub passenger_name: String,
    pub flight_id: FlightId,
    pub seat_no: String,
    pub cost: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub passport_no: String,
    pub passenger_name: String,
    pub flight_id: FlightId,
    pub seat_no: String,
    pub cost: i32,
}

impl NewTicket {
    pub fn with_id(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            passport_no: self.passport_no,
            passenger_name: self.passenger_name,
            flight_id: self.flight_id,
            seat_no: self.seat_no,
            cost: self.cost,
        }
    }
}

/// Number of tickets booked under one passport and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerTicketCount {
    pub passport_no: String,
    pub passenger_name: String,
    pub ticket_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketColumn {
    Id,
    PassportNo,
    PassengerName,
    FlightId,
    SeatNo,
    Cost,
}

impl Column for TicketColumn {
    const TABLE: &'static str = "ticket";

    fn name(self) -> &'static str {
        match self {
            TicketColumn::Id => "id",
            TicketColumn::PassportNo => "passport_no",
            TicketColumn::PassengerName => "passenger_name",
            TicketColumn::FlightId => "flight_id",
            TicketColumn::SeatNo => "seat_no",
            TicketColumn::Cost => "cost",
        }
    }
}

/// Ticket fields to change; in a repricing cascade this is usually just `cost`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketUpdate {
    pub passport_no: Option<String>,
    pub passenger_name: Option<String>,
    pub seat_no: Option<String>,
    pub cost: Option<i32>,
}

impl TicketUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passport_no(mut self, passport_no: impl Into<String>) -> Self {
        self.passport_no = Some(passport_no.into());
        self
    }

    pub fn passenger_name(mut self, name: impl Into<String>) -> Self {
        self.passenger_name = Some(name.into());
        self
    }

    pub fn seat_no(mut self, seat_no: impl Into<String>) -> Self {
        self.seat_no = Some(seat_no.into());
        self
    }

    pub fn cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn to_spec(&self) -> PartialUpdateSpec<TicketColumn> {
        PartialUpdateSpec::new()
            .set_opt(TicketColumn::PassportNo, self.passport_no.clone())
            .set_opt(TicketColumn::PassengerName, self.passenger_name.clone())
            .set_opt(TicketColumn::SeatNo, self.seat_no.clone())
            .set_opt(TicketColumn::Cost, self.cost)
    }
}

/// Equality filter over tickets, e.g. "every ticket of flight 8"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    pub passport_no: Option<String>,
    pub passenger_name: Option<String>,
    pub flight_id: Option<FlightId>,
    pub seat_no: Option<String>,
    pub cost: Option<i32>,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_flight(flight_id: FlightId) -> Self {
        Self {
            flight_id: Some(flight_id),
            ..Self::default()
        }
    }

    pub fn passport_no(mut self, passport_no: impl Into<String>) -> Self {
        self.passport_no = Some(passport_no.into());
        self
    }

    pub fn passenger_name(mut self, name: impl Into<String>) -> Self {
        self.passenger_name = Some(name.into());
        self
    }

    pub fn seat_no(mut self, seat_no: impl Into<String>) -> Self {
        self.seat_no = Some(seat_no.into());
        self
    }

    pub fn cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn to_spec(&self) -> FilterSpec<TicketColumn> {
        FilterSpec::new()
            .require_opt(TicketColumn::PassportNo, self.passport_no.clone())
            .require_opt(TicketColumn::PassengerName, self.passenger_name.clone())
            .require_opt(TicketColumn::FlightId, self.flight_id)
            .require_opt(TicketColumn::SeatNo, self.seat_no.clone())
            .require_opt(TicketColumn::Cost, self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SqlValue;

    #[test]
    fn test_for_flight_filter() {
        let spec = TicketFilter::for_flight(8).to_spec();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get(TicketColumn::FlightId), Some(&SqlValue::Integer(8)));
    }

    #[test]
    fn test_cost_update_spec() {
        let spec = TicketUpdate::new().cost(1500).to_spec();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get(TicketColumn::Cost), Some(&SqlValue::Integer(1500)));
    }
}
