// Flight Domain Model

use crate::domain::spec::{Column, PartialUpdateSpec};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Store-assigned flight row id
pub type FlightId = i64;

/// Well-known values of the free-form `status` column
pub mod status {
    pub const SCHEDULED: &str = "SCHEDULED";
    pub const DEPARTED: &str = "DEPARTED";
    pub const CANCELLED: &str = "CANCELLED";
}

/// Flight Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub flight_no: String,
    pub departure_date: NaiveDateTime,
    pub departure_airport_code: String,
    pub arrival_date: NaiveDateTime,
    pub arrival_airport_code: String,
    pub aircraft_id: i64,
    pub status: String,
}

/// Flight before the store has assigned an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlight {
    pub flight_no: String,
    pub departure_date: NaiveDateTime,
    pub departure_airport_code: String,
    pub arrival_date: NaiveDateTime,
    pub arrival_airport_code: String,
    pub aircraft_id: i64,
    pub status: String,
}

impl NewFlight {
    pub fn with_id(self, id: FlightId) -> Flight {
        Flight {
            id,
            flight_no: self.flight_no,
            departure_date: self.departure_date,
            departure_airport_code: self.departure_airport_code,
            arrival_date: self.arrival_date,
            arrival_airport_code: self.arrival_airport_code,
            aircraft_id: self.aircraft_id,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightColumn {
    Id,
    FlightNo,
    DepartureDate,
    DepartureAirportCode,
    ArrivalDate,
    ArrivalAirportCode,
    AircraftId,
    Status,
}

impl Column for FlightColumn {
    const TABLE: &'static str = "flight";

    fn name(self) -> &'static str {
        match self {
            FlightColumn::Id => "id",
            FlightColumn::FlightNo => "flight_no",
            FlightColumn::DepartureDate => "departure_date",
            FlightColumn::DepartureAirportCode => "departure_airport_code",
            FlightColumn::ArrivalDate => "arrival_date",
            FlightColumn::ArrivalAirportCode => "arrival_airport_code",
            FlightColumn::AircraftId => "aircraft_id",
            FlightColumn::Status => "status",
        }
    }
}

/// Mutable flight fields supplied by a caller; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightUpdate {
    pub flight_no: Option<String>,
    pub aircraft_id: Option<i64>,
    pub status: Option<String>,
    pub departure_date: Option<NaiveDateTime>,
    pub arrival_date: Option<NaiveDateTime>,
}

impl FlightUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flight_no(mut self, flight_no: impl Into<String>) -> Self {
        self.flight_no = Some(flight_no.into());
        self
    }

    pub fn aircraft_id(mut self, aircraft_id: i64) -> Self {
        self.aircraft_id = Some(aircraft_id);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn departure_date(mut self, at: NaiveDateTime) -> Self {
        self.departure_date = Some(at);
        self
    }

    pub fn arrival_date(mut self, at: NaiveDateTime) -> Self {
        self.arrival_date = Some(at);
        self
    }

    pub fn to_spec(&self) -> PartialUpdateSpec<FlightColumn> {
        PartialUpdateSpec::new()
            .set_opt(FlightColumn::FlightNo, self.flight_no.clone())
            .set_opt(FlightColumn::AircraftId, self.aircraft_id)
            .set_opt(FlightColumn::Status, self.status.clone())
            .set_opt(FlightColumn::DepartureDate, self.departure_date)
            .set_opt(FlightColumn::ArrivalDate, self.arrival_date)
    }
}
