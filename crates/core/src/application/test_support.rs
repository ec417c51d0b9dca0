// In-memory fakes of the transaction port for application tests

use crate::domain::{
    Column, Flight, FlightColumn, FlightId, NewFlight, NewTicket, SetClause, SqlValue, Ticket,
    TicketColumn, TicketId, WhereClause,
};
use crate::error::{AppError, Result, StoreError};
use crate::port::{BookingTransaction, Transaction, TransactionalBookingStore};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    FlightUpdate,
    TicketUpdate,
    Commit,
    Rollback,
}

/// Everything the fake saw, shared across transactions
#[derive(Debug, Clone, Default)]
pub struct TxLog {
    pub begun: usize,
    pub statements: Vec<String>,
    pub values: Vec<Vec<SqlValue>>,
    pub inserted: Vec<Ticket>,
    pub committed: bool,
    pub rolled_back: bool,
}

pub struct FakeBookingStore {
    log: Arc<Mutex<TxLog>>,
    faults: Vec<Fault>,
    flight_rows: u64,
    ticket_rows: u64,
    flights: Vec<Flight>,
}

impl FakeBookingStore {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(TxLog::default())),
            faults: Vec::new(),
            flight_rows: 0,
            ticket_rows: 0,
            flights: Vec::new(),
        }
    }

    /// Row counts reported by the two filtered updates
    pub fn with_rows(mut self, flight_rows: u64, ticket_rows: u64) -> Self {
        self.flight_rows = flight_rows;
        self.ticket_rows = ticket_rows;
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn with_flight(mut self, flight: Flight) -> Self {
        self.flights.push(flight);
        self
    }

    pub fn log(&self) -> TxLog {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionalBookingStore for FakeBookingStore {
    async fn begin_transaction(&self) -> Result<Box<dyn BookingTransaction>> {
        self.log.lock().unwrap().begun += 1;
        Ok(Box::new(FakeTransaction {
            log: Arc::clone(&self.log),
            faults: self.faults.clone(),
            flight_rows: self.flight_rows,
            ticket_rows: self.ticket_rows,
            flights: self.flights.clone(),
        }))
    }
}

struct FakeTransaction {
    log: Arc<Mutex<TxLog>>,
    faults: Vec<Fault>,
    flight_rows: u64,
    ticket_rows: u64,
    flights: Vec<Flight>,
}

impl FakeTransaction {
    fn injected(&self, fault: Fault, what: &str) -> Result<()> {
        if self.faults.contains(&fault) {
            return Err(AppError::Store(StoreError::Other(format!(
                "injected {} failure",
                what
            ))));
        }
        Ok(())
    }

    fn record<C: Column>(&self, set: &SetClause<C>, filter: &WhereClause<C>) {
        let mut log = self.log.lock().unwrap();
        log.statements.push(format!(
            "UPDATE {} SET {} WHERE {}",
            set.table(),
            set.sql(),
            filter.sql()
        ));
        log.values.push(
            set.values()
                .iter()
                .chain(filter.values())
                .cloned()
                .collect(),
        );
    }
}

#[async_trait]
impl Transaction for FakeTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.injected(Fault::Commit, "commit")?;
        self.log.lock().unwrap().committed = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.injected(Fault::Rollback, "rollback")?;
        self.log.lock().unwrap().rolled_back = true;
        Ok(())
    }
}

#[async_trait]
impl BookingTransaction for FakeTransaction {
    async fn update_flights(
        &mut self,
        set: &SetClause<FlightColumn>,
        filter: &WhereClause<FlightColumn>,
    ) -> Result<u64> {
        self.injected(Fault::FlightUpdate, "flight update")?;
        self.record(set, filter);
        Ok(self.flight_rows)
    }

    async fn update_tickets(
        &mut self,
        set: &SetClause<TicketColumn>,
        filter: &WhereClause<TicketColumn>,
    ) -> Result<u64> {
        self.injected(Fault::TicketUpdate, "ticket update")?;
        self.record(set, filter);
        Ok(self.ticket_rows)
    }

    async fn save_flight(&mut self, flight: NewFlight) -> Result<Flight> {
        let next_id = self.flights.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        let stored = flight.with_id(next_id);
        self.flights.push(stored.clone());
        Ok(stored)
    }

    async fn find_flight(&mut self, id: FlightId) -> Result<Option<Flight>> {
        Ok(self.flights.iter().find(|f| f.id == id).cloned())
    }

    async fn find_all_flights(&mut self) -> Result<Vec<Flight>> {
        Ok(self.flights.clone())
    }

    async fn update_flight(&mut self, flight: &Flight) -> Result<bool> {
        match self.flights.iter_mut().find(|f| f.id == flight.id) {
            Some(stored) => {
                *stored = flight.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_flight(&mut self, id: FlightId) -> Result<bool> {
        let before = self.flights.len();
        self.flights.retain(|f| f.id != id);
        Ok(self.flights.len() < before)
    }

    async fn insert_ticket(&mut self, ticket: NewTicket) -> Result<Ticket> {
        let mut log = self.log.lock().unwrap();
        let stored = ticket.with_id(log.inserted.len() as i64 + 1);
        log.inserted.push(stored.clone());
        Ok(stored)
    }

    async fn find_ticket(&mut self, id: TicketId) -> Result<Option<Ticket>> {
        let log = self.log.lock().unwrap();
        Ok(log.inserted.iter().find(|t| t.id == id).cloned())
    }

    async fn find_all_tickets(&mut self) -> Result<Vec<Ticket>> {
        Ok(self.log.lock().unwrap().inserted.clone())
    }

    async fn find_tickets_by_flight(&mut self, flight_id: FlightId) -> Result<Vec<Ticket>> {
        let log = self.log.lock().unwrap();
        Ok(log
            .inserted
            .iter()
            .filter(|t| t.flight_id == flight_id)
            .cloned()
            .collect())
    }

    async fn update_ticket(&mut self, ticket: &Ticket) -> Result<bool> {
        let mut log = self.log.lock().unwrap();
        match log.inserted.iter_mut().find(|t| t.id == ticket.id) {
            Some(stored) => {
                *stored = ticket.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_ticket(&mut self, id: TicketId) -> Result<bool> {
        let mut log = self.log.lock().unwrap();
        let before = log.inserted.len();
        log.inserted.retain(|t| t.id != id);
        Ok(log.inserted.len() < before)
    }
}
