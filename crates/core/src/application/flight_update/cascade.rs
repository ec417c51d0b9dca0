// Flight update with ticket repricing cascade

use crate::domain::{
    build_set_clause, build_where_clause, FilterMode, FlightColumn, FlightId, FlightUpdate,
    SetClause, TicketColumn, TicketFilter, TicketUpdate, WhereClause,
};
use crate::error::{AppError, Result};
use crate::port::{BookingTransaction, TransactionalBookingStore};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Progress of one coordinated update
///
/// Linear: `Idle -> TransactionOpen -> FlightUpdated -> TicketsUpdated -> Committed`.
/// `RolledBack` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinatorState {
    Idle,
    TransactionOpen,
    FlightUpdated,
    TicketsUpdated,
    Committed,
    RolledBack,
}

impl CoordinatorState {
    /// Next state on success, `None` once terminal
    pub fn next(self) -> Option<Self> {
        match self {
            CoordinatorState::Idle => Some(CoordinatorState::TransactionOpen),
            CoordinatorState::TransactionOpen => Some(CoordinatorState::FlightUpdated),
            CoordinatorState::FlightUpdated => Some(CoordinatorState::TicketsUpdated),
            CoordinatorState::TicketsUpdated => Some(CoordinatorState::Committed),
            CoordinatorState::Committed | CoordinatorState::RolledBack => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CoordinatorState::Committed | CoordinatorState::RolledBack
        )
    }
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatorState::Idle => write!(f, "IDLE"),
            CoordinatorState::TransactionOpen => write!(f, "TRANSACTION_OPEN"),
            CoordinatorState::FlightUpdated => write!(f, "FLIGHT_UPDATED"),
            CoordinatorState::TicketsUpdated => write!(f, "TICKETS_UPDATED"),
            CoordinatorState::Committed => write!(f, "COMMITTED"),
            CoordinatorState::RolledBack => write!(f, "ROLLED_BACK"),
        }
    }
}

/// Result of a committed cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    /// The flight row was matched by the update
    pub flight_updated: bool,
    /// Tickets of the flight that were rewritten (does not gate commit)
    pub tickets_updated: u64,
}

/// Statements rendered ahead of the transaction
struct CascadePlan {
    flight_set: Option<SetClause<FlightColumn>>,
    flight_filter: WhereClause<FlightColumn>,
    ticket_set: Option<SetClause<TicketColumn>>,
    ticket_filter: WhereClause<TicketColumn>,
}

impl CascadePlan {
    fn build(
        flight_id: FlightId,
        flight_update: &FlightUpdate,
        ticket_update: &TicketUpdate,
    ) -> Result<Self> {
        let flight_spec = flight_update.to_spec();
        let ticket_spec = ticket_update.to_spec();

        if flight_spec.is_empty() && ticket_spec.is_empty() {
            return Err(AppError::Validation(format!(
                "nothing to update for flight {}",
                flight_id
            )));
        }

        let flight_set = if flight_spec.is_empty() {
            None
        } else {
            Some(build_set_clause(&flight_spec)?)
        };

        let ticket_set = if ticket_spec.is_empty() {
            None
        } else {
            Some(build_set_clause(&ticket_spec)?)
        };

        let ticket_filter = build_where_clause(
            &TicketFilter::for_flight(flight_id).to_spec(),
            FilterMode::RequireRestriction,
        )?;

        Ok(Self {
            flight_set,
            flight_filter: WhereClause::by_id(FlightColumn::Id, flight_id),
            ticket_set,
            ticket_filter,
        })
    }
}

struct StateTracker {
    flight_id: FlightId,
    state: CoordinatorState,
}

impl StateTracker {
    fn new(flight_id: FlightId) -> Self {
        Self {
            flight_id,
            state: CoordinatorState::Idle,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.next() {
            debug!(flight_id = self.flight_id, from = %self.state, to = %next, "Cascade state");
            self.state = next;
        }
    }

    fn roll_back(&mut self) {
        debug!(
            flight_id = self.flight_id,
            from = %self.state,
            to = %CoordinatorState::RolledBack,
            "Cascade state"
        );
        self.state = CoordinatorState::RolledBack;
    }
}

/// Execute the flight update and ticket repricing as one transaction
///
/// # Arguments
///
/// * `store` - Opens the transaction both statements run in
/// * `flight_id` - Flight to update; also scopes the ticket update
/// * `flight_update` - Flight fields to set; empty skips the flight statement
/// * `ticket_update` - Ticket fields to set on every ticket of the flight; empty skips it
///
/// Either both statements commit or neither does. If the returned future is
/// dropped mid-sequence, the open transaction is dropped with it and rolls back.
pub async fn execute(
    store: &dyn TransactionalBookingStore,
    flight_id: FlightId,
    flight_update: &FlightUpdate,
    ticket_update: &TicketUpdate,
) -> Result<CascadeOutcome> {
    // Bad specs fail here, before any connection is taken
    let plan = CascadePlan::build(flight_id, flight_update, ticket_update)?;
    let mut tracker = StateTracker::new(flight_id);

    let mut tx = store.begin_transaction().await?;
    tracker.advance();

    match apply(tx.as_mut(), &plan, &mut tracker).await {
        Ok(outcome) => match tx.commit().await {
            Ok(()) => {
                tracker.advance();
                info!(
                    flight_id,
                    flight_updated = outcome.flight_updated,
                    tickets_updated = outcome.tickets_updated,
                    "Flight update committed"
                );
                Ok(outcome)
            }
            Err(cause) => {
                // A failed commit leaves nothing applied
                tracker.roll_back();
                error!(flight_id, error = %cause, "Commit failed");
                Err(AppError::transaction_failure(cause, None))
            }
        },
        Err(cause) => {
            let rollback_error = tx.rollback().await.err();
            tracker.roll_back();

            match &rollback_error {
                None => warn!(flight_id, error = %cause, "Flight update rolled back"),
                Some(rb) => error!(
                    flight_id,
                    error = %cause,
                    rollback_error = %rb,
                    "Flight update failed and rollback failed"
                ),
            }

            Err(AppError::transaction_failure(cause, rollback_error))
        }
    }
}

async fn apply(
    tx: &mut dyn BookingTransaction,
    plan: &CascadePlan,
    tracker: &mut StateTracker,
) -> Result<CascadeOutcome> {
    let flight_rows = match &plan.flight_set {
        Some(set) => tx.update_flights(set, &plan.flight_filter).await?,
        None => {
            debug!(
                flight_id = tracker.flight_id,
                "No flight fields supplied, skipping flight update"
            );
            0
        }
    };
    tracker.advance();

    let tickets_updated = match &plan.ticket_set {
        Some(set) => tx.update_tickets(set, &plan.ticket_filter).await?,
        None => 0,
    };
    tracker.advance();

    Ok(CascadeOutcome {
        flight_updated: flight_rows > 0,
        tickets_updated,
    })
}
