// Book Ticket Use Case

use crate::domain::{NewTicket, Ticket};
use crate::error::{AppError, Result};
use crate::port::{BookingTransaction, TransactionalBookingStore};
use tracing::info;

/// Maximum length of passport number, passenger name and seat number
pub const MAX_TEXT_FIELD_LEN: usize = 128;

/// Validate a ticket before it reaches the store
pub fn validate_ticket(ticket: &NewTicket) -> Result<()> {
    for (field, value) in [
        ("passport_no", &ticket.passport_no),
        ("passenger_name", &ticket.passenger_name),
        ("seat_no", &ticket.seat_no),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} cannot be empty", field)));
        }
        if value.len() > MAX_TEXT_FIELD_LEN {
            return Err(AppError::Validation(format!(
                "{} too long (max {} bytes)",
                field, MAX_TEXT_FIELD_LEN
            )));
        }
    }

    if ticket.cost < 0 {
        return Err(AppError::Validation(format!(
            "cost must be non-negative, got {}",
            ticket.cost
        )));
    }

    Ok(())
}

/// Execute book use case (with transaction so the flight check and insert agree)
///
/// # Arguments
///
/// * `store` - Transactional booking store
/// * `ticket` - Ticket to insert; its flight must exist
pub async fn execute(store: &dyn TransactionalBookingStore, ticket: NewTicket) -> Result<Ticket> {
    validate_ticket(&ticket)?;

    let mut tx = store.begin_transaction().await?;

    match insert_checked(tx.as_mut(), ticket).await {
        Ok(saved) => {
            tx.commit().await?;
            info!(ticket_id = saved.id, flight_id = saved.flight_id, "Ticket booked");
            Ok(saved)
        }
        Err(cause) => match tx.rollback().await {
            Ok(()) => Err(cause),
            Err(rollback_error) => Err(AppError::transaction_failure(cause, Some(rollback_error))),
        },
    }
}

async fn insert_checked(tx: &mut dyn BookingTransaction, ticket: NewTicket) -> Result<Ticket> {
    if tx.find_flight(ticket.flight_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Flight {} not found",
            ticket.flight_id
        )));
    }

    tx.insert_ticket(ticket).await
}
