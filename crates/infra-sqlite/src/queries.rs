// SQL shared by the pool-backed stores and the booking transaction
//
// Every function takes any SQLite executor: `&SqlitePool` runs the statement
// auto-committed, `&mut *tx` runs it inside a caller-owned transaction.

use crate::error::map_sqlx_error;
use chrono::NaiveDateTime;
use flightbook_core::domain::{
    Column, Flight, FlightId, NewFlight, NewTicket, PassengerTicketCount, SetClause, SqlValue,
    Ticket, TicketId, WhereClause,
};
use flightbook_core::error::Result;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqliteExecutor};
use tracing::debug;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

const FLIGHT_COLUMNS: &str = "id, flight_no, departure_date, departure_airport_code, \
     arrival_date, arrival_airport_code, aircraft_id, status";

const TICKET_COLUMNS: &str = "id, passport_no, passenger_name, flight_id, seat_no, cost";

/// Bind one value with its own SQL type: integers as INTEGER, text as TEXT
pub(crate) fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q SqlValue) -> SqliteQuery<'q> {
    match value {
        SqlValue::Integer(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.as_str()),
        SqlValue::Timestamp(v) => query.bind(*v),
    }
}

/// `UPDATE <table> SET <set> WHERE <filter>`
///
/// Only the table name and column identifiers are formatted into the SQL text;
/// all values go through `bind_value`.
pub(crate) async fn filtered_update<'e, C: Column>(
    executor: impl SqliteExecutor<'e>,
    set: &SetClause<C>,
    filter: &WhereClause<C>,
) -> Result<u64> {
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        C::TABLE,
        set.sql(),
        filter.sql()
    );

    let mut query = sqlx::query(&sql);
    for value in set.values().iter().chain(filter.values()) {
        query = bind_value(query, value);
    }

    let result = query.execute(executor).await.map_err(map_sqlx_error)?;

    debug!(
        table = C::TABLE,
        set = set.sql(),
        filter = filter.sql(),
        affected = result.rows_affected(),
        "Filtered update"
    );

    Ok(result.rows_affected())
}

// ---- flight ----

#[derive(Debug, sqlx::FromRow)]
struct FlightRow {
    id: i64,
    flight_no: String,
    departure_date: NaiveDateTime,
    departure_airport_code: String,
    arrival_date: NaiveDateTime,
    arrival_airport_code: String,
    aircraft_id: i64,
    status: String,
}

impl FlightRow {
    fn into_flight(self) -> Flight {
        Flight {
            id: self.id,
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

pub(crate) async fn insert_flight<'e>(
    executor: impl SqliteExecutor<'e>,
    flight: NewFlight,
) -> Result<Flight> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO flight (
            flight_no, departure_date, departure_airport_code,
            arrival_date, arrival_airport_code, aircraft_id, status
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&flight.flight_no)
    .bind(flight.departure_date)
    .bind(&flight.departure_airport_code)
    .bind(flight.arrival_date)
    .bind(&flight.arrival_airport_code)
    .bind(flight.aircraft_id)
    .bind(&flight.status)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(flight.with_id(id))
}

pub(crate) async fn find_flight<'e>(
    executor: impl SqliteExecutor<'e>,
    id: FlightId,
) -> Result<Option<Flight>> {
    let sql = format!("SELECT {} FROM flight WHERE id = ?", FLIGHT_COLUMNS);
    let row = sqlx::query_as::<_, FlightRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(row.map(FlightRow::into_flight))
}

pub(crate) async fn find_all_flights<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<Flight>> {
    let sql = format!("SELECT {} FROM flight ORDER BY id ASC", FLIGHT_COLUMNS);
    let rows: Vec<FlightRow> = sqlx::query_as(&sql)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(FlightRow::into_flight).collect())
}

pub(crate) async fn update_flight<'e>(
    executor: impl SqliteExecutor<'e>,
    flight: &Flight,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE flight
        SET flight_no = ?, departure_date = ?, departure_airport_code = ?,
            arrival_date = ?, arrival_airport_code = ?, aircraft_id = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(&flight.flight_no)
    .bind(flight.departure_date)
    .bind(&flight.departure_airport_code)
    .bind(flight.arrival_date)
    .bind(&flight.arrival_airport_code)
    .bind(flight.aircraft_id)
    .bind(&flight.status)
    .bind(flight.id)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_flight<'e>(
    executor: impl SqliteExecutor<'e>,
    id: FlightId,
) -> Result<bool> {
    let result = sqlx::query("DELETE FROM flight WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(result.rows_affected() > 0)
}

// ---- ticket ----

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: i64,
    passport_no: String,
    passenger_name: String,
    flight_id: i64,
    seat_no: String,
    cost: i32,
}

impl TicketRow {
    fn into_ticket(self) -> Ticket {
        Ticket {
            id: self.id,
            passport_no: self.passport_no,
            passenger_name: self.passenger_name,
            flight_id: self.flight_id,
            seat_no: self.seat_no,
            cost: self.cost,
        }
    }
}

pub(crate) async fn insert_ticket<'e>(
    executor: impl SqliteExecutor<'e>,
    ticket: NewTicket,
) -> Result<Ticket> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO ticket (passport_no, passenger_name, flight_id, seat_no, cost)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&ticket.passport_no)
    .bind(&ticket.passenger_name)
    .bind(ticket.flight_id)
    .bind(&ticket.seat_no)
    .bind(ticket.cost)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(ticket.with_id(id))
}

pub(crate) async fn find_ticket<'e>(
    executor: impl SqliteExecutor<'e>,
    id: TicketId,
) -> Result<Option<Ticket>> {
    let sql = format!("SELECT {} FROM ticket WHERE id = ?", TICKET_COLUMNS);
    let row = sqlx::query_as::<_, TicketRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(row.map(TicketRow::into_ticket))
}

pub(crate) async fn find_all_tickets<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<Ticket>> {
    let sql = format!("SELECT {} FROM ticket ORDER BY id ASC", TICKET_COLUMNS);
    let rows: Vec<TicketRow> = sqlx::query_as(&sql)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(TicketRow::into_ticket).collect())
}

pub(crate) async fn find_tickets_by_flight<'e>(
    executor: impl SqliteExecutor<'e>,
    flight_id: FlightId,
) -> Result<Vec<Ticket>> {
    let sql = format!(
        "SELECT {} FROM ticket WHERE flight_id = ? ORDER BY id ASC",
        TICKET_COLUMNS
    );
    let rows: Vec<TicketRow> = sqlx::query_as(&sql)
        .bind(flight_id)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(TicketRow::into_ticket).collect())
}

pub(crate) async fn update_ticket<'e>(
    executor: impl SqliteExecutor<'e>,
    ticket: &Ticket,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE ticket
        SET passport_no = ?, passenger_name = ?, flight_id = ?, seat_no = ?, cost = ?
        WHERE id = ?
        "#,
    )
    .bind(&ticket.passport_no)
    .bind(&ticket.passenger_name)
    .bind(ticket.flight_id)
    .bind(&ticket.seat_no)
    .bind(ticket.cost)
    .bind(ticket.id)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_ticket<'e>(
    executor: impl SqliteExecutor<'e>,
    id: TicketId,
) -> Result<bool> {
    let result = sqlx::query("DELETE FROM ticket WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn most_common_first_names<'e>(
    executor: impl SqliteExecutor<'e>,
    limit: u32,
) -> Result<Vec<String>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT
            CASE WHEN instr(passenger_name, ' ') > 0
                 THEN substr(passenger_name, 1, instr(passenger_name, ' ') - 1)
                 ELSE passenger_name
            END AS name,
            COUNT(*) AS count
        FROM ticket
        GROUP BY name
        ORDER BY count DESC, name ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(|(name, _)| name).collect())
}

pub(crate) async fn passenger_ticket_counts<'e>(
    executor: impl SqliteExecutor<'e>,
) -> Result<Vec<PassengerTicketCount>> {
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        r#"
        SELECT passport_no, passenger_name, COUNT(*) AS ticket_count
        FROM ticket
        GROUP BY passport_no, passenger_name
        ORDER BY ticket_count DESC, passenger_name ASC
        "#,
    )
    .fetch_all(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(rows
        .into_iter()
        .map(|(passport_no, passenger_name, ticket_count)| PassengerTicketCount {
            passport_no,
            passenger_name,
            ticket_count,
        })
        .collect())
}
