//! Flightbook CLI - flights, tickets and coordinated repricing on SQLite

mod config;
mod output;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use colored::Colorize;
use flightbook_core::application::{BookingUpdateCoordinator, TicketingService};
use flightbook_core::domain::{status, FlightUpdate, NewFlight, NewTicket, TicketUpdate};
use flightbook_core::port::{FlightStore, TicketStore};
use flightbook_core::AppError;
use flightbook_infra_sqlite::{
    create_pool, run_migrations, SqliteBookingStore, SqliteFlightStore, SqliteTicketStore,
    DEFAULT_MAX_CONNECTIONS,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{parse_datetime, LogFormat, DEFAULT_DB_URL};

#[derive(Parser)]
#[command(name = "flightbook")]
#[command(about = "Flight and ticket records with coordinated repricing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database URL
    #[arg(long, global = true, env = "FLIGHTBOOK_DB_URL", default_value = DEFAULT_DB_URL)]
    db_url: String,

    /// Pool size for file databases
    #[arg(
        long,
        global = true,
        env = "FLIGHTBOOK_MAX_CONNECTIONS",
        default_value_t = DEFAULT_MAX_CONNECTIONS
    )]
    max_connections: u32,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// List all flights
    Flights,

    /// Show one flight
    Flight {
        /// Flight ID
        id: i64,
    },

    /// Create a flight
    AddFlight {
        #[arg(long)]
        flight_no: String,

        /// Departure time (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_datetime)]
        departure: NaiveDateTime,

        #[arg(long)]
        from: String,

        /// Arrival time (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_datetime)]
        arrival: NaiveDateTime,

        #[arg(long)]
        to: String,

        #[arg(long)]
        aircraft_id: i64,

        #[arg(long, default_value = status::SCHEDULED)]
        status: String,
    },

    /// Delete a flight (its tickets are kept)
    DeleteFlight {
        /// Flight ID
        id: i64,
    },

    /// List tickets
    Tickets {
        /// Only tickets booked on this flight
        #[arg(short, long)]
        flight: Option<i64>,
    },

    /// Book a ticket on an existing flight
    Book {
        /// Flight ID
        flight_id: i64,

        #[arg(long)]
        passport_no: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        seat: String,

        #[arg(long)]
        cost: i32,
    },

    /// Update a flight and reprice its tickets in one transaction
    Reprice {
        /// Flight ID
        flight_id: i64,

        #[arg(long)]
        flight_no: Option<String>,

        #[arg(long)]
        aircraft_id: Option<i64>,

        #[arg(long)]
        status: Option<String>,

        /// New cost for every ticket on the flight
        #[arg(long)]
        cost: Option<i32>,
    },

    /// Most common passenger first names
    Names {
        #[arg(short = 'n', long, default_value = "5")]
        limit: u32,
    },

    /// Ticket count per passenger
    Passengers,
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flightbook=info"));

    // stdout carries command output, so logs go to stderr
    match LogFormat::from_env() {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    init_logging();

    // 2. Load configuration
    let pool_config = config::pool_config(&cli.db_url, cli.max_connections)?;
    info!(db_url = %pool_config.database_url, "Opening database");

    // 3. Initialize database
    let pool = create_pool(&pool_config)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let flights = SqliteFlightStore::new(pool.clone());
    let tickets = SqliteTicketStore::new(pool.clone());
    let booking_store = Arc::new(SqliteBookingStore::new(pool.clone()));
    let coordinator = BookingUpdateCoordinator::new(booking_store.clone());
    let ticketing = TicketingService::new(booking_store);

    match cli.command {
        Commands::Migrate => {
            println!("{}", "✓ Schema is up to date".green().bold());
        }

        Commands::Flights => {
            let all = flights.find_all().await?;
            if cli.json {
                print_json(&all)?;
            } else if all.is_empty() {
                println!("{}", "No flights".yellow());
            } else {
                println!("{}", output::flights_table(&all));
            }
        }

        Commands::Flight { id } => {
            let flight = flights
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("flight {}", id)))?;
            if cli.json {
                print_json(&flight)?;
            } else {
                println!("{}", output::flights_table(std::slice::from_ref(&flight)));
            }
        }

        Commands::AddFlight {
            flight_no,
            departure,
            from,
            arrival,
            to,
            aircraft_id,
            status,
        } => {
            let saved = flights
                .save(NewFlight {
                    flight_no,
                    departure_date: departure,
                    departure_airport_code: from,
                    arrival_date: arrival,
                    arrival_airport_code: to,
                    aircraft_id,
                    status,
                })
                .await?;
            if cli.json {
                print_json(&saved)?;
            } else {
                println!("{}", format!("✓ Flight {} saved", saved.id).green().bold());
                println!();
                println!("{}", output::flights_table(std::slice::from_ref(&saved)));
            }
        }

        Commands::DeleteFlight { id } => {
            if flights.delete_by_id(id).await? {
                println!("{}", format!("✓ Flight {} deleted", id).green().bold());
            } else {
                println!("{}", format!("Flight {} not found", id).yellow());
            }
        }

        Commands::Tickets { flight } => {
            let list = match flight {
                Some(flight_id) => tickets.find_by_flight_id(flight_id).await?,
                None => tickets.find_all().await?,
            };
            if cli.json {
                print_json(&list)?;
            } else if list.is_empty() {
                println!("{}", "No tickets".yellow());
            } else {
                println!("{}", output::tickets_table(&list));
            }
        }

        Commands::Book {
            flight_id,
            passport_no,
            name,
            seat,
            cost,
        } => {
            let ticket = ticketing
                .book(NewTicket {
                    passport_no,
                    passenger_name: name,
                    flight_id,
                    seat_no: seat,
                    cost,
                })
                .await?;
            if cli.json {
                print_json(&ticket)?;
            } else {
                println!("{}", format!("✓ Ticket {} booked", ticket.id).green().bold());
                println!();
                println!("{}", output::tickets_table(std::slice::from_ref(&ticket)));
            }
        }

        Commands::Reprice {
            flight_id,
            flight_no,
            aircraft_id,
            status,
            cost,
        } => {
            let mut flight_update = FlightUpdate::new();
            if let Some(flight_no) = flight_no {
                flight_update = flight_update.flight_no(flight_no);
            }
            if let Some(aircraft_id) = aircraft_id {
                flight_update = flight_update.aircraft_id(aircraft_id);
            }
            if let Some(status) = status {
                flight_update = flight_update.status(status);
            }

            let mut ticket_update = TicketUpdate::new();
            if let Some(cost) = cost {
                ticket_update = ticket_update.cost(cost);
            }

            let outcome = match coordinator
                .update_flight_and_cascade_ticket_pricing(flight_id, &flight_update, &ticket_update)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    // anyhow prints the error itself on return
                    if !cli.json {
                        for line in output::failure_details(&e) {
                            eprintln!("{}", line);
                        }
                    }
                    return Err(e.into());
                }
            };

            if cli.json {
                print_json(&outcome)?;
            } else {
                println!("{}", format!("✓ Flight {} committed", flight_id).green().bold());
                println!();
                let flight_state = if outcome.flight_updated {
                    "updated".green()
                } else {
                    "unchanged (no row matched)".yellow()
                };
                println!("  {} {}", "Flight:".bold(), flight_state);
                println!("  {} {}", "Tickets repriced:".bold(), outcome.tickets_updated);
            }
        }

        Commands::Names { limit } => {
            let names = tickets.most_common_first_names(limit).await?;
            if cli.json {
                print_json(&names)?;
            } else {
                println!("{}", output::names_table(&names));
            }
        }

        Commands::Passengers => {
            let counts = tickets.passenger_ticket_counts().await?;
            if cli.json {
                print_json(&counts)?;
            } else {
                println!("{}", output::passengers_table(&counts));
            }
        }
    }

    Ok(())
}
