// Flight Store Port (Interface)

use crate::domain::{Flight, FlightColumn, FlightId, NewFlight, SetClause, WhereClause};
use crate::error::Result;
use async_trait::async_trait;

/// Record store for the `flight` table
///
/// Every call runs as its own auto-committed statement. For multi-statement
/// atomic work use [`crate::port::TransactionalBookingStore`].
#[async_trait]
pub trait FlightStore: Send + Sync {
    /// Insert a flight and return it with its assigned id
    async fn save(&self, flight: NewFlight) -> Result<Flight>;

    async fn find_by_id(&self, id: FlightId) -> Result<Option<Flight>>;

    /// All flights ordered by id
    async fn find_all(&self) -> Result<Vec<Flight>>;

    /// Overwrite every mutable column of `flight`. Returns false if no row has its id.
    async fn update(&self, flight: &Flight) -> Result<bool>;

    async fn delete_by_id(&self, id: FlightId) -> Result<bool>;

    /// `UPDATE flight SET <set> WHERE <filter>`, returning the affected row count
    async fn apply_filtered_update(
        &self,
        set: &SetClause<FlightColumn>,
        filter: &WhereClause<FlightColumn>,
    ) -> Result<u64>;
}
