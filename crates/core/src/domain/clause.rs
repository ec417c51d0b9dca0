// Clause Builder
//
// Renders SET / WHERE fragments with `?` placeholders only. Values travel
// separately in `values()` and are bound by the store adapter.

use crate::domain::spec::{Column, FilterSpec, PartialUpdateSpec, SqlValue};
use crate::error::{AppError, Result};
use std::marker::PhantomData;

/// Placeholder used for every bound value (SQLite positional parameter)
pub const PLACEHOLDER: &str = "?";

/// What an empty filter is allowed to mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Reject an empty filter
    RequireRestriction,
    /// Treat an empty filter as "every row"
    AllowUnrestricted,
}

/// `col = ?, col = ?` for table `C::TABLE`
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause<C> {
    sql: String,
    values: Vec<SqlValue>,
    _table: PhantomData<C>,
}

impl<C: Column> SetClause<C> {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn table(&self) -> &'static str {
        C::TABLE
    }
}

/// `col = ? AND col = ?` for table `C::TABLE`
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause<C> {
    sql: String,
    values: Vec<SqlValue>,
    _table: PhantomData<C>,
}

impl<C: Column> WhereClause<C> {
    /// Single-row restriction on the table's primary key
    pub fn by_id(id_column: C, id: i64) -> Self {
        Self {
            sql: format!("{} = {}", id_column.name(), PLACEHOLDER),
            values: vec![SqlValue::Integer(id)],
            _table: PhantomData,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn is_unrestricted(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build the SET list for every present field of `spec`
///
/// # Errors
/// `AppError::Validation` when `spec` has no fields; such a statement must not
/// be sent to the store.
pub fn build_set_clause<C: Column>(spec: &PartialUpdateSpec<C>) -> Result<SetClause<C>> {
    if spec.is_empty() {
        return Err(AppError::Validation(format!(
            "update of {} has no fields to set",
            C::TABLE
        )));
    }

    let (sql, values) = render(spec.fields(), ", ");
    Ok(SetClause {
        sql,
        values,
        _table: PhantomData,
    })
}

/// Build the WHERE condition for `filter`
///
/// An empty filter renders as `1 = 1` under `FilterMode::AllowUnrestricted` and
/// is rejected under `FilterMode::RequireRestriction`.
pub fn build_where_clause<C: Column>(
    filter: &FilterSpec<C>,
    mode: FilterMode,
) -> Result<WhereClause<C>> {
    if filter.is_empty() {
        return match mode {
            FilterMode::AllowUnrestricted => Ok(WhereClause {
                sql: "1 = 1".to_string(),
                values: Vec::new(),
                _table: PhantomData,
            }),
            FilterMode::RequireRestriction => Err(AppError::Validation(format!(
                "filter on {} is empty; refusing to match every row",
                C::TABLE
            ))),
        };
    }

    let (sql, values) = render(filter.fields(), " AND ");
    Ok(WhereClause {
        sql,
        values,
        _table: PhantomData,
    })
}

fn render<'a, C: Column>(
    fields: impl Iterator<Item = (C, &'a SqlValue)>,
    separator: &str,
) -> (String, Vec<SqlValue>) {
    let mut parts = Vec::new();
    let mut values = Vec::new();

    for (column, value) in fields {
        parts.push(format!("{} = {}", column.name(), PLACEHOLDER));
        values.push(value.clone());
    }

    (parts.join(separator), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlightColumn, TicketColumn};
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_empty_set_is_rejected() {
        let spec: PartialUpdateSpec<FlightColumn> = PartialUpdateSpec::new();
        let err = assert_err!(build_set_clause(&spec));
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_placeholders_match_values_in_order() {
        let spec = PartialUpdateSpec::new()
            .set(FlightColumn::FlightNo, "NW111")
            .set(FlightColumn::AircraftId, 3_i64)
            .set(FlightColumn::Status, "STATUS");

        let clause = assert_ok!(build_set_clause(&spec));
        assert_eq!(clause.sql(), "flight_no = ?, aircraft_id = ?, status = ?");
        assert_eq!(clause.sql().matches(PLACEHOLDER).count(), 3);
        assert_eq!(
            clause.values(),
            &[
                SqlValue::Text("NW111".into()),
                SqlValue::Integer(3),
                SqlValue::Text("STATUS".into()),
            ]
        );
        assert_eq!(clause.table(), "flight");
    }

    #[test]
    fn test_values_never_enter_sql_text() {
        let spec = PartialUpdateSpec::new().set(FlightColumn::Status, "x'; DROP TABLE flight; --");

        let clause = assert_ok!(build_set_clause(&spec));
        assert_eq!(clause.sql(), "status = ?");
        assert!(!clause.sql().contains("DROP"));
    }

    #[test]
    fn test_where_joins_with_and() {
        let filter = FilterSpec::new()
            .require(TicketColumn::FlightId, 8_i64)
            .require(TicketColumn::SeatNo, "B1");

        let clause = assert_ok!(build_where_clause(&filter, FilterMode::RequireRestriction));
        assert_eq!(clause.sql(), "flight_id = ? AND seat_no = ?");
        assert_eq!(clause.values().len(), 2);
        assert!(!clause.is_unrestricted());
    }

    #[test]
    fn test_empty_where_is_guarded() {
        let filter: FilterSpec<TicketColumn> = FilterSpec::new();

        assert_err!(build_where_clause(&filter, FilterMode::RequireRestriction));

        let clause = assert_ok!(build_where_clause(&filter, FilterMode::AllowUnrestricted));
        assert_eq!(clause.sql(), "1 = 1");
        assert!(clause.is_unrestricted());
    }

    #[test]
    fn test_by_id() {
        let clause = WhereClause::by_id(FlightColumn::Id, 9);
        assert_eq!(clause.sql(), "id = ?");
        assert_eq!(clause.values(), &[SqlValue::Integer(9)]);
    }
}
