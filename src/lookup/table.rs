//! Read-only reference tables

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A case-insensitive row filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Equals { column: String, value: String },
    NotEquals { column: String, value: String },
    StartsWith { column: String, prefix: String },
}

impl Filter {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotEquals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn starts_with(column: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::StartsWith {
            column: column.into(),
            prefix: prefix.into(),
        }
    }

    fn column(&self) -> &str {
        match self {
            Self::Equals { column, .. }
            | Self::NotEquals { column, .. }
            | Self::StartsWith { column, .. } => column,
        }
    }

    /// A filter on a column the table lacks matches nothing, except `NotEquals`
    fn accepts(&self, cell: Option<&str>) -> bool {
        match (self, cell) {
            (Self::Equals { value, .. }, Some(cell)) => cell.eq_ignore_ascii_case(value),
            (Self::NotEquals { value, .. }, Some(cell)) => !cell.eq_ignore_ascii_case(value),
            (Self::NotEquals { .. }, None) => true,
            (Self::StartsWith { prefix, .. }, Some(cell)) => cell
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
            _ => false,
        }
    }
}

/// Tabular reference data queried by the custom functions
pub trait LookupTable: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn columns(&self) -> &[String];

    fn rows(&self) -> &[Vec<String>];

    /// Position of `column`, matched case-insensitively
    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns()
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
    }

    /// Rows accepted by every filter
    fn matching_rows(&self, filters: &[Filter]) -> Vec<&[String]> {
        let indexed: Vec<(&Filter, Option<usize>)> = filters
            .iter()
            .map(|filter| (filter, self.column_index(filter.column())))
            .collect();
        self.rows()
            .iter()
            .filter(|row| {
                indexed.iter().all(|(filter, index)| {
                    filter.accepts(index.and_then(|i| row.get(i)).map(String::as_str))
                })
            })
            .map(Vec::as_slice)
            .collect()
    }

    /// Distinct non-empty values of `column` over the matching rows, in table order
    fn find_distinct(&self, column: &str, filters: &[Filter]) -> Vec<String> {
        let Some(index) = self.column_index(column) else {
            debug!("table {} has no column {column}", self.name());
            return Vec::new();
        };
        self.matching_rows(filters)
            .into_iter()
            .filter_map(|row| row.get(index))
            .filter(|value| !value.is_empty())
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// The value of `column` when all matching rows agree on it
    fn find_single_result(&self, column: &str, filters: &[Filter]) -> Option<String> {
        let mut values = self.find_distinct(column, filters);
        match values.len() {
            1 => values.pop(),
            0 => None,
            n => {
                warn!(
                    "{n} different {column} values in table {} for {filters:?}",
                    self.name()
                );
                None
            }
        }
    }
}

/// A lookup table held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryLookupTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl InMemoryLookupTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from a header row and data rows
    pub fn from_rows<R, C>(name: impl Into<String>, header: &[&str], rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut table = Self::new(name, header.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, padding short rows with empty cells
    pub fn push_row<C>(&mut self, row: C)
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.resize(self.columns.len().max(cells.len()), String::new());
        self.rows.push(cells);
    }
}

impl LookupTable for InMemoryLookupTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Named set of shared tables
///
/// Readers get an `Arc` snapshot of a table; replacing a table never affects a
/// snapshot already handed out.
#[derive(Debug, Default)]
pub struct LookupTables {
    tables: RwLock<IndexMap<String, Arc<dyn LookupTable>>>,
}

impl LookupTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same name
    pub fn insert(&self, table: impl LookupTable + 'static) -> Option<Arc<dyn LookupTable>> {
        let name = table.name().to_string();
        self.tables.write().insert(name, Arc::new(table))
    }

    pub fn with_table(self, table: impl LookupTable + 'static) -> Self {
        self.insert(table);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LookupTable>> {
        self.tables.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> InMemoryLookupTable {
        InMemoryLookupTable::from_rows(
            "test",
            &["a", "b", "c"],
            vec![
                vec!["1", "x", "same"],
                vec!["2", "X", "same"],
                vec!["3", "y", "other"],
                vec!["4", "yz"],
            ],
        )
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = table();
        assert_eq!(table.column_index("B"), Some(1));
        assert_eq!(table.column_index("d"), None);
        assert_eq!(table.rows()[3].len(), 3);
    }

    #[test]
    fn test_filters() {
        let table = table();
        assert_eq!(table.find_distinct("a", &[Filter::equals("b", "x")]), vec!["1", "2"]);
        assert_eq!(table.find_distinct("a", &[Filter::starts_with("B", "Y")]), vec!["3", "4"]);
        assert_eq!(
            table.find_distinct("a", &[Filter::not_equals("b", "X"), Filter::not_equals("missing", "")]),
            vec!["3", "4"]
        );
        assert!(table.find_distinct("a", &[Filter::equals("missing", "1")]).is_empty());
    }

    #[test]
    fn test_single_result_requires_agreement() {
        let table = table();
        assert_eq!(
            table.find_single_result("c", &[Filter::equals("b", "x")]),
            Some("same".to_string())
        );
        assert_eq!(table.find_single_result("c", &[]), None);
        assert_eq!(table.find_single_result("c", &[Filter::equals("a", "9")]), None);
    }

    #[test]
    fn test_replacing_a_table_keeps_old_snapshots() {
        let tables = LookupTables::new().with_table(table());
        let snapshot = tables.get("test").unwrap();
        tables.insert(InMemoryLookupTable::new("test", vec!["only".to_string()]));
        assert_eq!(snapshot.columns().len(), 3);
        assert_eq!(tables.get("test").unwrap().columns().len(), 1);
        assert_eq!(tables.names(), vec!["test"]);
    }
}
