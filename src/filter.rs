//! Filter translation: logical (field, value) pairs into validated predicates.
//!
//! Callers describe filters against logical field names; the translator
//! resolves them through a [`TableSchema`] into physical `table.column`
//! predicates. Keys that match no schema field are dropped silently, so the
//! output can only shrink relative to the input. Missing or empty options
//! translate to an empty set and leave the query untouched.

use sea_query::{Condition, Expr, ExprTrait};

use crate::schema::TableSchema;

/// One logical filter criterion supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPair {
    /// Logical field name on the record type
    pub key: String,
    /// Value the field must equal
    pub value: String,
}

impl FilterPair {
    /// Create a filter pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Caller-facing filter input: an ordered list of [`FilterPair`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub filters: Vec<FilterPair>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(FilterPair::new(key, value));
        self
    }
}

/// A validated, schema-resolved predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    table: String,
    column: String,
    value: String,
}

impl ActiveFilter {
    /// Qualified `table.column` key of this predicate.
    pub fn key(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }

    /// Value the column must equal.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Mapping of qualified column keys to required values.
///
/// Entries keep translation order; re-translating a key overwrites its value
/// in place (mapping semantics). [`ActiveFilterSet::to_condition`] renders
/// the set as equality comparisons combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilterSet {
    entries: Vec<ActiveFilter>,
}

impl ActiveFilterSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ActiveFilter] {
        &self.entries
    }

    /// Insert a resolved predicate; re-inserting a key overwrites its value.
    pub fn insert(&mut self, table: &str, column: &str, value: &str) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.table == table && e.column == column)
        {
            existing.value = value.to_string();
            return;
        }
        self.entries.push(ActiveFilter {
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        });
    }

    /// Render the set as a conjunction of `table.column = value` comparisons.
    pub fn to_condition(&self) -> Condition {
        let mut condition = Condition::all();
        for entry in &self.entries {
            condition = condition.add(
                Expr::col((entry.table.clone(), entry.column.clone())).eq(entry.value.clone()),
            );
        }
        condition
    }
}

/// Strategy contract for filter translation.
///
/// Implementations must be pure with respect to their inputs: neither the
/// options nor the schema are mutated, and translation itself never fails.
/// Unresolvable input degrades to a smaller (possibly empty) output.
pub trait Filter: Send + Sync {
    /// Translate logical pairs into a validated predicate set.
    fn translate(&self, options: Option<&FilterOptions>, schema: &TableSchema)
        -> ActiveFilterSet;
}

/// Default translator: exact logical-name match, silent drop of unknowns.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilter;

impl Filter for DefaultFilter {
    fn translate(
        &self,
        options: Option<&FilterOptions>,
        schema: &TableSchema,
    ) -> ActiveFilterSet {
        let mut active = ActiveFilterSet::default();
        let Some(options) = options else {
            return active;
        };
        for pair in &options.filters {
            if let Some(field) = schema.field(&pair.key) {
                active.insert(&schema.table, &field.column, &pair.value);
            }
        }
        active
    }
}
