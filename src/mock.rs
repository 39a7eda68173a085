//! Scripted executor for tests.
//!
//! [`MockExecutor`] answers from queues loaded up front and journals every
//! call together with the SQL it would have run, so tests can assert on
//! query composition without a database. The crate's own tests use it
//! directly; dependent crates get it through the `mock` feature.

use std::cell::RefCell;
use std::collections::VecDeque;

use sea_query::SelectStatement;

use crate::adapter::SqlBackend;
use crate::error::DbError;
use crate::executor::QueryExecutor;
use crate::schema::Model;

/// One executor call as recorded by [`MockExecutor`].
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Trait method that ran: `count`, `fetch_all`, `fetch_first`,
    /// `create`, `update` or `delete`.
    pub kind: &'static str,
    /// Rendered SQL for queries; `<table> id=<id>` for keyed mutations.
    pub detail: String,
}

/// Scripted [`QueryExecutor`].
///
/// Results, counts and errors are appended before the code under test runs
/// and consumed in call order. Every call drains a pending error first;
/// reads then pop their queue, and an empty queue reads as no rows.
pub struct MockExecutor<T> {
    backend: SqlBackend,
    results: RefCell<VecDeque<Vec<T>>>,
    counts: RefCell<VecDeque<i64>>,
    errors: RefCell<VecDeque<DbError>>,
    journal: RefCell<Vec<MockCall>>,
    created: RefCell<Vec<T>>,
    updated: RefCell<Vec<(u32, T)>>,
    deleted: RefCell<Vec<u32>>,
}

impl<T> MockExecutor<T> {
    /// Create an empty mock that renders journal SQL in the given dialect.
    pub fn new(backend: SqlBackend) -> Self {
        Self {
            backend,
            results: RefCell::new(VecDeque::new()),
            counts: RefCell::new(VecDeque::new()),
            errors: RefCell::new(VecDeque::new()),
            journal: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            updated: RefCell::new(Vec::new()),
            deleted: RefCell::new(Vec::new()),
        }
    }

    /// Queue a row set for the next `fetch_all`/`fetch_first`.
    pub fn append_result(&self, rows: Vec<T>) {
        self.results.borrow_mut().push_back(rows);
    }

    /// Queue a value for the next `count`.
    pub fn append_count(&self, count: i64) {
        self.counts.borrow_mut().push_back(count);
    }

    /// Queue an error; the next call of any kind returns it.
    pub fn append_error(&self, error: DbError) {
        self.errors.borrow_mut().push_back(error);
    }

    /// Every call made so far, in order.
    pub fn journal(&self) -> Vec<MockCall> {
        self.journal.borrow().clone()
    }

    /// Identifiers passed to `delete`.
    pub fn deleted(&self) -> Vec<u32> {
        self.deleted.borrow().clone()
    }

    fn record(&self, kind: &'static str, detail: String) {
        self.journal.borrow_mut().push(MockCall { kind, detail });
    }

    fn take_error(&self) -> Option<DbError> {
        self.errors.borrow_mut().pop_front()
    }

    fn render(&self, query: &SelectStatement) -> String {
        let (sql, _) = self.backend.build_select(query);
        sql
    }
}

impl<T: Clone> MockExecutor<T> {
    /// Records passed to `create`.
    pub fn created(&self) -> Vec<T> {
        self.created.borrow().clone()
    }

    /// Identifier and record pairs passed to `update`.
    pub fn updated(&self) -> Vec<(u32, T)> {
        self.updated.borrow().clone()
    }
}

impl<T> QueryExecutor<T> for MockExecutor<T>
where
    T: Model + Clone,
{
    fn count(&self, query: &SelectStatement) -> Result<i64, DbError> {
        self.record("count", self.render(query));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok(self.counts.borrow_mut().pop_front().unwrap_or(0))
    }

    fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<T>, DbError> {
        self.record("fetch_all", self.render(query));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok(self.results.borrow_mut().pop_front().unwrap_or_default())
    }

    fn fetch_first(&self, query: &SelectStatement) -> Result<T, DbError> {
        self.record("fetch_first", self.render(query));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.results
            .borrow_mut()
            .pop_front()
            .and_then(|rows| rows.into_iter().next())
            .ok_or(DbError::NotFound)
    }

    fn create(&self, record: &T) -> Result<(), DbError> {
        self.record("create", T::table_name().to_string());
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.created.borrow_mut().push(record.clone());
        Ok(())
    }

    fn update(&self, id: u32, record: &T) -> Result<(), DbError> {
        self.record("update", format!("{} id={id}", T::table_name()));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.updated.borrow_mut().push((id, record.clone()));
        Ok(())
    }

    fn delete(&self, id: u32) -> Result<(), DbError> {
        self.record("delete", format!("{} id={id}", T::table_name()));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.deleted.borrow_mut().push(id);
        Ok(())
    }
}
