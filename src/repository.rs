//! Generic repository: CRUD plus dynamic query composition.
//!
//! A [`Repository`] owns exactly one live `SelectStatement` handle. `filter`
//! and `paginate` compose onto that handle and return `&mut Self` for
//! chaining; `get_all` executes whatever was composed and swaps in a fresh
//! handle, so every read pipeline starts from `SELECT * FROM <table>`. CRUD
//! operations build their own one-shot statements and leave the composed
//! handle alone.

use std::marker::PhantomData;

use sea_query::{Expr, ExprTrait, SelectStatement};

use crate::error::DbError;
use crate::executor::QueryExecutor;
use crate::filter::{DefaultFilter, Filter, FilterOptions};
use crate::pagination::{DefaultPagination, Paginate, Pagination};
use crate::schema::Model;

/// Generic repository over a record type `T` and an executor `E`.
///
/// The executor is injected per repository; there is no process-wide
/// connection state. Instances are single-owner: the composed handle is
/// mutated in place, so a repository must not be shared across concurrent
/// contexts. Create one per logical request instead.
///
/// # Example
///
/// ```ignore
/// use berth::{FilterOptions, Pagination, Repository};
///
/// let mut repo: Repository<User, _> = Repository::new(executor);
/// let filters = FilterOptions::new().with("user_name", "alice");
/// let mut page = Pagination { page: 2, sort: "desc".into(), ..Default::default() };
///
/// let users = repo.filter(Some(&filters)).paginate(&mut page).get_all()?;
/// assert_eq!(page.total_pages, (page.total as f64 / 10.0).ceil() as i32);
/// ```
pub struct Repository<T, E> {
    executor: E,
    query: SelectStatement,
    filter: Box<dyn Filter>,
    pagination: Box<dyn Paginate>,
    deferred: Option<DbError>,
    _model: PhantomData<T>,
}

impl<T, E> Repository<T, E>
where
    T: Model,
    E: QueryExecutor<T>,
{
    /// Create a repository with the default filter and pagination
    /// translators.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            query: Self::fresh_query(),
            filter: Box::new(DefaultFilter),
            pagination: Box::new(DefaultPagination),
            deferred: None,
            _model: PhantomData,
        }
    }

    /// `SELECT * FROM <table>` for `T`.
    fn fresh_query() -> SelectStatement {
        let mut query = SelectStatement::default();
        query.column(sea_query::Asterisk).from(T::table_name());
        query
    }

    /// Fresh query narrowed to the primary key.
    fn pk_query(id: u32) -> SelectStatement {
        let mut query = Self::fresh_query();
        query.and_where(Expr::col((T::table_name(), T::primary_key())).eq(id));
        query
    }

    /// The injected executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Apply filter options to the composed query.
    ///
    /// Resolves `T`'s schema and applies the active translator. A resolution
    /// failure is swallowed: the query stays as it was and composition
    /// continues. Repeated calls intersect (conditions AND together).
    pub fn filter(&mut self, options: Option<&FilterOptions>) -> &mut Self {
        match T::resolve() {
            Ok(schema) => {
                let active = self.filter.translate(options, &schema);
                if !active.is_empty() {
                    self.query.cond_where(active.to_condition());
                }
            }
            Err(e) => {
                log::debug!(
                    "Schema resolution failed for {}; filter skipped: {e}",
                    std::any::type_name::<T>()
                );
            }
        }
        self
    }

    /// Apply pagination to the composed query.
    ///
    /// Counts the rows the current composition matches (so a preceding
    /// `filter` is reflected), lets the translator record totals on
    /// `pagination`, and applies the returned clauses. A count failure is
    /// deferred and surfaced by the next [`Repository::get_all`].
    pub fn paginate(&mut self, pagination: &mut Pagination) -> &mut Self {
        match self.executor.count(&self.query) {
            Ok(count) => {
                if let Some(clause) = self.pagination.translate(count, pagination) {
                    clause.apply(&mut self.query);
                }
            }
            Err(e) => {
                self.deferred = Some(e);
            }
        }
        self
    }

    /// Execute the composed query and reset the handle.
    ///
    /// The reset happens first, so the next composition starts fresh whether
    /// this call succeeds or fails. A deferred pagination error is returned
    /// here, before anything touches the database. Totals written to a
    /// `Pagination` by a preceding `paginate` remain valid for the caller.
    ///
    /// # Errors
    ///
    /// Returns the deferred error from a failed `paginate` count, or the
    /// executor's error verbatim.
    pub fn get_all(&mut self) -> Result<Vec<T>, DbError> {
        let query = std::mem::replace(&mut self.query, Self::fresh_query());
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        self.executor.fetch_all(&query)
    }

    /// Insert a record.
    ///
    /// # Errors
    ///
    /// Returns the executor's error verbatim.
    pub fn add(&self, record: &T) -> Result<(), DbError> {
        self.executor.create(record)
    }

    /// Fetch the record with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingId`] for a zero identifier and
    /// [`DbError::NotFound`] when no record matches.
    pub fn get(&self, id: u32) -> Result<T, DbError> {
        if id == 0 {
            return Err(DbError::MissingId);
        }
        self.executor.fetch_first(&Self::pk_query(id))
    }

    /// Replace the stored column values of the record with the given
    /// identifier.
    ///
    /// The record must exist: an existence check runs first and its failure
    /// propagates untranslated.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingId`] for a zero identifier,
    /// [`DbError::NotFound`] when no record matches, or the executor's error
    /// verbatim.
    pub fn update(&self, id: u32, record: &T) -> Result<(), DbError> {
        if id == 0 {
            return Err(DbError::MissingId);
        }
        self.executor.fetch_first(&Self::pk_query(id))?;
        self.executor.update(id, record)
    }

    /// Delete the record with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingId`] for a zero identifier,
    /// [`DbError::NotFound`] when no record matches, or the executor's error
    /// verbatim.
    pub fn delete(&self, id: u32) -> Result<(), DbError> {
        if id == 0 {
            return Err(DbError::MissingId);
        }
        self.executor.fetch_first(&Self::pk_query(id))?;
        self.executor.delete(id)
    }

    /// Swap the filter translation strategy.
    ///
    /// Composed state, pending errors, and the pagination strategy are left
    /// untouched.
    pub fn set_filter(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filter = Box::new(filter);
        self
    }

    /// Swap the pagination translation strategy.
    pub fn set_pagination(&mut self, pagination: impl Paginate + 'static) -> &mut Self {
        self.pagination = Box::new(pagination);
        self
    }
}
