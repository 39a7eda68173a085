//! Pagination translation: page geometry into offset/limit/order-by clauses.
//!
//! [`Pagination`] is caller-owned state. Its getters default lazily and write
//! the default back, so `Page = 0` becomes 1 and `PageSize <= 0` becomes 10
//! on first access and stay there. The translator receives the row count for the
//! composed query, records `total`/`total_pages` on the state, and emits a
//! [`PageClause`] for the query builder. Setting `bypass` short-circuits the
//! whole translation: no clauses, no totals, state untouched.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use sea_query::{Order, SelectStatement};

static MATCH_FIRST_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("hardcoded pattern compiles"));
static MATCH_ALL_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z0-9])([A-Z])").expect("hardcoded pattern compiles"));

/// Convert an arbitrarily cased column reference to snake_case.
///
/// Two-pass replacement: split a capitalized word off its predecessor, then
/// split remaining lower/upper boundaries. `userID` becomes `user_id`,
/// `CreatedAt` becomes `created_at`.
pub(crate) fn snake_case(input: &str) -> String {
    let snake = MATCH_FIRST_CAP.replace_all(input, "${1}_${2}");
    let snake = MATCH_ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// Caller-owned pagination state.
///
/// Counters are `i32` like the wire format they come from; totals are written
/// by the translator, everything else by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Requested page, 1-based; 0 defaults to 1 on first access
    pub page: i32,
    /// Rows per page; zero or negative defaults to 10 on first access
    pub page_size: i32,
    /// Sort direction token, carried verbatim (lowercased in the clause)
    pub sort: String,
    /// Total matching rows, written by the translator
    pub total: i32,
    /// Total pages at the effective page size, written by the translator
    pub total_pages: i32,
    /// Logical column to order by; empty defaults to `id` on first access
    pub order_by_column: String,
    /// When set, pagination is skipped entirely and every row is returned
    pub bypass: bool,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective page, defaulting `0` to `1` in place.
    pub fn get_page(&mut self) -> i32 {
        if self.page == 0 {
            self.page = 1;
        }
        self.page
    }

    /// Effective page size, defaulting `0` (or a negative size) to `10` in
    /// place.
    pub fn get_page_size(&mut self) -> i32 {
        if self.page_size <= 0 {
            self.page_size = 10;
        }
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    ///
    /// Negative page numbers clamp to zero rows skipped.
    pub fn get_offset(&mut self) -> u64 {
        let page = self.get_page();
        let page_size = self.get_page_size();
        let offset = i64::from(page - 1) * i64::from(page_size);
        offset.max(0) as u64
    }

    /// Order clause for the current state, defaulting the column to `id`.
    pub fn get_order_by(&mut self) -> OrderBy {
        if self.order_by_column.is_empty() {
            self.order_by_column = "id".to_string();
        }
        OrderBy::new(&self.order_by_column, &self.sort)
    }
}

/// Normalized order clause: snake_cased column plus lowercased sort token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    sort: String,
}

impl OrderBy {
    pub(crate) fn new(column: &str, sort: &str) -> Self {
        Self {
            column: snake_case(column),
            sort: sort.to_lowercase(),
        }
    }

    /// Physical column to order by.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Lowercased sort token as supplied by the caller.
    pub fn sort(&self) -> &str {
        &self.sort
    }

    /// Typed direction: `desc`/`descending` sort descending, anything else
    /// ascending.
    pub fn direction(&self) -> Order {
        match self.sort.as_str() {
            "desc" | "descending" => Order::Desc,
            _ => Order::Asc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sort.is_empty() {
            write!(f, "{}", self.column)
        } else {
            write!(f, "{} {}", self.column, self.sort)
        }
    }
}

/// Clauses the translator wants applied to the composed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageClause {
    pub offset: u64,
    pub limit: u64,
    pub order_by: OrderBy,
}

impl PageClause {
    /// Apply order/limit/offset to a select statement.
    pub fn apply(&self, query: &mut SelectStatement) {
        query
            .order_by(self.order_by.column().to_string(), self.order_by.direction())
            .limit(self.limit)
            .offset(self.offset);
    }
}

/// Strategy contract for pagination translation.
///
/// `count` is the number of rows the composed query matches before limits are
/// applied. Returns `None` when the state asks to bypass pagination.
/// Translation never fails.
pub trait Paginate: Send + Sync {
    fn translate(&self, count: i64, pagination: &mut Pagination) -> Option<PageClause>;
}

/// Default translator: totals plus offset/limit/order from the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPagination;

impl Paginate for DefaultPagination {
    fn translate(&self, count: i64, pagination: &mut Pagination) -> Option<PageClause> {
        if pagination.bypass {
            return None;
        }
        let page_size = pagination.get_page_size();
        pagination.total = count as i32;
        pagination.total_pages = (count as f64 / f64::from(page_size)).ceil() as i32;
        Some(PageClause {
            offset: pagination.get_offset(),
            limit: page_size as u64,
            order_by: pagination.get_order_by(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{PostgresQueryBuilder, Query};

    #[test]
    fn test_snake_case_pascal() {
        assert_eq!(snake_case("CreatedAt"), "created_at");
    }

    #[test]
    fn test_snake_case_trailing_acronym() {
        assert_eq!(snake_case("userID"), "user_id");
    }

    #[test]
    fn test_snake_case_leading_acronym() {
        assert_eq!(snake_case("HTTPStatus"), "http_status");
        assert_eq!(snake_case("ID"), "id");
    }

    #[test]
    fn test_snake_case_already_snake() {
        assert_eq!(snake_case("created_at"), "created_at");
    }

    #[test]
    fn test_defaults_applied_lazily_and_written_back() {
        let mut p = Pagination::new();
        assert_eq!(p.page, 0);
        assert_eq!(p.page_size, 0);

        assert_eq!(p.get_page(), 1);
        assert_eq!(p.get_page_size(), 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
    }

    #[test]
    fn test_defaults_are_idempotent() {
        let mut p = Pagination::new();
        let _ = p.get_page();
        let _ = p.get_page_size();
        assert_eq!(p.get_page(), 1);
        assert_eq!(p.get_page_size(), 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
    }

    #[test]
    fn test_negative_page_size_defaults_to_ten() {
        let mut p = Pagination {
            page_size: -5,
            ..Pagination::new()
        };
        assert_eq!(p.get_page_size(), 10);
        assert_eq!(p.page_size, 10);
    }

    #[test]
    fn test_explicit_values_never_overwritten() {
        let mut p = Pagination {
            page: 3,
            page_size: 25,
            ..Pagination::new()
        };
        assert_eq!(p.get_page(), 3);
        assert_eq!(p.get_page_size(), 25);
    }

    #[test]
    fn test_offset_uses_page_size() {
        let mut p = Pagination {
            page: 3,
            page_size: 10,
            ..Pagination::new()
        };
        assert_eq!(p.get_offset(), 20);
    }

    #[test]
    fn test_offset_first_page_is_zero() {
        let mut p = Pagination::new();
        assert_eq!(p.get_offset(), 0);
    }

    #[test]
    fn test_offset_negative_page_clamps_to_zero() {
        let mut p = Pagination {
            page: -2,
            page_size: 10,
            ..Pagination::new()
        };
        assert_eq!(p.get_offset(), 0);
    }

    #[test]
    fn test_order_by_defaults_to_id() {
        let mut p = Pagination {
            sort: "desc".to_string(),
            ..Pagination::new()
        };
        let order = p.get_order_by();
        assert_eq!(order.to_string(), "id desc");
        assert_eq!(p.order_by_column, "id");
    }

    #[test]
    fn test_order_by_normalizes_column_and_sort() {
        let mut p = Pagination {
            order_by_column: "CreatedAt".to_string(),
            sort: "DESC".to_string(),
            ..Pagination::new()
        };
        let order = p.get_order_by();
        assert_eq!(order.to_string(), "created_at desc");
        assert!(matches!(order.direction(), Order::Desc));

        p.order_by_column = "userID".to_string();
        p.sort = "asc".to_string();
        assert_eq!(p.get_order_by().to_string(), "user_id asc");
    }

    #[test]
    fn test_unrecognized_sort_token_sorts_ascending() {
        let mut p = Pagination {
            sort: "sideways".to_string(),
            ..Pagination::new()
        };
        assert!(matches!(p.get_order_by().direction(), Order::Asc));
    }

    #[test]
    fn test_translate_records_totals() {
        let mut p = Pagination::new();
        let clause = DefaultPagination.translate(25, &mut p);

        assert!(clause.is_some());
        assert_eq!(p.total, 25);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_translate_exact_multiple_of_page_size() {
        let mut p = Pagination::new();
        let _ = DefaultPagination.translate(30, &mut p);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_translate_zero_count() {
        let mut p = Pagination::new();
        let clause = DefaultPagination.translate(0, &mut p).unwrap();
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(clause.limit, 10);
        assert_eq!(clause.offset, 0);
    }

    #[test]
    fn test_translate_negative_page_size_uses_default_limit() {
        let mut p = Pagination {
            page_size: -5,
            ..Pagination::new()
        };
        let clause = DefaultPagination.translate(25, &mut p).unwrap();

        assert_eq!(clause.limit, 10);
        assert_eq!(clause.offset, 0);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_bypass_short_circuits_untouched() {
        let mut p = Pagination {
            bypass: true,
            ..Pagination::new()
        };
        let clause = DefaultPagination.translate(25, &mut p);

        assert!(clause.is_none());
        assert_eq!(p.page, 0);
        assert_eq!(p.page_size, 0);
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_clause_carries_geometry() {
        let mut p = Pagination {
            page: 3,
            page_size: 10,
            order_by_column: "CreatedAt".to_string(),
            sort: "desc".to_string(),
            ..Pagination::new()
        };
        let clause = DefaultPagination.translate(25, &mut p).unwrap();

        assert_eq!(clause.offset, 20);
        assert_eq!(clause.limit, 10);
        assert_eq!(clause.order_by.to_string(), "created_at desc");
    }

    #[test]
    fn test_clause_applies_to_select() {
        let mut p = Pagination {
            page: 2,
            page_size: 5,
            order_by_column: "name".to_string(),
            ..Pagination::new()
        };
        let clause = DefaultPagination.translate(12, &mut p).unwrap();

        let mut query = Query::select();
        query.column(sea_query::Asterisk).from("users");
        clause.apply(&mut query);
        let (sql, _values) = query.build(PostgresQueryBuilder);

        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("LIMIT"));
        assert!(sql.contains("OFFSET"));
    }
}
