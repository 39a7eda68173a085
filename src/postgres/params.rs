//! Value conversion for may_postgres parameter binding.
//!
//! Converts `sea_query` `Value`s into `ToSql` trait objects in two passes:
//!
//! 1. First pass: collect all values into typed vectors (one per Postgres
//!    type family, `Option`-wrapped so NULLs bind with the right type)
//! 2. Second pass: push references to the stored values
//!
//! The references stay valid for the closure scope, which is where the
//! statement is executed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use may_postgres::types::ToSql;
use rust_decimal::Decimal;
use sea_query::{Value, ValueType};
use uuid::Uuid;

use crate::error::DbError;

/// Extract a typed optional from a `Value` without depending on the enum's
/// internal representation. Used for the feature-gated families.
fn extract<T: ValueType>(value: &Value) -> Result<Option<T>, DbError> {
    if value.is_null() {
        return Ok(None);
    }
    T::try_from(value.clone())
        .map(Some)
        .map_err(|_| DbError::Other(format!("Unsupported value type in query: {value:?}")))
}

/// Convert sea-query values to may_postgres `ToSql` parameters and run `f`
/// with them.
///
/// # Errors
///
/// Returns `DbError::Other` if a value has no Postgres binding, or whatever
/// `f` returns.
pub fn with_converted_params<F, R>(values: &sea_query::Values, f: F) -> Result<R, DbError>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R, DbError>,
{
    let mut bools: Vec<Option<bool>> = Vec::new();
    let mut ints: Vec<Option<i32>> = Vec::new();
    let mut big_ints: Vec<Option<i64>> = Vec::new();
    let mut floats: Vec<Option<f32>> = Vec::new();
    let mut doubles: Vec<Option<f64>> = Vec::new();
    let mut strings: Vec<Option<String>> = Vec::new();
    let mut bytes: Vec<Option<Vec<u8>>> = Vec::new();
    let mut date_times: Vec<Option<NaiveDateTime>> = Vec::new();
    let mut utc_date_times: Vec<Option<DateTime<Utc>>> = Vec::new();
    let mut dates: Vec<Option<NaiveDate>> = Vec::new();
    let mut uuids: Vec<Option<Uuid>> = Vec::new();
    let mut decimals: Vec<Option<Decimal>> = Vec::new();
    let mut jsons: Vec<Option<serde_json::Value>> = Vec::new();

    // First pass: collect all values into typed vectors
    for value in values.iter() {
        match value {
            Value::Bool(b) => bools.push(*b),
            Value::Int(i) => ints.push(*i),
            Value::TinyInt(i) => ints.push(i.map(i32::from)),
            Value::SmallInt(i) => ints.push(i.map(i32::from)),
            Value::TinyUnsigned(u) => ints.push(u.map(i32::from)),
            Value::SmallUnsigned(u) => ints.push(u.map(i32::from)),
            Value::BigInt(i) => big_ints.push(*i),
            Value::Unsigned(u) => big_ints.push(u.map(i64::from)),
            Value::BigUnsigned(u) => {
                if let Some(u) = u {
                    if *u > i64::MAX as u64 {
                        return Err(DbError::Other(format!(
                            "BigUnsigned value {} exceeds i64::MAX ({}), cannot be safely cast to i64",
                            u,
                            i64::MAX
                        )));
                    }
                }
                big_ints.push(u.map(|u| u as i64));
            }
            Value::Float(v) => floats.push(*v),
            Value::Double(d) => doubles.push(*d),
            Value::String(s) => strings.push(s.clone()),
            Value::Bytes(b) => bytes.push(b.clone()),
            Value::ChronoDateTime(_) => date_times.push(extract::<NaiveDateTime>(value)?),
            Value::ChronoDateTimeUtc(_) => utc_date_times.push(extract::<DateTime<Utc>>(value)?),
            Value::ChronoDate(_) => dates.push(extract::<NaiveDate>(value)?),
            Value::Uuid(_) => uuids.push(extract::<Uuid>(value)?),
            Value::Decimal(_) => decimals.push(extract::<Decimal>(value)?),
            Value::Json(_) => jsons.push(extract::<serde_json::Value>(value)?),
            _ => {
                return Err(DbError::Other(format!(
                    "Unsupported value type in query: {value:?}"
                )));
            }
        }
    }

    // Second pass: create references to the stored values
    let mut bool_idx = 0;
    let mut int_idx = 0;
    let mut big_int_idx = 0;
    let mut float_idx = 0;
    let mut double_idx = 0;
    let mut string_idx = 0;
    let mut byte_idx = 0;
    let mut date_time_idx = 0;
    let mut utc_date_time_idx = 0;
    let mut date_idx = 0;
    let mut uuid_idx = 0;
    let mut decimal_idx = 0;
    let mut json_idx = 0;

    let mut params: Vec<&dyn ToSql> = Vec::new();

    for value in values.iter() {
        match value {
            Value::Bool(_) => {
                params.push(&bools[bool_idx] as &dyn ToSql);
                bool_idx += 1;
            }
            Value::Int(_)
            | Value::TinyInt(_)
            | Value::SmallInt(_)
            | Value::TinyUnsigned(_)
            | Value::SmallUnsigned(_) => {
                params.push(&ints[int_idx] as &dyn ToSql);
                int_idx += 1;
            }
            Value::BigInt(_) | Value::Unsigned(_) | Value::BigUnsigned(_) => {
                params.push(&big_ints[big_int_idx] as &dyn ToSql);
                big_int_idx += 1;
            }
            Value::Float(_) => {
                params.push(&floats[float_idx] as &dyn ToSql);
                float_idx += 1;
            }
            Value::Double(_) => {
                params.push(&doubles[double_idx] as &dyn ToSql);
                double_idx += 1;
            }
            Value::String(_) => {
                params.push(&strings[string_idx] as &dyn ToSql);
                string_idx += 1;
            }
            Value::Bytes(_) => {
                params.push(&bytes[byte_idx] as &dyn ToSql);
                byte_idx += 1;
            }
            Value::ChronoDateTime(_) => {
                params.push(&date_times[date_time_idx] as &dyn ToSql);
                date_time_idx += 1;
            }
            Value::ChronoDateTimeUtc(_) => {
                params.push(&utc_date_times[utc_date_time_idx] as &dyn ToSql);
                utc_date_time_idx += 1;
            }
            Value::ChronoDate(_) => {
                params.push(&dates[date_idx] as &dyn ToSql);
                date_idx += 1;
            }
            Value::Uuid(_) => {
                params.push(&uuids[uuid_idx] as &dyn ToSql);
                uuid_idx += 1;
            }
            Value::Decimal(_) => {
                params.push(&decimals[decimal_idx] as &dyn ToSql);
                decimal_idx += 1;
            }
            Value::Json(_) => {
                params.push(&jsons[json_idx] as &dyn ToSql);
                json_idx += 1;
            }
            _ => {
                return Err(DbError::Other(format!(
                    "Unsupported value type in query: {value:?}"
                )));
            }
        }
    }

    // Execute closure with the parameters (references are valid within closure scope)
    f(&params)
}
