#![forbid(unsafe_code)]

//! Column readers that tolerate SQLite's dynamic typing. A cell that cannot
//! be coerced reads as `None` and is logged; it never fails the query.

use rusqlite::Row;
use rusqlite::types::ValueRef;

pub(crate) fn int_column(
    row: &Row<'_>,
    index: usize,
    column: &str,
) -> rusqlite::Result<Option<i64>> {
    let raw = row.get_ref(index)?;
    let value = match raw {
        ValueRef::Null => return Ok(None),
        ValueRef::Integer(value) => Some(value),
        ValueRef::Real(value) => real_to_int(value),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse::<i64>().ok()),
        ValueRef::Blob(_) => None,
    };
    if value.is_none() {
        tracing::warn!(column, value_type = %raw.data_type(), "non-integer value ignored");
    }
    Ok(value)
}

pub(crate) fn text_column(
    row: &Row<'_>,
    index: usize,
    column: &str,
) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(index)? {
        ValueRef::Null => None,
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => {
            tracing::warn!(column, "blob value decoded as text");
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
    })
}

fn real_to_int(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e18 {
        Some(value as i64)
    } else {
        None
    }
}
