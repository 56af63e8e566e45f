#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::Connection;
use std::collections::BTreeSet;

pub(crate) const SATELLITE_TABLE: &str = "satellite";
pub(crate) const TRANSPONDER_TABLE: &str = "transponder";
pub(crate) const CHANNEL_TABLE: &str = "channel";
pub(crate) const DVB_SERVICE_TABLE: &str = "dvb_service";
pub(crate) const ANALOG_SERVICE_TABLE: &str = "analog_service";
pub(crate) const DVB_FREQUENCY_TABLE: &str = "dvb_frequency";
pub(crate) const TUNER_DATA_TABLE: &str = "tuner_data";

/// Channel identity comes first: without it there is nothing to load.
const REQUIRED_TABLES: [&str; 7] = [
    CHANNEL_TABLE,
    SATELLITE_TABLE,
    TRANSPONDER_TABLE,
    DVB_SERVICE_TABLE,
    ANALOG_SERVICE_TABLE,
    DVB_FREQUENCY_TABLE,
    TUNER_DATA_TABLE,
];

/// Optional per-row deletion flag on the channel table.
const DELETED_COLUMN: &str = "deleted";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SchemaShape {
    pub(crate) has_deleted_flag: bool,
}

pub(crate) fn preflight_gate(conn: &Connection) -> Result<SchemaShape, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?.to_ascii_lowercase());
    }

    for table in REQUIRED_TABLES {
        if !tables.contains(table) {
            return Err(StoreError::UnexpectedSchema { table });
        }
    }

    Ok(SchemaShape {
        has_deleted_flag: has_column(conn, CHANNEL_TABLE, DELETED_COLUMN)?,
    })
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        if row.get::<_, String>(1)?.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Rebuilds every index in the file. Idempotent; safe on a healthy database.
pub(crate) fn integrity_pass(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("REINDEX;")?;
    tracing::debug!("integrity pass completed");
    Ok(())
}
