#![forbid(unsafe_code)]
#![allow(dead_code)]

use rusqlite::types::Value;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("chanlist_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) struct DigitalRow<'a> {
    pub handle: i64,
    pub program_number: i64,
    pub name: &'a str,
    pub channel_number: i64,
    pub original_network_id: i64,
    pub transport_stream_id: i64,
    pub service_id: i64,
    pub service_type: i64,
    pub frequency: Option<i64>,
}

/// A channel database file laid out like the receiver writes it.
pub(crate) struct Fixture {
    pub dir: PathBuf,
    pub path: PathBuf,
    conn: Connection,
}

impl Fixture {
    pub(crate) fn new(test_name: &str) -> Self {
        Self::build(test_name, true)
    }

    pub(crate) fn without_deleted_flag(test_name: &str) -> Self {
        Self::build(test_name, false)
    }

    fn build(test_name: &str, with_deleted_flag: bool) -> Self {
        let dir = temp_dir(test_name);
        let path = dir.join("chmgt.db");
        let conn = Connection::open(&path).expect("create fixture db");
        let deleted_column = if with_deleted_flag {
            ",\n              deleted INTEGER NOT NULL DEFAULT 0"
        } else {
            ""
        };
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE satellite (
              satellite_id INTEGER PRIMARY KEY,
              name TEXT,
              orbital_position INTEGER
            );

            CREATE TABLE transponder (
              transponder_id INTEGER NOT NULL,
              satellite_id INTEGER,
              frequency INTEGER,
              polarity INTEGER,
              symbol_rate INTEGER
            );

            CREATE TABLE channel (
              handle INTEGER PRIMARY KEY,
              program_number INTEGER,
              name TEXT{deleted_column}
            );

            CREATE TABLE dvb_service (
              handle INTEGER NOT NULL,
              channel_number INTEGER NOT NULL,
              original_network_id INTEGER,
              transport_stream_id INTEGER,
              service_id INTEGER,
              service_type INTEGER
            );
            CREATE INDEX idx_dvb_service_handle ON dvb_service(handle);

            CREATE TABLE analog_service (
              handle INTEGER NOT NULL,
              channel_number INTEGER NOT NULL
            );

            CREATE TABLE dvb_frequency (
              channel_number INTEGER PRIMARY KEY,
              frequency INTEGER
            );

            CREATE TABLE tuner_data (
              channel_number INTEGER PRIMARY KEY,
              frequency INTEGER
            );
            "#
        ))
        .expect("create fixture schema");
        Self { dir, path, conn }
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn satellite(&self, id: i64, name: &str, orbital_position: i64) {
        self.conn
            .execute(
                "INSERT INTO satellite(satellite_id, name, orbital_position) VALUES (?1, ?2, ?3)",
                params![id, name, orbital_position],
            )
            .expect("insert satellite");
    }

    pub(crate) fn transponder(
        &self,
        id: i64,
        satellite_id: Option<i64>,
        frequency: i64,
        polarity: i64,
        symbol_rate: i64,
    ) {
        self.conn
            .execute(
                "INSERT INTO transponder(transponder_id, satellite_id, frequency, polarity, symbol_rate) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, satellite_id, frequency, polarity, symbol_rate],
            )
            .expect("insert transponder");
    }

    pub(crate) fn bare_channel(&self, handle: i64, program_number: i64, name: &str) {
        self.conn
            .execute(
                "INSERT INTO channel(handle, program_number, name) VALUES (?1, ?2, ?3)",
                params![handle, program_number, name],
            )
            .expect("insert channel");
    }

    pub(crate) fn digital_channel(&self, row: DigitalRow<'_>) {
        self.bare_channel(row.handle, row.program_number, row.name);
        self.conn
            .execute(
                "INSERT INTO dvb_service(handle, channel_number, original_network_id, transport_stream_id, service_id, service_type) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.handle,
                    row.channel_number,
                    row.original_network_id,
                    row.transport_stream_id,
                    row.service_id,
                    row.service_type,
                ],
            )
            .expect("insert dvb_service");
        if let Some(frequency) = row.frequency {
            self.conn
                .execute(
                    "INSERT INTO dvb_frequency(channel_number, frequency) VALUES (?1, ?2)",
                    params![row.channel_number, frequency],
                )
                .expect("insert dvb_frequency");
        }
    }

    pub(crate) fn simple_digital(&self, handle: i64, program_number: i64, name: &str) {
        self.digital_channel(DigitalRow {
            handle,
            program_number,
            name,
            channel_number: 1000 + handle,
            original_network_id: 1,
            transport_stream_id: 1000 + handle,
            service_id: 100 + handle,
            service_type: 1,
            frequency: Some(11_000_000 + handle * 1_000),
        });
    }

    pub(crate) fn analog_channel(
        &self,
        handle: i64,
        program_number: i64,
        name: &str,
        channel_number: i64,
        frequency: Option<i64>,
    ) {
        self.bare_channel(handle, program_number, name);
        self.conn
            .execute(
                "INSERT INTO analog_service(handle, channel_number) VALUES (?1, ?2)",
                params![handle, channel_number],
            )
            .expect("insert analog_service");
        if let Some(frequency) = frequency {
            self.conn
                .execute(
                    "INSERT INTO tuner_data(channel_number, frequency) VALUES (?1, ?2)",
                    params![channel_number, frequency],
                )
                .expect("insert tuner_data");
        }
    }

    pub(crate) fn mark_deleted(&self, handle: i64) {
        self.conn
            .execute(
                "UPDATE channel SET deleted=1 WHERE handle=?1",
                params![handle],
            )
            .expect("flag channel deleted");
    }

    /// Closes the fixture connection so the store under test has the file to itself.
    pub(crate) fn finish(self) -> (PathBuf, PathBuf) {
        drop(self.conn);
        (self.dir, self.path)
    }
}

/// Every row of `table` in rowid order, as typed values.
pub(crate) fn dump_table(path: &Path, table: &str) -> Vec<Vec<Value>> {
    let conn = Connection::open(path).expect("open for dump");
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {table} ORDER BY rowid"))
        .expect("prepare dump");
    let columns = stmt.column_count();
    let mut rows = stmt.query([]).expect("query dump");
    let mut out = Vec::new();
    while let Some(row) = rows.next().expect("dump row") {
        let mut values = Vec::with_capacity(columns);
        for index in 0..columns {
            values.push(row.get::<_, Value>(index).expect("dump value"));
        }
        out.push(values);
    }
    out
}

pub(crate) fn count_rows(path: &Path, table: &str, handle: i64) -> i64 {
    let conn = Connection::open(path).expect("open for count");
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE handle=?1"),
        params![handle],
        |row| row.get(0),
    )
    .expect("count rows")
}

pub(crate) const ALL_TABLES: [&str; 7] = [
    "satellite",
    "transponder",
    "channel",
    "dvb_service",
    "analog_service",
    "dvb_frequency",
    "tuner_data",
];

pub(crate) fn dump_all(path: &Path) -> Vec<(&'static str, Vec<Vec<Value>>)> {
    ALL_TABLES
        .iter()
        .map(|table| (*table, dump_table(path, table)))
        .collect()
}
