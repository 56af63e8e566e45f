#![forbid(unsafe_code)]

use super::StoreError;
use super::columns::{int_column, text_column};
use super::schema::{SATELLITE_TABLE, TRANSPONDER_TABLE};
use chanlist_core::codec::{decode_digital_frequency_mhz, decode_orbital_position, decode_polarity};
use chanlist_core::{Satellite, SatelliteId, Transponder, TransponderId};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

#[derive(Clone, Debug)]
pub struct SatelliteRow {
    pub id: i64,
    pub name: String,
    pub orbital_position: i64,
}

#[derive(Clone, Debug)]
pub struct TransponderRow {
    pub id: i64,
    pub satellite_id: Option<i64>,
    pub frequency: i64,
    pub polarity: i64,
    pub symbol_rate: i64,
}

#[derive(Debug, Default)]
pub struct TransponderLoad {
    pub transponders: BTreeMap<TransponderId, Transponder>,
    pub duplicates: usize,
}

pub fn load_satellites(
    rows: impl IntoIterator<Item = SatelliteRow>,
) -> BTreeMap<SatelliteId, Satellite> {
    rows.into_iter()
        .map(|row| {
            let id = SatelliteId::new(row.id);
            let satellite = Satellite {
                id,
                name: row.name,
                position: decode_orbital_position(row.orbital_position),
            };
            (id, satellite)
        })
        .collect()
}

/// First row wins for a repeated transponder id. An unknown satellite id is
/// kept off the transponder rather than failing the load.
pub fn load_transponders(
    rows: impl IntoIterator<Item = TransponderRow>,
    satellites: &BTreeMap<SatelliteId, Satellite>,
) -> TransponderLoad {
    let mut out = TransponderLoad::default();

    for row in rows {
        let id = TransponderId::new(row.id);
        let slot = match out.transponders.entry(id) {
            Entry::Occupied(_) => {
                tracing::debug!(transponder = row.id, "duplicate transponder row skipped");
                out.duplicates += 1;
                continue;
            }
            Entry::Vacant(slot) => slot,
        };

        let satellite_id = row
            .satellite_id
            .map(SatelliteId::new)
            .filter(|sat| satellites.contains_key(sat));
        if satellite_id.is_none() {
            tracing::debug!(
                transponder = row.id,
                satellite = ?row.satellite_id,
                "transponder without a known satellite"
            );
        }

        slot.insert(Transponder {
            id,
            satellite_id,
            frequency: decode_digital_frequency_mhz(row.frequency),
            polarity: decode_polarity(row.polarity),
            symbol_rate: row.symbol_rate,
        });
    }

    out
}

pub(crate) fn query_satellites(conn: &Connection) -> Result<Vec<SatelliteRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT satellite_id, name, orbital_position FROM {SATELLITE_TABLE}"
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let Some(id) = int_column(row, 0, "satellite.satellite_id")? else {
            tracing::warn!("satellite row without a usable id skipped");
            continue;
        };
        out.push(SatelliteRow {
            id,
            name: text_column(row, 1, "satellite.name")?.unwrap_or_default(),
            orbital_position: int_column(row, 2, "satellite.orbital_position")?.unwrap_or(0),
        });
    }
    Ok(out)
}

pub(crate) fn query_transponders(conn: &Connection) -> Result<Vec<TransponderRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT transponder_id, satellite_id, frequency, polarity, symbol_rate \
         FROM {TRANSPONDER_TABLE}"
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let Some(id) = int_column(row, 0, "transponder.transponder_id")? else {
            tracing::warn!("transponder row without a usable id skipped");
            continue;
        };
        out.push(TransponderRow {
            id,
            satellite_id: int_column(row, 1, "transponder.satellite_id")?,
            frequency: int_column(row, 2, "transponder.frequency")?.unwrap_or(0),
            polarity: int_column(row, 3, "transponder.polarity")?.unwrap_or(0),
            symbol_rate: int_column(row, 4, "transponder.symbol_rate")?.unwrap_or(0),
        });
    }
    Ok(out)
}
