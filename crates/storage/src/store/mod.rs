#![forbid(unsafe_code)]

mod backup;
mod channels;
mod columns;
mod config;
mod entities;
mod error;
mod schema;
mod writer;

pub use backup::backup_path;
pub use channels::{
    AnalogBranch, ChannelCounts, ChannelRow, DvbBranch, reconstruct_channel, reconstruct_channels,
};
pub use config::StoreConfig;
pub use entities::{SatelliteRow, TransponderLoad, TransponderRow, load_satellites, load_transponders};
pub use error::StoreError;
pub use writer::WriteCounts;

use chanlist_core::{
    Capabilities, Channel, ListEntry, Satellite, SatelliteId, Transponder, TransponderId,
    plan_write_ops,
};
use rusqlite::{Connection, OpenFlags};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub satellites: usize,
    pub transponders: usize,
    pub duplicate_transponders: usize,
    pub channels: ChannelCounts,
}

#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub satellites: BTreeMap<SatelliteId, Satellite>,
    pub transponders: BTreeMap<TransponderId, Transponder>,
    pub channels: Vec<Channel>,
    pub capabilities: Capabilities,
    /// Primary file first, then the backup copy when one exists.
    pub files: Vec<PathBuf>,
    pub stats: LoadStats,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveReport {
    pub updated: usize,
    pub deleted: usize,
    pub backup: PathBuf,
}

/// A receiver channel database on disk. Each `load`/`save` opens its own
/// connection and closes it before returning.
#[derive(Clone, Debug)]
pub struct ChannelDb {
    path: PathBuf,
    config: StoreConfig,
}

impl ChannelDb {
    pub fn new(path: impl AsRef<Path>, config: StoreConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path, &self.config.backup_suffix)
    }

    pub fn load(&self) -> Result<LoadedModel, StoreError> {
        let conn = self.open()?;
        let shape = schema::preflight_gate(&conn)?;
        if self.config.integrity_pass {
            schema::integrity_pass(&conn)?;
        }

        let satellites = load_satellites(entities::query_satellites(&conn)?);
        let TransponderLoad {
            transponders,
            duplicates,
        } = load_transponders(entities::query_transponders(&conn)?, &satellites);
        let (channels, channel_counts) =
            reconstruct_channels(channels::query_channel_rows(&conn, shape)?);
        drop(conn);

        let stats = LoadStats {
            satellites: satellites.len(),
            transponders: transponders.len(),
            duplicate_transponders: duplicates,
            channels: channel_counts,
        };
        tracing::info!(
            path = %self.path.display(),
            satellites = stats.satellites,
            transponders = stats.transponders,
            digital = channel_counts.digital,
            analog = channel_counts.analog,
            unclassified = channel_counts.unclassified,
            deleted_skipped = channel_counts.deleted_skipped,
            "channel database loaded"
        );

        let mut files = vec![self.path.clone()];
        let backup = self.backup_path();
        if backup != self.path && backup.is_file() {
            files.push(backup);
        }

        Ok(LoadedModel {
            satellites,
            transponders,
            channels,
            capabilities: Capabilities::channel_db(),
            files,
            stats,
        })
    }

    pub fn save(&self, entries: &[ListEntry]) -> Result<SaveReport, StoreError> {
        let backup = self.checked_backup_path()?;
        let ops = plan_write_ops(entries);

        let mut conn = self.open()?;
        schema::preflight_gate(&conn)?;
        let counts = writer::apply_write_ops(&mut conn, &ops)?;
        if self.config.integrity_pass {
            schema::integrity_pass(&conn)?;
        }
        conn.close().map_err(|(_, err)| StoreError::Sql(err))?;

        backup::write_backup(&self.path, &backup).map_err(StoreError::BackupFailed)?;

        tracing::info!(
            path = %self.path.display(),
            updated = counts.updated,
            deleted = counts.deleted,
            backup = %backup.display(),
            "channel database saved"
        );

        Ok(SaveReport {
            updated: counts.updated,
            deleted: counts.deleted,
            backup,
        })
    }

    /// The copy must land beside the primary file under a different name;
    /// copying a file onto itself truncates it.
    fn checked_backup_path(&self) -> Result<PathBuf, StoreError> {
        let suffix = &self.config.backup_suffix;
        if suffix.is_empty() {
            return Err(StoreError::InvalidConfig("backup_suffix must not be empty"));
        }
        if suffix.contains(['/', '\\']) {
            return Err(StoreError::InvalidConfig(
                "backup_suffix must not contain path separators",
            ));
        }
        let backup = self.backup_path();
        if backup == self.path {
            return Err(StoreError::InvalidConfig(
                "backup path resolves to the primary file",
            ));
        }
        Ok(backup)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if !self.path.is_file() {
            return Err(StoreError::MissingFile(self.path.clone()));
        }
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.config.busy_timeout)?;
        Ok(conn)
    }
}
