#![forbid(unsafe_code)]

use super::StoreError;
use super::schema::{ANALOG_SERVICE_TABLE, CHANNEL_TABLE, DVB_SERVICE_TABLE};
use chanlist_core::{ChannelHandle, WriteOp};
use rusqlite::{Connection, Transaction, params};

/// Channel identity rows actually changed. An op whose handle is no longer in
/// the file counts as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub updated: usize,
    pub deleted: usize,
}

/// Applies every op inside one transaction. Any failing statement rolls the
/// whole batch back when the transaction is dropped uncommitted.
pub(crate) fn apply_write_ops(
    conn: &mut Connection,
    ops: &[WriteOp],
) -> Result<WriteCounts, StoreError> {
    let tx = conn.transaction()?;
    let mut counts = WriteCounts::default();

    for op in ops {
        let result = match op {
            WriteOp::Update {
                handle,
                program_number,
                name,
            } => update_channel_tx(&tx, *handle, *program_number, name).map(|affected| {
                counts.updated += affected;
            }),
            WriteOp::Delete { handle } => delete_channel_tx(&tx, *handle).map(|affected| {
                counts.deleted += affected;
            }),
        };
        if let Err(source) = result {
            tracing::warn!(handle = op.handle().get(), error = %source, "write failed, rolling back");
            return Err(StoreError::WriteFailed {
                handle: op.handle(),
                source,
            });
        }
    }

    tx.commit()?;
    Ok(counts)
}

fn update_channel_tx(
    tx: &Transaction<'_>,
    handle: ChannelHandle,
    program_number: i64,
    name: &str,
) -> rusqlite::Result<usize> {
    tx.execute(
        &format!("UPDATE {CHANNEL_TABLE} SET program_number=?2, name=?3 WHERE handle=?1"),
        params![handle.get(), program_number, name],
    )
}

/// Returns the identity rows removed. Descriptor rows may be missing for
/// either branch; zero affected rows is fine.
fn delete_channel_tx(tx: &Transaction<'_>, handle: ChannelHandle) -> rusqlite::Result<usize> {
    for table in [DVB_SERVICE_TABLE, ANALOG_SERVICE_TABLE] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE handle=?1"),
            params![handle.get()],
        )?;
    }
    tx.execute(
        &format!("DELETE FROM {CHANNEL_TABLE} WHERE handle=?1"),
        params![handle.get()],
    )
}
