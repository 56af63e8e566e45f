#![forbid(unsafe_code)]

use super::StoreError;
use super::columns::{int_column, text_column};
use super::schema::{
    ANALOG_SERVICE_TABLE, CHANNEL_TABLE, DVB_FREQUENCY_TABLE, DVB_SERVICE_TABLE, SchemaShape,
    TUNER_DATA_TABLE,
};
use chanlist_core::codec::{
    decode_analog_frequency_mhz, decode_digital_frequency_mhz, mask_service_field,
};
use chanlist_core::{AnalogPayload, Channel, ChannelHandle, DigitalPayload, Payload};
use rusqlite::{Connection, Row};
use std::collections::BTreeSet;

/// Digital descriptor columns; `handle` is the join key and marks the branch as present.
#[derive(Clone, Debug, Default)]
pub struct DvbBranch {
    pub handle: Option<i64>,
    pub original_network_id: Option<i64>,
    pub transport_stream_id: Option<i64>,
    pub service_id: Option<i64>,
    pub service_type: Option<i64>,
    pub frequency: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct AnalogBranch {
    pub handle: Option<i64>,
    pub frequency: Option<i64>,
}

/// One row of the channel join: identity plus both optional descriptor branches.
#[derive(Clone, Debug, Default)]
pub struct ChannelRow {
    pub handle: i64,
    pub program_number: i64,
    pub name: String,
    pub deleted: bool,
    pub dvb: DvbBranch,
    pub analog: AnalogBranch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelCounts {
    pub digital: usize,
    pub analog: usize,
    pub unclassified: usize,
    pub deleted_skipped: usize,
    pub duplicate_rows: usize,
}

/// `None` for rows flagged deleted: they never enter the channel set.
pub fn reconstruct_channel(row: ChannelRow) -> Option<Channel> {
    if row.deleted {
        return None;
    }

    let payload = if row.dvb.handle.is_some() {
        Payload::Digital(DigitalPayload {
            original_network_id: mask_service_field(row.dvb.original_network_id.unwrap_or(0)),
            transport_stream_id: mask_service_field(row.dvb.transport_stream_id.unwrap_or(0)),
            service_id: mask_service_field(row.dvb.service_id.unwrap_or(0)),
            service_type: row.dvb.service_type.unwrap_or(0),
            frequency: row.dvb.frequency.map(decode_digital_frequency_mhz),
        })
    } else if row.analog.handle.is_some() {
        Payload::Analog(AnalogPayload {
            frequency: row.analog.frequency.map(decode_analog_frequency_mhz),
        })
    } else {
        Payload::Unclassified
    };

    Some(
        Channel::new(ChannelHandle::new(row.handle), row.program_number, row.name)
            .with_payload(payload),
    )
}

/// Rows arrive in the channel table's natural order; a handle repeated by a
/// fan-out in the joined tables is emitted once, from its first row.
pub fn reconstruct_channels(
    rows: impl IntoIterator<Item = ChannelRow>,
) -> (Vec<Channel>, ChannelCounts) {
    let mut counts = ChannelCounts::default();
    let mut seen = BTreeSet::new();
    let mut channels = Vec::new();

    for row in rows {
        if !seen.insert(row.handle) {
            tracing::debug!(handle = row.handle, "repeated join row for channel skipped");
            counts.duplicate_rows += 1;
            continue;
        }
        let handle = row.handle;
        let Some(channel) = reconstruct_channel(row) else {
            counts.deleted_skipped += 1;
            continue;
        };
        match &channel.payload {
            Payload::Digital(_) => counts.digital += 1,
            Payload::Analog(_) => counts.analog += 1,
            Payload::Unclassified => {
                tracing::warn!(handle, "channel has neither a digital nor an analog descriptor");
                counts.unclassified += 1;
            }
        }
        channels.push(channel);
    }

    (channels, counts)
}

fn channel_join_sql(shape: SchemaShape) -> String {
    let deleted = if shape.has_deleted_flag {
        "COALESCE(c.deleted, 0)"
    } else {
        "0"
    };
    format!(
        "SELECT c.handle, c.program_number, c.name, {deleted}, \
                d.handle, d.original_network_id, d.transport_stream_id, d.service_id, \
                d.service_type, f.frequency, \
                a.handle, t.frequency \
         FROM {CHANNEL_TABLE} c \
         LEFT JOIN {DVB_SERVICE_TABLE} d ON d.handle = c.handle \
         LEFT JOIN {DVB_FREQUENCY_TABLE} f ON f.channel_number = d.channel_number \
         LEFT JOIN {ANALOG_SERVICE_TABLE} a ON a.handle = c.handle \
         LEFT JOIN {TUNER_DATA_TABLE} t ON t.channel_number = a.channel_number"
    )
}

/// `None` when the handle itself is unreadable; every other column falls back
/// to unset.
fn channel_row(row: &Row<'_>) -> rusqlite::Result<Option<ChannelRow>> {
    let Some(handle) = int_column(row, 0, "channel.handle")? else {
        tracing::warn!("channel row without a usable handle skipped");
        return Ok(None);
    };
    Ok(Some(ChannelRow {
        handle,
        program_number: int_column(row, 1, "channel.program_number")?.unwrap_or(0),
        name: text_column(row, 2, "channel.name")?.unwrap_or_default(),
        deleted: int_column(row, 3, "channel.deleted")?.is_some_and(|flag| flag != 0),
        dvb: DvbBranch {
            handle: int_column(row, 4, "dvb_service.handle")?,
            original_network_id: int_column(row, 5, "dvb_service.original_network_id")?,
            transport_stream_id: int_column(row, 6, "dvb_service.transport_stream_id")?,
            service_id: int_column(row, 7, "dvb_service.service_id")?,
            service_type: int_column(row, 8, "dvb_service.service_type")?,
            frequency: int_column(row, 9, "dvb_frequency.frequency")?,
        },
        analog: AnalogBranch {
            handle: int_column(row, 10, "analog_service.handle")?,
            frequency: int_column(row, 11, "tuner_data.frequency")?,
        },
    }))
}

pub(crate) fn query_channel_rows(
    conn: &Connection,
    shape: SchemaShape,
) -> Result<Vec<ChannelRow>, StoreError> {
    let mut stmt = conn.prepare(&channel_join_sql(shape))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        if let Some(channel) = channel_row(row)? {
            out.push(channel);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(handle: i64, name: &str) -> ChannelRow {
        ChannelRow {
            handle,
            program_number: handle,
            name: name.to_string(),
            ..ChannelRow::default()
        }
    }

    fn dvb(handle: i64, frequency: Option<i64>) -> DvbBranch {
        DvbBranch {
            handle: Some(handle),
            original_network_id: Some(0x2001),
            transport_stream_id: Some(0x4451),
            service_id: Some(0xE102),
            service_type: Some(25),
            frequency,
        }
    }

    #[test]
    fn digital_branch_masks_service_fields() {
        let row = ChannelRow {
            dvb: dvb(5, Some(514_000)),
            ..identity(5, "Test")
        };
        let channel = reconstruct_channel(row).expect("not deleted");
        let digital = channel.digital().expect("digital payload");
        assert_eq!(digital.original_network_id, 0x0001);
        assert_eq!(digital.transport_stream_id, 0x0451);
        assert_eq!(digital.service_id, 0x0102);
        assert_eq!(digital.service_type, 25);
        assert_eq!(digital.frequency.map(|f| f.as_f64()), Some(514.0));
    }

    #[test]
    fn digital_branch_without_frequency_row_leaves_frequency_unset() {
        let row = ChannelRow {
            dvb: dvb(6, None),
            ..identity(6, "No Freq")
        };
        let channel = reconstruct_channel(row).expect("not deleted");
        assert!(channel.digital().is_some());
        assert_eq!(channel.payload.frequency(), None);
    }

    #[test]
    fn digital_branch_takes_precedence_over_analog() {
        let row = ChannelRow {
            dvb: dvb(7, Some(602_000)),
            analog: AnalogBranch {
                handle: Some(7),
                frequency: Some(4_825_000),
            },
            ..identity(7, "Both")
        };
        let channel = reconstruct_channel(row).expect("not deleted");
        assert!(channel.digital().is_some());
        assert!(channel.analog().is_none());
    }

    #[test]
    fn analog_branch_divides_tuner_frequency() {
        let row = ChannelRow {
            analog: AnalogBranch {
                handle: Some(8),
                frequency: Some(4_825_000),
            },
            ..identity(8, "ARD analog")
        };
        let channel = reconstruct_channel(row).expect("not deleted");
        let analog = channel.analog().expect("analog payload");
        assert_eq!(analog.frequency.map(|f| f.to_string()), Some("48.25".to_string()));
    }

    #[test]
    fn deleted_rows_are_dropped_and_bare_rows_kept() {
        let deleted = ChannelRow {
            deleted: true,
            dvb: dvb(1, Some(514_000)),
            ..identity(1, "gone")
        };
        let bare = identity(2, "bare");
        let (channels, counts) = reconstruct_channels([deleted, bare]);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].handle, ChannelHandle::new(2));
        assert_eq!(channels[0].payload, Payload::Unclassified);
        assert_eq!(counts.deleted_skipped, 1);
        assert_eq!(counts.unclassified, 1);
    }

    #[test]
    fn order_follows_input_and_repeated_handles_collapse() {
        let rows = [
            ChannelRow {
                dvb: dvb(30, Some(1)),
                ..identity(30, "c")
            },
            ChannelRow {
                dvb: dvb(10, Some(2)),
                ..identity(10, "a")
            },
            ChannelRow {
                dvb: dvb(30, Some(3)),
                ..identity(30, "c again")
            },
        ];
        let (channels, counts) = reconstruct_channels(rows);
        let handles: Vec<i64> = channels.iter().map(|c| c.handle.get()).collect();
        assert_eq!(handles, vec![30, 10]);
        assert_eq!(channels[0].name, "c");
        assert_eq!(counts.duplicate_rows, 1);
        assert_eq!(counts.digital, 2);
    }
}
