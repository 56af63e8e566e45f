#![forbid(unsafe_code)]

use super::channel::ListEntry;
use crate::ids::ChannelHandle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Update {
        handle: ChannelHandle,
        program_number: i64,
        name: String,
    },
    Delete {
        handle: ChannelHandle,
    },
}

impl WriteOp {
    pub fn handle(&self) -> ChannelHandle {
        match self {
            Self::Update { handle, .. } | Self::Delete { handle } => *handle,
        }
    }
}

/// Partitions the edited sequence into per-handle writes. Proxy entries are
/// skipped; their owning list carries the write.
pub fn plan_write_ops(entries: &[ListEntry]) -> Vec<WriteOp> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            ListEntry::Proxy(_) => None,
            ListEntry::Channel(channel) if channel.deleted => Some(WriteOp::Delete {
                handle: channel.handle,
            }),
            ListEntry::Channel(channel) => Some(WriteOp::Update {
                handle: channel.handle,
                program_number: channel.program_number,
                name: channel.name.clone(),
            }),
        })
        .collect()
}
