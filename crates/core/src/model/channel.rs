#![forbid(unsafe_code)]

use crate::codec::Megahertz;
use crate::ids::ChannelHandle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitalPayload {
    pub original_network_id: u16,
    pub transport_stream_id: u16,
    pub service_id: u16,
    pub service_type: i64,
    /// `None` when the channel has no row in the digital frequency table.
    pub frequency: Option<Megahertz>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalogPayload {
    /// `None` when the channel has no tuner data row.
    pub frequency: Option<Megahertz>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Payload {
    /// Neither a digital nor an analog descriptor row exists for the handle.
    #[default]
    Unclassified,
    Digital(DigitalPayload),
    Analog(AnalogPayload),
}

impl Payload {
    pub fn frequency(&self) -> Option<Megahertz> {
        match self {
            Self::Digital(digital) => digital.frequency,
            Self::Analog(analog) => analog.frequency,
            Self::Unclassified => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub handle: ChannelHandle,
    pub program_number: i64,
    pub name: String,
    pub deleted: bool,
    pub payload: Payload,
}

impl Channel {
    pub fn new(handle: ChannelHandle, program_number: i64, name: impl Into<String>) -> Self {
        Self {
            handle,
            program_number,
            name: name.into(),
            deleted: false,
            payload: Payload::Unclassified,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn renumber(&mut self, program_number: i64) {
        self.program_number = program_number;
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub fn digital(&self) -> Option<&DigitalPayload> {
        match &self.payload {
            Payload::Digital(digital) => Some(digital),
            _ => None,
        }
    }

    pub fn analog(&self) -> Option<&AnalogPayload> {
        match &self.payload {
            Payload::Analog(analog) => Some(analog),
            _ => None,
        }
    }
}

/// One slot of the host's edited channel sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEntry {
    Channel(Channel),
    /// Cross-list reference to a channel owned by another list.
    Proxy(ChannelHandle),
}

impl From<Channel> for ListEntry {
    fn from(value: Channel) -> Self {
        Self::Channel(value)
    }
}
