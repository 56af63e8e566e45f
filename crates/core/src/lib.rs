#![forbid(unsafe_code)]

pub mod codec;
pub mod model;

pub mod ids {
    macro_rules! persisted_id {
        ($name:ident) => {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(i64);

            impl $name {
                pub const fn new(value: i64) -> Self {
                    Self(value)
                }

                pub const fn get(self) -> i64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        };
    }

    persisted_id!(SatelliteId);
    persisted_id!(TransponderId);
    persisted_id!(ChannelHandle);
}

pub use codec::{Hemisphere, Megahertz, OrbitalPosition, Polarity};
pub use ids::{ChannelHandle, SatelliteId, TransponderId};
pub use model::*;
