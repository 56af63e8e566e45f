#![forbid(unsafe_code)]

use crate::codec::{Megahertz, OrbitalPosition, Polarity};
use crate::ids::{SatelliteId, TransponderId};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Satellite {
    pub id: SatelliteId,
    pub name: String,
    pub position: OrbitalPosition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transponder {
    pub id: TransponderId,
    /// Lookup key into the satellite map; not an owning link.
    pub satellite_id: Option<SatelliteId>,
    pub frequency: Megahertz,
    pub polarity: Polarity,
    pub symbol_rate: i64,
}

impl Transponder {
    pub fn satellite<'a>(
        &self,
        satellites: &'a BTreeMap<SatelliteId, Satellite>,
    ) -> Option<&'a Satellite> {
        self.satellite_id.and_then(|id| satellites.get(&id))
    }
}
