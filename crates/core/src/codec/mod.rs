#![forbid(unsafe_code)]

//! Packed integer fields as they are persisted, and their decoded values.
//!
//! Every function here is total: out-of-range raws are masked or divided,
//! never rejected, since channel databases written by receivers are not
//! guaranteed to be logically clean.

use std::cmp::Ordering;
use std::fmt;

/// Logical width of the DVB service identifiers (ONID, TSID, SID).
pub const SERVICE_FIELD_MASK: i64 = 0x1FFF;

/// Digital frequencies are stored in kHz.
pub const DIGITAL_FREQUENCY_DIVISOR: i64 = 1_000;

/// Analog tuner frequencies are stored in multiples of 10 Hz.
pub const ANALOG_FREQUENCY_DIVISOR: i64 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    East,
    West,
}

impl Hemisphere {
    pub fn letter(self) -> char {
        match self {
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrbitalPosition {
    pub degrees: u64,
    pub tenths: u8,
    pub hemisphere: Hemisphere,
}

impl OrbitalPosition {
    /// Re-encodes to signed tenths of a degree, negative for West.
    pub fn to_raw(self) -> i64 {
        let magnitude = self.degrees.wrapping_mul(10).wrapping_add(u64::from(self.tenths));
        match self.hemisphere {
            Hemisphere::West => 0i64.wrapping_sub_unsigned(magnitude),
            Hemisphere::East => magnitude as i64,
        }
    }
}

impl fmt::Display for OrbitalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{}",
            self.degrees,
            self.tenths,
            self.hemisphere.letter()
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarity {
    Horizontal,
    Vertical,
}

impl Polarity {
    pub fn symbol(self) -> char {
        match self {
            Self::Horizontal => 'H',
            Self::Vertical => 'V',
        }
    }
}

/// Exact decimal megahertz value: `raw / divisor`.
///
/// Kept as the persisted integer plus its scale so that scaling back
/// recovers the raw value without floating point loss.
#[derive(Clone, Copy, Debug)]
pub struct Megahertz {
    raw: i64,
    divisor: i64,
}

impl Megahertz {
    fn new(raw: i64, divisor: i64) -> Self {
        Self { raw, divisor }
    }

    pub fn raw(&self) -> i64 {
        self.raw
    }

    pub fn divisor(&self) -> i64 {
        self.divisor
    }

    pub fn as_f64(&self) -> f64 {
        self.raw as f64 / self.divisor as f64
    }

    /// Multiplies back by `factor`. `None` when the product is not an integer
    /// or does not fit in `i64`.
    pub fn scaled(&self, factor: i64) -> Option<i64> {
        let product = i128::from(self.raw) * i128::from(factor);
        let divisor = i128::from(self.divisor);
        if product % divisor != 0 {
            return None;
        }
        i64::try_from(product / divisor).ok()
    }
}

impl PartialEq for Megahertz {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Megahertz {}

impl PartialOrd for Megahertz {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Megahertz {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = i128::from(self.raw) * i128::from(other.divisor);
        let right = i128::from(other.raw) * i128::from(self.divisor);
        left.cmp(&right)
    }
}

impl fmt::Display for Megahertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.raw < 0 { "-" } else { "" };
        let magnitude = self.raw.unsigned_abs();
        let divisor = self.divisor.unsigned_abs();
        let whole = magnitude / divisor;
        let fraction = magnitude % divisor;
        let width = decimal_digits(divisor) - 1;
        let digits = format!("{fraction:0width$}");
        let trimmed = digits.trim_end_matches('0');
        let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
        write!(f, "{sign}{whole}.{trimmed}")
    }
}

fn decimal_digits(mut value: u64) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

pub fn decode_orbital_position(raw: i64) -> OrbitalPosition {
    let hemisphere = if raw < 0 {
        Hemisphere::West
    } else {
        Hemisphere::East
    };
    let magnitude = raw.unsigned_abs();
    OrbitalPosition {
        degrees: magnitude / 10,
        tenths: (magnitude % 10) as u8,
        hemisphere,
    }
}

pub fn decode_digital_frequency_mhz(raw_khz: i64) -> Megahertz {
    Megahertz::new(raw_khz, DIGITAL_FREQUENCY_DIVISOR)
}

pub fn decode_analog_frequency_mhz(raw_tens_of_hz: i64) -> Megahertz {
    Megahertz::new(raw_tens_of_hz, ANALOG_FREQUENCY_DIVISOR)
}

pub fn decode_polarity(raw: i64) -> Polarity {
    if raw == 0 {
        Polarity::Horizontal
    } else {
        Polarity::Vertical
    }
}

pub fn mask_service_field(raw: i64) -> u16 {
    (raw & SERVICE_FIELD_MASK) as u16
}
