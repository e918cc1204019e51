//! Envelopes (FamiTracker "macros" / sequences).

use alloc::vec::Vec;

use crate::chip::Chip;

/// Most steps an envelope may have.
pub const MAX_STEPS: usize = 256;

/// The parameter an envelope modulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Volume,
    Arpeggio,
    Pitch,
    HiPitch,
    Timbre,
}

impl Dimension {
    pub const COUNT: usize = 5;

    pub const ALL: [Dimension; Self::COUNT] = [
        Dimension::Volume,
        Dimension::Arpeggio,
        Dimension::Pitch,
        Dimension::HiPitch,
        Dimension::Timbre,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Dimension::Volume => "volume",
            Dimension::Arpeggio => "arpeggio",
            Dimension::Pitch => "pitch",
            Dimension::HiPitch => "hi-pitch",
            Dimension::Timbre => "timbre",
        }
    }
}

/// How arpeggio envelope values are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArpMode {
    #[default]
    Absolute,
    Fixed,
    Relative,
    Scheme,
}

impl ArpMode {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(ArpMode::Absolute),
            1 => Some(ArpMode::Fixed),
            2 => Some(ArpMode::Relative),
            3 => Some(ArpMode::Scheme),
            _ => None,
        }
    }
}

/// A per-tick value curve referenced by instruments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub chip: Chip,
    pub dimension: Dimension,
    pub id: u8,
    /// Step to jump back to after the last step
    pub loop_point: Option<u8>,
    /// Step held until the note is released
    pub release_point: Option<u8>,
    pub arp_mode: ArpMode,
    pub steps: Vec<i8>,
}

impl Envelope {
    /// Create an empty envelope.
    pub fn new(chip: Chip, dimension: Dimension, id: u8) -> Self {
        Self {
            chip,
            dimension,
            id,
            loop_point: None,
            release_point: None,
            arp_mode: ArpMode::Absolute,
            steps: Vec::new(),
        }
    }

    /// Returns true if this envelope answers to `(chip, dimension, id)`.
    pub fn is(&self, chip: Chip, dimension: Dimension, id: u8) -> bool {
        self.chip == chip && self.dimension == dimension && self.id == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_from_index() {
        assert_eq!(Dimension::from_index(0), Some(Dimension::Volume));
        assert_eq!(Dimension::from_index(4), Some(Dimension::Timbre));
        assert_eq!(Dimension::from_index(5), None);
        assert_eq!(Dimension::from_index(-1), None);
    }
}
