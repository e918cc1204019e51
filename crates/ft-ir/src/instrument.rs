//! Instruments and N163 wave tables.

use alloc::string::String;
use arrayvec::ArrayVec;

use crate::chip::Chip;
use crate::envelope::Dimension;
use crate::gap_list::{AllocError, GapList};

/// Most samples in one N163 wave.
pub const MAX_WAVE_SAMPLES: usize = 240;
/// Fewest samples in one N163 wave.
pub const MIN_WAVE_SAMPLES: usize = 2;
/// Most waves one N163 instrument can hold.
pub const MAX_WAVES: usize = 64;

/// One wave: 4-bit samples, length fixed by the owning instrument.
pub type Wave = ArrayVec<u8, MAX_WAVE_SAMPLES>;

/// Envelope ids an instrument uses, one slot per dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvelopeRefs([Option<u8>; Dimension::COUNT]);

impl EnvelopeRefs {
    pub fn get(&self, dimension: Dimension) -> Option<u8> {
        self.0[dimension.index()]
    }

    pub fn set(&mut self, dimension: Dimension, id: Option<u8>) {
        self.0[dimension.index()] = id;
    }
}

/// Wave RAM geometry and waves of a wavetable instrument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveTable {
    /// Samples per wave
    pub wave_len: u8,
    /// Where the wave is loaded in wave RAM
    pub load_addr: u8,
    pub waves: GapList<Wave>,
}

impl WaveTable {
    pub fn new(wave_len: u8, load_addr: u8, limit: usize) -> Self {
        Self {
            wave_len,
            load_addr,
            waves: GapList::with_limit(limit),
        }
    }

    /// A wave of `wave_len` zero samples.
    pub fn blank_wave(&self) -> Wave {
        (0..self.wave_len).take(MAX_WAVE_SAMPLES).map(|_| 0).collect()
    }

    /// Grow the wave list with blank waves until it has `len` entries.
    pub fn grow_to(&mut self, len: usize) -> Result<(), AllocError> {
        if self.waves.len() < len {
            let blank = self.blank_wave();
            self.waves.fill_to(len, &blank)?;
        }
        Ok(())
    }

    /// Get wave `index`, growing the list with blank waves first.
    pub fn wave_mut(&mut self, index: usize) -> Result<&mut Wave, AllocError> {
        self.grow_to(index + 1)?;
        self.waves
            .get_mut(index)
            .ok_or(AllocError { requested: index + 1 })
    }
}

/// An instrument definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instrument {
    pub chip: Chip,
    pub name: String,
    pub envelopes: EnvelopeRefs,
    /// Present only on wavetable chips
    pub wave_table: Option<WaveTable>,
    /// Set by an instrument definition; false on fill-in slots
    pub declared: bool,
}

impl Instrument {
    /// An unassigned 2A03 instrument, used to fill skipped indices.
    pub fn blank() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_refs_by_dimension() {
        let mut refs = EnvelopeRefs::default();
        refs.set(Dimension::Arpeggio, Some(3));
        refs.set(Dimension::Timbre, Some(0));
        assert_eq!(refs.get(Dimension::Volume), None);
        assert_eq!(refs.get(Dimension::Arpeggio), Some(3));
        assert_eq!(refs.get(Dimension::Timbre), Some(0));
    }

    #[test]
    fn wave_mut_grows_with_blank_waves() {
        let mut table = WaveTable::new(16, 0, usize::MAX);
        table.wave_mut(2).unwrap()[0] = 15;
        assert_eq!(table.waves.len(), 3);
        assert_eq!(table.waves.get(0).unwrap().len(), 16);
        assert!(table.waves.get(1).unwrap().iter().all(|&s| s == 0));
        assert_eq!(table.waves.get(2).unwrap()[0], 15);

        // asking again does not grow
        table.wave_mut(2).unwrap();
        assert_eq!(table.waves.len(), 3);
    }
}
