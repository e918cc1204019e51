//! The module: everything one text export describes.

use alloc::string::String;

use crate::chip::{channel_layout, Chip, ChannelLayout, Expansions};
use crate::envelope::{Dimension, Envelope};
use crate::gap_list::{AllocError, GapList};
use crate::instrument::Instrument;
use crate::song::Song;

/// Highest `FRAMERATE` override in Hz.
pub const MAX_TICK_RATE: u16 = 800;
/// Most N163 channels that can be active.
pub const MAX_N163_CHANNELS: u8 = 8;

/// Target console timing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Machine {
    /// 2A03, 60 Hz
    #[default]
    Ntsc,
    /// 2A07, 50 Hz
    Pal,
}

impl Machine {
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Machine::Ntsc),
            1 => Some(Machine::Pal),
            _ => None,
        }
    }

    /// Tick rate used when the module does not override it.
    pub const fn default_tick_rate(self) -> u16 {
        match self {
            Machine::Ntsc => 60,
            Machine::Pal => 50,
        }
    }
}

/// A complete tracker project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub title: String,
    pub author: String,
    pub copyright: String,
    /// Comment lines joined with `\n`
    pub comment: String,
    pub machine: Machine,
    /// Tick rate override in Hz, 0 for the machine default
    pub tick_rate: u16,
    pub expansions: Expansions,
    /// How many of the 8 N163 channels are active
    pub n163_channels: u8,
    pub instruments: GapList<Instrument>,
    /// Envelopes of every chip, looked up by `(chip, dimension, id)`
    pub envelopes: GapList<Envelope>,
    pub songs: GapList<Song>,
    limit: usize,
}

impl Default for Module {
    fn default() -> Self {
        Self::with_limit(usize::MAX)
    }
}

impl Module {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty module whose containers never grow past `limit`
    /// elements.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            copyright: String::new(),
            comment: String::new(),
            machine: Machine::Ntsc,
            tick_rate: 0,
            expansions: Expansions::empty(),
            n163_channels: 1,
            instruments: GapList::with_limit(limit),
            envelopes: GapList::with_limit(limit),
            songs: GapList::with_limit(limit),
            limit,
        }
    }

    /// Element ceiling for containers created under this module.
    pub fn container_limit(&self) -> usize {
        self.limit
    }

    /// Effective tick rate in Hz.
    pub fn tick_rate_hz(&self) -> u16 {
        if self.tick_rate == 0 {
            self.machine.default_tick_rate()
        } else {
            self.tick_rate
        }
    }

    /// Coded channels in `ORDER` and `ROW` column order.
    pub fn channel_layout(&self) -> ChannelLayout {
        channel_layout(self.expansions)
    }

    /// Number of coded channels.
    pub fn channel_count(&self) -> usize {
        self.channel_layout().len()
    }

    /// Get an instrument if it exists.
    pub fn instrument(&self, index: usize) -> Option<&Instrument> {
        self.instruments.get(index)
    }

    /// Get instrument `index` for writing, appending blank instruments
    /// until it exists.
    pub fn instrument_mut(&mut self, index: usize) -> Result<&mut Instrument, AllocError> {
        self.instruments.fill_to(index + 1, &Instrument::blank())?;
        self.instruments
            .get_mut(index)
            .ok_or(AllocError { requested: index + 1 })
    }

    /// Find an envelope in the pool.
    pub fn envelope(&self, chip: Chip, dimension: Dimension, id: u8) -> Option<&Envelope> {
        self.envelopes.iter().find(|env| env.is(chip, dimension, id))
    }

    /// Add an envelope to the pool, replacing one with the same
    /// `(chip, dimension, id)`. Returns its pool index.
    pub fn set_envelope(&mut self, envelope: Envelope) -> Result<usize, AllocError> {
        let existing = self
            .envelopes
            .iter()
            .position(|env| env.is(envelope.chip, envelope.dimension, envelope.id));
        match existing {
            Some(index) => {
                self.envelopes.set(index, envelope);
                Ok(index)
            }
            None => {
                self.envelopes.push(envelope)?;
                Ok(self.envelopes.len() - 1)
            }
        }
    }

    /// Resolve an instrument's envelope for one dimension.
    pub fn instrument_envelope(&self, instrument: usize, dimension: Dimension) -> Option<&Envelope> {
        let inst = self.instrument(instrument)?;
        let id = inst.envelopes.get(dimension)?;
        self.envelope(inst.chip, dimension, id)
    }

    /// Append a song and return it.
    pub fn add_song(&mut self, song: Song) -> Result<&mut Song, AllocError> {
        self.songs.push(song)
    }
}
