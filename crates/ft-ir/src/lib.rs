//! Core model types for FamiTracker text modules.
//!
//! This crate defines the in-memory representation that the text parser
//! builds: a module with its songs, instruments, envelopes and wave tables.
//! Every dynamic collection in the model is a [`GapList`].

extern crate alloc;

mod chip;
mod envelope;
mod gap_list;
mod instrument;
mod module;
mod pattern;
pub mod song;

pub use chip::{
    channel_layout, ChannelKind, ChannelLayout, Chip, Expansions, APU_CHANNELS, APU_NOISE_INDEX,
    MAX_CHANNELS, MIN_CHANNELS,
};
pub use envelope::{ArpMode, Dimension, Envelope, MAX_STEPS};
pub use gap_list::{AllocError, GapList};
pub use instrument::{
    EnvelopeRefs, Instrument, Wave, WaveTable, MAX_WAVES, MAX_WAVE_SAMPLES, MIN_WAVE_SAMPLES,
};
pub use module::{Machine, Module, MAX_N163_CHANNELS, MAX_TICK_RATE};
pub use pattern::{
    Effect, InstrumentRef, Pattern, PatternRow, Pitch, INST_LEGATO, INST_NONE, MAX_EFFECTS,
    MAX_INSTRUMENTS, MAX_NOTE, MAX_PATTERNS, MAX_ROWS, NOTE_CUT, NOTE_RELEASE, NOTE_WAIT,
    VOLUME_NONE,
};
pub use song::{OrderRow, Song, Track};
