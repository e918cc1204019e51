//! Pattern rows and patterns.

use crate::gap_list::{AllocError, GapList};

/// Effect columns per channel.
pub const MAX_EFFECTS: usize = 4;
/// Highest note: B-7.
pub const MAX_NOTE: u8 = 95;
/// Highest rows-per-pattern value.
pub const MAX_ROWS: usize = 256;
/// Pattern ids per track.
pub const MAX_PATTERNS: usize = 256;
/// Instrument column values 00-7F.
pub const MAX_INSTRUMENTS: usize = 128;

// Byte encodings used by the text format and dumps.
pub const NOTE_RELEASE: u8 = 126;
pub const NOTE_CUT: u8 = 127;
pub const NOTE_WAIT: u8 = 255;
pub const INST_LEGATO: u8 = 254;
pub const INST_NONE: u8 = 255;
pub const VOLUME_NONE: u8 = 255;

/// Pitch column of a pattern row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pitch {
    /// `...`: keep whatever is playing
    #[default]
    Wait,
    /// Semitone 0-95 (C-0 through B-7), or noise period 0-15 on the
    /// noise channel
    Note(u8),
    /// `===`: key release
    Release,
    /// `---`: note cut
    Cut,
}

impl Pitch {
    pub const fn to_raw(self) -> u8 {
        match self {
            Pitch::Wait => NOTE_WAIT,
            Pitch::Note(n) => n,
            Pitch::Release => NOTE_RELEASE,
            Pitch::Cut => NOTE_CUT,
        }
    }

    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            NOTE_WAIT => Some(Pitch::Wait),
            NOTE_RELEASE => Some(Pitch::Release),
            NOTE_CUT => Some(Pitch::Cut),
            n if n <= MAX_NOTE => Some(Pitch::Note(n)),
            _ => None,
        }
    }
}

/// Instrument column of a pattern row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstrumentRef {
    /// `..`
    #[default]
    None,
    /// `&&`: keep the previous instrument without retriggering
    Legato,
    /// `00`-`7F`
    Index(u8),
}

impl InstrumentRef {
    pub const fn to_raw(self) -> u8 {
        match self {
            InstrumentRef::None => INST_NONE,
            InstrumentRef::Legato => INST_LEGATO,
            InstrumentRef::Index(i) => i,
        }
    }

    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            INST_NONE => InstrumentRef::None,
            INST_LEGATO => InstrumentRef::Legato,
            i => InstrumentRef::Index(i),
        }
    }
}

/// One effect column: an ASCII command letter and its parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    pub letter: u8,
    pub value: u8,
}

impl Effect {
    pub const fn new(letter: u8, value: u8) -> Self {
        Self { letter, value }
    }
}

/// One channel's cell in one row of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternRow {
    pub pitch: Pitch,
    pub instrument: InstrumentRef,
    /// Volume 0-15, `None` for unchanged
    pub volume: Option<u8>,
    pub effects: [Option<Effect>; MAX_EFFECTS],
}

impl PatternRow {
    /// A row with nothing in any column.
    pub const BLANK: Self = Self {
        pitch: Pitch::Wait,
        instrument: InstrumentRef::None,
        volume: None,
        effects: [None; MAX_EFFECTS],
    };

    /// Returns true if every column is empty.
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }

    /// Number of effect columns in use, counted up to the first empty slot.
    pub fn effect_count(&self) -> usize {
        self.effects.iter().take_while(|fx| fx.is_some()).count()
    }
}

impl Default for PatternRow {
    fn default() -> Self {
        Self::BLANK
    }
}

/// A fixed-length run of rows for one track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    rows: GapList<PatternRow>,
}

impl Pattern {
    /// Create a pattern of `len` blank rows.
    pub fn blank(len: usize, limit: usize) -> Result<Self, AllocError> {
        let mut rows = GapList::with_limit(limit);
        rows.fill_to(len, &PatternRow::BLANK)?;
        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&PatternRow> {
        self.rows.get(row)
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut PatternRow> {
        self.rows.get_mut(row)
    }

    /// Overwrite a row. Returns false if `row` is past the end.
    pub fn set_row(&mut self, row: usize, value: PatternRow) -> bool {
        self.rows.set(row, value)
    }

    pub fn rows(&self) -> impl Iterator<Item = &PatternRow> + '_ {
        self.rows.iter()
    }

    /// Returns true if no row has anything in it.
    pub fn is_blank(&self) -> bool {
        self.rows().all(PatternRow::is_blank)
    }
}
