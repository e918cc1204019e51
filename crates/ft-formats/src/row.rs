//! Pattern row decoding.
//!
//! A `ROW` line carries one column per channel, separated by colons. Each
//! column is `pitch(3) instrument(2) volume(1)` followed by up to four
//! `letter + 2 hex digit` effects. Whitespace between fields is optional.

use arrayvec::ArrayVec;
use ft_ir::{Effect, InstrumentRef, PatternRow, Pitch, MAX_CHANNELS, MAX_EFFECTS, MAX_INSTRUMENTS};
use thiserror::Error;

use crate::pitch::{decode_pitch, PitchError, PitchKind};

/// Decoded columns of one row, in channel order.
pub type RowColumns = ArrayVec<PatternRow, MAX_CHANNELS>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RowErrorKind {
    #[error("{0}")]
    Pitch(PitchError),
    #[error("line ends inside pitch")]
    PitchUnterminated,
    #[error("line ends inside instrument")]
    InstrumentUnterminated,
    #[error("bad instrument digit {0:?}")]
    InstrumentDigit(char),
    #[error("instrument {0:02X} out of range (expected 00-7F)")]
    InstrumentRange(u8),
    #[error("line ends inside volume")]
    VolumeUnterminated,
    #[error("bad volume digit {0:?}")]
    VolumeDigit(char),
    #[error("line ends inside effect")]
    EffectUnterminated,
    #[error("bad effect command {0:?}")]
    EffectLetter(char),
    #[error("bad effect digit {0:?}")]
    EffectDigit(char),
    #[error("expected ':' before column, found {0:?}")]
    MissingSeparator(char),
}

impl RowErrorKind {
    pub const fn code(self) -> i32 {
        match self {
            RowErrorKind::Pitch(e) => e.code(),
            RowErrorKind::PitchUnterminated => -6,
            RowErrorKind::InstrumentUnterminated => -7,
            RowErrorKind::InstrumentDigit(_) => -8,
            RowErrorKind::InstrumentRange(_) => -9,
            RowErrorKind::VolumeUnterminated => -10,
            RowErrorKind::VolumeDigit(_) => -11,
            RowErrorKind::EffectUnterminated => -12,
            RowErrorKind::EffectLetter(_) => -13,
            RowErrorKind::EffectDigit(_) => -14,
            RowErrorKind::MissingSeparator(_) => -15,
        }
    }
}

/// The first failure in a row, with the channel column it happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("column {column}: {kind}")]
pub struct RowError {
    pub column: usize,
    pub kind: RowErrorKind,
}

impl RowError {
    pub const fn code(&self) -> i32 {
        self.kind.code()
    }
}

struct RowReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> RowReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skip to the next column separator.
    fn skip_column(&mut self) {
        while self.peek().is_some_and(|b| b != b':') {
            self.pos += 1;
        }
    }

    /// Read an `N`-character field. `None` if the column ends first.
    fn field<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.skip_space();
        let field = self.bytes.get(self.pos..self.pos + N)?;
        if field.contains(&b':') {
            return None;
        }
        self.pos += N;
        field.try_into().ok()
    }
}

fn hex_digit(b: u8) -> Result<u8, char> {
    (b as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(b as char)
}

fn hex_byte([hi, lo]: [u8; 2]) -> Result<u8, char> {
    Ok(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

fn decode_column(reader: &mut RowReader, kind: PitchKind) -> Result<PatternRow, RowErrorKind> {
    let pitch = reader.field::<3>().ok_or(RowErrorKind::PitchUnterminated)?;
    let pitch: Pitch = decode_pitch(pitch, kind).map_err(RowErrorKind::Pitch)?;

    let instrument = match reader.field::<2>().ok_or(RowErrorKind::InstrumentUnterminated)? {
        [b'.', b'.'] => InstrumentRef::None,
        [b'&', b'&'] => InstrumentRef::Legato,
        digits => {
            let index = hex_byte(digits).map_err(RowErrorKind::InstrumentDigit)?;
            if index as usize >= MAX_INSTRUMENTS {
                return Err(RowErrorKind::InstrumentRange(index));
            }
            InstrumentRef::Index(index)
        }
    };

    let volume = match reader.field::<1>().ok_or(RowErrorKind::VolumeUnterminated)? {
        [b'.'] => None,
        [digit] => Some(hex_digit(digit).map_err(RowErrorKind::VolumeDigit)?),
    };

    let mut effects = [None; MAX_EFFECTS];
    for slot in effects.iter_mut() {
        reader.skip_space();
        match reader.peek() {
            None | Some(b':') => break,
            Some(b'.') => {
                reader.skip_column();
                break;
            }
            Some(_) => {}
        }
        let [letter, hi, lo] = reader.field::<3>().ok_or(RowErrorKind::EffectUnterminated)?;
        if !(letter.is_ascii_uppercase() || letter.is_ascii_digit()) {
            return Err(RowErrorKind::EffectLetter(letter as char));
        }
        let value = hex_byte([hi, lo]).map_err(RowErrorKind::EffectDigit)?;
        *slot = Some(Effect::new(letter, value));
    }

    Ok(PatternRow {
        pitch,
        instrument,
        volume,
        effects,
    })
}

/// Decode the column part of a `ROW` line (everything after the row id).
///
/// `kinds` gives the pitch kind of each channel; columns past its length
/// are not decoded. A row may carry fewer columns than channels.
pub fn decode_row(text: &str, kinds: &[PitchKind]) -> Result<RowColumns, RowError> {
    let max_columns = kinds.len().min(MAX_CHANNELS);
    let mut reader = RowReader::new(text);
    let mut columns = RowColumns::new();

    while columns.len() < max_columns {
        let column = columns.len();
        reader.skip_space();
        match reader.peek() {
            None => break,
            Some(b':') => reader.pos += 1,
            Some(_) if column == 0 => {}
            Some(other) => {
                return Err(RowError {
                    column,
                    kind: RowErrorKind::MissingSeparator(other as char),
                })
            }
        }
        reader.skip_space();
        if reader.peek().is_none() {
            break;
        }
        let row = decode_column(&mut reader, kinds[column])
            .map_err(|kind| RowError { column, kind })?;
        columns.push(row);
    }

    // the last decoded column must end the row or be followed by another
    if !columns.is_empty() {
        reader.skip_space();
        if let Some(other) = reader.peek().filter(|&b| b != b':') {
            return Err(RowError {
                column: columns.len(),
                kind: RowErrorKind::MissingSeparator(other as char),
            });
        }
    }
    Ok(columns)
}
