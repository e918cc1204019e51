//! Pitch column decoding.

use ft_ir::{ChannelKind, Pitch, MAX_NOTE};
use thiserror::Error;

/// How a channel spells its pitch column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PitchKind {
    /// Note letter, accidental, octave: `C#4`
    #[default]
    Tone,
    /// One hex digit noise period: `A-#`
    Noise,
}

impl PitchKind {
    pub fn for_channel(channel: ChannelKind) -> Self {
        if channel.is_noise() {
            PitchKind::Noise
        } else {
            PitchKind::Tone
        }
    }
}

impl TryFrom<u8> for PitchKind {
    type Error = PitchError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(PitchKind::Tone),
            1 => Ok(PitchKind::Noise),
            other => Err(PitchError::UnknownKind(other)),
        }
    }
}

/// A malformed pitch token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PitchError {
    #[error("expected note letter A-G, found {0:?}")]
    MissingLetter(char),
    #[error("expected accidental '-', '#' or 'b', found {0:?}")]
    BadAccidental(char),
    #[error("expected octave 0-7, found {0:?}")]
    BadOctave(char),
    #[error("expected noise period 0-F, found {0:?}")]
    BadHexDigit(char),
    #[error("unknown pitch kind {0}")]
    UnknownKind(u8),
}

impl PitchError {
    pub const fn code(self) -> i32 {
        match self {
            PitchError::MissingLetter(_) => -1,
            PitchError::BadAccidental(_) => -2,
            PitchError::BadOctave(_) => -3,
            PitchError::BadHexDigit(_) => -4,
            PitchError::UnknownKind(_) => -5,
        }
    }
}

const fn letter_semitone(letter: u8) -> Option<i32> {
    match letter {
        b'C' => Some(0),
        b'D' => Some(2),
        b'E' => Some(4),
        b'F' => Some(5),
        b'G' => Some(7),
        b'A' => Some(9),
        b'B' => Some(11),
        _ => None,
    }
}

/// Decode a 3-character pitch token.
///
/// `...` waits, `---` cuts, `===` releases; only the first character is
/// checked for those. `Cb0` and `B#7` clamp to the note range.
pub fn decode_pitch(token: [u8; 3], kind: PitchKind) -> Result<Pitch, PitchError> {
    match token[0] {
        b'.' => return Ok(Pitch::Wait),
        b'-' => return Ok(Pitch::Cut),
        b'=' => return Ok(Pitch::Release),
        _ => {}
    }

    match kind {
        PitchKind::Noise => (token[0] as char)
            .to_digit(16)
            .map(|period| Pitch::Note(period as u8))
            .ok_or(PitchError::BadHexDigit(token[0] as char)),
        PitchKind::Tone => {
            let letter =
                letter_semitone(token[0]).ok_or(PitchError::MissingLetter(token[0] as char))?;
            let accidental = match token[1] {
                b'-' => 0,
                b'#' => 1,
                b'b' => -1,
                other => return Err(PitchError::BadAccidental(other as char)),
            };
            let octave = match token[2] {
                b @ b'0'..=b'7' => i32::from(b - b'0'),
                other => return Err(PitchError::BadOctave(other as char)),
            };
            let semitone = (letter + accidental + 12 * octave).clamp(0, i32::from(MAX_NOTE));
            Ok(Pitch::Note(semitone as u8))
        }
    }
}
