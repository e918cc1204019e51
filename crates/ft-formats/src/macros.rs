//! `MACRO` body decoding: five header values, a colon, then steps.

use ft_ir::{Dimension, MAX_STEPS};
use thiserror::Error;

use crate::scan::{scan_int, scan_ints, Radix};

/// Header values in the order they appear in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacroHeader {
    pub dimension: Dimension,
    pub id: i64,
    /// -1 for none
    pub loop_point: i64,
    /// -1 for none
    pub release_point: i64,
    pub arp_mode: i64,
}

/// A decoded macro line. Values are range-checked by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroBody {
    pub header: MacroHeader,
    pub steps: Vec<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("not enough header values (expected 5, found {0})")]
    HeaderArity(usize),
    #[error("dimension {0} out of range (expected 0-4)")]
    Dimension(i64),
    #[error("expected colon after header values")]
    MissingColon,
    #[error("more than {} steps", MAX_STEPS)]
    TooManySteps,
}

impl MacroError {
    pub const fn code(self) -> i32 {
        match self {
            MacroError::HeaderArity(_) => -1,
            MacroError::Dimension(_) => -2,
            MacroError::MissingColon => -3,
            MacroError::TooManySteps => -4,
        }
    }
}

/// Strip optional whitespace and a required colon.
pub fn after_colon(text: &str) -> Option<&str> {
    text.trim_start().strip_prefix(':')
}

/// Decode `dim id loop release arp : v0 v1 ...`. An empty step list is
/// valid.
pub fn parse_macro(text: &str) -> Result<MacroBody, MacroError> {
    let mut header = [0i64; 5];
    let (count, rest) = scan_ints(text, &mut header, Radix::Decimal);
    if count != header.len() {
        return Err(MacroError::HeaderArity(count));
    }
    let [dimension, id, loop_point, release_point, arp_mode] = header;
    let dimension = Dimension::from_index(dimension).ok_or(MacroError::Dimension(dimension))?;
    let body = after_colon(rest).ok_or(MacroError::MissingColon)?;

    let mut steps = vec![0i64; MAX_STEPS];
    let (count, rest) = scan_ints(body, &mut steps, Radix::Decimal);
    if scan_int(rest, Radix::Decimal).is_some() {
        return Err(MacroError::TooManySteps);
    }
    steps.truncate(count);

    Ok(MacroBody {
        header: MacroHeader {
            dimension,
            id,
            loop_point,
            release_point,
            arp_mode,
        },
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_macro() {
        let body = parse_macro("0 3 -1 -1 0 : 10 10 8 8 4").unwrap();
        assert_eq!(body.header.dimension, Dimension::Volume);
        assert_eq!(body.header.id, 3);
        assert_eq!(body.header.loop_point, -1);
        assert_eq!(body.header.release_point, -1);
        assert_eq!(body.header.arp_mode, 0);
        assert_eq!(body.steps, [10, 10, 8, 8, 4]);
    }

    #[test]
    fn colon_may_follow_without_space() {
        let body = parse_macro("1 0 2 -1 2: 0 -12 12").unwrap();
        assert_eq!(body.header.dimension, Dimension::Arpeggio);
        assert_eq!(body.steps, [0, -12, 12]);
    }

    #[test]
    fn empty_macro() {
        let body = parse_macro("4 7 -1 -1 0 :").unwrap();
        assert!(body.steps.is_empty());
    }

    #[test]
    fn errors() {
        assert_eq!(parse_macro("0 3 -1 -1"), Err(MacroError::HeaderArity(4)));
        assert_eq!(parse_macro("5 3 -1 -1 0 : 1"), Err(MacroError::Dimension(5)));
        assert_eq!(parse_macro("0 3 -1 -1 0 10 10"), Err(MacroError::MissingColon));
        assert_eq!(MacroError::MissingColon.code(), -3);
    }

    #[test]
    fn step_limit() {
        let ok = format!("0 0 -1 -1 0 :{}", " 1".repeat(MAX_STEPS));
        assert_eq!(parse_macro(&ok).unwrap().steps.len(), MAX_STEPS);
        let too_many = format!("0 0 -1 -1 0 :{}", " 1".repeat(MAX_STEPS + 1));
        assert_eq!(parse_macro(&too_many), Err(MacroError::TooManySteps));
    }
}
