//! Per-line diagnostics and fatal parse errors.

use core::fmt;
use core::ops::RangeInclusive;
use std::io;

use ft_ir::AllocError;
use thiserror::Error;

use crate::keyword::Keyword;
use crate::macros::MacroError;
use crate::row::{RowError, RowErrorKind};

/// Category of a rejected line. Codes are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Leading token is not a keyword
    UnknownKeyword,
    /// Too few header values
    HeaderArity,
    /// A value outside its documented range
    Range,
    /// Missing `:` between header and body
    Separator,
    /// Malformed pitch in a row
    PitchGrammar,
    /// Malformed instrument, volume or effect in a row
    Token,
    /// Directive not valid in the current state
    StatePrecondition,
}

impl DiagnosticKind {
    pub const fn code(self) -> u8 {
        match self {
            DiagnosticKind::UnknownKeyword => 0,
            DiagnosticKind::HeaderArity => 1,
            DiagnosticKind::Range => 2,
            DiagnosticKind::Separator => 3,
            DiagnosticKind::PitchGrammar => 4,
            DiagnosticKind::Token => 5,
            DiagnosticKind::StatePrecondition => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownKeyword => "unknown keyword",
            DiagnosticKind::HeaderArity => "header arity",
            DiagnosticKind::Range => "range",
            DiagnosticKind::Separator => "separator",
            DiagnosticKind::PitchGrammar => "pitch",
            DiagnosticKind::Token => "token",
            DiagnosticKind::StatePrecondition => "state",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A line that was rejected without changing the module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    /// `None` when the keyword itself was not recognized
    pub keyword: Option<Keyword>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub const fn code(&self) -> u8 {
        self.kind.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword {
            Some(keyword) => write!(f, "{}: {}: {}", self.line, keyword, self.message),
            None => write!(f, "{}: {}", self.line, self.message),
        }
    }
}

/// An error that stops the parse. The partial module is dropped.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: out of memory")]
    Alloc {
        line: usize,
        #[source]
        source: AllocError,
    },
    #[error("line {line}: read failed")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl FormatError {
    /// Line being processed when the error happened.
    pub fn line(&self) -> usize {
        match self {
            FormatError::Alloc { line, .. } | FormatError::Io { line, .. } => *line,
        }
    }
}

/// Why a single line was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Rejection {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Rejection {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn range(what: &str, value: i64, expected: &RangeInclusive<i64>) -> Self {
        Self::new(
            DiagnosticKind::Range,
            format!(
                "{what} {value} out of range (expected {}-{})",
                expected.start(),
                expected.end()
            ),
        )
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::StatePrecondition, message)
    }
}

/// Result of dispatching one line.
#[derive(Debug)]
pub(crate) enum LineError {
    Rejected(Rejection),
    Fatal(AllocError),
}

impl From<Rejection> for LineError {
    fn from(rejection: Rejection) -> Self {
        LineError::Rejected(rejection)
    }
}

impl From<AllocError> for LineError {
    fn from(err: AllocError) -> Self {
        LineError::Fatal(err)
    }
}

impl From<MacroError> for LineError {
    fn from(err: MacroError) -> Self {
        let kind = match err {
            MacroError::HeaderArity(_) => DiagnosticKind::HeaderArity,
            MacroError::Dimension(_) | MacroError::TooManySteps => DiagnosticKind::Range,
            MacroError::MissingColon => DiagnosticKind::Separator,
        };
        LineError::Rejected(Rejection::new(kind, err.to_string()))
    }
}

impl From<RowError> for LineError {
    fn from(err: RowError) -> Self {
        let kind = match err.kind {
            RowErrorKind::Pitch(_) => DiagnosticKind::PitchGrammar,
            RowErrorKind::MissingSeparator(_) => DiagnosticKind::Separator,
            RowErrorKind::InstrumentRange(_) => DiagnosticKind::Range,
            _ => DiagnosticKind::Token,
        };
        LineError::Rejected(Rejection::new(kind, err.to_string()))
    }
}
