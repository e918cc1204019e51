//! Parser for the FamiTracker text export.
//!
//! Feed lines to a [`ModuleBuilder`], or use [`parse_module`] /
//! [`read_module`] for whole inputs. Malformed lines are reported as
//! [`Diagnostic`]s and skipped; only running out of memory or a failed
//! read stops the parse.

mod builder;
mod error;
pub mod grammar;
mod keyword;
pub mod macros;
pub mod pitch;
pub mod row;
pub mod scan;

pub use builder::{parse_module, read_module, ModuleBuilder, Outcome, ParseOptions, Parsed};
pub use error::{Diagnostic, DiagnosticKind, FormatError};
pub use keyword::Keyword;
