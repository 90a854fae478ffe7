//! Crate error types.

use thiserror::Error;

/// Errors surfaced by the context subsystem.
///
/// Scope reads and writes are total operations; the only failure mode is
/// asking for the ambient scope where none is installed, and only the strict
/// accessor ([`crate::context::try_current`]) reports that as an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The strict resolution helper was invoked outside any `run` extent.
    #[error("no active request scope")]
    NoActiveScope,
}
