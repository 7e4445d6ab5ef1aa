//! Error types for the WDDX codec.

use thiserror::Error;

/// Errors surfaced by the packet codec and the action surface.
///
/// Structural irregularities *inside* a well-enveloped packet are not errors:
/// the decoder skips fields and vars without a `name`, pads missing recordset
/// cells with `Null`, and turns unknown scalar tags into strings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WddxError {
    /// No `wddxPacket`/`data` envelope, or text that is not XML at all.
    #[error("the object provided is not a valid WDDX packet: {0}")]
    InvalidPacket(String),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("unknown WDDX action: {0}")]
    UnknownAction(String),
}

impl From<XmlError> for WddxError {
    fn from(e: XmlError) -> Self {
        WddxError::InvalidPacket(e.to_string())
    }
}

/// Errors raised while building an [`XmlDocument`](crate::XmlDocument).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(String),
    #[error("document has no root element")]
    NoRootElement,
    #[error("unclosed element <{0}>")]
    Unclosed(String),
}

/// Errors raised while constructing a [`Value`](crate::Value).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}
