use thiserror::Error;

use super::{GateId, Literal};

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// The gate with given id does not exist (out of range or already removed).
    #[error("gate with id={0} does not exist")]
    GateDoesNotExist(GateId),

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, a fanin edge without its mirroring fanout edge.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Writing the circuit failed.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),

    /// Just forwarding a [`SimError`].
    #[error("{0}")]
    SimError(#[from] SimError),
}

/// Error returned when parsing from file failed.
///
/// It is defined here because the `parser` module is private.
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParserError {
    /// All features are not supported (only the basics in fact).
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid token, something else was expected.
    #[error("line {line}: invalid token: {msg}")]
    InvalidToken { line: usize, msg: String },

    /// The file ended before the section announced by the header.
    #[error("line {line}: missing {what} definition")]
    MissingLine { line: usize, what: &'static str },

    /// A literal refers to an id beyond the maximum given by the header.
    #[error("line {line}: literal {literal} exceeds maximum valid id {max}")]
    LiteralOutOfRange {
        line: usize,
        literal: Literal,
        max: GateId,
    },

    /// A defined literal (input or and gate) must be positive, and neither the constant.
    #[error("line {line}: {what} {literal}({}) cannot be inverted or constant", literal / 2)]
    CannotInvert {
        line: usize,
        what: &'static str,
        literal: Literal,
    },

    /// A gate id is defined twice.
    #[error("line {line}: literal {literal} is redefined, previously defined in line {previous}")]
    Redefinition {
        line: usize,
        literal: Literal,
        previous: usize,
    },

    /// Malformed or duplicate symbol table record.
    #[error("line {line}: invalid symbol: {msg}")]
    InvalidSymbol { line: usize, msg: String },

    /// An IO error occured (file doesn't exist, or doesn't have the right extension, ...).
    #[error("io error: {0}")]
    IoError(String),
}

/// Error returned when a simulation campaign is aborted by an invalid pattern.
///
/// `simulated` is the number of patterns successfully consumed before the error,
/// the FEC groups computed from those patterns remain valid.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(
        "pattern({pattern}) length({len}) does not match the number of inputs({inputs}) in a circuit, {simulated} patterns simulated"
    )]
    PatternWidth {
        pattern: String,
        len: usize,
        inputs: usize,
        simulated: usize,
    },

    #[error("pattern({pattern}) contains a non-0/1 character('{ch}'), {simulated} patterns simulated")]
    NonBoolean {
        pattern: String,
        ch: char,
        simulated: usize,
    },

    #[error("io error while simulating: {msg}, {simulated} patterns simulated")]
    IoError { msg: String, simulated: usize },
}

impl SimError {
    /// Number of patterns simulated before the campaign was aborted.
    pub fn simulated(&self) -> usize {
        match *self {
            SimError::PatternWidth { simulated, .. }
            | SimError::NonBoolean { simulated, .. }
            | SimError::IoError { simulated, .. } => simulated,
        }
    }
}
