//! Error types.
//!
//! Every failure in this crate is a caller-detectable precondition violation:
//! nothing here performs I/O, so there is no transient/retryable class. Each
//! variant maps onto one of two kinds (see [`ErrorKind`]).

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input to an operation (bad epsilon, out-of-range action, ...).
    InvalidArgument,
    /// A component lacks a capability it needs (detected at construction/first use).
    Configuration,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("epsilon must be within [0, 1], got {0}")]
    EpsilonOutOfRange(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("number of actions must be at least 1, got {0}")]
    InvalidNumberOfActions(u64),

    #[error("action {action} is not within the valid range [1, {num_actions}]")]
    ActionOutOfRange { action: u32, num_actions: u32 },

    #[error("action {0} appears more than once in the action list")]
    DuplicateAction(u32),

    #[error("weight at index {index} is negative ({weight})")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("at least one weight must be positive")]
    ZeroWeights,

    #[error("expected {expected} entries (one per action), got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("probabilities must sum to one, got {0}")]
    ProbabilitiesNotNormalized(f64),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid range: low {lo} is greater than high {hi}")]
    InvalidRange { lo: i64, hi: i64 },

    #[error("an initial full explorer and an initial explorer are mutually exclusive")]
    ConflictingFallbacks,

    #[error("missing capability: {0}")]
    MissingCapability(&'static str),

    #[error("no policy is available and no fallback explorer applies to this call")]
    NoDecisionSource,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCapability(_) | Error::NoDecisionSource => ErrorKind::Configuration,
            _ => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
