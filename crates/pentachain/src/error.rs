//! Error types for geometry construction and search configuration.

use thiserror::Error;

/// Failure to construct a pentagon.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeomError {
    /// The defining edge is not unit length.
    #[error("defining edge must have length 1.0, got {length}")]
    InvalidEdgeLength { length: f64 },
}

/// Rejected search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("sequence length must be at least 1")]
    ZeroLength,
    #[error("alphabet must not be empty")]
    EmptyAlphabet,
    #[error("edge index {0} is outside 1..=5")]
    EdgeIndexOutOfRange(u8),
    #[error("edge index {0} appears more than once in the alphabet")]
    DuplicateSymbol(u8),
    #[error("denylist patterns must not be empty")]
    EmptyPattern,
    #[error("start sequence has length {got}, expected {expected}")]
    StartLength { expected: usize, got: usize },
    #[error("start sequence uses edge index {0}, which is not in the alphabet")]
    StartSymbol(u8),
    #[error("index range {start}..{end} is empty or exceeds the {total} candidates")]
    IndexRange { start: u64, end: u64, total: u64 },
    #[error("a candidate cap needs a sequential run to report a resume point")]
    ShardedCap,
    #[error("candidate space {alphabet}^{length} does not fit in 64 bits")]
    SpaceTooLarge { alphabet: usize, length: usize },
}
