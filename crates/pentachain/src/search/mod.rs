//! Attachment-sequence search over pentagon chains.
//!
//! Purpose
//! - Find the fixed-length attachment sequence whose chain stays collision-free
//!   with the smallest `distance` (closest self-approach without touching).
//! - Two strategies share `SearchCfg`, `SharedBest`, and `ResultSink`:
//!   - `odometer`: lexicographic enumeration that skips every completion of a
//!     colliding prefix;
//!   - `exhaustive`: flat-index Cartesian product with a denylist of
//!     contiguous patterns, every survivor fully evaluated.
//!
//! Parallelism
//! - Workers own their chains. The only shared state is the best record and
//!   the sink, both touched only at improvement events.
//! - Ties on `distance` are broken by the smaller sequence, so the reported
//!   best does not depend on how the space was sharded.
//!
//! Code cross-refs: `chain::Chain`, `best::SharedBest`, `sink::ResultSink`

pub mod best;
pub mod exhaustive;
pub mod odometer;
pub mod sink;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ConfigError;
use crate::geom2::GeomCfg;

pub use best::{BestRecord, SharedBest};
pub use exhaustive::{run_exhaustive, run_exhaustive_sharded};
pub use odometer::{run_odometer, run_odometer_sharded, Odometer};
pub use sink::{format_record, LogSink, MemorySink, NullSink, ResultSink};

/// Named attachment alphabets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alphabet {
    /// Every side, `{1,2,3,4,5}`.
    Full,
    /// Without side 1, `{2,3,4,5}`: side 1 folds back onto the previous pentagon.
    Restricted,
}

impl Alphabet {
    pub fn symbols(self) -> Vec<u8> {
        match self {
            Alphabet::Full => vec![1, 2, 3, 4, 5],
            Alphabet::Restricted => vec![2, 3, 4, 5],
        }
    }
}

/// Search configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchCfg {
    /// Number of attachments per candidate.
    pub length: usize,
    /// Edge indices to draw from; enumerated in ascending order.
    pub alphabet: Vec<u8>,
    /// Contiguous patterns that exclude a candidate before any geometry is built
    /// (exhaustive strategy only).
    pub denylist: Vec<Vec<u8>>,
    /// Emit a progress event every this many candidates (0 disables).
    pub progress_every: u64,
    /// Stop after this many candidates and report where to resume.
    pub max_candidates: Option<u64>,
    pub geom: GeomCfg,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            length: 15,
            alphabet: Alphabet::Full.symbols(),
            denylist: vec![vec![2, 3, 3, 2]],
            progress_every: 1000,
            max_candidates: None,
            geom: GeomCfg::default(),
        }
    }
}

impl SearchCfg {
    /// Defaults with the given alphabet.
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet: alphabet.symbols(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        let mut seen = [false; 6];
        for &s in &self.alphabet {
            if !(1..=5).contains(&s) {
                return Err(ConfigError::EdgeIndexOutOfRange(s));
            }
            if std::mem::replace(&mut seen[usize::from(s)], true) {
                return Err(ConfigError::DuplicateSymbol(s));
            }
        }
        if self.denylist.iter().any(Vec::is_empty) {
            return Err(ConfigError::EmptyPattern);
        }
        Ok(())
    }

    /// Alphabet in enumeration order.
    pub fn symbols(&self) -> Vec<u8> {
        let mut s = self.alphabet.clone();
        s.sort_unstable();
        s
    }

    /// Whether `sequence` contains a denylisted pattern as a contiguous run.
    pub fn is_denied(&self, sequence: &[u8]) -> bool {
        self.denylist
            .iter()
            .any(|pat| sequence.windows(pat.len()).any(|w| w == pat.as_slice()))
    }
}

/// Counters accumulated by a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates whose geometry was evaluated (a pruned prefix counts once).
    pub candidates: u64,
    /// Candidates skipped by the denylist.
    pub denied: u64,
    /// Evaluated candidates that ended in a collision.
    pub collided: u64,
}

impl std::ops::AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.candidates += rhs.candidates;
        self.denied += rhs.denied;
        self.collided += rhs.collided;
    }
}

/// Where a capped run stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resume {
    /// Next odometer sequence to evaluate.
    Sequence(Vec<u8>),
    /// Next flat index of the Cartesian product.
    Index(u64),
}

/// Outcome of a search run.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport {
    pub best: Option<BestRecord>,
    pub stats: SearchStats,
    /// `None` once the space is exhausted.
    pub resume: Option<Resume>,
}

/// Shared progress counter; every worker ticks it once per visited candidate.
#[derive(Debug, Default)]
pub(crate) struct Progress {
    every: u64,
    seen: AtomicU64,
}

impl Progress {
    pub(crate) fn new(every: u64) -> Self {
        Self {
            every,
            seen: AtomicU64::new(0),
        }
    }

    pub(crate) fn tick(&self, sequence: &[u8]) {
        let n = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        if self.every > 0 && n % self.every == 0 {
            tracing::info!(candidates = n, sequence = ?sequence, "progress");
        }
    }
}
