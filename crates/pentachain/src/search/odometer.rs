//! Strategy A: odometer enumeration with prefix pruning.
//!
//! Candidates are visited in lexicographic order over the sorted alphabet (last
//! position fastest). A candidate whose chain collides at position `k` has
//! every completion of its first `k+1` elements skipped: the odometer advances
//! position `k` and resets everything after it. One chain is kept per worker
//! and only retracted back to the prefix shared with the next candidate.
//!
//! Sharded runs fix the first element per shard and run in parallel.

use rayon::prelude::*;

use super::best::SharedBest;
use super::sink::ResultSink;
use super::{Progress, Resume, SearchCfg, SearchReport, SearchStats};
use crate::chain::Chain;
use crate::error::ConfigError;

/// Fixed-length counter over a sorted alphabet.
///
/// The first `fixed` positions never change; advancing past them exhausts the odometer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Odometer {
    symbols: Vec<u8>,
    digits: Vec<usize>,
    fixed: usize,
}

impl Odometer {
    /// Start at the smallest sequence. `symbols` must be sorted and non-empty.
    pub fn new(symbols: Vec<u8>, length: usize) -> Self {
        Self {
            symbols,
            digits: vec![0; length],
            fixed: 0,
        }
    }

    /// Start at `start`, which must use only alphabet symbols.
    pub fn starting_at(symbols: Vec<u8>, start: &[u8]) -> Result<Self, ConfigError> {
        let digits = start
            .iter()
            .map(|s| {
                symbols
                    .binary_search(s)
                    .map_err(|_| ConfigError::StartSymbol(*s))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            symbols,
            digits,
            fixed: 0,
        })
    }

    /// Smallest sequence starting with `prefix`; the prefix is never advanced.
    pub fn with_prefix(symbols: Vec<u8>, prefix: &[u8], length: usize) -> Result<Self, ConfigError> {
        let mut start = prefix.to_vec();
        start.truncate(length);
        let first = symbols.first().copied().ok_or(ConfigError::EmptyAlphabet)?;
        start.resize(length, first);
        let mut odo = Self::starting_at(symbols, &start)?;
        odo.fixed = prefix.len().min(length);
        Ok(odo)
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Current sequence as edge indices.
    pub fn sequence(&self) -> Vec<u8> {
        self.digits.iter().map(|&d| self.symbols[d]).collect()
    }

    /// Advance position `pos`, carrying into earlier positions on overflow, and
    /// reset every later position to the smallest symbol.
    ///
    /// Returns the leftmost position that changed, or `None` once the counter
    /// would move into the fixed prefix (or before position 0).
    pub fn advance_at(&mut self, pos: usize) -> Option<usize> {
        let base = self.symbols.len();
        let mut p = pos.min(self.digits.len().checked_sub(1)?);
        loop {
            if p < self.fixed {
                return None;
            }
            self.digits[p] += 1;
            if self.digits[p] < base {
                break;
            }
            self.digits[p] = 0;
            p = p.checked_sub(1)?;
        }
        for d in &mut self.digits[p + 1..] {
            *d = 0;
        }
        Some(p)
    }

    /// Advance the last position.
    pub fn advance(&mut self) -> Option<usize> {
        self.advance_at(self.digits.len().saturating_sub(1))
    }
}

/// Result of one worker's walk.
struct Walk {
    stats: SearchStats,
    resume: Option<Vec<u8>>,
}

/// Walk the odometer until it is exhausted or `budget` candidates were evaluated.
fn walk(
    odo: &mut Odometer,
    cfg: &SearchCfg,
    best: &SharedBest,
    sink: &dyn ResultSink,
    progress: &Progress,
    budget: Option<u64>,
) -> Walk {
    let mut chain = Chain::with_cfg(cfg.geom);
    let mut stats = SearchStats::default();
    let mut local_best = f64::INFINITY;
    let mut seq = odo.sequence();
    loop {
        if budget.is_some_and(|max| stats.candidates >= max) {
            return Walk {
                stats,
                resume: Some(seq),
            };
        }
        let common = chain
            .sequence()
            .iter()
            .zip(&seq)
            .take_while(|(a, b)| a == b)
            .count();
        chain.truncate(common);
        let collided_at = chain
            .extend_until_collision(&seq[common..])
            .map(|k| common + k);
        stats.candidates += 1;
        progress.tick(&seq);

        let next = match collided_at {
            Some(k) => {
                stats.collided += 1;
                odo.advance_at(k)
            }
            None => {
                let d = chain.distance();
                if d <= local_best && best.could_improve(d) {
                    best.offer(d, &seq, sink);
                    local_best = d;
                }
                odo.advance()
            }
        };
        if next.is_none() {
            return Walk {
                stats,
                resume: None,
            };
        }
        seq = odo.sequence();
    }
}

/// Sequential odometer search, optionally resuming from `start`.
///
/// With `cfg.max_candidates` set, the report's `resume` holds the next sequence to evaluate.
pub fn run_odometer(
    cfg: &SearchCfg,
    start: Option<&[u8]>,
    sink: &dyn ResultSink,
) -> Result<SearchReport, ConfigError> {
    cfg.validate()?;
    let symbols = cfg.symbols();
    let mut odo = match start {
        Some(s) if s.len() != cfg.length => {
            return Err(ConfigError::StartLength {
                expected: cfg.length,
                got: s.len(),
            })
        }
        Some(s) => Odometer::starting_at(symbols, s)?,
        None => Odometer::new(symbols, cfg.length),
    };
    tracing::info!(
        length = cfg.length,
        alphabet = ?cfg.alphabet,
        start = ?odo.sequence(),
        "odometer search"
    );
    let best = SharedBest::new();
    let progress = Progress::new(cfg.progress_every);
    let done = walk(&mut odo, cfg, &best, sink, &progress, cfg.max_candidates);
    let report = SearchReport {
        best: best.into_inner(),
        stats: done.stats,
        resume: done.resume.map(Resume::Sequence),
    };
    tracing::info!(
        candidates = report.stats.candidates,
        collided = report.stats.collided,
        "odometer search finished"
    );
    Ok(report)
}

/// Odometer search with one rayon task per leading symbol.
///
/// Covers the whole space; a candidate cap is rejected because a sharded walk
/// has no single resume point.
pub fn run_odometer_sharded(
    cfg: &SearchCfg,
    sink: &dyn ResultSink,
) -> Result<SearchReport, ConfigError> {
    cfg.validate()?;
    if cfg.max_candidates.is_some() {
        return Err(ConfigError::ShardedCap);
    }
    let symbols = cfg.symbols();
    let shards = symbols
        .iter()
        .map(|&s| Odometer::with_prefix(symbols.clone(), &[s], cfg.length))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(
        length = cfg.length,
        alphabet = ?cfg.alphabet,
        shards = shards.len(),
        "sharded odometer search"
    );
    let best = SharedBest::new();
    let progress = Progress::new(cfg.progress_every);
    let stats = shards
        .into_par_iter()
        .map(|mut odo| {
            let prefix = odo.sequence().first().copied();
            let done = walk(&mut odo, cfg, &best, sink, &progress, None);
            tracing::debug!(?prefix, candidates = done.stats.candidates, "shard finished");
            done.stats
        })
        .reduce(SearchStats::default, |mut a, b| {
            a += b;
            a
        });
    tracing::info!(
        candidates = stats.candidates,
        collided = stats.collided,
        "sharded odometer search finished"
    );
    Ok(SearchReport {
        best: best.into_inner(),
        stats,
        resume: None,
    })
}
