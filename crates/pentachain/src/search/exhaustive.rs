//! Strategy B: bounded exhaustive search over the Cartesian product.
//!
//! Candidate `i` is the base-`|alphabet|` expansion of `i` (most significant
//! position first), so any flat-index range is a resumable unit of work.
//! Candidates containing a denylisted pattern are dropped before any geometry
//! is built; survivors are evaluated to full length.

use std::ops::Range;

use rayon::prelude::*;

use super::best::SharedBest;
use super::sink::ResultSink;
use super::{Progress, Resume, SearchCfg, SearchReport, SearchStats};
use crate::chain::Chain;
use crate::error::ConfigError;

/// Number of candidates, `|alphabet|^length`.
pub fn space_size(alphabet: usize, length: usize) -> Result<u64, ConfigError> {
    u32::try_from(length)
        .ok()
        .and_then(|exp| (alphabet as u64).checked_pow(exp))
        .ok_or(ConfigError::SpaceTooLarge { alphabet, length })
}

/// Write candidate `index` into `out` (resized to `length`).
pub fn decode(index: u64, symbols: &[u8], length: usize, out: &mut Vec<u8>) {
    let base = symbols.len() as u64;
    out.clear();
    out.resize(length, 0);
    let mut rest = index;
    for slot in out.iter_mut().rev() {
        *slot = symbols[(rest % base) as usize];
        rest /= base;
    }
}

/// Evaluate every candidate in `range` on one worker-owned chain.
fn scan(
    range: Range<u64>,
    cfg: &SearchCfg,
    symbols: &[u8],
    best: &SharedBest,
    sink: &dyn ResultSink,
    progress: &Progress,
) -> SearchStats {
    let mut chain = Chain::with_cfg(cfg.geom);
    let mut stats = SearchStats::default();
    let mut local_best = f64::INFINITY;
    let mut seq = Vec::with_capacity(cfg.length);
    for index in range {
        decode(index, symbols, cfg.length, &mut seq);
        progress.tick(&seq);
        if cfg.is_denied(&seq) {
            stats.denied += 1;
            continue;
        }
        let common = chain
            .sequence()
            .iter()
            .zip(&seq)
            .take_while(|(a, b)| a == b)
            .count();
        chain.truncate(common);
        for &n in &seq[common..] {
            chain.attach(n);
        }
        stats.candidates += 1;
        if chain.has_collisions() {
            stats.collided += 1;
            continue;
        }
        let d = chain.distance();
        if d <= local_best && best.could_improve(d) {
            best.offer(d, &seq, sink);
            local_best = d;
        }
    }
    stats
}

/// Clamp `range` to the space and the candidate cap. Returns the range to scan
/// and the index to resume from when the cap cuts it short.
fn plan(cfg: &SearchCfg, range: Option<Range<u64>>) -> Result<(Range<u64>, Option<u64>), ConfigError> {
    cfg.validate()?;
    let total = space_size(cfg.alphabet.len(), cfg.length)?;
    let range = range.unwrap_or(0..total);
    if range.start >= range.end || range.end > total {
        return Err(ConfigError::IndexRange {
            start: range.start,
            end: range.end,
            total,
        });
    }
    match cfg.max_candidates {
        Some(max) if range.end - range.start > max => {
            let cut = range.start + max;
            Ok((range.start..cut, Some(cut)))
        }
        _ => Ok((range, None)),
    }
}

/// Sequential exhaustive search over `range` (default: the whole space).
pub fn run_exhaustive(
    cfg: &SearchCfg,
    range: Option<Range<u64>>,
    sink: &dyn ResultSink,
) -> Result<SearchReport, ConfigError> {
    run_exhaustive_sharded(cfg, range, 1, sink)
}

/// Exhaustive search split into `shards` contiguous index ranges run on rayon workers.
///
/// The best record is identical for every shard count.
pub fn run_exhaustive_sharded(
    cfg: &SearchCfg,
    range: Option<Range<u64>>,
    shards: usize,
    sink: &dyn ResultSink,
) -> Result<SearchReport, ConfigError> {
    let (range, resume) = plan(cfg, range)?;
    let symbols = cfg.symbols();
    let shards = shards.max(1) as u64;
    let span = range.end - range.start;
    let chunk = span.div_ceil(shards).max(1);
    let pieces: Vec<Range<u64>> = (0..shards)
        .map(|k| {
            let lo = range.start + (k * chunk).min(span);
            let hi = range.start + ((k + 1) * chunk).min(span);
            lo..hi
        })
        .filter(|r| !r.is_empty())
        .collect();
    tracing::info!(
        length = cfg.length,
        alphabet = ?cfg.alphabet,
        start = range.start,
        end = range.end,
        shards = pieces.len(),
        "exhaustive search"
    );
    let best = SharedBest::new();
    let progress = Progress::new(cfg.progress_every);
    let stats = if pieces.len() == 1 {
        scan(range, cfg, &symbols, &best, sink, &progress)
    } else {
        pieces
            .into_par_iter()
            .map(|piece| {
                let (lo, hi) = (piece.start, piece.end);
                let stats = scan(piece, cfg, &symbols, &best, sink, &progress);
                tracing::debug!(lo, hi, candidates = stats.candidates, "shard finished");
                stats
            })
            .reduce(SearchStats::default, |mut a, b| {
                a += b;
                a
            })
    };
    tracing::info!(
        candidates = stats.candidates,
        denied = stats.denied,
        collided = stats.collided,
        "exhaustive search finished"
    );
    Ok(SearchReport {
        best: best.into_inner(),
        stats,
        resume: resume.map(Resume::Index),
    })
}
