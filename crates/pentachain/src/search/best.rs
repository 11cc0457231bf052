//! Best-so-far record shared by all search workers.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::sink::ResultSink;

/// One improving result.
#[derive(Clone, Debug, PartialEq)]
pub struct BestRecord {
    pub distance: f64,
    pub sequence: Vec<u8>,
    /// Number of improvements accepted so far, starting at 1.
    pub version: u64,
}

impl BestRecord {
    /// Order by `(distance, sequence)`: lower distance wins, ties go to the smaller sequence.
    fn cmp_candidate(&self, distance: f64, sequence: &[u8]) -> CmpOrdering {
        distance
            .total_cmp(&self.distance)
            .then_with(|| sequence.cmp(&self.sequence))
    }
}

/// Best record behind a lock, with the current distance mirrored in an atomic
/// so workers can reject non-improving candidates without locking.
#[derive(Debug)]
pub struct SharedBest {
    distance_bits: AtomicU64,
    record: Mutex<Option<BestRecord>>,
}

impl Default for SharedBest {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBest {
    pub fn new() -> Self {
        Self {
            distance_bits: AtomicU64::new(f64::INFINITY.to_bits()),
            record: Mutex::new(None),
        }
    }

    /// Current best distance (`+inf` before the first improvement).
    #[inline]
    pub fn distance(&self) -> f64 {
        f64::from_bits(self.distance_bits.load(Ordering::Acquire))
    }

    /// Cheap pre-check: could `distance` replace the current best (ties included)?
    #[inline]
    pub fn could_improve(&self, distance: f64) -> bool {
        distance.is_finite() && distance <= self.distance()
    }

    /// Offer a collision-free result. On acceptance the record is appended to
    /// `sink` while the lock is held, so the log follows version order.
    pub fn offer(&self, distance: f64, sequence: &[u8], sink: &dyn ResultSink) -> bool {
        if !self.could_improve(distance) {
            return false;
        }
        let mut guard = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        let version = match guard.as_ref() {
            Some(cur) if cur.cmp_candidate(distance, sequence) != CmpOrdering::Less => {
                return false;
            }
            Some(cur) => cur.version + 1,
            None => 1,
        };
        let record = BestRecord {
            distance,
            sequence: sequence.to_vec(),
            version,
        };
        self.distance_bits
            .store(distance.to_bits(), Ordering::Release);
        tracing::info!(
            distance,
            sequence = ?record.sequence,
            version,
            "new best"
        );
        sink.record(&record);
        *guard = Some(record);
        true
    }

    pub fn snapshot(&self) -> Option<BestRecord> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_inner(self) -> Option<BestRecord> {
        self.record
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
