//! Pentagon chains: geometry kernel, collision scoring, and sequence search.
//!
//! A chain starts from two unit pentagons sharing a side; every further
//! pentagon is the mirror neighbour of the previous one across a chosen side
//! (edge index 1..=5). The search looks for the attachment sequence whose
//! chain never overlaps itself while coming as close to touching as possible.
//!
//! Modules
//! - `geom2`: pentagon construction and convex polygon predicates.
//! - `chain`: incremental chain with sticky collision flag and running distance.
//! - `search`: odometer and exhaustive strategies, shared best record, result sinks.
//! - `error`: construction and configuration errors.

pub mod chain;
pub mod error;
pub mod geom2;
pub mod search;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use chain::Chain;
pub use error::{ConfigError, GeomError};
pub use geom2::{GeomCfg, Pentagon, Point};
pub use search::{Alphabet, SearchCfg, SearchReport};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::chain::Chain;
    pub use crate::error::{ConfigError, GeomError};
    pub use crate::geom2::{
        circumradius, inradius, intersection_area, polygon_distance, GeomCfg, Pentagon, Point,
        Segment,
    };
    pub use crate::search::{
        run_exhaustive, run_exhaustive_sharded, run_odometer, run_odometer_sharded, Alphabet,
        BestRecord, LogSink, MemorySink, NullSink, Resume, ResultSink, SearchCfg, SearchReport,
        SearchStats, SharedBest,
    };
}
