//! Strategy timing probe on a mid-sized search space.
//!
//! Purpose
//! - Give a reproducible data point for "how long does each strategy take at
//!   length N, and how much does odometer pruning save?"
//! - Compare sequential and sharded runs on the same space.
//!
//! Usage:
//!   cargo run -p pentachain --release --example strategy_timing -- 8

use std::time::Instant;

use pentachain::search::{
    run_exhaustive, run_exhaustive_sharded, run_odometer, run_odometer_sharded, Alphabet,
    NullSink, SearchCfg, SearchReport,
};

fn main() {
    let length = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(8usize);
    let odo_cfg = SearchCfg {
        length,
        progress_every: 0,
        ..SearchCfg::with_alphabet(Alphabet::Full)
    };
    let ex_cfg = SearchCfg {
        alphabet: Alphabet::Restricted.symbols(),
        ..odo_cfg.clone()
    };
    let threads = rayon::current_num_threads();

    timed("odometer", || run_odometer(&odo_cfg, None, &NullSink));
    timed("odometer_sharded", || run_odometer_sharded(&odo_cfg, &NullSink));
    timed("exhaustive", || run_exhaustive(&ex_cfg, None, &NullSink));
    timed("exhaustive_sharded", || {
        run_exhaustive_sharded(&ex_cfg, None, threads * 4, &NullSink)
    });
}

fn timed<F>(name: &str, run: F)
where
    F: FnOnce() -> Result<SearchReport, pentachain::ConfigError>,
{
    let start = Instant::now();
    match run() {
        Ok(report) => {
            let ms = start.elapsed().as_secs_f64() * 1e3;
            let (distance, sequence) = report
                .best
                .map(|b| (b.distance, b.sequence))
                .unwrap_or((f64::INFINITY, Vec::new()));
            println!(
                "strategy={name} candidates={} collided={} denied={} best={distance:.9} sequence={sequence:?} time_ms={ms:.3}",
                report.stats.candidates, report.stats.collided, report.stats.denied
            );
        }
        Err(err) => eprintln!("strategy={name} error={err}"),
    }
}
