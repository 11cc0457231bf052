use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pentachain::prelude::*;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Search pentagon-chain attachment sequences")]
struct Cmd {
    /// Log debug events (shard start/finish)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Lexicographic search that skips completions of colliding prefixes
    Odometer {
        #[command(flatten)]
        search: SearchArgs,
        /// Resume from this sequence, e.g. 2,2,3,5
        #[arg(long)]
        start: Option<EdgeSeq>,
        /// One rayon task per leading edge index
        #[arg(long)]
        parallel: bool,
    },
    /// Full evaluation of every candidate that avoids the denylist
    Exhaustive {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long)]
        start_index: Option<u64>,
        #[arg(long)]
        end_index: Option<u64>,
        /// Scan on the calling thread only
        #[arg(long)]
        sequential: bool,
        /// Number of index ranges (default: rayon thread count)
        #[arg(long)]
        shards: Option<usize>,
    },
    /// Print a chain as JSON
    Chain {
        #[arg(long)]
        sequence: EdgeSeq,
    },
}

#[derive(Args, Clone, Debug)]
struct SearchArgs {
    #[arg(long, default_value_t = 15)]
    length: usize,
    /// Defaults to full for odometer, restricted for exhaustive
    #[arg(long, value_enum)]
    alphabet: Option<AlphabetArg>,
    /// Chains closer than this count as touching
    #[arg(long, default_value_t = 1e-6)]
    epsilon: f64,
    /// Contiguous pattern to skip, e.g. 2332; repeatable, replaces the default
    #[arg(long = "deny")]
    deny: Vec<EdgeSeq>,
    #[arg(long, default_value_t = 1000)]
    progress_every: u64,
    #[arg(long)]
    max_candidates: Option<u64>,
    /// Result log (default: data/pentagons_<timestamp>.txt)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlphabetArg {
    Full,
    Restricted,
}

impl From<AlphabetArg> for Alphabet {
    fn from(a: AlphabetArg) -> Self {
        match a {
            AlphabetArg::Full => Alphabet::Full,
            AlphabetArg::Restricted => Alphabet::Restricted,
        }
    }
}

/// Edge-index sequence written as `2,3,3,2` or `2332`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct EdgeSeq(Vec<u8>);

impl FromStr for EdgeSeq {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<String> = if s.contains(',') {
            s.split(',').map(|p| p.trim().to_string()).collect()
        } else {
            s.chars().map(String::from).collect()
        };
        let seq = parts
            .iter()
            .map(|p| match p.parse::<u8>() {
                Ok(n) if (1..=5).contains(&n) => Ok(n),
                _ => Err(format!("`{p}` is not an edge index in 1..=5")),
            })
            .collect::<Result<Vec<u8>, String>>()?;
        if seq.is_empty() {
            return Err("empty sequence".to_string());
        }
        Ok(EdgeSeq(seq))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Odometer,
    Exhaustive,
}

impl Strategy {
    fn name(self) -> &'static str {
        match self {
            Strategy::Odometer => "odometer",
            Strategy::Exhaustive => "exhaustive",
        }
    }

    fn default_alphabet(self) -> Alphabet {
        match self {
            Strategy::Odometer => Alphabet::Full,
            Strategy::Exhaustive => Alphabet::Restricted,
        }
    }
}

impl SearchArgs {
    fn to_cfg(&self, strategy: Strategy) -> SearchCfg {
        let alphabet = self
            .alphabet
            .map(Alphabet::from)
            .unwrap_or_else(|| strategy.default_alphabet());
        let mut cfg = SearchCfg::with_alphabet(alphabet);
        cfg.length = self.length;
        if !self.deny.is_empty() {
            cfg.denylist = self.deny.iter().map(|p| p.0.clone()).collect();
        }
        cfg.progress_every = self.progress_every;
        cfg.max_candidates = self.max_candidates;
        cfg.geom.eps_collision = self.epsilon;
        cfg
    }

    fn out_path(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(default_log_path)
    }
}

fn default_log_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!("data/pentagons_{stamp}.txt"))
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Odometer {
            search,
            start,
            parallel,
        } => {
            let plan = Plan::Odometer {
                start: start.map(|s| s.0),
                parallel,
            };
            search_to_log(&search, plan).map(print_report)
        }
        Action::Exhaustive {
            search,
            start_index,
            end_index,
            sequential,
            shards,
        } => {
            let shards = if sequential {
                1
            } else {
                shards.unwrap_or_else(default_shards)
            };
            let plan = Plan::Exhaustive {
                start_index,
                end_index,
                shards,
            };
            search_to_log(&search, plan).map(print_report)
        }
        Action::Chain { sequence } => {
            let view = ChainView::build(&sequence.0);
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
    }
}

fn default_shards() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Clone, Debug, PartialEq)]
enum Plan {
    Odometer {
        start: Option<Vec<u8>>,
        parallel: bool,
    },
    Exhaustive {
        start_index: Option<u64>,
        end_index: Option<u64>,
        shards: usize,
    },
}

impl Plan {
    fn strategy(&self) -> Strategy {
        match self {
            Plan::Odometer { .. } => Strategy::Odometer,
            Plan::Exhaustive { .. } => Strategy::Exhaustive,
        }
    }

    fn params(&self, cfg: &SearchCfg) -> serde_json::Value {
        let mut params = serde_json::json!({
            "strategy": self.strategy().name(),
            "length": cfg.length,
            "alphabet": cfg.alphabet,
            "denylist": cfg.denylist,
            "eps_collision": cfg.geom.eps_collision,
            "eps_area": cfg.geom.eps_area,
            "max_candidates": cfg.max_candidates,
        });
        match self {
            Plan::Odometer { start, parallel } => {
                params["start"] = serde_json::json!(start);
                params["parallel"] = serde_json::json!(parallel);
            }
            Plan::Exhaustive {
                start_index,
                end_index,
                shards,
            } => {
                params["start_index"] = serde_json::json!(start_index);
                params["end_index"] = serde_json::json!(end_index);
                params["shards"] = serde_json::json!(shards);
            }
        }
        params
    }
}

/// Run one search, appending improvements to the log at `args.out` and writing its sidecar.
fn search_to_log(args: &SearchArgs, plan: Plan) -> Result<(PathBuf, SearchReport)> {
    let cfg = args.to_cfg(plan.strategy());
    let out = args.out_path();
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&out)
        .with_context(|| format!("opening {}", out.display()))?;
    tracing::info!(out = %out.display(), strategy = plan.strategy().name(), "search");

    let sink = LogSink::new(BufWriter::new(file));
    let report = run_plan(&cfg, &plan, &sink)?;
    sink.finish()
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(plan.params(&cfg)).with_summary(summary(&report));
    provenance::write_sidecar(&out, payload)?;
    Ok((out, report))
}

fn run_plan(cfg: &SearchCfg, plan: &Plan, sink: &dyn ResultSink) -> Result<SearchReport> {
    let report = match plan {
        Plan::Odometer { start, parallel } => {
            if *parallel {
                if start.is_some() {
                    bail!("--start resumes a sequential walk and cannot be combined with --parallel");
                }
                run_odometer_sharded(cfg, sink)
            } else {
                run_odometer(cfg, start.as_deref(), sink)
            }
        }
        Plan::Exhaustive {
            start_index,
            end_index,
            shards,
        } => {
            let range = match (start_index, end_index) {
                (None, None) => None,
                (lo, hi) => {
                    let total = pentachain::search::exhaustive::space_size(
                        cfg.alphabet.len(),
                        cfg.length,
                    )?;
                    Some(lo.unwrap_or(0)..hi.unwrap_or(total))
                }
            };
            run_exhaustive_sharded(cfg, range, *shards, sink)
        }
    };
    report.context("invalid search configuration")
}

fn summary(report: &SearchReport) -> serde_json::Value {
    let resume = match &report.resume {
        Some(Resume::Sequence(s)) => serde_json::json!({ "start": s }),
        Some(Resume::Index(i)) => serde_json::json!({ "start_index": i }),
        None => serde_json::Value::Null,
    };
    serde_json::json!({
        "distance": report.best.as_ref().map(|b| b.distance),
        "sequence": report.best.as_ref().map(|b| b.sequence.clone()),
        "candidates": report.stats.candidates,
        "denied": report.stats.denied,
        "collided": report.stats.collided,
        "resume": resume,
    })
}

fn print_report((out, report): (PathBuf, SearchReport)) {
    match &report.best {
        Some(best) => {
            println!("Min distance: {:.7}", best.distance);
            println!("Sequence: {:?}", best.sequence);
        }
        None => println!("No collision-free sequence found"),
    }
    println!(
        "Candidates: {} (denied {}, collided {})",
        report.stats.candidates, report.stats.denied, report.stats.collided
    );
    match &report.resume {
        Some(Resume::Sequence(s)) => println!("Resume with: --start {}", join_seq(s)),
        Some(Resume::Index(i)) => println!("Resume with: --start-index {i}"),
        None => {}
    }
    println!("Log: {}", out.display());
}

fn join_seq(seq: &[u8]) -> String {
    seq.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Serialize)]
struct PentagonView {
    label: String,
    center: [f64; 2],
    vertices: Vec<[f64; 2]>,
}

impl From<&Pentagon> for PentagonView {
    fn from(p: &Pentagon) -> Self {
        Self {
            label: p.to_string(),
            center: [p.center().x, p.center().y],
            vertices: p.vertices().iter().map(|v| [v.x, v.y]).collect(),
        }
    }
}

/// JSON export of a chain; `distance` is null while no pair was measured.
#[derive(Serialize)]
struct ChainView {
    sequence: Vec<u8>,
    distance: Option<f64>,
    has_collisions: bool,
    pentagons: Vec<PentagonView>,
}

impl ChainView {
    fn build(sequence: &[u8]) -> Self {
        let chain = Chain::from_sequence_full(sequence);
        let d = chain.distance();
        Self {
            sequence: chain.sequence().to_vec(),
            distance: d.is_finite().then_some(d),
            has_collisions: chain.has_collisions(),
            pentagons: chain.pentagons().iter().map(PentagonView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn edge_seq_accepts_commas_and_digits() {
        assert_eq!("2,3,3,2".parse::<EdgeSeq>().unwrap(), EdgeSeq(vec![2, 3, 3, 2]));
        assert_eq!("2332".parse::<EdgeSeq>().unwrap(), EdgeSeq(vec![2, 3, 3, 2]));
        assert_eq!(" 4, 5 ".parse::<EdgeSeq>().unwrap(), EdgeSeq(vec![4, 5]));
    }

    #[test]
    fn edge_seq_rejects_bad_indices() {
        assert!("2,6".parse::<EdgeSeq>().is_err());
        assert!("0".parse::<EdgeSeq>().is_err());
        assert!("2,x".parse::<EdgeSeq>().is_err());
        assert!("".parse::<EdgeSeq>().is_err());
    }

    #[test]
    fn search_flags_map_onto_cfg() {
        let cmd = Cmd::try_parse_from([
            "cli",
            "exhaustive",
            "--length",
            "6",
            "--deny",
            "2332",
            "--deny",
            "5,5",
            "--epsilon",
            "1e-5",
            "--sequential",
        ])
        .unwrap();
        let Action::Exhaustive {
            search, sequential, ..
        } = cmd.action
        else {
            panic!("expected exhaustive");
        };
        assert!(sequential);
        let cfg = search.to_cfg(Strategy::Exhaustive);
        assert_eq!(cfg.length, 6);
        assert_eq!(cfg.alphabet, vec![2, 3, 4, 5]);
        assert_eq!(cfg.denylist, vec![vec![2, 3, 3, 2], vec![5, 5]]);
        assert_eq!(cfg.geom.eps_collision, 1e-5);
    }

    #[test]
    fn odometer_defaults_to_full_alphabet() {
        let cmd = Cmd::try_parse_from(["cli", "odometer", "--start", "2,2,2"]).unwrap();
        let Action::Odometer { search, start, .. } = cmd.action else {
            panic!("expected odometer");
        };
        assert_eq!(start, Some(EdgeSeq(vec![2, 2, 2])));
        let cfg = search.to_cfg(Strategy::Odometer);
        assert_eq!(cfg.alphabet, vec![1, 2, 3, 4, 5]);
        assert_eq!(cfg.denylist, SearchCfg::default().denylist);
    }

    #[test]
    fn exhaustive_run_writes_log_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("runs").join("len4.txt");
        let args = SearchArgs {
            length: 4,
            alphabet: None,
            epsilon: 1e-6,
            deny: Vec::new(),
            progress_every: 0,
            max_candidates: None,
            out: Some(out.clone()),
        };
        let plan = Plan::Exhaustive {
            start_index: None,
            end_index: None,
            shards: 1,
        };
        let (path, report) = search_to_log(&args, plan).unwrap();
        assert_eq!(path, out);
        let best = report.best.unwrap();
        assert!((best.distance - 36f64.to_radians().sin()).abs() < 1e-9);

        let log = fs::read_to_string(&out).unwrap();
        assert!(log.ends_with(&format!("{:?}\n\n", best.sequence)));
        assert_eq!(log.matches("\n\n").count() as u64, best.version);

        let sidecar = dir.path().join("runs").join("len4.provenance.json");
        let doc: serde_json::Value =
            serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(doc["params"]["strategy"], "exhaustive");
        assert_eq!(doc["summary"]["candidates"], 255);
        assert!(doc["summary"]["resume"].is_null());
    }

    #[test]
    fn capped_exhaustive_reports_resume_index() {
        let dir = tempdir().unwrap();
        let args = SearchArgs {
            length: 4,
            alphabet: None,
            epsilon: 1e-6,
            deny: Vec::new(),
            progress_every: 0,
            max_candidates: Some(100),
            out: Some(dir.path().join("capped.txt")),
        };
        let plan = Plan::Exhaustive {
            start_index: None,
            end_index: None,
            shards: 1,
        };
        let (_, report) = search_to_log(&args, plan).unwrap();
        assert_eq!(report.resume, Some(Resume::Index(100)));
        assert_eq!(summary(&report)["resume"]["start_index"], 100);
    }

    #[test]
    fn parallel_odometer_rejects_start() {
        let cfg = SearchCfg {
            length: 3,
            ..SearchCfg::default()
        };
        let plan = Plan::Odometer {
            start: Some(vec![2, 2, 2]),
            parallel: true,
        };
        assert!(run_plan(&cfg, &plan, &NullSink).is_err());
    }

    #[test]
    fn chain_view_exports_labels_and_geometry() {
        let view = ChainView::build(&[2, 5]);
        assert_eq!(view.pentagons.len(), 4);
        assert_eq!(view.pentagons[0].label, "P1");
        assert_eq!(view.pentagons[3].label, "P4");
        assert!(!view.has_collisions);
        assert!((view.distance.unwrap() - 1.0).abs() < 1e-9);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["pentagons"][1]["vertices"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn chain_view_without_measured_pair_has_null_distance() {
        let view = ChainView::build(&[3]);
        assert!(view.distance.is_none());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["distance"].is_null());
    }
}
