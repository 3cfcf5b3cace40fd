use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};

use csuite::config::Config;
use csuite::errors::CsuiteError;
use csuite::pmc;
use csuite::pmc::PmcSet;
use csuite::runner;
use csuite::runner::{PmcOptions, RunPlan};
use csuite::suites::Suite;

#[derive(Parser)]
#[command(name = "csuite", version, about = "Run a benchmark suite against a JavaScript engine")]
struct Cli {
    /// The benchmark suite to run (octane, sunspider, kraken)
    suite_name: String,

    /// The path to the engine executable
    engine_path: PathBuf,

    /// The path to the csuite driver directory
    csuite_path: PathBuf,

    /// Override the default number of runs for the benchmark
    #[arg(short, long)]
    runs: Option<u32>,

    /// Pass these extra arguments to the engine
    #[arg(short = 'x', long, allow_hyphen_values = true)]
    extra_arguments: Option<String>,

    /// Trace GC events (forces a single run)
    #[arg(short, long)]
    trace_gc: bool,

    /// Collect PMC data. Options are: arch, dcache, instr
    #[arg(short, long)]
    pmc_set: Option<String>,

    /// Collect cumulative PMC data
    #[arg(short = 'c', long)]
    pmc_cumulative: bool,

    /// Run individual tests in the benchmark
    #[arg(short = 'i', long)]
    run_individual: bool,

    /// See more output about what csuite is doing
    #[arg(short, long)]
    verbose: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Fail fast on paths before touching the output tree.
    let engine_path = std::path::absolute(&cli.engine_path)?;
    if !engine_path.exists() {
        return Err(CsuiteError::EnginePathInvalid { path: engine_path }.into());
    }

    let csuite_dir = std::path::absolute(&cli.csuite_path)?;
    if !csuite_dir.exists() {
        return Err(CsuiteError::SuiteDirInvalid.into());
    }

    let data_dir = std::path::absolute(csuite_dir.join("..").join("data"))?;
    if !data_dir.exists() {
        return Err(CsuiteError::BenchmarkDataNotFound.into());
    }

    let config = Config::load()?;

    let suite = Suite::from_name(&cli.suite_name);
    let default_runs = suite.default_runs();
    let mut runs = default_runs;
    if let Some(requested) = cli.runs.or(config.runs_for(suite)) {
        if (f64::from(requested) / f64::from(default_runs)) < 0.6 {
            let warning = format!(
                "Normally, {} requires {} runs to get stable results.",
                cli.suite_name, default_runs
            );
            eprintln!(
                "{}",
                warning.if_supports_color(Stream::Stderr, |s| s.yellow())
            );
        }
        runs = requested;
    }
    if cli.trace_gc {
        runs = 1;
    }
    if cli.verbose {
        println!("Running and averaging {} {} times.", cli.suite_name, runs);
    }

    let pmc = match cli.pmc_set.as_deref() {
        Some(name) => {
            let set = PmcSet::from_name(name)?;
            if !pmc::kernel_supports_pmc() {
                return Err(CsuiteError::PmcSupportMissing.into());
            }
            Some(PmcOptions {
                set,
                cumulative: cli.pmc_cumulative,
            })
        }
        None => None,
    };

    let extra_args: Vec<String> = cli
        .extra_arguments
        .or(config.extra_arguments)
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let plan = RunPlan {
        suite,
        suite_label: cli.suite_name,
        engine: engine_path,
        csuite_dir,
        data_dir,
        runs,
        extra_args,
        trace_gc: cli.trace_gc,
        pmc,
        verbose: cli.verbose,
        output_root: std::env::current_dir()?.join("_benchmark_results"),
    };

    if cli.run_individual {
        runner::run_individual(&plan)
    } else {
        runner::run_suite(&plan)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
