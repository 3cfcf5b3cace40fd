use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::errors::CsuiteError;
use crate::pmc;
use crate::pmc::PmcSet;
use crate::suites::Suite;

/// PMC collection options for a session.
#[derive(Debug, Clone, Copy)]
pub struct PmcOptions {
    pub set: PmcSet,
    pub cumulative: bool,
}

/// Everything resolved before the run loop starts.
#[derive(Debug)]
pub struct RunPlan {
    pub suite: Suite,
    /// Raw CLI suite name. Output paths use this even when the name was
    /// unrecognized and fell back to sunspider defaults.
    pub suite_label: String,
    pub engine: PathBuf,
    pub csuite_dir: PathBuf,
    pub data_dir: PathBuf,
    pub runs: u32,
    pub extra_args: Vec<String>,
    pub trace_gc: bool,
    pub pmc: Option<PmcOptions>,
    pub verbose: bool,
    /// `_benchmark_results` under the invoking directory.
    pub output_root: PathBuf,
}

impl RunPlan {
    pub fn output_runs_dir(&self) -> PathBuf {
        self.output_root.join(&self.suite_label)
    }

    pub fn gc_trace_path(&self) -> PathBuf {
        self.output_root.join(format!("{}_gc_trace", self.suite_label))
    }

    pub fn driver(&self) -> PathBuf {
        self.suite.driver_path(&self.csuite_dir, &self.data_dir)
    }

    pub fn working_dir(&self) -> PathBuf {
        self.suite.working_dir(&self.data_dir)
    }
}

/// One fully resolved child invocation: program plus argument vector.
///
/// Handed to `Command` as-is; nothing passes through a shell, so driver
/// paths and `-e` expressions need no quoting.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Human-readable form for progress lines.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Whole-suite invocation: `engine --expose-gc [trace flags] [extra] driver`.
pub fn engine_invocation(plan: &RunPlan, trace: bool) -> Invocation {
    let mut args: Vec<OsString> = vec!["--expose-gc".into()];
    if trace {
        args.push("--enable-tracing".into());
        args.push("--trace-gc-heap-layout".into());
        args.push("--gc-global".into());
    }
    args.extend(plan.extra_args.iter().map(OsString::from));
    args.push(plan.driver().into_os_string());
    Invocation {
        program: plan.engine.clone().into_os_string(),
        args,
    }
}

/// Individual-test invocation: `engine [extra] <test file list>`.
/// No `--expose-gc` here; individual runs exercise the default heap.
pub fn test_invocation(plan: &RunPlan, test: &str) -> Invocation {
    let mut args: Vec<OsString> = plan.extra_args.iter().map(OsString::from).collect();
    args.extend(plan.suite.files_for_test(&plan.data_dir, test));
    Invocation {
        program: plan.engine.clone().into_os_string(),
        args,
    }
}

/// Wrap an engine invocation in a `pmcstat` sampling prefix. pmcstat owns
/// the output file; the engine's stdout is left alone.
pub fn wrap_pmc(inner: Invocation, opts: PmcOptions, pmc_file: &Path) -> Invocation {
    let mut args = pmc::pmcstat_args(opts.set, opts.cumulative, pmc_file);
    args.push(inner.program);
    args.extend(inner.args);
    Invocation {
        program: "pmcstat".into(),
        args,
    }
}

/// Create a directory if it does not already exist. Repeat invocations
/// against the same target are no-ops.
fn ensure_dir(path: &Path, verbose: bool) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if verbose {
        println!("Creating directory {}.", path.display());
    }
    std::fs::create_dir_all(path).map_err(|source| CsuiteError::OutputDirError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Run one invocation to completion, optionally capturing its stdout in a
/// file. The child's exit status is not inspected; a crashed run leaves
/// whatever output it managed to produce.
fn execute(inv: &Invocation, cwd: &Path, stdout_to: Option<&Path>, verbose: bool) -> Result<()> {
    if verbose {
        let line = match stdout_to {
            Some(path) => format!("Running {} > {}.", inv.display(), path.display()),
            None => format!("Running {}.", inv.display()),
        };
        println!("{}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
    }

    let mut command = Command::new(&inv.program);
    command.args(&inv.args).current_dir(cwd);
    if let Some(path) = stdout_to {
        let file = File::create(path)?;
        command.stdout(Stdio::from(file));
    }

    if let Err(err) = command.status() {
        eprintln!("Failed to run {}: {}", inv.display(), err);
    }
    Ok(())
}

/// Whole-suite mode: one driver invocation per run index, stdout captured
/// per run (or routed into a `.pmc` file by pmcstat when sampling).
pub fn run_suite(plan: &RunPlan) -> Result<()> {
    ensure_dir(&plan.output_root, plan.verbose)?;
    let runs_dir = plan.output_runs_dir();
    ensure_dir(&runs_dir, plan.verbose)?;

    let cwd = plan.working_dir();
    if plan.verbose {
        println!("Working directory for runs is {}.", cwd.display());
    }

    let pmc_dir = match plan.pmc {
        Some(opts) => {
            let dir = runs_dir.join("pmc").join(opts.set.name());
            ensure_dir(&dir, plan.verbose)?;
            Some(dir)
        }
        None => None,
    };

    let started = Utc::now();
    for i in 0..plan.runs {
        let inv = engine_invocation(plan, plan.trace_gc);
        match (plan.pmc, &pmc_dir) {
            (Some(opts), Some(dir)) => {
                let pmc_file = dir.join(format!("run{i}.pmc"));
                execute(&wrap_pmc(inv, opts, &pmc_file), &cwd, None, plan.verbose)?;
            }
            _ => {
                let out = if plan.trace_gc {
                    // trace_gc forces runs == 1 upstream.
                    plan.gc_trace_path()
                } else {
                    runs_dir.join(format!("run{i}"))
                };
                execute(&inv, &cwd, Some(&out), plan.verbose)?;
            }
        }
    }

    write_manifest(plan, &runs_dir, started)?;
    Ok(())
}

/// Individual mode: every test in the suite's fixed list gets its own run
/// loop. Without PMC the child inherits stdout; this mode has never
/// captured per-run output.
pub fn run_individual(plan: &RunPlan) -> Result<()> {
    ensure_dir(&plan.output_root, plan.verbose)?;
    let runs_dir = plan.output_runs_dir();
    ensure_dir(&runs_dir, plan.verbose)?;
    let cwd = plan.working_dir();

    for test in plan.suite.test_names() {
        for i in 0..plan.runs {
            let inv = test_invocation(plan, test);
            match plan.pmc {
                Some(opts) => {
                    let test_dir = runs_dir
                        .join("pmc")
                        .join(opts.set.name())
                        .join("tests")
                        .join(test_basename(test));
                    ensure_dir(&test_dir, plan.verbose)?;
                    let pmc_file = test_dir.join(format!("run{i}.pmc"));
                    execute(&wrap_pmc(inv, opts, &pmc_file), &cwd, None, plan.verbose)?;
                }
                None => execute(&inv, &cwd, None, plan.verbose)?,
            }
        }
    }
    Ok(())
}

fn test_basename(test: &str) -> &str {
    test.rsplit('/').next().unwrap_or(test)
}

/// Session metadata written next to the per-run files.
#[derive(Debug, Serialize)]
struct RunManifest<'a> {
    suite: &'a str,
    engine: String,
    runs: u32,
    extra_arguments: &'a [String],
    trace_gc: bool,
    pmc_set: Option<&'static str>,
    pmc_cumulative: bool,
    started: DateTime<Utc>,
}

fn write_manifest(plan: &RunPlan, runs_dir: &Path, started: DateTime<Utc>) -> Result<()> {
    let manifest = RunManifest {
        suite: &plan.suite_label,
        engine: plan.engine.display().to_string(),
        runs: plan.runs,
        extra_arguments: &plan.extra_args,
        trace_gc: plan.trace_gc,
        pmc_set: plan.pmc.map(|p| p.set.name()),
        pmc_cumulative: plan.pmc.is_some_and(|p| p.cumulative),
        started,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(runs_dir.join("manifest.json"), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_plan(suite: Suite, label: &str) -> RunPlan {
        RunPlan {
            suite,
            suite_label: label.to_string(),
            engine: PathBuf::from("/opt/v8/d8"),
            csuite_dir: PathBuf::from("/tools/csuite"),
            data_dir: PathBuf::from("/tools/data"),
            runs: 3,
            extra_args: vec![],
            trace_gc: false,
            pmc: None,
            verbose: false,
            output_root: PathBuf::from("/work/_benchmark_results"),
        }
    }

    #[test]
    fn engine_invocation_shape() {
        let plan = make_plan(Suite::Sunspider, "sunspider");
        let inv = engine_invocation(&plan, false);
        assert_eq!(inv.program, OsString::from("/opt/v8/d8"));
        assert_eq!(inv.args[0], OsString::from("--expose-gc"));
        assert_eq!(
            inv.args.last().unwrap(),
            &OsString::from("/tools/csuite/sunspider-standalone-driver.js")
        );
        assert_eq!(inv.args.len(), 2);
    }

    #[test]
    fn engine_invocation_trace_flags() {
        let plan = make_plan(Suite::Octane, "octane");
        let inv = engine_invocation(&plan, true);
        assert_eq!(
            &inv.args[..4],
            &[
                OsString::from("--expose-gc"),
                OsString::from("--enable-tracing"),
                OsString::from("--trace-gc-heap-layout"),
                OsString::from("--gc-global"),
            ]
        );
        assert_eq!(
            inv.args.last().unwrap(),
            &OsString::from("/tools/data/octane/run.js")
        );
    }

    #[test]
    fn extra_args_sit_between_flags_and_driver() {
        let mut plan = make_plan(Suite::Kraken, "kraken");
        plan.extra_args = vec!["--no-opt".to_string(), "--stress-gc".to_string()];
        let inv = engine_invocation(&plan, false);
        assert_eq!(
            inv.args,
            vec![
                OsString::from("--expose-gc"),
                OsString::from("--no-opt"),
                OsString::from("--stress-gc"),
                OsString::from("/tools/csuite/run-kraken.js"),
            ]
        );
    }

    #[test]
    fn test_invocation_has_no_expose_gc() {
        let plan = make_plan(Suite::Sunspider, "sunspider");
        let inv = test_invocation(&plan, "sunspider/3d-cube");
        assert_eq!(
            inv.args,
            vec![OsString::from("/tools/data/sunspider/3d-cube.js")]
        );
    }

    #[test]
    fn wrap_pmc_prefixes_the_engine_command() {
        let plan = make_plan(Suite::Sunspider, "sunspider");
        let inner = engine_invocation(&plan, false);
        let opts = PmcOptions {
            set: PmcSet::Arch,
            cumulative: false,
        };
        let wrapped = wrap_pmc(inner, opts, Path::new("/out/run0.pmc"));
        assert_eq!(wrapped.program, OsString::from("pmcstat"));
        // -o <file> immediately precedes the engine path.
        let o_pos = wrapped
            .args
            .iter()
            .position(|a| a == &OsString::from("-o"))
            .unwrap();
        assert_eq!(wrapped.args[o_pos + 1], OsString::from("/out/run0.pmc"));
        assert_eq!(wrapped.args[o_pos + 2], OsString::from("/opt/v8/d8"));
    }

    #[test]
    fn output_paths_use_raw_label() {
        let plan = make_plan(Suite::Sunspider, "my-custom-suite");
        assert_eq!(
            plan.output_runs_dir(),
            PathBuf::from("/work/_benchmark_results/my-custom-suite")
        );
        assert_eq!(
            plan.gc_trace_path(),
            PathBuf::from("/work/_benchmark_results/my-custom-suite_gc_trace")
        );
    }

    #[test]
    fn test_basename_strips_suite_prefix() {
        assert_eq!(test_basename("octane/gbemu-part1"), "gbemu-part1");
        assert_eq!(test_basename("plain"), "plain");
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a").join("b");
        ensure_dir(&target, false).unwrap();
        assert!(target.is_dir());
        ensure_dir(&target, false).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn manifest_round_trips_as_json() {
        let tmp = tempfile::tempdir().unwrap();
        let mut plan = make_plan(Suite::Octane, "octane");
        plan.extra_args = vec!["--no-opt".to_string()];
        write_manifest(&plan, tmp.path(), Utc::now()).unwrap();

        let text = std::fs::read_to_string(tmp.path().join("manifest.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["suite"], "octane");
        assert_eq!(value["runs"], 3);
        assert_eq!(value["extra_arguments"][0], "--no-opt");
        assert!(value["pmc_set"].is_null());
        assert!(value["started"].is_string());
    }
}
