use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The three recognized benchmark suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Octane,
    Sunspider,
    Kraken,
}

impl Suite {
    /// Resolve a suite from its CLI name.
    ///
    /// Unrecognized names fall back to sunspider-like defaults rather than
    /// being rejected. Long-standing behavior, kept as-is; output paths still
    /// use the raw name the caller passed.
    pub fn from_name(name: &str) -> Suite {
        match name {
            "octane" => Suite::Octane,
            "kraken" => Suite::Kraken,
            _ => Suite::Sunspider,
        }
    }

    /// Canonical directory name under the benchmark data root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Suite::Octane => "octane",
            Suite::Sunspider => "sunspider",
            Suite::Kraken => "kraken",
        }
    }

    /// Number of runs needed for stable results.
    pub fn default_runs(&self) -> u32 {
        match self {
            Suite::Octane => 10,
            Suite::Kraken => 80,
            Suite::Sunspider => 100,
        }
    }

    /// The driver script handed to the engine in whole-suite mode.
    ///
    /// Octane ships its own harness under the data directory; sunspider and
    /// kraken use standalone drivers that live in the csuite directory.
    pub fn driver_path(&self, csuite_dir: &Path, data_dir: &Path) -> PathBuf {
        match self {
            Suite::Octane => data_dir.join("octane").join("run.js"),
            Suite::Kraken => csuite_dir.join("run-kraken.js"),
            Suite::Sunspider => csuite_dir.join("sunspider-standalone-driver.js"),
        }
    }

    /// Working directory for engine invocations.
    pub fn working_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.dir_name())
    }

    /// The fixed list of individual test names, in execution order.
    pub fn test_names(&self) -> &'static [&'static str] {
        match self {
            Suite::Octane => OCTANE_TESTS,
            Suite::Sunspider => SUNSPIDER_TESTS,
            Suite::Kraken => KRAKEN_TESTS,
        }
    }

    /// Engine argument fragment for one individual test: the ordered file
    /// list plus, for octane, the `-e` expression that kicks off the harness.
    ///
    /// Order matters; the engine loads and executes the files sequentially.
    pub fn files_for_test(&self, test_root: &Path, test: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self {
            Suite::Kraken => {
                args.push(test_root.join(format!("{test}-data.js")).into());
                args.push(test_root.join(format!("{test}.js")).into());
            }
            Suite::Octane => {
                args.push(test_root.join("octane/base.js").into());
                args.push(test_root.join(format!("{test}.js")).into());
                if test.starts_with("octane/gbemu") {
                    args.push(test_root.join("octane/gbemu-part2.js").into());
                } else if test.starts_with("octane/typescript") {
                    args.push(test_root.join("octane/typescript-compiler.js").into());
                    args.push(test_root.join("octane/typescript-input.js").into());
                } else if test.starts_with("octane/zlib") {
                    args.push(test_root.join("octane/zlib-data.js").into());
                }
                args.push("-e".into());
                args.push("BenchmarkSuite.RunSuites({});".into());
            }
            Suite::Sunspider => {
                args.push(test_root.join(format!("{test}.js")).into());
            }
        }
        args
    }
}

const OCTANE_TESTS: &[&str] = &[
    "octane/box2d",
    "octane/code-load",
    "octane/crypto",
    "octane/deltablue",
    "octane/earley-boyer",
    "octane/gbemu-part1",
    "octane/mandreel",
    "octane/navier-stokes",
    "octane/pdfjs",
    "octane/raytrace",
    "octane/regexp",
    "octane/richards",
    "octane/splay",
    "octane/typescript",
    "octane/zlib",
];

const SUNSPIDER_TESTS: &[&str] = &[
    "sunspider/3d-cube",
    "sunspider/3d-morph",
    "sunspider/3d-raytrace",
    "sunspider/access-binary-trees",
    "sunspider/access-fannkuch",
    "sunspider/access-nbody",
    "sunspider/access-nsieve",
    "sunspider/bitops-3bit-bits-in-byte",
    "sunspider/bitops-bits-in-byte",
    "sunspider/bitops-bitwise-and",
    "sunspider/bitops-nsieve-bits",
    "sunspider/controlflow-recursive",
    "sunspider/crypto-aes",
    "sunspider/crypto-md5",
    "sunspider/crypto-sha1",
    "sunspider/date-format-tofte",
    "sunspider/date-format-xparb",
    "sunspider/math-cordic",
    "sunspider/math-partial-sums",
    "sunspider/math-spectral-norm",
    "sunspider/regexp-dna",
    "sunspider/string-base64",
    "sunspider/string-fasta",
    "sunspider/string-tagcloud",
    "sunspider/string-unpack-code",
    "sunspider/string-validate-input",
];

const KRAKEN_TESTS: &[&str] = &[
    "kraken/ai-astar",
    "kraken/audio-beat-detection",
    "kraken/audio-dft",
    "kraken/audio-fft",
    "kraken/audio-oscillator",
    "kraken/imaging-darkroom",
    "kraken/imaging-desaturate",
    "kraken/imaging-gaussian-blur",
    "kraken/json-parse-financial",
    "kraken/json-stringify-tinderbox",
    "kraken/stanford-crypto-aes",
    "kraken/stanford-crypto-ccm",
    "kraken/stanford-crypto-pbkdf2",
    "kraken/stanford-crypto-sha256-iterative",
];
