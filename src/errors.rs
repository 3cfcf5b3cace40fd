use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CsuiteError {
    #[error("{path} is not valid.")]
    EnginePathInvalid { path: PathBuf },

    #[error("The csuite directory is invalid.")]
    SuiteDirInvalid,

    #[error("I can't find the benchmark data directory. Aborting.")]
    BenchmarkDataNotFound,

    #[error("Invalid PMC set '{name}'. Options are: arch, dcache, instr.")]
    InvalidPmcSet { name: String },

    #[error("PMC support is not enabled in the kernel.")]
    PmcSupportMissing,

    #[error("Failed to read config file {path}: {source}")]
    ConfigReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {detail}")]
    ConfigParseError { path: PathBuf, detail: String },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirError {
        path: PathBuf,
        source: std::io::Error,
    },
}
