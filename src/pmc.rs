use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::errors::CsuiteError;

/// Counters sampled for every set.
const PMC_HEADER: &[&str] = &["INST_RETIRED", "CPU_CYCLES"];

const PMC_ARCH_SET: &[&str] = &["LD_SPEC", "ST_SPEC", "EXC_RETURN", "BR_RETURN_SPEC"];
const PMC_DCACHE_SET: &[&str] = &[
    "L1D_CACHE",
    "L1D_CACHE_REFILL",
    "L2D_CACHE",
    "L2D_CACHE_REFILL",
];
const PMC_INSTR_SET: &[&str] = &["L1I_CACHE", "L1I_CACHE_REFILL", "BR_MIS_PRED", "BR_PRED"];

/// Named groups of hardware performance counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmcSet {
    Arch,
    Dcache,
    Instr,
}

impl PmcSet {
    /// Validated in-crate rather than by clap so a bad value exits 1 with
    /// the usual message instead of clap's usage error.
    pub fn from_name(name: &str) -> Result<PmcSet, CsuiteError> {
        match name {
            "arch" => Ok(PmcSet::Arch),
            "dcache" => Ok(PmcSet::Dcache),
            "instr" => Ok(PmcSet::Instr),
            other => Err(CsuiteError::InvalidPmcSet {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PmcSet::Arch => "arch",
            PmcSet::Dcache => "dcache",
            PmcSet::Instr => "instr",
        }
    }

    /// Full counter list: the header counters followed by the set-specific ones.
    pub fn counters(&self) -> Vec<&'static str> {
        let specific = match self {
            PmcSet::Arch => PMC_ARCH_SET,
            PmcSet::Dcache => PMC_DCACHE_SET,
            PmcSet::Instr => PMC_INSTR_SET,
        };
        PMC_HEADER.iter().chain(specific).copied().collect()
    }
}

/// `pmcstat` argument prefix for one sampled run:
/// `[-C] -p C1 -p C2 ... -o <output>`. The wrapped engine command is
/// appended after these by the caller.
pub fn pmcstat_args(set: PmcSet, cumulative: bool, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if cumulative {
        args.push("-C".into());
    }
    for counter in set.counters() {
        args.push("-p".into());
        args.push(counter.into());
    }
    args.push("-o".into());
    args.push(output.as_os_str().to_os_string());
    args
}

/// Probe for hwpmc support by scanning `kldstat` output.
///
/// A missing or failing `kldstat` counts as no support; the caller turns
/// that into a fatal error before any run starts.
pub fn kernel_supports_pmc() -> bool {
    match Command::new("kldstat").output() {
        Ok(out) => String::from_utf8_lossy(&out.stdout).contains("hwpmc"),
        Err(_) => false,
    }
}
