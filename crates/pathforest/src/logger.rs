//! Verbosity-gated progress logging for analysis runs.
//!
//! Library code never prints unless the configured [`Verbosity`] allows it.
//! All output goes to stderr so the console report on stdout stays clean.

use std::fmt;
use std::str::FromStr;

/// Verbosity level for analysis output.
///
/// Ordered: `Silent < Warning < Info < Debug`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Errors and warnings only.
    Warning,
    /// Progress and important information.
    Info,
    /// Detailed debugging information (one line per tree).
    Debug,
}

impl Verbosity {
    /// Map a repeated `-v` flag count onto a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Warning,
            1 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verbosity::Silent => "silent",
            Verbosity::Warning => "warning",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" => Ok(Verbosity::Silent),
            "warning" | "warn" => Ok(Verbosity::Warning),
            "info" => Ok(Verbosity::Info),
            "debug" => Ok(Verbosity::Debug),
            other => Err(format!(
                "expected one of silent, warning, info, debug; got '{other}'"
            )),
        }
    }
}

/// Logger for a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    verbosity: Verbosity,
}

impl AnalysisLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_analysis(&self, n_trees: usize, n_features: usize) {
        if self.enabled(Verbosity::Info) {
            eprintln!("[pathforest] walking {n_trees} trees over {n_features} features");
        }
    }

    pub fn log_tree(&self, tree_idx: usize, n_leaves: usize) {
        if self.enabled(Verbosity::Debug) {
            eprintln!("[pathforest]   tree {tree_idx:>4}: {n_leaves} leaves");
        }
    }

    pub fn log_class(&self, label: &dyn fmt::Display, total_paths: usize, distinct_paths: usize) {
        if self.enabled(Verbosity::Info) {
            eprintln!(
                "[pathforest] class {label}: {total_paths} paths ({distinct_paths} distinct)"
            );
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(Verbosity::Warning) {
            eprintln!("[pathforest] warning: {message}");
        }
    }

    pub fn finish_analysis(&self, n_classes: usize, n_records: usize) {
        if self.enabled(Verbosity::Info) {
            eprintln!("[pathforest] done: {n_records} paths across {n_classes} classes");
        }
    }
}
