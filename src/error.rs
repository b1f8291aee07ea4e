//! Typed error kinds for each subsystem, unified at the binary edge with `anyhow`.
//!
//! Mirrors the error-kind split in the design spec: parse errors carry a line
//! number and message, reference errors degrade a single transcript without
//! aborting the variant, IO/configuration errors propagate and abort the run.

use thiserror::Error;

/// Errors raised while parsing or building the reference cache (gene model +
/// FASTA + canonical overrides).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{0}: line {1}: {2}")]
    Parse(String, usize, String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("canonical override references unknown transcript {transcript_id} for gene {gene_symbol}")]
    UnknownOverrideTranscript {
        gene_symbol: String,
        transcript_id: String,
    },
}

/// Errors arising while annotating a single transcript. These never abort a
/// variant's annotation set; the caller degrades that one transcript instead.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("transcript {0} declared coding but has no coding sequence")]
    MissingCodingSequence(String),

    #[error("transcript {0} has a CDS length ({1}) that is not a multiple of 3")]
    InvalidCdsLength(String, usize),

    #[error("codon index {0} out of range for transcript {1} (cds length {2})")]
    CodonOutOfRange(usize, String, usize),
}

/// Errors from the pipeline harness (worker dispatch, reassembly).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("worker pool failed: {0}")]
    WorkerFailed(String),

    #[error("cancelled before completion")]
    Cancelled,
}

/// Errors in CLI-supplied configuration, surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown comparison column: {0}")]
    UnknownColumn(String),

    #[error("invalid canonical-overrides row at line {0}: {1}")]
    InvalidOverrideRow(usize, String),

    #[error("{field} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}
