//! The annotation engine (spec.md 4.3): per-variant consequence
//! classification, HGVSc/HGVSp construction, impact ranking, and
//! best-transcript selection.

pub mod engine;
pub mod hgvs;
pub mod position;
pub mod select;

pub use engine::{annotate_variant, DEFAULT_FLANK_WINDOW};
pub use select::select_best;

use std::collections::HashMap;

use crate::consequence::Impact;

/// The engine's per-(variant, transcript) output (spec.md 3).
#[derive(Debug, Clone)]
pub struct Annotation {
    pub allele: String,
    /// Comma-separated SO terms, highest-impact first (the engine's own
    /// composition order; distinct from `consequence::normalize`, which is
    /// for comparison only).
    pub consequence: String,
    pub impact: Impact,
    pub gene_id: Option<String>,
    pub gene_symbol: Option<String>,
    /// Versioned transcript id, e.g. `ENST00000311936.8`.
    pub transcript_id: Option<String>,
    pub biotype: Option<String>,
    /// `N/total`, e.g. `2/5`.
    pub exon: Option<String>,
    /// `N/total`.
    pub intron: Option<String>,
    pub hgvsc: String,
    /// 3-letter amino-acid form, e.g. `p.Gly12Cys`.
    pub hgvsp: String,
    pub cdna_position: Option<i64>,
    pub cds_position: Option<i64>,
    pub protein_position: Option<i64>,
    /// `G/C` form.
    pub amino_acids: Option<String>,
    /// `Ggt/Tgt` form, changed base(s) uppercased.
    pub codons: Option<String>,
    pub canonical: bool,
    /// (source name, column name) -> value, populated by registered
    /// `AnnotationSource`s after the engine itself has run.
    pub extra: HashMap<(String, String), String>,
}

impl Annotation {
    /// The highest-impact element of `consequence`.
    pub fn primary_consequence(&self) -> &str {
        crate::consequence::primary_term(&self.consequence)
    }

    pub fn exon_ordinal(&self) -> Option<u32> {
        self.exon.as_deref().and_then(|s| s.split('/').next()).and_then(|n| n.parse().ok())
    }
}
