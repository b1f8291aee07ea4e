//! Entity types for the reference data model.
//!
//! Genes and transcripts live in flat arenas (`Vec<Gene>` / `Vec<Transcript>`
//! inside `ReferenceIndex`, see `crate::index`) and reference each other by
//! id, not by pointer. This sidesteps the cyclic-reference problem the
//! source model has (transcripts pointing back to their gene) without
//! `Rc`/`RefCell` or unsafe code.

use serde::{Deserialize, Serialize};

/// Index into the gene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneId(pub u32);

/// Index into the transcript arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TranscriptId(pub u32);

/// Transcript biotypes that this pipeline treats as protein-coding for the
/// purpose of "best annotation" ranking (spec.md 4.3.4).
pub const PROTEIN_CODING_BIOTYPES: &[&str] = &[
    "protein_coding",
    "nonsense_mediated_decay",
    "non_stop_decay",
    "IG_V_gene",
    "IG_D_gene",
    "IG_J_gene",
    "IG_C_gene",
    "TR_V_gene",
    "TR_D_gene",
    "TR_J_gene",
    "TR_C_gene",
    "protein_coding_LoF",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn from_gtf(s: &str) -> Self {
        if s == "-" {
            Strand::Minus
        } else {
            Strand::Plus
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(self, Strand::Plus)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gene {
    pub id: GeneId,
    /// Stable identifier, e.g. `ENSG00000133703`.
    pub gene_id: String,
    /// Display symbol, e.g. `KRAS`.
    pub symbol: String,
    pub biotype: String,
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
    pub transcripts: Vec<TranscriptId>,
}

impl Gene {
    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }
}

/// A single exon, 1-based inclusive genomic coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exon {
    pub start: i64,
    pub end: i64,
    /// 1-based ordinal in transcription order.
    pub number: u32,
}

impl Exon {
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }
}

/// A CDS segment: genomic span plus the cumulative CDS offset (0-based) of
/// its first transcribed base, letting genomic -> coding position lookups
/// run in O(log segments) via binary search over `cds` (spec.md 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdsSegment {
    pub start: i64,
    pub end: i64,
    pub cds_offset: u64,
}

impl CdsSegment {
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: TranscriptId,
    /// Versioned identifier, e.g. `ENST00000311936.8`.
    pub transcript_id: String,
    /// `transcript_id` with the `.N` suffix stripped, used for identity joins.
    pub unversioned_id: String,
    pub gene_id: Option<GeneId>,
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
    pub biotype: String,
    pub canonical: bool,
    /// Sorted in transcription order (strand-aware).
    pub exons: Vec<Exon>,
    /// Sorted in transcription order, start codon -> stop codon.
    pub cds: Vec<CdsSegment>,
    /// Concatenated coding nucleotide sequence, transcription order.
    pub cds_sequence: Option<String>,
}

impl Transcript {
    pub fn is_protein_coding(&self) -> bool {
        PROTEIN_CODING_BIOTYPES.contains(&self.biotype.as_str())
    }

    pub fn cds_len(&self) -> i64 {
        self.cds.iter().map(|s| s.len()).sum()
    }

    pub fn has_coding_sequence(&self) -> bool {
        self.cds_sequence.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Total transcribed (exonic) length, i.e. mature mRNA / transcript length.
    pub fn transcript_len(&self) -> i64 {
        self.exons.iter().map(|e| e.len()).sum()
    }
}

pub fn strip_version(id: &str) -> &str {
    match id.rfind('.') {
        Some(idx) if id[idx + 1..].chars().all(|c| c.is_ascii_digit()) && idx + 1 < id.len() => {
            &id[..idx]
        }
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_version_removes_trailing_dot_number() {
        assert_eq!(strip_version("ENST00000311936.8"), "ENST00000311936");
        assert_eq!(strip_version("ENST00000311936"), "ENST00000311936");
        assert_eq!(strip_version("NM_004333.4"), "NM_004333");
    }
}
