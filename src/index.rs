//! Position index and the top-level `ReferenceIndex` that owns the gene/
//! transcript arenas alongside it.
//!
//! No single data structure is mandated for "transcripts overlapping
//! position p" (spec.md 9, open question); this picks a per-chromosome
//! sorted array of `(start, end, TranscriptId)` keyed on gene-level span,
//! queried by binary search for the candidate window and a linear overlap
//! refinement. A static, load-once-query-many index built this way stays
//! trivially `Send + Sync` for lock-free concurrent reads (spec.md 4.2, 5).

use std::collections::HashMap;

use crate::model::{Gene, GeneId, Transcript, TranscriptId};

/// Strips a leading `chr` (case-insensitive) so `chr12` and `12` index the
/// same chromosome.
pub fn normalize_chrom(chrom: &str) -> String {
    let lower = chrom.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("chr") {
        rest.to_string()
    } else {
        lower
    }
}

#[derive(Debug, Default)]
struct ChromIndex {
    /// Sorted by `start`.
    entries: Vec<(i64, i64, TranscriptId)>,
}

impl ChromIndex {
    fn push(&mut self, start: i64, end: i64, id: TranscriptId) {
        self.entries.push((start, end, id));
    }

    fn finalize(&mut self) {
        self.entries.sort_by_key(|e| e.0);
    }

    fn overlapping(&self, start: i64, end: i64, out: &mut Vec<TranscriptId>) {
        // Binary search for the first entry whose start could still overlap:
        // any entry starting after `end` cannot overlap, so we only need to
        // scan entries with `start <= end`, found by partition point.
        let upper = self.entries.partition_point(|e| e.0 <= end);
        for &(s, e, id) in &self.entries[..upper] {
            if e >= start {
                out.push(id);
            }
        }
    }
}

/// Per-chromosome interval structure over transcript gene-spans (spec.md 4.2).
#[derive(Debug, Default)]
pub struct PositionIndex {
    by_chrom: HashMap<String, ChromIndex>,
}

impl PositionIndex {
    pub fn builder() -> PositionIndexBuilder {
        PositionIndexBuilder::default()
    }

    pub fn lookup(&self, chrom: &str, pos: i64) -> Vec<TranscriptId> {
        self.lookup_range(chrom, pos, pos)
    }

    pub fn lookup_range(&self, chrom: &str, start: i64, end: i64) -> Vec<TranscriptId> {
        let mut out = Vec::new();
        if let Some(idx) = self.by_chrom.get(&normalize_chrom(chrom)) {
            idx.overlapping(start, end, &mut out);
        }
        out
    }
}

#[derive(Default)]
pub struct PositionIndexBuilder {
    by_chrom: HashMap<String, ChromIndex>,
}

impl PositionIndexBuilder {
    pub fn insert(&mut self, chrom: &str, start: i64, end: i64, id: TranscriptId) {
        self.by_chrom
            .entry(normalize_chrom(chrom))
            .or_default()
            .push(start, end, id);
    }

    pub fn build(mut self) -> PositionIndex {
        for idx in self.by_chrom.values_mut() {
            idx.finalize();
        }
        PositionIndex {
            by_chrom: self.by_chrom,
        }
    }
}

/// The fully-built, immutable reference index: gene/transcript arenas plus
/// lookup structures. Built once in `main`, then shared behind an `Arc` so
/// every worker reads it without locking (spec.md 3, 5, 9 "Global state").
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    genes: Vec<Gene>,
    transcripts: Vec<Transcript>,
    position_index: PositionIndex,
    gene_by_symbol: HashMap<String, Vec<GeneId>>,
    transcript_by_unversioned_id: HashMap<String, TranscriptId>,
    transcript_by_versioned_id: HashMap<String, TranscriptId>,
}

impl ReferenceIndex {
    pub fn new(
        genes: Vec<Gene>,
        transcripts: Vec<Transcript>,
        position_index: PositionIndex,
    ) -> Self {
        let mut gene_by_symbol: HashMap<String, Vec<GeneId>> = HashMap::new();
        for g in &genes {
            gene_by_symbol.entry(g.symbol.clone()).or_default().push(g.id);
        }
        let mut transcript_by_unversioned_id = HashMap::new();
        let mut transcript_by_versioned_id = HashMap::new();
        for t in &transcripts {
            transcript_by_unversioned_id.insert(t.unversioned_id.clone(), t.id);
            transcript_by_versioned_id.insert(t.transcript_id.clone(), t.id);
        }
        Self {
            genes,
            transcripts,
            position_index,
            gene_by_symbol,
            transcript_by_unversioned_id,
            transcript_by_versioned_id,
        }
    }

    pub fn gene(&self, id: GeneId) -> &Gene {
        &self.genes[id.0 as usize]
    }

    pub fn transcript(&self, id: TranscriptId) -> &Transcript {
        &self.transcripts[id.0 as usize]
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    pub fn transcripts_overlapping(&self, chrom: &str, pos: i64) -> Vec<&Transcript> {
        self.position_index
            .lookup(chrom, pos)
            .into_iter()
            .map(|id| self.transcript(id))
            .collect()
    }

    pub fn transcripts_overlapping_range(&self, chrom: &str, start: i64, end: i64) -> Vec<&Transcript> {
        self.position_index
            .lookup_range(chrom, start, end)
            .into_iter()
            .map(|id| self.transcript(id))
            .collect()
    }

    pub fn transcript_by_unversioned_id(&self, id: &str) -> Option<&Transcript> {
        self.transcript_by_unversioned_id
            .get(id)
            .map(|&tid| self.transcript(tid))
    }

    pub fn transcript_by_versioned_id(&self, id: &str) -> Option<&Transcript> {
        self.transcript_by_versioned_id
            .get(id)
            .map(|&tid| self.transcript(tid))
    }

    pub fn genes_by_symbol(&self, symbol: &str) -> Vec<&Gene> {
        self.gene_by_symbol
            .get(symbol)
            .map(|ids| ids.iter().map(|&id| self.gene(id)).collect())
            .unwrap_or_default()
    }
}
