//! Best-annotation selection when a single representative annotation is
//! needed for a variant (spec.md 4.3.4): MAF-row writers and the comparison
//! engine both call this.

use crate::annotate::Annotation;
use crate::consequence::{normalize, primary_term};
use crate::maf_annotation::MAFAnnotation;
use crate::model::{strip_version, PROTEIN_CODING_BIOTYPES};

/// Picks the "best" annotation out of every transcript hit for a variant,
/// preferring agreement with a pre-existing annotation's transcript/gene
/// when one is supplied, then ranking by canonical/biotype/impact/HGVSp
/// presence (spec.md 4.3.4).
pub fn select_best<'a>(annotations: &'a [Annotation], pre_existing: Option<&MAFAnnotation>) -> Option<&'a Annotation> {
    if annotations.is_empty() {
        return None;
    }

    let preferred = preferred_set(annotations, pre_existing);
    let pool: Vec<&Annotation> = if preferred.is_empty() { annotations.iter().collect() } else { preferred };

    pool.into_iter().max_by_key(rank_key)
}

fn preferred_set<'a>(annotations: &'a [Annotation], pre_existing: Option<&MAFAnnotation>) -> Vec<&'a Annotation> {
    let Some(pre) = pre_existing else {
        return Vec::new();
    };

    if let Some(pre_tx) = pre.unversioned_transcript_id() {
        let pre_was_coding = consequence_is_coding(pre.consequence.as_deref().unwrap_or(""));
        let matches: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| a.transcript_id.as_deref().map(strip_version) == Some(pre_tx.as_str()))
            .filter(|a| !(pre_was_coding && !is_protein_coding_biotype(a.biotype.as_deref().unwrap_or(""))))
            .collect();
        if !matches.is_empty() {
            return matches;
        }
    }

    if let Some(symbol) = &pre.gene_symbol {
        let matches: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| a.gene_symbol.as_deref() == Some(symbol.as_str()))
            .collect();
        if !matches.is_empty() {
            return matches;
        }
    }

    Vec::new()
}

fn consequence_is_coding(consequence: &str) -> bool {
    let normalized = normalize(consequence);
    let primary = primary_term(&normalized);
    !primary.is_empty()
        && !matches!(
            primary,
            "non_coding_transcript_exon_variant"
                | "intron_variant"
                | "intergenic_variant"
                | "upstream_gene_variant"
                | "downstream_gene_variant"
                | "non_coding_transcript_variant"
        )
}

fn is_protein_coding_biotype(biotype: &str) -> bool {
    PROTEIN_CODING_BIOTYPES.contains(&biotype)
}

/// Ranking tuple in priority order: canonical, then protein-coding biotype,
/// then impact, then HGVSp presence (spec.md 4.3.4 step 3). Tuple `Ord`
/// compares element-wise in declaration order, so this alone encodes the
/// whole priority chain.
fn rank_key(a: &&Annotation) -> (bool, bool, crate::consequence::Impact, bool) {
    (
        a.canonical,
        is_protein_coding_biotype(a.biotype.as_deref().unwrap_or("")),
        a.impact,
        !a.hgvsp.is_empty(),
    )
}
