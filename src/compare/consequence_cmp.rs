//! Consequence column categorization (spec.md 4.5.1).

use std::collections::HashSet;

use crate::compare::Category;
use crate::consequence::{normalize, primary_term};

const CODING_TERMS: &[&str] = &[
    "missense_variant",
    "synonymous_variant",
    "stop_gained",
    "stop_lost",
    "start_lost",
    "frameshift_variant",
    "inframe_insertion",
    "inframe_deletion",
    "inframe_variant",
    "protein_altering_variant",
    "stop_retained_variant",
    "start_retained_variant",
    "coding_sequence_variant",
];

fn is_coding(term: &str) -> bool {
    CODING_TERMS.contains(&term)
}

fn is_utr(term: &str) -> bool {
    matches!(term, "5_prime_utr_variant" | "3_prime_utr_variant")
}

fn is_upstream_downstream(term: &str) -> bool {
    matches!(term, "upstream_gene_variant" | "downstream_gene_variant")
}

fn is_inframe(term: &str) -> bool {
    matches!(term, "inframe_insertion" | "inframe_deletion" | "inframe_variant")
}

fn is_stop_gained_or_lost(term: &str) -> bool {
    matches!(term, "stop_gained" | "stop_lost")
}

fn has_splice_region_or_frameshift(normalized: &str) -> bool {
    normalized.contains("splice_region_variant") || normalized.contains("frameshift_variant")
}

fn is_splice_boundary(term: &str) -> bool {
    matches!(term, "splice_donor_variant" | "splice_acceptor_variant")
}

/// Categorizes the `consequence` column (spec.md 4.5.1, steps 1-15). Cross-
/// column reclassification (4.5.4) is applied by the caller, not here.
pub fn categorize(pre_existing: &str, local: &str) -> Category {
    let norm_pre = normalize(pre_existing);
    let norm_local = normalize(local);

    if norm_pre == norm_local {
        return Category::Match;
    }

    let pre_primary = primary_term(&norm_pre);
    let local_primary = primary_term(&norm_local);

    if is_upstream_downstream(pre_primary) {
        return Category::UpstreamReclassified;
    }

    if local_primary == "coding_sequence_variant" && is_coding(pre_primary) {
        return Category::NoCdsData;
    }

    if (is_coding(pre_primary) && local_primary == "non_coding_transcript_exon_variant")
        || (is_coding(local_primary) && pre_primary == "non_coding_transcript_exon_variant")
    {
        return Category::TranscriptModelChange;
    }

    if (is_coding(pre_primary) && local_primary == "intergenic_variant")
        || (is_coding(local_primary) && pre_primary == "intergenic_variant")
    {
        return Category::GeneModelChange;
    }

    let pre_is_utr_or_intron = is_utr(pre_primary) || pre_primary == "intron_variant";
    let local_is_utr_or_intron = is_utr(local_primary) || local_primary == "intron_variant";
    if (is_utr(pre_primary) && local_is_utr_or_intron) || (is_utr(local_primary) && pre_is_utr_or_intron) {
        return Category::UpstreamReclassified;
    }

    if pre_primary == local_primary {
        return Category::Match;
    }

    let is_fs_stop_start_pair = (pre_primary == "frameshift_variant" && matches!(local_primary, "stop_gained" | "start_lost"))
        || (local_primary == "frameshift_variant" && matches!(pre_primary, "stop_gained" | "start_lost"));
    if is_fs_stop_start_pair {
        return Category::Match;
    }

    // Set-containment over comma-split tokens, per spec.md 9's own caution
    // against a naive substring check on the raw term text.
    let pre_terms: HashSet<&str> = norm_pre.split(',').filter(|s| !s.is_empty()).collect();
    let local_terms: HashSet<&str> = norm_local.split(',').filter(|s| !s.is_empty()).collect();
    if pre_terms.contains(local_primary) || local_terms.contains(pre_primary) {
        return Category::Match;
    }

    let splice_reclassification = (has_splice_region_or_frameshift(&norm_pre) && is_splice_boundary(local_primary))
        || (has_splice_region_or_frameshift(&norm_local) && is_splice_boundary(pre_primary));
    if splice_reclassification {
        return Category::Match;
    }

    let inframe_stop_pair =
        (is_inframe(pre_primary) && is_stop_gained_or_lost(local_primary)) || (is_inframe(local_primary) && is_stop_gained_or_lost(pre_primary));
    if inframe_stop_pair {
        return Category::Match;
    }

    let stop_lost_vs_retained = (pre_primary == "stop_lost" && local_primary == "stop_retained_variant")
        || (local_primary == "stop_lost" && pre_primary == "stop_retained_variant");
    if stop_lost_vs_retained {
        return Category::Match;
    }

    let synonymous_vs_stop_retained = (pre_primary == "synonymous_variant" && local_primary == "stop_retained_variant")
        || (local_primary == "synonymous_variant" && pre_primary == "stop_retained_variant");
    if synonymous_vs_stop_retained {
        return Category::Match;
    }

    let is_start_lost_partner = |t: &str| matches!(t, "synonymous_variant" | "missense_variant") || is_inframe(t);
    let start_lost_pair =
        (pre_primary == "start_lost" && is_start_lost_partner(local_primary)) || (local_primary == "start_lost" && is_start_lost_partner(pre_primary));
    if start_lost_pair {
        return Category::Match;
    }

    Category::Mismatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_terms_match() {
        assert_eq!(categorize("Missense_Mutation", "missense_variant"), Category::Match);
    }

    #[test]
    fn upstream_gene_variant_reclassified_to_more_specific_local_term() {
        assert_eq!(categorize("5'Flank", "intron_variant"), Category::UpstreamReclassified);
    }

    #[test]
    fn no_cds_data_when_local_degrades_but_pre_was_coding() {
        assert_eq!(categorize("Missense_Mutation", "coding_sequence_variant"), Category::NoCdsData);
    }

    #[test]
    fn transcript_model_change_coding_vs_noncoding_transcript() {
        assert_eq!(
            categorize("Missense_Mutation", "non_coding_transcript_exon_variant"),
            Category::TranscriptModelChange
        );
    }

    #[test]
    fn gene_model_change_coding_vs_intergenic() {
        assert_eq!(categorize("Missense_Mutation", "intergenic_variant"), Category::GeneModelChange);
    }

    #[test]
    fn frameshift_at_immediate_stop_codon_matches() {
        assert_eq!(categorize("frameshift_variant", "stop_gained"), Category::Match);
        assert_eq!(categorize("stop_gained", "frameshift_variant"), Category::Match);
    }

    #[test]
    fn splice_boundary_reclassification_matches() {
        assert_eq!(categorize("splice_region_variant", "splice_donor_variant"), Category::Match);
        assert_eq!(categorize("frame_shift_del", "splice_acceptor_variant"), Category::Match);
    }

    #[test]
    fn inframe_vs_stop_matches() {
        assert_eq!(categorize("in_frame_del", "stop_gained"), Category::Match);
    }

    #[test]
    fn agreeing_inframe_deletion_matches_despite_two_hop_normalization() {
        // In_Frame_Del -> inframe_deletion -> inframe_variant, and
        // inframe_deletion -> inframe_variant: both sides land on the same
        // normalized term, so this is a genuine agreement, not a mismatch.
        assert_eq!(categorize("In_Frame_Del", "inframe_deletion"), Category::Match);
        assert_eq!(categorize("In_Frame_Ins", "inframe_insertion"), Category::Match);
    }

    #[test]
    fn stop_lost_vs_stop_retained_matches() {
        assert_eq!(categorize("Nonstop_Mutation", "stop_retained_variant"), Category::Match);
    }

    #[test]
    fn synonymous_vs_stop_retained_matches_spec_scenario_4() {
        assert_eq!(categorize("Silent", "stop_retained_variant"), Category::Match);
    }

    #[test]
    fn start_lost_vs_missense_matches() {
        assert_eq!(categorize("Translation_Start_Site", "missense_variant"), Category::Match);
    }

    #[test]
    fn unrelated_terms_mismatch() {
        assert_eq!(categorize("missense_variant", "synonymous_variant"), Category::Mismatch);
    }
}
