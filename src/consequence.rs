//! Sequence Ontology vocabulary: impact ranks, MAF/VEP-term normalization,
//! and the SO<->MAF `Variant_Classification` mapping (spec.md 4.4).

use std::collections::HashMap;
use std::sync::OnceLock;

/// Strict total order over impact severities (spec.md 4.4, 8). Declared
/// ascending so the derived `Ord` gives `High > Moderate > Low > Modifier`
/// without a hand-written comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Impact {
    Modifier,
    Low,
    Moderate,
    High,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

const HIGH_TERMS: &[&str] = &[
    "transcript_ablation",
    "splice_acceptor_variant",
    "splice_donor_variant",
    "stop_gained",
    "frameshift_variant",
    "stop_lost",
    "start_lost",
];

const MODERATE_TERMS: &[&str] = &[
    "inframe_insertion",
    "inframe_deletion",
    "missense_variant",
    "protein_altering_variant",
];

const LOW_TERMS: &[&str] = &[
    "splice_region_variant",
    "synonymous_variant",
    "stop_retained_variant",
    "start_retained_variant",
    "coding_sequence_variant",
    "5_prime_utr_variant",
    "3_prime_utr_variant",
    "non_coding_transcript_exon_variant",
    "mature_mirna_variant",
];

/// Everything not in HIGH/MODERATE/LOW is MODIFIER, including the terms
/// listed explicitly in spec.md 4.4 (`intron_variant`, `intergenic_variant`,
/// `upstream_gene_variant`, `downstream_gene_variant`,
/// `non_coding_transcript_variant`, `NMD_transcript_variant`).
pub fn impact_of(term: &str) -> Impact {
    let lower = term.to_ascii_lowercase();
    if HIGH_TERMS.contains(&lower.as_str()) {
        Impact::High
    } else if MODERATE_TERMS.contains(&lower.as_str()) {
        Impact::Moderate
    } else if LOW_TERMS.contains(&lower.as_str()) {
        Impact::Low
    } else {
        Impact::Modifier
    }
}

/// Picks the highest-impact element of a (possibly) comma-separated
/// consequence string; the primary term for ranking and comparison.
pub fn primary_term(consequence: &str) -> &str {
    consequence
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .max_by_key(|t| impact_of(t))
        .unwrap_or("")
}

/// Sorts terms by descending impact (stable: ties keep their relative
/// order) and joins them with commas, for the engine's own consequence
/// composition (spec.md 4.3.3 step 3) -- distinct from `normalize`, which is
/// for comparison only and may drop/rewrite terms.
pub fn compose_consequence(terms: &mut Vec<&str>) -> String {
    terms.sort_by_key(|t| std::cmp::Reverse(impact_of(t)));
    terms.join(",")
}

fn rewrite_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("missense_mutation", "missense_variant"),
            ("nonsense_mutation", "stop_gained"),
            ("silent", "synonymous_variant"),
            ("splice_site", "splice_donor_variant"),
            ("frame_shift_del", "frameshift_variant"),
            ("frame_shift_ins", "frameshift_variant"),
            ("in_frame_del", "inframe_deletion"),
            ("in_frame_ins", "inframe_insertion"),
            ("nonstop_mutation", "stop_lost"),
            ("translation_start_site", "start_lost"),
            ("3'utr", "3_prime_utr_variant"),
            ("5'utr", "5_prime_utr_variant"),
            ("intron", "intron_variant"),
            ("igr", "intergenic_variant"),
            ("3'flank", "downstream_gene_variant"),
            ("5'flank", "upstream_gene_variant"),
            ("protein_altering_variant", "inframe_variant"),
            ("inframe_deletion", "inframe_variant"),
            ("inframe_insertion", "inframe_variant"),
            ("mature_mirna_variant", "non_coding_transcript_exon_variant"),
            ("splice_donor_region_variant", "splice_region_variant"),
            ("splice_donor_5th_base_variant", "splice_region_variant"),
        ])
    })
}

/// Terms dropped outright once mapped, because they carry no signal beyond
/// MODIFIER (spec.md 4.4).
const DROPPED_MODIFIER_ONLY: &[&str] = &[
    "non_coding_transcript_variant",
    "nmd_transcript_variant",
    "splice_polypyrimidine_tract_variant",
];

/// Applies `rewrite_table()` to a single term until it stops changing (some
/// entries are two-hop, e.g. `in_frame_del` -> `inframe_deletion` ->
/// `inframe_variant`), so a term already in its rewritten form round-trips
/// through unchanged. Bounded by the table size; the table is a fixed,
/// acyclic const list, so this always terminates well before the cap.
fn rewrite_to_fixpoint(mut term: String) -> String {
    for _ in 0..rewrite_table().len() {
        match rewrite_table().get(term.as_str()) {
            Some(&next) if next != term => term = next.to_string(),
            _ => break,
        }
    }
    term
}

/// Maps arbitrary MAF/VEP consequence strings to a canonical, lowercased,
/// alphabetically-sorted, comma-joined SO form, used only for comparison
/// (spec.md 4.4). Idempotent: rewrites are applied to a fixpoint (some
/// entries are two-hop, e.g. `in_frame_del` -> `inframe_deletion` ->
/// `inframe_variant`), and the dominance rules only ever remove terms.
pub fn normalize(input: &str) -> String {
    let mut terms: Vec<String> = input
        .split(',')
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .map(rewrite_to_fixpoint)
        .filter(|t| !DROPPED_MODIFIER_ONLY.contains(&t.as_str()))
        .collect();

    terms.sort();
    terms.dedup();

    let has_splice_boundary = terms
        .iter()
        .any(|t| t == "splice_donor_variant" || t == "splice_acceptor_variant");
    if has_splice_boundary {
        terms.retain(|t| t != "intron_variant");
    }

    let has_non_intron_non_splice_region = terms
        .iter()
        .any(|t| t != "intron_variant" && t != "splice_region_variant");
    if has_non_intron_non_splice_region {
        terms.retain(|t| t != "splice_region_variant");
    }

    let has_high = terms.iter().any(|t| impact_of(t) == Impact::High);
    if has_high {
        terms.retain(|t| {
            !matches!(
                t.as_str(),
                "5_prime_utr_variant"
                    | "3_prime_utr_variant"
                    | "start_retained_variant"
                    | "stop_retained_variant"
                    | "coding_sequence_variant"
            )
        });
    }

    let has_frameshift = terms.iter().any(|t| t == "frameshift_variant");
    if has_frameshift {
        terms.retain(|t| t != "stop_gained" && t != "stop_lost");
    }

    terms.sort();
    terms.join(",")
}

/// Maps a primary SO term to the MAF `Variant_Classification` enumeration
/// (spec.md 6). Falls back to `RNA` for anything unrecognized, matching the
/// MAF spec's catch-all for non-coding transcript effects.
pub fn so_to_maf_classification(primary_so_term: &str) -> &'static str {
    match primary_so_term {
        "missense_variant" => "Missense_Mutation",
        "stop_gained" => "Nonsense_Mutation",
        "synonymous_variant" | "stop_retained_variant" | "start_retained_variant" => "Silent",
        "frameshift_variant" => "Frame_Shift_Del", // caller refines Del/Ins by allele shape
        "inframe_deletion" => "In_Frame_Del",
        "inframe_insertion" => "In_Frame_Ins",
        "splice_donor_variant" | "splice_acceptor_variant" => "Splice_Site",
        "splice_region_variant" => "Splice_Region",
        "stop_lost" => "Nonstop_Mutation",
        "start_lost" => "Translation_Start_Site",
        "3_prime_utr_variant" => "3'UTR",
        "5_prime_utr_variant" => "5'UTR",
        "intron_variant" => "Intron",
        "intergenic_variant" => "IGR",
        "downstream_gene_variant" => "3'Flank",
        "upstream_gene_variant" => "5'Flank",
        _ => "RNA",
    }
}
