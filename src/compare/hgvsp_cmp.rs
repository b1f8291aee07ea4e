//! HGVSp column categorization (spec.md 4.5.2).

use std::sync::OnceLock;

use regex::Regex;

use crate::codon::hgvsp_to_short;
use crate::compare::Category;

fn protein_pos_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^p\.[A-Za-z*]+(\d+)").unwrap())
}

fn synonymous_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^p\.\w+=$").unwrap())
}

fn splice_notation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^p\.[A-Za-z*]\d+_splice$").unwrap())
}

fn frameshift_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^p\.[A-Za-z*]+(\d+)[A-Za-z*]+fs").unwrap())
}

/// A pre-existing HGVSp that leads with digits right after `p.` instead of
/// an amino-acid code, carrying an HGVSc-style intronic offset (`+`/`-`)
/// into the protein field — a non-standard MAF annotation some upstream
/// tools emit for intronic/splice calls (spec.md 4.5.2 rule 5).
fn non_standard_intronic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^p\.\d+[+-]\d+").unwrap())
}

fn protein_position(hgvsp: &str) -> Option<i64> {
    protein_pos_re().captures(hgvsp).and_then(|c| c[1].parse().ok())
}

fn is_frameshift_notation(hgvsp: &str) -> bool {
    hgvsp.contains("fs")
}

fn is_splice_consequence(consequence: &str) -> bool {
    consequence.contains("splice_donor_variant") || consequence.contains("splice_acceptor_variant") || consequence.contains("splice_region_variant")
}

/// Categorizes the `hgvsp` column (spec.md 4.5.2). `local_consequence` is
/// the locally computed consequence string for the same row, needed to
/// distinguish a legitimately protein-less splice call from a real mismatch.
pub fn categorize(pre_existing: &str, local: &str, local_consequence: &str) -> Category {
    let pre = pre_existing.trim();
    let loc = local.trim();

    let pre_empty = pre.is_empty() || pre == "." || pre == "p.?";
    let loc_empty = loc.is_empty() || loc == "." || loc == "p.?";

    if pre_empty && loc_empty {
        return Category::BothEmpty;
    }

    let normalized_pre = hgvsp_to_short(pre);
    let normalized_loc = hgvsp_to_short(loc);
    if !pre_empty && !loc_empty && normalized_pre == normalized_loc {
        return Category::Match;
    }

    if splice_notation_re().is_match(pre) && (loc_empty || is_splice_consequence(local_consequence)) {
        return Category::SpliceNoProtein;
    }
    if is_splice_consequence(local_consequence) && loc_empty {
        return Category::SpliceNoProtein;
    }

    if non_standard_intronic_re().is_match(pre) && loc_empty {
        return Category::MafNonstandard;
    }

    if pre_empty && !loc_empty {
        return Category::VepEmpty;
    }
    if loc_empty && !pre_empty {
        return Category::MafEmpty;
    }

    let pre_syn = synonymous_re().is_match(pre);
    let loc_syn = synonymous_re().is_match(loc);
    if (pre_syn && loc.contains("fs")) || (loc_syn && pre.contains("fs")) {
        return Category::SpliceVsSyn;
    }

    let pre_fs = frameshift_re().is_match(pre) || is_frameshift_notation(pre);
    let loc_fs = frameshift_re().is_match(loc) || is_frameshift_notation(loc);
    if pre_fs && loc_fs {
        if let (Some(p1), Some(p2)) = (protein_position(pre), protein_position(loc)) {
            if (p1 - p2).abs() <= 3 {
                return Category::FuzzyFs;
            }
        }
        return Category::FuzzyFs;
    }

    // One side is a frameshift, the other a bare stop-codon call ending in
    // `*` with no `fs` of its own (spec.md 4.5.2 rule 3's one-sided case).
    let pre_bare_stop = pre.ends_with('*') && !pre_fs;
    let loc_bare_stop = loc.ends_with('*') && !loc_fs;
    if (pre_fs && loc_bare_stop) || (loc_fs && pre_bare_stop) {
        return Category::FuzzyFs;
    }

    if splice_notation_re().is_match(pre) && !loc_empty {
        return Category::SpliceVsPredicted;
    }

    if let (Some(p1), Some(p2)) = (protein_position(pre), protein_position(loc)) {
        if p1 != p2 {
            return Category::PositionShift;
        }
    }

    Category::Mismatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_empty_matches() {
        assert_eq!(categorize("", "", "intron_variant"), Category::BothEmpty);
    }

    #[test]
    fn identical_after_three_to_one_normalization_matches() {
        assert_eq!(categorize("p.Gly12Cys", "p.G12C", "missense_variant"), Category::Match);
    }

    #[test]
    fn splice_notation_with_empty_local_is_splice_no_protein() {
        assert_eq!(
            categorize("p.X125_splice", "", "splice_acceptor_variant"),
            Category::SpliceNoProtein
        );
    }

    #[test]
    fn pre_existing_empty_local_present_is_vep_empty() {
        assert_eq!(categorize("", "p.Gly12Cys", "missense_variant"), Category::VepEmpty);
    }

    #[test]
    fn local_empty_pre_existing_present_is_maf_empty() {
        assert_eq!(categorize("p.Gly12Cys", "", "missense_variant"), Category::MafEmpty);
    }

    #[test]
    fn frameshift_position_mismatch_is_fuzzy_fs() {
        assert_eq!(
            categorize("p.Lys2fsTer3", "p.Lys4fsTer9", "frameshift_variant"),
            Category::FuzzyFs
        );
    }

    #[test]
    fn differing_protein_position_is_position_shift() {
        assert_eq!(categorize("p.Phe130Val", "p.Ser131Val", "missense_variant"), Category::PositionShift);
    }

    #[test]
    fn unrelated_notation_mismatches() {
        assert_eq!(categorize("p.Gly12Cys", "p.Ala45Thr", "missense_variant"), Category::Mismatch);
    }

    #[test]
    fn non_standard_intronic_notation_with_empty_local_is_maf_nonstandard() {
        assert_eq!(categorize("p.123+1", "", "intron_variant"), Category::MafNonstandard);
    }

    #[test]
    fn splice_notation_with_non_empty_local_is_splice_vs_predicted() {
        assert_eq!(
            categorize("p.X125_splice", "p.Gly12Cys", "missense_variant"),
            Category::SpliceVsPredicted
        );
    }

    #[test]
    fn one_sided_frameshift_against_bare_stop_call_is_fuzzy_fs() {
        assert_eq!(categorize("p.Lys2fsTer3", "p.Gln5*", "frameshift_variant"), Category::FuzzyFs);
        assert_eq!(categorize("p.Gln5*", "p.Lys2fsTer3", "frameshift_variant"), Category::FuzzyFs);
    }
}
