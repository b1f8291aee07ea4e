//! HGVSc column categorization (spec.md 4.5.3).

use std::sync::OnceLock;

use regex::Regex;

use crate::compare::Category;

#[derive(Debug, PartialEq, Eq)]
enum Op {
    Sub,
    Del,
    Dup,
    Ins,
    Delins,
}

fn coordinate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^c\.(\*?-?\d+)(?:[+-](\d+))?(?:_(\*?-?\d+)(?:[+-](\d+))?)?").unwrap())
}

fn strip_prefix(hgvsc: &str) -> &str {
    match hgvsc.rfind(':') {
        Some(idx) => &hgvsc[idx + 1..],
        None => hgvsc,
    }
}

fn classify_op(hgvsc: &str) -> Option<Op> {
    // Order matters: `delins` must be checked before the bare `del`/`ins`
    // substrings it contains.
    if hgvsc.contains("delins") {
        Some(Op::Delins)
    } else if hgvsc.contains("dup") {
        Some(Op::Dup)
    } else if hgvsc.contains("del") {
        Some(Op::Del)
    } else if hgvsc.contains("ins") {
        Some(Op::Ins)
    } else if hgvsc.contains('>') {
        Some(Op::Sub)
    } else {
        None
    }
}

fn base_coordinate(hgvsc: &str) -> Option<(i64, i64)> {
    let caps = coordinate_re().captures(hgvsc)?;
    let base: i64 = caps.get(1)?.as_str().trim_start_matches('*').parse().ok()?;
    let offset: i64 = caps.get(2).map(|m| m.as_str().parse().unwrap_or(0)).unwrap_or(0);
    Some((base, offset))
}

/// Categorizes the `hgvsc` column (spec.md 4.5.3, steps 1-7).
pub fn categorize(pre_existing: &str, local: &str) -> Category {
    let pre = strip_prefix(pre_existing.trim());
    let loc = strip_prefix(local.trim());

    let pre_empty = pre.is_empty() || pre == ".";
    let loc_empty = loc.is_empty() || loc == ".";

    if pre_empty && loc_empty {
        return Category::BothEmpty;
    }
    if pre == loc {
        return Category::Match;
    }
    if pre_empty && !loc_empty {
        return Category::VepEmpty;
    }
    if loc_empty && !pre_empty {
        return Category::MafEmpty;
    }

    let pre_op = classify_op(pre);
    let loc_op = classify_op(loc);

    let is_dup_ins_pair = matches!(
        (&pre_op, &loc_op),
        (Some(Op::Dup), Some(Op::Ins)) | (Some(Op::Ins), Some(Op::Dup))
    );
    if is_dup_ins_pair {
        return Category::DupVsIns;
    }

    let is_delins_pair = pre_op == Some(Op::Delins) || loc_op == Some(Op::Delins);
    if is_delins_pair && pre_op != loc_op {
        return Category::DelinsNormalized;
    }

    if pre_op == loc_op {
        if let (Some(p), Some(l)) = (base_coordinate(pre), base_coordinate(loc)) {
            if p != l {
                return Category::PositionShift;
            }
        }
    }

    Category::Mismatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_match() {
        assert_eq!(categorize("ENST00000333418.4:c.1799T>A", "c.1799T>A"), Category::Match);
    }

    #[test]
    fn both_empty_matches() {
        assert_eq!(categorize("", "."), Category::BothEmpty);
    }

    #[test]
    fn dup_vs_ins_is_recognized() {
        assert_eq!(categorize("c.100dupA", "c.99_100insA"), Category::DupVsIns);
    }

    #[test]
    fn delins_normalized_against_plain_substitution() {
        assert_eq!(categorize("c.100delinsA", "c.100A>T"), Category::DelinsNormalized);
    }

    #[test]
    fn scenario_3_position_shift_matches_spec() {
        assert_eq!(categorize("c.390T>G", "c.388T>G"), Category::PositionShift);
    }

    #[test]
    fn vep_empty_when_pre_existing_blank() {
        assert_eq!(categorize("", "c.100A>T"), Category::VepEmpty);
    }

    #[test]
    fn maf_empty_when_local_blank() {
        assert_eq!(categorize("c.100A>T", ""), Category::MafEmpty);
    }

    #[test]
    fn unrelated_operations_mismatch() {
        assert_eq!(categorize("c.100A>T", "c.200_205del"), Category::Mismatch);
    }
}
