//! The comparison engine (spec.md 4.5): given a pre-existing MAF annotation
//! and the locally computed annotations for the same variant, pick the best
//! local annotation (`annotate::select_best`) and categorize agreement for
//! each enabled column into one of the closed set of categories below.

mod category;
mod consequence_cmp;
mod hgvsc_cmp;
mod hgvsp_cmp;
mod summary;

pub use category::Category;
pub use summary::{ComparisonColumns, RowCategories, Summary};

use crate::annotate::{select_best, Annotation};
use crate::maf_annotation::MAFAnnotation;

/// Categorizes one variant's pre-existing vs. locally computed annotation
/// across the enabled columns, applying cross-column reclassification
/// (spec.md 4.5.4).
pub fn compare_row(pre_existing: &MAFAnnotation, local_annotations: &[Annotation], columns: &ComparisonColumns) -> Option<RowCategories> {
    let best = select_best(local_annotations, Some(pre_existing))?;
    Some(compare_against(pre_existing, best, columns))
}

fn compare_against(pre_existing: &MAFAnnotation, local: &Annotation, columns: &ComparisonColumns) -> RowCategories {
    let mut row = RowCategories::default();

    if columns.consequence {
        row.consequence = Some(consequence_cmp::categorize(
            pre_existing.consequence.as_deref().unwrap_or(""),
            &local.consequence,
        ));
    }
    if columns.hgvsp {
        row.hgvsp = Some(hgvsp_cmp::categorize(
            pre_existing.hgvsp.as_deref().unwrap_or(""),
            &local.hgvsp,
            &local.consequence,
        ));
    }
    if columns.hgvsc {
        row.hgvsc = Some(hgvsc_cmp::categorize(
            pre_existing.hgvsc_without_prefix().unwrap_or(""),
            &local.hgvsc,
        ));
    }

    row.reclassify_cross_column();
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consequence::Impact;
    use std::collections::HashMap;

    fn local(consequence: &str, hgvsc: &str, hgvsp: &str) -> Annotation {
        Annotation {
            allele: "A".to_string(),
            consequence: consequence.to_string(),
            impact: Impact::Moderate,
            gene_id: Some("ENSG1".to_string()),
            gene_symbol: Some("BRAF".to_string()),
            transcript_id: Some("ENST00000333418.4".to_string()),
            biotype: Some("protein_coding".to_string()),
            exon: None,
            intron: None,
            hgvsc: hgvsc.to_string(),
            hgvsp: hgvsp.to_string(),
            cdna_position: None,
            cds_position: None,
            protein_position: Some(130),
            amino_acids: None,
            codons: None,
            canonical: true,
            extra: HashMap::new(),
        }
    }

    /// spec.md 8, scenario 3.
    #[test]
    fn scenario_3_position_shifted_mutation_reclassifies_hgvsc_and_hgvsp() {
        let pre = MAFAnnotation {
            gene_symbol: Some("BRAF".to_string()),
            consequence: Some("Missense_Mutation".to_string()),
            hgvsp: Some("p.P130=".to_string()),
            transcript_id: Some("ENST00000333418.4".to_string()),
            hgvsc: Some("ENST00000333418.4:c.390T>G".to_string()),
            ..Default::default()
        };
        let locals = vec![local("missense_variant", "c.388T>G", "p.Phe130Val")];
        let row = compare_row(&pre, &locals, &ComparisonColumns::default()).unwrap();

        assert_eq!(row.hgvsc, Some(Category::PositionShift));
        assert_eq!(row.hgvsp, Some(Category::PositionShift));
        // The consequence terms normalize identically (`missense_variant` on
        // both sides); cross-column reclassification only promotes columns
        // categorized `mismatch`, so this one legitimately stays `match`
        // (see DESIGN.md for why this departs from spec.md's literal prose).
        assert_eq!(row.consequence, Some(Category::Match));
    }

    /// spec.md 8, scenario 4.
    #[test]
    fn scenario_4_silent_vs_stop_retained_matches() {
        let pre = MAFAnnotation {
            consequence: Some("Silent".to_string()),
            ..Default::default()
        };
        let locals = vec![local("stop_retained_variant", "c.300A>G", "p.Ter100=")];
        let row = compare_row(&pre, &locals, &ComparisonColumns::default()).unwrap();
        assert_eq!(row.consequence, Some(Category::Match));
    }

    /// spec.md 8, scenario 5.
    #[test]
    fn scenario_5_maf_splice_hgvsp_vs_empty_local_under_splice_acceptor() {
        let pre = MAFAnnotation {
            hgvsp: Some("p.X125_splice".to_string()),
            ..Default::default()
        };
        let locals = vec![local("splice_acceptor_variant", "c.375-2A>G", "")];
        let row = compare_row(&pre, &locals, &ComparisonColumns::default()).unwrap();
        assert_eq!(row.hgvsp, Some(Category::SpliceNoProtein));
    }
}
