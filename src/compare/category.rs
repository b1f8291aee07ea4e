//! The closed category set a column comparison can land in (spec.md 4.5).

/// One of the ~15 well-defined equivalence/divergence classes a column
/// comparison can be assigned (spec.md 1, 4.5). The authoritative set is the
/// union given in spec.md 4.5, per spec.md 9's note about multiple revisions
/// of the category list existing in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Match,
    BothEmpty,
    FuzzyFs,
    SpliceVsSyn,
    MafNonstandard,
    SpliceNoProtein,
    PositionShift,
    VepEmpty,
    MafEmpty,
    UpstreamReclassified,
    NoCdsData,
    DupVsIns,
    DelinsNormalized,
    SpliceVsPredicted,
    TranscriptModelChange,
    GeneModelChange,
    Mismatch,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Match => "match",
            Category::BothEmpty => "both_empty",
            Category::FuzzyFs => "fuzzy_fs",
            Category::SpliceVsSyn => "splice_vs_syn",
            Category::MafNonstandard => "maf_nonstandard",
            Category::SpliceNoProtein => "splice_no_protein",
            Category::PositionShift => "position_shift",
            Category::VepEmpty => "vep_empty",
            Category::MafEmpty => "maf_empty",
            Category::UpstreamReclassified => "upstream_reclassified",
            Category::NoCdsData => "no_cds_data",
            Category::DupVsIns => "dup_vs_ins",
            Category::DelinsNormalized => "delins_normalized",
            Category::SpliceVsPredicted => "splice_vs_predicted",
            Category::TranscriptModelChange => "transcript_model_change",
            Category::GeneModelChange => "gene_model_change",
            Category::Mismatch => "mismatch",
        }
    }

    /// A category is default-visible iff it isn't one of the "known benign
    /// source of disagreement" categories the comparison output suppresses
    /// unless `--all` is passed (spec.md 4.5.5).
    pub fn is_default_visible(self) -> bool {
        !matches!(
            self,
            Category::Match
                | Category::BothEmpty
                | Category::MafNonstandard
                | Category::SpliceNoProtein
                | Category::NoCdsData
                | Category::DupVsIns
                | Category::DelinsNormalized
                | Category::SpliceVsPredicted
                | Category::TranscriptModelChange
                | Category::GeneModelChange
        )
    }

    pub const ALL: &'static [Category] = &[
        Category::Match,
        Category::BothEmpty,
        Category::FuzzyFs,
        Category::SpliceVsSyn,
        Category::MafNonstandard,
        Category::SpliceNoProtein,
        Category::PositionShift,
        Category::VepEmpty,
        Category::MafEmpty,
        Category::UpstreamReclassified,
        Category::NoCdsData,
        Category::DupVsIns,
        Category::DelinsNormalized,
        Category::SpliceVsPredicted,
        Category::TranscriptModelChange,
        Category::GeneModelChange,
        Category::Mismatch,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_visibility_matches_spec_exclusion_list() {
        assert!(!Category::Match.is_default_visible());
        assert!(!Category::BothEmpty.is_default_visible());
        assert!(Category::Mismatch.is_default_visible());
        assert!(Category::PositionShift.is_default_visible());
        assert!(Category::FuzzyFs.is_default_visible());
        assert!(Category::UpstreamReclassified.is_default_visible());
        assert!(Category::VepEmpty.is_default_visible());
        assert!(Category::MafEmpty.is_default_visible());
    }
}
