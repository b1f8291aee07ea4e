//! Per-column comparison state and the aggregate histogram report
//! (spec.md 4.5.4, 4.5.5).

use std::collections::HashMap;

use crate::compare::Category;

/// Which columns are enabled for comparison. Controlled by CLI flags
/// (SPEC_FULL.md 6); all three are on by default.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonColumns {
    pub consequence: bool,
    pub hgvsc: bool,
    pub hgvsp: bool,
}

impl Default for ComparisonColumns {
    fn default() -> Self {
        ComparisonColumns {
            consequence: true,
            hgvsc: true,
            hgvsp: true,
        }
    }
}

/// The per-column categorization result for a single variant row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowCategories {
    pub consequence: Option<Category>,
    pub hgvsc: Option<Category>,
    pub hgvsp: Option<Category>,
}

impl RowCategories {
    /// Promotes sibling `mismatch` columns once the hgvsc column lands on
    /// `position_shift` or `delins_normalized` (spec.md 4.5.4): a shifted or
    /// renormalized coordinate explains an otherwise-unrelated mismatch in
    /// the consequence/hgvsp columns for the same row.
    pub fn reclassify_cross_column(&mut self) {
        let drives_reclassification = matches!(self.hgvsc, Some(Category::PositionShift) | Some(Category::DelinsNormalized));
        if !drives_reclassification {
            return;
        }
        let promoted = self.hgvsc.unwrap();
        if self.consequence == Some(Category::Mismatch) {
            self.consequence = Some(promoted);
        }
        if self.hgvsp == Some(Category::Mismatch) {
            self.hgvsp = Some(promoted);
        }
    }
}

/// Aggregate histogram of categorization outcomes across an entire
/// comparison run, one histogram per enabled column plus a grand total
/// (spec.md 4.5.5).
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub consequence: HashMap<Category, u64>,
    pub hgvsc: HashMap<Category, u64>,
    pub hgvsp: HashMap<Category, u64>,
    pub rows_compared: u64,
    pub rows_skipped_no_transcript_match: u64,
}

impl Summary {
    pub fn record(&mut self, row: &RowCategories) {
        self.rows_compared += 1;
        if let Some(c) = row.consequence {
            *self.consequence.entry(c).or_insert(0) += 1;
        }
        if let Some(c) = row.hgvsc {
            *self.hgvsc.entry(c).or_insert(0) += 1;
        }
        if let Some(c) = row.hgvsp {
            *self.hgvsp.entry(c).or_insert(0) += 1;
        }
    }

    pub fn record_skip(&mut self) {
        self.rows_skipped_no_transcript_match += 1;
    }

    /// Merges another summary into this one; used to fold per-chunk results
    /// from the parallel pipeline into one final report.
    pub fn merge(&mut self, other: &Summary) {
        self.rows_compared += other.rows_compared;
        self.rows_skipped_no_transcript_match += other.rows_skipped_no_transcript_match;
        for (k, v) in &other.consequence {
            *self.consequence.entry(*k).or_insert(0) += v;
        }
        for (k, v) in &other.hgvsc {
            *self.hgvsc.entry(*k).or_insert(0) += v;
        }
        for (k, v) in &other.hgvsp {
            *self.hgvsp.entry(*k).or_insert(0) += v;
        }
    }

    /// Per-column counts restricted to the default-visible categories
    /// (spec.md 4.5.5), in a stable `Category::ALL` order.
    pub fn visible_counts(histogram: &HashMap<Category, u64>) -> Vec<(Category, u64)> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| c.is_default_visible())
            .filter_map(|c| histogram.get(&c).map(|n| (c, *n)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reclassifies_mismatch_siblings_when_hgvsc_shows_position_shift() {
        let mut row = RowCategories {
            consequence: Some(Category::Mismatch),
            hgvsc: Some(Category::PositionShift),
            hgvsp: Some(Category::Mismatch),
        };
        row.reclassify_cross_column();
        assert_eq!(row.consequence, Some(Category::PositionShift));
        assert_eq!(row.hgvsp, Some(Category::PositionShift));
    }

    #[test]
    fn leaves_non_mismatch_siblings_alone() {
        let mut row = RowCategories {
            consequence: Some(Category::Match),
            hgvsc: Some(Category::DelinsNormalized),
            hgvsp: Some(Category::Mismatch),
        };
        row.reclassify_cross_column();
        assert_eq!(row.consequence, Some(Category::Match));
        assert_eq!(row.hgvsp, Some(Category::DelinsNormalized));
    }

    #[test]
    fn no_reclassification_when_hgvsc_is_plain_mismatch() {
        let mut row = RowCategories {
            consequence: Some(Category::Mismatch),
            hgvsc: Some(Category::Mismatch),
            hgvsp: Some(Category::Mismatch),
        };
        row.reclassify_cross_column();
        assert_eq!(row.consequence, Some(Category::Mismatch));
    }

    #[test]
    fn merge_sums_histograms_and_counters() {
        let mut a = Summary::default();
        a.record(&RowCategories {
            consequence: Some(Category::Match),
            hgvsc: None,
            hgvsp: None,
        });
        let mut b = Summary::default();
        b.record(&RowCategories {
            consequence: Some(Category::Match),
            hgvsc: None,
            hgvsp: None,
        });
        b.record_skip();
        a.merge(&b);
        assert_eq!(a.rows_compared, 2);
        assert_eq!(a.rows_skipped_no_transcript_match, 1);
        assert_eq!(a.consequence[&Category::Match], 2);
    }
}
