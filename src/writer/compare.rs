//! Comparison output: one row per variant showing the pre-existing vs.
//! locally computed value for each enabled column, plus its category
//! (spec.md 6).

use anyhow::{Context, Result};
use std::io::Write;

use crate::compare::{ComparisonColumns, RowCategories};
use crate::writer::RowWriter;

pub struct CompareRow {
    pub variant: String,
    pub gene: String,
    pub maf_consequence: Option<String>,
    pub vep_consequence: Option<String>,
    pub maf_hgvsc: Option<String>,
    pub vep_hgvsc: Option<String>,
    pub maf_hgvsp: Option<String>,
    pub vep_hgvsp: Option<String>,
    pub categories: RowCategories,
}

pub struct CompareWriter<W: Write> {
    writer: csv::Writer<W>,
    columns: ComparisonColumns,
    show_all: bool,
}

impl<W: Write> CompareWriter<W> {
    pub fn new(inner: W, columns: ComparisonColumns, show_all: bool) -> Self {
        CompareWriter {
            writer: csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(inner),
            columns,
            show_all,
        }
    }

    /// A row is emitted iff any enabled column's category is default-visible
    /// or `--all` was requested (spec.md 6).
    fn should_emit(&self, row: &CompareRow) -> bool {
        if self.show_all {
            return true;
        }
        [row.categories.consequence, row.categories.hgvsc, row.categories.hgvsp]
            .into_iter()
            .flatten()
            .any(|c| c.is_default_visible())
    }
}

impl<W: Write> RowWriter for CompareWriter<W> {
    type Row = CompareRow;

    fn write_header(&mut self) -> Result<()> {
        let mut header = vec!["Variant".to_string(), "Gene".to_string()];
        if self.columns.consequence {
            header.push("MAF_Consequence".to_string());
            header.push("VEP_Consequence".to_string());
        }
        if self.columns.hgvsc {
            header.push("MAF_HGVSc".to_string());
            header.push("VEP_HGVSc".to_string());
        }
        if self.columns.hgvsp {
            header.push("MAF_HGVSp".to_string());
            header.push("VEP_HGVSp".to_string());
        }
        if self.columns.consequence {
            header.push("consequence_category".to_string());
        }
        if self.columns.hgvsc {
            header.push("hgvsc_category".to_string());
        }
        if self.columns.hgvsp {
            header.push("hgvsp_category".to_string());
        }
        self.writer.write_record(&header).context("failed to write comparison output header")?;
        Ok(())
    }

    fn write_row(&mut self, row: &CompareRow) -> Result<()> {
        if !self.should_emit(row) {
            return Ok(());
        }
        let mut fields = vec![row.variant.clone(), row.gene.clone()];
        if self.columns.consequence {
            fields.push(row.maf_consequence.clone().unwrap_or_default());
            fields.push(row.vep_consequence.clone().unwrap_or_default());
        }
        if self.columns.hgvsc {
            fields.push(row.maf_hgvsc.clone().unwrap_or_default());
            fields.push(row.vep_hgvsc.clone().unwrap_or_default());
        }
        if self.columns.hgvsp {
            fields.push(row.maf_hgvsp.clone().unwrap_or_default());
            fields.push(row.vep_hgvsp.clone().unwrap_or_default());
        }
        if self.columns.consequence {
            fields.push(row.categories.consequence.map(|c| c.to_string()).unwrap_or_default());
        }
        if self.columns.hgvsc {
            fields.push(row.categories.hgvsc.map(|c| c.to_string()).unwrap_or_default());
        }
        if self.columns.hgvsp {
            fields.push(row.categories.hgvsp.map(|c| c.to_string()).unwrap_or_default());
        }
        self.writer.write_record(&fields).context("failed to write comparison output row")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush comparison output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Category;

    fn row(categories: RowCategories) -> CompareRow {
        CompareRow {
            variant: "12:25245351:C:A".to_string(),
            gene: "KRAS".to_string(),
            maf_consequence: Some("Missense_Mutation".to_string()),
            vep_consequence: Some("missense_variant".to_string()),
            maf_hgvsc: None,
            vep_hgvsc: None,
            maf_hgvsp: None,
            vep_hgvsp: None,
            categories,
        }
    }

    #[test]
    fn match_only_row_is_suppressed_by_default() {
        let mut buf = Vec::new();
        let mut writer = CompareWriter::new(&mut buf, ComparisonColumns::default(), false);
        writer.write_header().unwrap();
        writer
            .write_row(&row(RowCategories {
                consequence: Some(Category::Match),
                hgvsc: Some(Category::BothEmpty),
                hgvsp: Some(Category::BothEmpty),
            }))
            .unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn all_flag_forces_every_row_through() {
        let mut buf = Vec::new();
        let mut writer = CompareWriter::new(&mut buf, ComparisonColumns::default(), true);
        writer.write_header().unwrap();
        writer
            .write_row(&row(RowCategories {
                consequence: Some(Category::Match),
                hgvsc: Some(Category::BothEmpty),
                hgvsp: Some(Category::BothEmpty),
            }))
            .unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn mismatch_row_is_emitted_by_default() {
        let mut buf = Vec::new();
        let mut writer = CompareWriter::new(&mut buf, ComparisonColumns::default(), false);
        writer.write_header().unwrap();
        writer
            .write_row(&row(RowCategories {
                consequence: Some(Category::Mismatch),
                hgvsc: Some(Category::BothEmpty),
                hgvsp: Some(Category::BothEmpty),
            }))
            .unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
