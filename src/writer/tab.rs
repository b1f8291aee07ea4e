//! VEP-style 19-column tab output (spec.md 6).

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::writer::RowWriter;

const MISSING: &str = "-";

fn or_missing(value: &Option<String>) -> String {
    value.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| MISSING.to_string())
}

/// One row of VEP-style tab output. Field order matches the header exactly.
#[derive(Debug, Clone, Serialize)]
pub struct TabRow {
    #[serde(rename = "#Uploaded_variation")]
    pub uploaded_variation: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Allele")]
    pub allele: String,
    #[serde(rename = "Gene")]
    pub gene: String,
    #[serde(rename = "Feature")]
    pub feature: String,
    #[serde(rename = "Feature_type")]
    pub feature_type: String,
    #[serde(rename = "Consequence")]
    pub consequence: String,
    #[serde(rename = "cDNA_position")]
    pub cdna_position: String,
    #[serde(rename = "CDS_position")]
    pub cds_position: String,
    #[serde(rename = "Protein_position")]
    pub protein_position: String,
    #[serde(rename = "Amino_acids")]
    pub amino_acids: String,
    #[serde(rename = "Codons")]
    pub codons: String,
    #[serde(rename = "Existing_variation")]
    pub existing_variation: String,
    #[serde(rename = "IMPACT")]
    pub impact: String,
    #[serde(rename = "BIOTYPE")]
    pub biotype: String,
    #[serde(rename = "CANONICAL")]
    pub canonical: String,
    #[serde(rename = "EXON")]
    pub exon: String,
    #[serde(rename = "INTRON")]
    pub intron: String,
    #[serde(rename = "HGVSp")]
    pub hgvsp: String,
}

impl TabRow {
    pub fn from_annotation(uploaded_variation: &str, location: &str, annotation: &crate::annotate::Annotation) -> Self {
        TabRow {
            uploaded_variation: uploaded_variation.to_string(),
            location: location.to_string(),
            allele: annotation.allele.clone(),
            gene: or_missing(&annotation.gene_id),
            feature: or_missing(&annotation.transcript_id),
            feature_type: "Transcript".to_string(),
            consequence: if annotation.consequence.is_empty() {
                MISSING.to_string()
            } else {
                annotation.consequence.clone()
            },
            cdna_position: annotation.cdna_position.map(|p| p.to_string()).unwrap_or_else(|| MISSING.to_string()),
            cds_position: annotation.cds_position.map(|p| p.to_string()).unwrap_or_else(|| MISSING.to_string()),
            protein_position: annotation.protein_position.map(|p| p.to_string()).unwrap_or_else(|| MISSING.to_string()),
            amino_acids: or_missing(&annotation.amino_acids),
            codons: or_missing(&annotation.codons),
            existing_variation: MISSING.to_string(),
            impact: annotation.impact.as_str().to_string(),
            biotype: or_missing(&annotation.biotype),
            canonical: if annotation.canonical { "YES".to_string() } else { MISSING.to_string() },
            exon: or_missing(&annotation.exon),
            intron: or_missing(&annotation.intron),
            hgvsp: if annotation.hgvsp.is_empty() { MISSING.to_string() } else { annotation.hgvsp.clone() },
        }
    }
}

pub struct TabWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TabWriter<W> {
    pub fn new(inner: W) -> Self {
        TabWriter {
            writer: csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(inner),
        }
    }
}

impl<W: Write> RowWriter for TabWriter<W> {
    type Row = TabRow;

    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record([
                "#Uploaded_variation",
                "Location",
                "Allele",
                "Gene",
                "Feature",
                "Feature_type",
                "Consequence",
                "cDNA_position",
                "CDS_position",
                "Protein_position",
                "Amino_acids",
                "Codons",
                "Existing_variation",
                "IMPACT",
                "BIOTYPE",
                "CANONICAL",
                "EXON",
                "INTRON",
                "HGVSp",
            ])
            .context("failed to write tab output header")?;
        Ok(())
    }

    fn write_row(&mut self, row: &TabRow) -> Result<()> {
        self.writer.serialize(row).context("failed to write tab output row")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush tab output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_annotation() -> crate::annotate::Annotation {
        crate::annotate::Annotation {
            allele: "T".to_string(),
            consequence: "missense_variant".to_string(),
            impact: crate::consequence::Impact::Moderate,
            gene_id: Some("ENSG00000133703".to_string()),
            gene_symbol: Some("KRAS".to_string()),
            transcript_id: Some("ENST00000311936.8".to_string()),
            biotype: Some("protein_coding".to_string()),
            exon: Some("2/6".to_string()),
            intron: None,
            hgvsc: "c.34G>T".to_string(),
            hgvsp: "p.Gly12Cys".to_string(),
            cdna_position: Some(169),
            cds_position: Some(34),
            protein_position: Some(12),
            amino_acids: Some("G/C".to_string()),
            codons: Some("gGt/gTt".to_string()),
            canonical: true,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn missing_fields_render_as_dash() {
        let row = TabRow::from_annotation("12_25245351_C/A", "12:25245351", &sample_annotation());
        assert_eq!(row.existing_variation, "-");
    }

    #[test]
    fn writes_header_and_row_tab_delimited() {
        let mut buf = Vec::new();
        {
            let mut writer = TabWriter::new(&mut buf);
            writer.write_header().unwrap();
            writer.write_row(&TabRow::from_annotation("12_25245351_C/A", "12:25245351", &sample_annotation())).unwrap();
            writer.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("#Uploaded_variation\tLocation\t"));
        assert!(text.contains("missense_variant"));
        assert!(text.contains("p.Gly12Cys"));
    }
}
