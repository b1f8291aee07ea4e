//! MAF output when the input was MAF: every original column preserved
//! byte-exact, plus a fixed suffix of seven `vibe.*` columns (spec.md 6).

use anyhow::{Context, Result};
use std::io::Write;

use crate::annotate::Annotation;
use crate::consequence::so_to_maf_classification;
use crate::variant::VariantKind;
use crate::writer::RowWriter;

const VIBE_SUFFIX_COLUMNS: &[&str] = &[
    "vibe.hugo_symbol",
    "vibe.consequence",
    "vibe.variant_classification",
    "vibe.transcript_id",
    "vibe.hgvsc",
    "vibe.hgvsp",
    "vibe.hgvsp_short",
];

/// One output row: the original MAF fields passed through untouched, plus
/// the best local annotation (or `None` if nothing overlapped, though the
/// intergenic-variant fallback means this should be rare in practice).
pub struct MafRow {
    pub original_fields: Vec<String>,
    pub best_annotation: Option<Annotation>,
    pub variant_kind: VariantKind,
}

fn variant_classification(annotation: &Annotation, kind: VariantKind) -> String {
    let primary = annotation.primary_consequence();
    let classification = so_to_maf_classification(primary);
    if classification == "Frame_Shift_Del" && kind == VariantKind::Insertion {
        "Frame_Shift_Ins".to_string()
    } else {
        classification.to_string()
    }
}

pub struct MafAnnotateWriter<W: Write> {
    writer: csv::Writer<W>,
    original_header: Vec<String>,
}

impl<W: Write> MafAnnotateWriter<W> {
    pub fn new(inner: W, original_header: Vec<String>) -> Self {
        MafAnnotateWriter {
            writer: csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(inner),
            original_header,
        }
    }
}

impl<W: Write> RowWriter for MafAnnotateWriter<W> {
    type Row = MafRow;

    fn write_header(&mut self) -> Result<()> {
        let mut header = self.original_header.clone();
        header.extend(VIBE_SUFFIX_COLUMNS.iter().map(|s| s.to_string()));
        self.writer.write_record(&header).context("failed to write MAF output header")?;
        Ok(())
    }

    fn write_row(&mut self, row: &MafRow) -> Result<()> {
        let mut fields = row.original_fields.clone();
        match &row.best_annotation {
            Some(a) => {
                fields.push(a.gene_symbol.clone().unwrap_or_default());
                fields.push(a.consequence.clone());
                fields.push(variant_classification(a, row.variant_kind));
                fields.push(a.transcript_id.clone().unwrap_or_default());
                fields.push(a.hgvsc.clone());
                fields.push(a.hgvsp.clone());
                fields.push(crate::codon::hgvsp_to_short(&a.hgvsp));
            }
            None => fields.extend(std::iter::repeat(String::new()).take(VIBE_SUFFIX_COLUMNS.len())),
        }
        self.writer.write_record(&fields).context("failed to write MAF output row")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush MAF output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn annotation() -> Annotation {
        Annotation {
            allele: "A".to_string(),
            consequence: "missense_variant".to_string(),
            impact: crate::consequence::Impact::Moderate,
            gene_id: Some("ENSG1".to_string()),
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
    fn appends_seven_vibe_columns_after_original_header() {
        let mut buf = Vec::new();
        let original_header = vec!["Chromosome".to_string(), "Start_Position".to_string()];
        {
            let mut writer = MafAnnotateWriter::new(&mut buf, original_header);
            writer.write_header().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let header_line = text.lines().next().unwrap();
        let columns: Vec<&str> = header_line.split('\t').collect();
        assert_eq!(columns.len(), 9);
        assert_eq!(&columns[2..], VIBE_SUFFIX_COLUMNS);
    }

    #[test]
    fn original_fields_pass_through_byte_exact() {
        let mut buf = Vec::new();
        {
            let mut writer = MafAnnotateWriter::new(&mut buf, vec!["Chromosome".to_string()]);
            writer
                .write_row(&MafRow {
                    original_fields: vec!["chr12".to_string()],
                    best_annotation: Some(annotation()),
                    variant_kind: VariantKind::Snv,
                })
                .unwrap();
            writer.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let fields: Vec<&str> = text.trim_end().split('\t').collect();
        assert_eq!(fields[0], "chr12");
        assert_eq!(fields[1], "KRAS");
        assert_eq!(fields[6], "p.G12C");
    }
}
