//! VCF output: header passthrough plus a synthesized `CSQ` INFO field
//! (spec.md 6).

use anyhow::{Context, Result};
use std::io::Write;

use crate::writer::RowWriter;

/// The fixed leading fields of every `CSQ=` entry, in order (spec.md 6).
/// Registered `AnnotationSource`s append their own sub-fields after these.
const CSQ_FIELDS: &[&str] = &[
    "Allele",
    "Consequence",
    "IMPACT",
    "SYMBOL",
    "Gene",
    "Feature_type",
    "Feature",
    "BIOTYPE",
    "EXON",
    "INTRON",
    "HGVSc",
    "HGVSp",
    "cDNA_position",
    "CDS_position",
    "Protein_position",
    "Amino_acids",
    "Codons",
    "CANONICAL",
];

/// One already-coalesced output row: a `(CHROM, POS)` with every ALT that
/// shared it merged, carrying one `CSQ=` entry string per (allele,
/// transcript) pair (spec.md 6: "Multiple rows for the same (CHROM,POS)
/// coalesce into one output row with merged ALTs").
#[derive(Debug, Clone)]
pub struct VcfRow {
    pub chrom: String,
    pub pos: i64,
    pub id: String,
    pub reference: String,
    /// Comma-joined, merged across coalesced input rows.
    pub alt: String,
    /// `None` renders as `.` (spec.md 6: `QUAL` of `0` also renders as `.`).
    pub qual: Option<f64>,
    pub filter: String,
    /// Original INFO field with any prior `CSQ=...;` entry already stripped.
    pub info_without_csq: String,
    pub format_and_samples: Option<String>,
    /// Fully-built `Allele|Consequence|...` strings, one per transcript hit,
    /// joined with `,` by the writer.
    pub csq_entries: Vec<String>,
}

/// Builds one `CSQ=` entry from an engine annotation plus auxiliary source
/// columns, in `CSQ_FIELDS` order followed by the auxiliary values.
pub fn build_csq_entry(annotation: &crate::annotate::Annotation, aux_values_in_registration_order: &[String]) -> String {
    let fixed = [
        annotation.allele.clone(),
        annotation.consequence.clone(),
        annotation.impact.as_str().to_string(),
        annotation.gene_symbol.clone().unwrap_or_default(),
        annotation.gene_id.clone().unwrap_or_default(),
        "Transcript".to_string(),
        annotation.transcript_id.clone().unwrap_or_default(),
        annotation.biotype.clone().unwrap_or_default(),
        annotation.exon.clone().unwrap_or_default(),
        annotation.intron.clone().unwrap_or_default(),
        annotation.hgvsc.clone(),
        annotation.hgvsp.clone(),
        annotation.cdna_position.map(|p| p.to_string()).unwrap_or_default(),
        annotation.cds_position.map(|p| p.to_string()).unwrap_or_default(),
        annotation.protein_position.map(|p| p.to_string()).unwrap_or_default(),
        annotation.amino_acids.clone().unwrap_or_default(),
        annotation.codons.clone().unwrap_or_default(),
        if annotation.canonical { "YES".to_string() } else { String::new() },
    ];
    fixed.into_iter().chain(aux_values_in_registration_order.iter().cloned()).collect::<Vec<_>>().join("|")
}

/// Strips a pre-existing `CSQ=...` entry out of an INFO field, preserving
/// every other `key=value`/flag entry and its original ordering.
pub fn strip_csq(info: &str) -> String {
    info.split(';').filter(|field| !field.starts_with("CSQ=")).collect::<Vec<_>>().join(";")
}

pub struct VcfWriter<W: Write> {
    inner: W,
    original_header_lines: Vec<String>,
    csq_format_description: String,
}

impl<W: Write> VcfWriter<W> {
    pub fn new(inner: W, original_header_lines: Vec<String>, auxiliary_fields_in_registration_order: &[&str]) -> Self {
        let mut fields: Vec<&str> = CSQ_FIELDS.to_vec();
        fields.extend(auxiliary_fields_in_registration_order);
        VcfWriter {
            inner,
            original_header_lines,
            csq_format_description: fields.join("|"),
        }
    }
}

impl<W: Write> RowWriter for VcfWriter<W> {
    type Row = VcfRow;

    fn write_header(&mut self) -> Result<()> {
        let csq_info_line = format!(
            "##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Consequence annotations: {}\">",
            self.csq_format_description
        );
        let mut inserted = false;
        for line in &self.original_header_lines {
            if !inserted && line.starts_with("#CHROM") {
                writeln!(self.inner, "{csq_info_line}").context("failed to write CSQ header line")?;
                inserted = true;
            }
            writeln!(self.inner, "{line}").context("failed to write VCF header line")?;
        }
        if !inserted {
            writeln!(self.inner, "{csq_info_line}").context("failed to write CSQ header line")?;
        }
        Ok(())
    }

    fn write_row(&mut self, row: &VcfRow) -> Result<()> {
        let qual = match row.qual {
            Some(q) if q != 0.0 => q.to_string(),
            _ => ".".to_string(),
        };
        let csq = row.csq_entries.join(",");
        let info = if row.info_without_csq.is_empty() {
            format!("CSQ={csq}")
        } else {
            format!("{};CSQ={csq}", row.info_without_csq)
        };
        let mut fields = vec![
            row.chrom.clone(),
            row.pos.to_string(),
            row.id.clone(),
            row.reference.clone(),
            row.alt.clone(),
            qual,
            row.filter.clone(),
            info,
        ];
        if let Some(rest) = &row.format_and_samples {
            fields.push(rest.clone());
        }
        writeln!(self.inner, "{}", fields.join("\t")).context("failed to write VCF data row")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush().context("failed to flush VCF output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn annotation() -> crate::annotate::Annotation {
        crate::annotate::Annotation {
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
    fn strip_csq_removes_only_the_csq_field() {
        assert_eq!(strip_csq("DP=10;CSQ=old;AF=0.5"), "DP=10;AF=0.5");
        assert_eq!(strip_csq("CSQ=old"), "");
    }

    #[test]
    fn qual_of_zero_renders_as_dot() {
        let mut buf = Vec::new();
        let mut writer = VcfWriter::new(&mut buf, vec!["#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO".to_string()], &[]);
        writer.write_header().unwrap();
        writer
            .write_row(&VcfRow {
                chrom: "12".to_string(),
                pos: 25245351,
                id: ".".to_string(),
                reference: "C".to_string(),
                alt: "A".to_string(),
                qual: Some(0.0),
                filter: "PASS".to_string(),
                info_without_csq: String::new(),
                format_and_samples: None,
                csq_entries: vec![build_csq_entry(&annotation(), &[])],
            })
            .unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(buf).unwrap();
        let data_line = text.lines().last().unwrap();
        let fields: Vec<&str> = data_line.split('\t').collect();
        assert_eq!(fields[5], ".");
        assert!(fields[7].starts_with("CSQ=A|missense_variant|MODERATE"));
    }

    #[test]
    fn csq_info_line_is_inserted_immediately_before_chrom_line() {
        let mut buf = Vec::new();
        let mut writer = VcfWriter::new(
            &mut buf,
            vec!["##fileformat=VCFv4.2".to_string(), "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO".to_string()],
            &[],
        );
        writer.write_header().unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "##fileformat=VCFv4.2");
        assert!(lines[1].starts_with("##INFO=<ID=CSQ"));
        assert!(lines[2].starts_with("#CHROM"));
    }
}
