//! VCF→MAF conversion output: 29 fixed MAF columns (spec.md 6).

use anyhow::{Context, Result};
use std::io::Write;

use crate::annotate::Annotation;
use crate::consequence::so_to_maf_classification;
use crate::variant::MafAllele;
use crate::writer::RowWriter;

const HEADER: &[&str] = &[
    "Hugo_Symbol",
    "Chromosome",
    "Start_Position",
    "End_Position",
    "Strand",
    "Variant_Classification",
    "Variant_Type",
    "Reference_Allele",
    "Tumor_Seq_Allele1",
    "Tumor_Seq_Allele2",
    "dbSNP_RS",
    "dbSNP_Val_Status",
    "Tumor_Sample_Barcode",
    "Matched_Norm_Sample_Barcode",
    "Match_Norm_Seq_Allele1",
    "Match_Norm_Seq_Allele2",
    "Sequencer",
    "Transcript_ID",
    "Exon_Number",
    "Consequence",
    "HGVSc",
    "HGVSp",
    "HGVSp_Short",
    "cDNA_position",
    "CDS_position",
    "Protein_position",
    "Amino_acids",
    "IMPACT",
    "Codons",
];

pub struct Vcf2MafRow {
    pub allele: MafAllele,
    pub tumor_sample_barcode: String,
    pub best_annotation: Option<Annotation>,
}

pub struct Vcf2MafWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> Vcf2MafWriter<W> {
    pub fn new(inner: W) -> Self {
        Vcf2MafWriter {
            writer: csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(inner),
        }
    }
}

impl<W: Write> RowWriter for Vcf2MafWriter<W> {
    type Row = Vcf2MafRow;

    fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(HEADER).context("failed to write vcf2maf header")?;
        Ok(())
    }

    fn write_row(&mut self, row: &Vcf2MafRow) -> Result<()> {
        let a = row.best_annotation.as_ref();
        let variant_type = row.allele.variant_type();
        let classification = a.map(|a| {
            let primary = a.primary_consequence();
            let base = so_to_maf_classification(primary);
            match (base, variant_type) {
                ("Frame_Shift_Del", "INS") => "Frame_Shift_Ins",
                ("In_Frame_Del", "INS") => "In_Frame_Ins",
                _ => base,
            }
            .to_string()
        });

        let fields: Vec<String> = vec![
            a.and_then(|a| a.gene_symbol.clone()).unwrap_or_default(),
            row.allele.chrom.clone(),
            row.allele.start.to_string(),
            row.allele.end.to_string(),
            "+".to_string(),
            classification.unwrap_or_default(),
            variant_type.to_string(),
            row.allele.reference.clone(),
            row.allele.reference.clone(),
            row.allele.alternate.clone(),
            String::new(),
            String::new(),
            row.tumor_sample_barcode.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            a.and_then(|a| a.transcript_id.clone()).unwrap_or_default(),
            a.and_then(|a| a.exon.clone()).unwrap_or_default(),
            a.map(|a| a.consequence.clone()).unwrap_or_default(),
            a.map(|a| a.hgvsc.clone()).unwrap_or_default(),
            a.map(|a| a.hgvsp.clone()).unwrap_or_default(),
            a.map(|a| crate::codon::hgvsp_to_short(&a.hgvsp)).unwrap_or_default(),
            a.and_then(|a| a.cdna_position).map(|p| p.to_string()).unwrap_or_default(),
            a.and_then(|a| a.cds_position).map(|p| p.to_string()).unwrap_or_default(),
            a.and_then(|a| a.protein_position).map(|p| p.to_string()).unwrap_or_default(),
            a.and_then(|a| a.amino_acids.clone()).unwrap_or_default(),
            a.map(|a| a.impact.as_str().to_string()).unwrap_or_default(),
            a.and_then(|a| a.codons.clone()).unwrap_or_default(),
        ];
        self.writer.write_record(&fields).context("failed to write vcf2maf row")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush vcf2maf output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_29_columns_ending_in_codons() {
        assert_eq!(HEADER.len(), 29);
        assert_eq!(HEADER[0], "Hugo_Symbol");
        assert_eq!(*HEADER.last().unwrap(), "Codons");
    }

    /// spec.md 8, scenario 6.
    #[test]
    fn insertion_row_matches_spec_scenario_6() {
        let mut buf = Vec::new();
        let mut writer = Vcf2MafWriter::new(&mut buf);
        writer.write_header().unwrap();
        writer
            .write_row(&Vcf2MafRow {
                allele: MafAllele {
                    chrom: "1".to_string(),
                    start: 100,
                    end: 101,
                    reference: "-".to_string(),
                    alternate: "TG".to_string(),
                },
                tumor_sample_barcode: "SAMPLE1".to_string(),
                best_annotation: None,
            })
            .unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(buf).unwrap();
        let data_line = text.lines().nth(1).unwrap();
        let fields: Vec<&str> = data_line.split('\t').collect();
        assert_eq!(fields[2], "100");
        assert_eq!(fields[3], "101");
        assert_eq!(fields[6], "INS");
        assert_eq!(fields[7], "-");
        assert_eq!(fields[9], "TG");
    }
}
