//! Minimal MAF row reader: required/optional column lookup by header name
//! (spec.md 6).

use std::collections::HashMap;

use crate::maf_annotation::MAFAnnotation;
use crate::variant::{MafAllele, Variant};

/// A parsed MAF header: column name -> index, so callers can look up
/// optional columns without caring about their position.
#[derive(Debug, Clone)]
pub struct MafHeader {
    index_by_name: HashMap<String, usize>,
}

impl MafHeader {
    pub fn parse(line: &str) -> Self {
        let index_by_name = line.split('\t').enumerate().map(|(i, name)| (name.to_string(), i)).collect();
        MafHeader { index_by_name }
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.index_by_name.get(column).copied()
    }
}

fn field<'a>(fields: &'a [&str], header: &MafHeader, column: &str) -> Option<&'a str> {
    header.index_of(column).and_then(|i| fields.get(i)).copied().filter(|s| !s.is_empty())
}

/// The variant encoded by a MAF row's required columns, plus the
/// pre-existing annotation carried in its optional columns (spec.md 6).
pub struct MafRowParse {
    pub allele: MafAllele,
    pub pre_existing: MAFAnnotation,
}

/// Parses one MAF data line into a `MafAllele` plus whatever pre-existing
/// annotation columns are present. Required columns: `Chromosome,
/// Start_Position, Reference_Allele, Tumor_Seq_Allele2` (spec.md 6).
pub fn parse_data_line(line: &str, header: &MafHeader) -> Option<MafRowParse> {
    let fields: Vec<&str> = line.split('\t').collect();

    let chrom = field(&fields, header, "Chromosome")?.to_string();
    let start: i64 = field(&fields, header, "Start_Position")?.parse().ok()?;
    let reference = field(&fields, header, "Reference_Allele")?.to_string();
    let alternate = field(&fields, header, "Tumor_Seq_Allele2")?.to_string();
    let end = field(&fields, header, "End_Position")
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| start + reference.len().max(1) as i64 - 1);

    let allele = MafAllele {
        chrom,
        start,
        end,
        reference,
        alternate,
    };

    let pre_existing = MAFAnnotation {
        gene_symbol: field(&fields, header, "Hugo_Symbol").map(str::to_string),
        consequence: field(&fields, header, "Consequence")
            .or_else(|| field(&fields, header, "Variant_Classification"))
            .map(str::to_string),
        hgvsp: field(&fields, header, "HGVSp_Short")
            .or_else(|| field(&fields, header, "HGVSp"))
            .map(str::to_string),
        transcript_id: field(&fields, header, "Transcript_ID").map(str::to_string),
        hgvsc: field(&fields, header, "HGVSc").map(str::to_string),
        variant_type: field(&fields, header, "Variant_Type").map(str::to_string),
        build: field(&fields, header, "NCBI_Build").map(str::to_string),
    };

    Some(MafRowParse { allele, pre_existing })
}

/// Recovers the VCF-convention variant from a MAF row, given the anchor base
/// adjacent to an indel's MAF span (spec.md 3, 8 round-trip law). Callers
/// typically read the anchor base from the reference FASTA.
pub fn to_vcf_variant(allele: &MafAllele, prefix_base: char) -> Variant {
    allele.to_vcf_convention(prefix_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_and_optional_columns_by_name_regardless_of_order() {
        let header = MafHeader::parse("Hugo_Symbol\tChromosome\tStart_Position\tEnd_Position\tReference_Allele\tTumor_Seq_Allele2\tConsequence");
        let line = "KRAS\t12\t25245351\t25245351\tC\tA\tmissense_variant";
        let parsed = parse_data_line(line, &header).unwrap();
        assert_eq!(parsed.allele.chrom, "12");
        assert_eq!(parsed.allele.start, 25245351);
        assert_eq!(parsed.pre_existing.gene_symbol.as_deref(), Some("KRAS"));
        assert_eq!(parsed.pre_existing.consequence.as_deref(), Some("missense_variant"));
    }

    #[test]
    fn missing_optional_columns_are_none() {
        let header = MafHeader::parse("Chromosome\tStart_Position\tReference_Allele\tTumor_Seq_Allele2");
        let line = "12\t25245351\tC\tA";
        let parsed = parse_data_line(line, &header).unwrap();
        assert_eq!(parsed.pre_existing.gene_symbol, None);
        assert_eq!(parsed.pre_existing.hgvsp, None);
    }
}
