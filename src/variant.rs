//! Variant representation, canonicalization, and the VCF<->MAF allele
//! convention conversions (spec.md 3, 4.3.2).

use serde::{Deserialize, Serialize};

/// A variant in VCF convention: `reference`/`alternate` may share a leading
/// anchor base for insertions/deletions (spec.md 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub chrom: String,
    /// 1-based start position, VCF convention.
    pub pos: i64,
    pub reference: String,
    pub alternate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Snv,
    Mnv,
    Insertion,
    Deletion,
    Delins,
}

/// The variant after left-trimming the shared prefix between `reference` and
/// `alternate` (spec.md 4.3.2). The original VCF `pos` is not mutated
/// elsewhere; this is purely the internal form used for position math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalVariant {
    pub chrom: String,
    /// Original VCF position, preserved for output.
    pub original_pos: i64,
    /// Position of the leftmost differing base, after prefix trimming.
    pub pos: i64,
    pub reference: String,
    pub alternate: String,
    pub kind: VariantKind,
}

impl Variant {
    /// Left-trims the shared prefix between reference and alternate, then
    /// classifies the resulting shape (spec.md 4.3.2).
    pub fn canonicalize(&self) -> CanonicalVariant {
        let ref_bytes: Vec<char> = self.reference.chars().collect();
        let alt_bytes: Vec<char> = self.alternate.chars().collect();

        let mut trim = 0usize;
        while trim < ref_bytes.len()
            && trim < alt_bytes.len()
            && ref_bytes[trim].eq_ignore_ascii_case(&alt_bytes[trim])
            // Never trim away the only base of a pure SNV-shaped pair.
            && !(trim + 1 == ref_bytes.len() && trim + 1 == alt_bytes.len())
        {
            trim += 1;
        }

        let reference: String = ref_bytes[trim..].iter().collect();
        let alternate: String = alt_bytes[trim..].iter().collect();
        let pos = self.pos + trim as i64;

        let kind = classify(&reference, &alternate);

        CanonicalVariant {
            chrom: self.chrom.clone(),
            original_pos: self.pos,
            pos,
            reference,
            alternate,
            kind,
        }
    }

    /// Length-based SNV/indel predicate (spec.md 3): true for anything whose
    /// canonical reference and alternate lengths differ.
    pub fn is_indel(&self) -> bool {
        let c = self.canonicalize();
        c.reference.len() != c.alternate.len()
    }

    /// Converts a VCF-convention indel into MAF convention: insertions get
    /// `-` as the reference allele, deletions get `-` as the alternate,
    /// with positions shifted to exclude the shared anchor base (spec.md 3,
    /// 6; worked example in spec.md 8 scenario 6).
    pub fn to_maf_convention(&self) -> MafAllele {
        let c = self.canonicalize();
        match c.kind {
            VariantKind::Insertion => MafAllele {
                chrom: c.chrom,
                start: self.pos,
                end: self.pos + 1,
                reference: "-".to_string(),
                alternate: c.alternate,
            },
            VariantKind::Deletion => MafAllele {
                chrom: c.chrom,
                start: c.pos,
                end: c.pos + c.reference.len() as i64 - 1,
                reference: c.reference,
                alternate: "-".to_string(),
            },
            _ => MafAllele {
                chrom: c.chrom,
                start: c.pos,
                end: c.pos + c.reference.len().max(1) as i64 - 1,
                reference: c.reference,
                alternate: c.alternate,
            },
        }
    }
}

/// A variant in MAF allele convention (insertions: ref=`-`; deletions:
/// alt=`-`), plus the `prefix_base` needed to reconstruct VCF form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MafAllele {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub reference: String,
    pub alternate: String,
}

impl MafAllele {
    /// Reconstructs the VCF-convention variant given the single anchor base
    /// adjacent to the MAF span (spec.md 8, round-trip law; scenario 2).
    pub fn to_vcf_convention(&self, prefix_base: char) -> Variant {
        if self.reference == "-" {
            Variant {
                chrom: self.chrom.clone(),
                pos: self.start,
                reference: prefix_base.to_string(),
                alternate: format!("{prefix_base}{}", self.alternate),
            }
        } else if self.alternate == "-" {
            Variant {
                chrom: self.chrom.clone(),
                pos: self.start - 1,
                reference: format!("{prefix_base}{}", self.reference),
                alternate: prefix_base.to_string(),
            }
        } else {
            Variant {
                chrom: self.chrom.clone(),
                pos: self.start,
                reference: self.reference.clone(),
                alternate: self.alternate.clone(),
            }
        }
    }

    pub fn variant_type(&self) -> &'static str {
        let ref_len = if self.reference == "-" { 0 } else { self.reference.len() };
        let alt_len = if self.alternate == "-" { 0 } else { self.alternate.len() };
        if ref_len == 0 {
            "INS"
        } else if alt_len == 0 {
            "DEL"
        } else if ref_len == alt_len {
            match ref_len {
                1 => "SNP",
                2 => "DNP",
                3 => "TNP",
                _ => "ONP",
            }
        } else {
            "ONP"
        }
    }
}

fn classify(reference: &str, alternate: &str) -> VariantKind {
    match (reference.len(), alternate.len()) {
        (0, _) => VariantKind::Insertion,
        (_, 0) => VariantKind::Deletion,
        (r, a) if r == a && r == 1 => VariantKind::Snv,
        (r, a) if r == a => VariantKind::Mnv,
        _ => VariantKind::Delins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snv_is_not_trimmed() {
        let v = Variant {
            chrom: "12".to_string(),
            pos: 25245351,
            reference: "C".to_string(),
            alternate: "A".to_string(),
        };
        let c = v.canonicalize();
        assert_eq!(c.kind, VariantKind::Snv);
        assert_eq!(c.pos, 25245351);
        assert_eq!(c.reference, "C");
        assert_eq!(c.alternate, "A");
    }

    #[test]
    fn insertion_trims_shared_prefix_and_classifies() {
        let v = Variant {
            chrom: "1".to_string(),
            pos: 100,
            reference: "A".to_string(),
            alternate: "ATG".to_string(),
        };
        let c = v.canonicalize();
        assert_eq!(c.kind, VariantKind::Insertion);
        assert_eq!(c.pos, 101);
        assert_eq!(c.reference, "");
        assert_eq!(c.alternate, "TG");
    }

    #[test]
    fn vcf_to_maf_insertion_matches_spec_scenario_6() {
        let v = Variant {
            chrom: "1".to_string(),
            pos: 100,
            reference: "A".to_string(),
            alternate: "ATG".to_string(),
        };
        let maf = v.to_maf_convention();
        assert_eq!(maf.start, 100);
        assert_eq!(maf.end, 101);
        assert_eq!(maf.reference, "-");
        assert_eq!(maf.alternate, "TG");
        assert_eq!(maf.variant_type(), "INS");
    }

    #[test]
    fn maf_deletion_round_trips_to_vcf_matches_spec_scenario_2() {
        let maf = MafAllele {
            chrom: "1".to_string(),
            start: 101,
            end: 102,
            reference: "CG".to_string(),
            alternate: "-".to_string(),
        };
        let vcf = maf.to_vcf_convention('A');
        assert_eq!(vcf.pos, 100);
        assert_eq!(vcf.reference, "ACG");
        assert_eq!(vcf.alternate, "A");
    }

    #[test]
    fn vcf_deletion_to_maf_and_back_preserves_variant() {
        let v = Variant {
            chrom: "1".to_string(),
            pos: 100,
            reference: "ACG".to_string(),
            alternate: "A".to_string(),
        };
        let maf = v.to_maf_convention();
        let back = maf.to_vcf_convention('A');
        assert_eq!(back, v);
    }

    #[test]
    fn is_indel_is_length_based() {
        let snv = Variant {
            chrom: "1".to_string(),
            pos: 1,
            reference: "A".to_string(),
            alternate: "G".to_string(),
        };
        assert!(!snv.is_indel());

        let del = Variant {
            chrom: "1".to_string(),
            pos: 1,
            reference: "AT".to_string(),
            alternate: "A".to_string(),
        };
        assert!(del.is_indel());
    }
}
