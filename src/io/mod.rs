//! Row-level VCF/MAF readers (spec.md 6). Full tabular parsing is an
//! external-collaborator concern (spec.md 1, Non-goals); these cover exactly
//! the row shape the rest of the pipeline needs.

pub mod maf;
pub mod vcf;
