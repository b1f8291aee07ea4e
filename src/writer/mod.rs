//! Output writers (spec.md 6, 9 "Polymorphic writer"): one capability set,
//! one impl per emitted format. Expressed as a trait with an associated
//! `Row` type rather than an inheritance hierarchy, per spec.md 9.

mod compare;
mod maf;
mod tab;
mod vcf;
mod vcf2maf;

pub use compare::{CompareRow, CompareWriter};
pub use maf::MafAnnotateWriter;
pub use tab::{TabRow, TabWriter};
pub use vcf::{build_csq_entry, strip_csq, VcfRow, VcfWriter};
pub use vcf2maf::{Vcf2MafRow, Vcf2MafWriter};

use anyhow::Result;

/// The capability set every output format implements: a header, one row at a
/// time, and an explicit flush. `Row` is the format's own row shape so each
/// writer can pick whatever representation (a serde struct, a `Vec<String>`)
/// suits its serialization.
pub trait RowWriter {
    type Row;

    fn write_header(&mut self) -> Result<()>;
    fn write_row(&mut self, row: &Self::Row) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}
