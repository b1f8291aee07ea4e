//! Reference data model: genes, transcripts, exons and CDS segments, held in
//! arenas and referenced by id rather than by pointer (see DESIGN.md, "cyclic
//! references between Gene and Transcript").

mod gene;

pub use gene::{CdsSegment, Exon, Gene, GeneId, Strand, Transcript, TranscriptId, PROTEIN_CODING_BIOTYPES};
