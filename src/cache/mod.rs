//! The cache loader: parses a gzipped gene model + optional gzipped FASTA of
//! protein-coding transcript sequences into a `ReferenceIndex` (spec.md 4.1).

mod fasta;
mod gtf;
mod loader;
mod overrides;

pub use loader::load_cache;
pub use overrides::CanonicalOverrides;
