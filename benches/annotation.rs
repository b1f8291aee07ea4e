//! Benchmarks for the annotation engine's hot path: per-variant transcript
//! classification against a small in-memory reference index. Kept separate
//! from the crate's unit/integration tests (Cargo `[[bench]]` target) so
//! `cargo bench` doesn't run under the regular test harness.

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use vibe_vep::annotate::{annotate_variant, DEFAULT_FLANK_WINDOW};
use vibe_vep::cache::load_cache;
use vibe_vep::variant::Variant;

fn gz_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
    file
}

/// A single-exon KRAS-shaped fixture, the same shape used in
/// `tests/integration_test.rs`, reused here so the benchmark exercises a
/// realistic CDS-substitution path rather than an empty index.
fn kras_gene_model() -> &'static str {
    concat!(
        "12\tensembl\tgene\t25205246\t25250936\t.\t-\t.\tgene_id \"ENSG00000133703\"; gene_name \"KRAS\"; gene_biotype \"protein_coding\";\n",
        "12\tensembl\ttranscript\t25245274\t25245384\t.\t-\t.\tgene_id \"ENSG00000133703\"; transcript_id \"ENST00000311936.8\"; transcript_biotype \"protein_coding\"; tag \"Ensembl_canonical\";\n",
        "12\tensembl\texon\t25245274\t25245384\t.\t-\t.\tgene_id \"ENSG00000133703\"; transcript_id \"ENST00000311936.8\"; exon_number \"2\";\n",
        "12\tensembl\tCDS\t25245274\t25245384\t.\t-\t0\tgene_id \"ENSG00000133703\"; transcript_id \"ENST00000311936.8\"; exon_number \"2\";\n",
    )
}

fn kras_fasta() -> String {
    let mut seq = "A".repeat(33);
    seq.push_str("GGT");
    seq.push_str(&"A".repeat(75));
    format!(">ENST00000311936.8\n{seq}\n")
}

fn bench_annotate_missense(c: &mut Criterion) {
    let gm = gz_file(kras_gene_model());
    let fasta = gz_file(&kras_fasta());
    let index = load_cache(gm.path(), Some(fasta.path()), None).unwrap();

    let variant = Variant {
        chrom: "12".to_string(),
        pos: 25245351,
        reference: "C".to_string(),
        alternate: "A".to_string(),
    };

    c.bench_function("annotate_variant_missense", |b| {
        b.iter(|| annotate_variant(black_box(&index), black_box(&variant), DEFAULT_FLANK_WINDOW));
    });
}

fn bench_annotate_intergenic(c: &mut Criterion) {
    let gm = gz_file(kras_gene_model());
    let fasta = gz_file(&kras_fasta());
    let index = load_cache(gm.path(), Some(fasta.path()), None).unwrap();

    let variant = Variant {
        chrom: "12".to_string(),
        pos: 1,
        reference: "C".to_string(),
        alternate: "A".to_string(),
    };

    c.bench_function("annotate_variant_intergenic", |b| {
        b.iter(|| annotate_variant(black_box(&index), black_box(&variant), DEFAULT_FLANK_WINDOW));
    });
}

criterion_group!(benches, bench_annotate_missense, bench_annotate_intergenic);
criterion_main!(benches);
