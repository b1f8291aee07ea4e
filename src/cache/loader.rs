//! Builds a `ReferenceIndex` from a gzipped GTF-like gene model, an optional
//! gzipped FASTA of coding-transcript sequences, and an optional canonical-
//! overrides table (spec.md 4.1).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::cache::gtf::{self, GtfRecord};
use crate::cache::overrides::CanonicalOverrides;
use crate::error::CacheError;
use crate::index::{PositionIndex, ReferenceIndex};
use crate::model::{CdsSegment, Exon, Gene, GeneId, Strand, Transcript, TranscriptId};

/// FASTA-vs-CDS length disagreements up to this many bases are tolerated
/// (the trailing stop codon the FASTA may or may not include; spec.md 4.1).
const FASTA_LENGTH_TOLERANCE: i64 = 3;

fn open_gz(path: &Path) -> Result<BufReader<MultiGzDecoder<File>>, CacheError> {
    let file = File::open(path).map_err(|e| CacheError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufReader::new(MultiGzDecoder::new(file)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StrandRaw {
    Plus,
    Minus,
}

impl Default for StrandRaw {
    fn default() -> Self {
        StrandRaw::Plus
    }
}

impl From<StrandRaw> for Strand {
    fn from(s: StrandRaw) -> Self {
        match s {
            StrandRaw::Plus => Strand::Plus,
            StrandRaw::Minus => Strand::Minus,
        }
    }
}

#[derive(Default)]
struct GeneBuilder {
    gene_id: String,
    symbol: String,
    biotype: String,
    chrom: String,
    start: i64,
    end: i64,
    strand: StrandRaw,
}

#[derive(Default)]
struct TranscriptBuilder {
    transcript_id: String,
    gene_id: Option<String>,
    chrom: String,
    start: i64,
    end: i64,
    strand: StrandRaw,
    biotype: String,
    canonical: bool,
    exons: Vec<Exon>,
    /// Raw genomic (start, end) pairs from CDS + stop_codon features; merged
    /// and sorted during finalization.
    cds_raw: Vec<(i64, i64)>,
}

/// Loads the reference index. `fasta_path` and `overrides` are optional, as
/// the cache can serve nucleotide-only annotation without a FASTA.
pub fn load_cache(
    gene_model_path: &Path,
    fasta_path: Option<&Path>,
    overrides: Option<&CanonicalOverrides>,
) -> Result<ReferenceIndex, CacheError> {
    let reader = open_gz(gene_model_path)?;
    let source_name = gene_model_path.display().to_string();

    let mut genes: HashMap<String, GeneBuilder> = HashMap::new();
    let mut transcripts: HashMap<String, TranscriptBuilder> = HashMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| CacheError::Io {
            path: source_name.clone(),
            source: e,
        })?;
        let Some(record) = gtf::parse_line(&line, line_no + 1)? else {
            continue;
        };
        ingest_record(&record, line_no + 1, &mut genes, &mut transcripts)?;
    }

    log::info!(
        "parsed gene model {}: {} genes, {} transcripts",
        source_name,
        genes.len(),
        transcripts.len()
    );

    let sequences = match fasta_path {
        Some(path) => {
            let reader = open_gz(path)?;
            crate::cache::fasta::read_all(reader)?
        }
        None => HashMap::new(),
    };

    let finalized = finalize_transcripts(transcripts, &sequences);
    let (genes, mut transcripts) = assign_ids(genes, finalized);
    apply_overrides(&mut transcripts, overrides);

    let mut builder = PositionIndex::builder();
    for t in &transcripts {
        let (span_start, span_end) = match t.gene_id {
            Some(gid) => {
                let gene = &genes[gid.0 as usize];
                (gene.start, gene.end)
            }
            None => (t.start, t.end),
        };
        builder.insert(&t.chrom, span_start, span_end, t.id);
    }

    Ok(ReferenceIndex::new(genes, transcripts, builder.build()))
}

fn ingest_record(
    record: &GtfRecord,
    line_no: usize,
    genes: &mut HashMap<String, GeneBuilder>,
    transcripts: &mut HashMap<String, TranscriptBuilder>,
) -> Result<(), CacheError> {
    match record.feature.as_str() {
        "gene" => {
            let gene_id = require_attr(record, "gene_id", line_no)?;
            let entry = genes.entry(gene_id.to_string()).or_default();
            entry.gene_id = gene_id.to_string();
            entry.symbol = record.attr("gene_name").unwrap_or(gene_id).to_string();
            entry.biotype = record.attr("gene_biotype").unwrap_or("").to_string();
            entry.chrom = record.seqname.clone();
            entry.start = record.start;
            entry.end = record.end;
            entry.strand = raw_strand(&record.strand);
        }
        "transcript" => {
            let transcript_id = require_attr(record, "transcript_id", line_no)?;
            let gene_id = record.attr("gene_id").map(|s| s.to_string());
            let entry = transcripts.entry(transcript_id.to_string()).or_default();
            entry.transcript_id = transcript_id.to_string();
            entry.gene_id = gene_id;
            entry.chrom = record.seqname.clone();
            entry.start = record.start;
            entry.end = record.end;
            entry.strand = raw_strand(&record.strand);
            entry.biotype = record.attr("transcript_biotype").unwrap_or("").to_string();
            entry.canonical = record.has_tag("Ensembl_canonical") || record.has_tag("MANE_Select");
        }
        "exon" => {
            let transcript_id = require_attr(record, "transcript_id", line_no)?;
            let number: u32 = record.attr("exon_number").and_then(|s| s.parse().ok()).unwrap_or(0);
            let entry = transcripts.entry(transcript_id.to_string()).or_default();
            fill_transcript_shell(entry, record);
            entry.exons.push(Exon {
                start: record.start,
                end: record.end,
                number,
            });
        }
        "CDS" | "start_codon" | "stop_codon" => {
            let transcript_id = require_attr(record, "transcript_id", line_no)?;
            let entry = transcripts.entry(transcript_id.to_string()).or_default();
            fill_transcript_shell(entry, record);
            entry.cds_raw.push((record.start, record.end));
        }
        _ => {}
    }
    Ok(())
}

fn raw_strand(s: &str) -> StrandRaw {
    if s == "-" {
        StrandRaw::Minus
    } else {
        StrandRaw::Plus
    }
}

/// Features other than `transcript` may be emitted before the `transcript`
/// row itself (emission order isn't assumed, spec.md 4.1); fill in the
/// transcript-level fields the first time any feature for it is seen so a
/// later or missing `transcript` row doesn't leave them empty.
fn fill_transcript_shell(entry: &mut TranscriptBuilder, record: &GtfRecord) {
    if entry.transcript_id.is_empty() {
        entry.transcript_id = record.attr("transcript_id").unwrap_or("").to_string();
        entry.gene_id = record.attr("gene_id").map(|s| s.to_string());
        entry.chrom = record.seqname.clone();
        entry.strand = raw_strand(&record.strand);
        entry.biotype = record.attr("transcript_biotype").unwrap_or("").to_string();
    }
}

fn require_attr<'a>(record: &'a GtfRecord, key: &str, line_no: usize) -> Result<&'a str, CacheError> {
    record.attr(key).filter(|s| !s.is_empty()).ok_or_else(|| {
        CacheError::Parse(
            "gene model".to_string(),
            line_no,
            format!("missing required attribute `{key}` on a {} feature", record.feature),
        )
    })
}

struct FinalTranscript {
    raw_gene_id: Option<String>,
    transcript: Transcript,
}

/// Merges overlapping/adjacent raw CDS+stop_codon intervals into segments,
/// sorts exons and segments in transcription order (descending genomic
/// coordinate on the minus strand), computes cumulative CDS offsets, and
/// attaches the coding sequence when one was found in the FASTA.
fn finalize_transcripts(
    transcripts: HashMap<String, TranscriptBuilder>,
    sequences: &HashMap<String, String>,
) -> Vec<FinalTranscript> {
    let mut entries: Vec<_> = transcripts.into_values().collect();
    entries.sort_by(|a, b| a.transcript_id.cmp(&b.transcript_id));

    let mut out = Vec::with_capacity(entries.len());
    for (idx, mut entry) in entries.into_iter().enumerate() {
        let id = TranscriptId(idx as u32);

        entry.cds_raw.sort();
        let merged = merge_intervals(&entry.cds_raw);

        let forward = entry.strand == StrandRaw::Plus;
        entry
            .exons
            .sort_by(|a, b| if forward { a.start.cmp(&b.start) } else { b.start.cmp(&a.start) });

        let mut cds_spans = merged;
        cds_spans.sort_by(|a, b| if forward { a.0.cmp(&b.0) } else { b.0.cmp(&a.0) });

        let mut cds = Vec::with_capacity(cds_spans.len());
        let mut offset: u64 = 0;
        for (start, end) in cds_spans {
            let len = (end - start + 1) as u64;
            cds.push(CdsSegment {
                start,
                end,
                cds_offset: offset,
            });
            offset += len;
        }

        let (start, end) = exon_span(&entry.exons, entry.start, entry.end);
        let transcript_id_str = entry.transcript_id.clone();
        let unversioned_id = crate::model::strip_version(&transcript_id_str).to_string();
        let cds_sequence = sequences.get(&transcript_id_str).cloned();

        if let Some(seq) = &cds_sequence {
            let cds_total: i64 = cds.iter().map(|s| s.len()).sum();
            let diff = (seq.len() as i64 - cds_total).abs();
            if diff > FASTA_LENGTH_TOLERANCE {
                log::warn!(
                    "transcript {transcript_id_str}: FASTA sequence length {} disagrees with summed CDS length {} by {} bases",
                    seq.len(),
                    cds_total,
                    diff
                );
            }
        }

        out.push(FinalTranscript {
            raw_gene_id: entry.gene_id,
            transcript: Transcript {
                id,
                transcript_id: transcript_id_str,
                unversioned_id,
                gene_id: None, // patched in assign_ids once GeneId values exist
                chrom: entry.chrom,
                start,
                end,
                strand: entry.strand.into(),
                biotype: entry.biotype,
                canonical: entry.canonical,
                exons: entry.exons,
                cds,
                cds_sequence,
            },
        });
    }
    out
}

fn merge_intervals(sorted: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut out: Vec<(i64, i64)> = Vec::new();
    for &(start, end) in sorted {
        if let Some(last) = out.last_mut() {
            if start <= last.1 + 1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        out.push((start, end));
    }
    out
}

fn exon_span(exons: &[Exon], fallback_start: i64, fallback_end: i64) -> (i64, i64) {
    if exons.is_empty() {
        return (fallback_start, fallback_end);
    }
    let start = exons.iter().map(|e| e.start).min().unwrap();
    let end = exons.iter().map(|e| e.end).max().unwrap();
    (start, end)
}

fn assign_ids(
    genes: HashMap<String, GeneBuilder>,
    finalized_transcripts: Vec<FinalTranscript>,
) -> (Vec<Gene>, Vec<Transcript>) {
    let mut gene_entries: Vec<_> = genes.into_values().collect();
    gene_entries.sort_by(|a, b| a.gene_id.cmp(&b.gene_id));

    let mut gene_index_by_raw_id: HashMap<String, usize> = HashMap::new();
    let mut built_genes = Vec::with_capacity(gene_entries.len());
    for (idx, g) in gene_entries.into_iter().enumerate() {
        gene_index_by_raw_id.insert(g.gene_id.clone(), idx);
        built_genes.push(Gene {
            id: GeneId(idx as u32),
            gene_id: g.gene_id,
            symbol: g.symbol,
            biotype: g.biotype,
            chrom: g.chrom,
            start: g.start,
            end: g.end,
            strand: g.strand.into(),
            transcripts: Vec::new(),
        });
    }

    let mut transcripts = Vec::with_capacity(finalized_transcripts.len());
    for FinalTranscript { raw_gene_id, mut transcript } in finalized_transcripts {
        if let Some(raw_gene_id) = raw_gene_id {
            if let Some(&gidx) = gene_index_by_raw_id.get(&raw_gene_id) {
                let gid = GeneId(gidx as u32);
                transcript.gene_id = Some(gid);
                built_genes[gidx].transcripts.push(transcript.id);
            } else {
                log::warn!(
                    "transcript {} references unknown gene {raw_gene_id}; keeping without gene linkage",
                    transcript.transcript_id
                );
            }
        }
        transcripts.push(transcript);
    }

    (built_genes, transcripts)
}

fn apply_overrides(transcripts: &mut [Transcript], overrides: Option<&CanonicalOverrides>) {
    let Some(overrides) = overrides else {
        return;
    };

    let by_versioned: HashMap<String, usize> = transcripts
        .iter()
        .enumerate()
        .map(|(i, t)| (t.transcript_id.clone(), i))
        .collect();
    let by_unversioned: HashMap<String, usize> = transcripts
        .iter()
        .enumerate()
        .map(|(i, t)| (t.unversioned_id.clone(), i))
        .collect();

    for (symbol, transcript_id) in overrides.iter() {
        let resolved = by_versioned
            .get(transcript_id)
            .or_else(|| by_unversioned.get(crate::model::strip_version(transcript_id)))
            .copied();

        match resolved {
            Some(winner_idx) => {
                let gene_id = transcripts[winner_idx].gene_id;
                for (i, t) in transcripts.iter_mut().enumerate() {
                    if t.gene_id == gene_id {
                        t.canonical = i == winner_idx;
                    }
                }
            }
            None => {
                log::warn!(
                    "canonical override for gene {symbol} references unknown transcript {transcript_id}"
                );
            }
        }
    }
}
