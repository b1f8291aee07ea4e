//! Per-transcript consequence classification (spec.md 4.3.3) and the
//! variant-level orchestration that ties position lookup, HGVS construction
//! and impact composition together (spec.md 4.3.1).

use std::collections::HashMap;

use crate::annotate::hgvs::{build_hgvsc, indel_effect, substitution_effect, ProteinEffect};
use crate::annotate::position::{cdna_pos, locate, Locus};
use crate::annotate::Annotation;
use crate::consequence::{compose_consequence, impact_of};
use crate::index::ReferenceIndex;
use crate::model::Transcript;
use crate::variant::{CanonicalVariant, Variant, VariantKind};

/// Default upstream/downstream window in base pairs (spec.md 4.3.3.1),
/// overridable via CLI/`Config`.
pub const DEFAULT_FLANK_WINDOW: i64 = 5000;

/// Annotates a variant against every transcript the reference index reports
/// overlapping (gene body or flank window), falling back to a single
/// `intergenic_variant` annotation when nothing overlaps at all (spec.md
/// 4.3.1).
pub fn annotate_variant(index: &ReferenceIndex, variant: &Variant, flank_window: i64) -> Vec<Annotation> {
    let canonical = variant.canonicalize();
    let ref_len = canonical.reference.len().max(1) as i64;
    let span_start = canonical.pos - flank_window;
    let span_end = canonical.pos + ref_len - 1 + flank_window;

    let transcripts = index.transcripts_overlapping_range(&variant.chrom, span_start, span_end);
    if transcripts.is_empty() {
        return vec![intergenic(variant)];
    }

    transcripts
        .into_iter()
        .map(|t| annotate_transcript(index, t, variant, &canonical, flank_window))
        .collect()
}

fn intergenic(variant: &Variant) -> Annotation {
    Annotation {
        allele: variant.alternate.clone(),
        consequence: "intergenic_variant".to_string(),
        impact: impact_of("intergenic_variant"),
        gene_id: None,
        gene_symbol: None,
        transcript_id: None,
        biotype: None,
        exon: None,
        intron: None,
        hgvsc: String::new(),
        hgvsp: String::new(),
        cdna_position: None,
        cds_position: None,
        protein_position: None,
        amino_acids: None,
        codons: None,
        canonical: false,
        extra: HashMap::new(),
    }
}

fn annotate_transcript(
    index: &ReferenceIndex,
    transcript: &Transcript,
    variant: &Variant,
    canonical: &CanonicalVariant,
    flank_window: i64,
) -> Annotation {
    let (gene_id, gene_symbol) = match transcript.gene_id {
        Some(gid) => {
            let gene = index.gene(gid);
            (Some(gene.gene_id.clone()), Some(gene.symbol.clone()))
        }
        None => (None, None),
    };

    let locus = locate(transcript, canonical.pos);
    let (mut terms, effect) = classify(transcript, canonical, &locus, flank_window);
    if terms.is_empty() {
        terms.push("coding_sequence_variant".to_string());
    }

    let consequence = {
        let mut refs: Vec<&str> = terms.iter().map(|s| s.as_str()).collect();
        compose_consequence(&mut refs)
    };
    let impact = impact_of(crate::consequence::primary_term(&consequence));

    let hgvsc = build_hgvsc(transcript, canonical);
    let cdna_position = cdna_pos(transcript, canonical.pos);
    let (protein_position, hgvsp, amino_acids, codons) = match &effect {
        Some(e) => (e.protein_position, e.hgvsp.clone(), e.amino_acids.clone(), e.codons.clone()),
        None => (None, String::new(), None, None),
    };
    let cds_position = match locus {
        Locus::Cds { offset } => Some(offset as i64 + 1),
        _ => None,
    };

    let (exon, intron) = exon_intron_ordinals(transcript, canonical.pos, &locus);

    Annotation {
        allele: variant.alternate.clone(),
        consequence,
        impact,
        gene_id,
        gene_symbol,
        transcript_id: Some(transcript.transcript_id.clone()),
        biotype: Some(transcript.biotype.clone()),
        exon,
        intron,
        hgvsc,
        hgvsp,
        cdna_position,
        cds_position,
        protein_position,
        amino_acids,
        codons,
        canonical: transcript.canonical,
        extra: HashMap::new(),
    }
}

fn exon_intron_ordinals(transcript: &Transcript, pos: i64, locus: &Locus) -> (Option<String>, Option<String>) {
    let total_exons = transcript.exons.len();
    let total_introns = total_exons.saturating_sub(1);
    match locus {
        Locus::Intron { upstream_exon, .. } => (None, Some(format!("{upstream_exon}/{total_introns}"))),
        Locus::Upstream { .. } | Locus::Downstream { .. } => (None, None),
        _ => {
            let ordinal = transcript.exons.iter().find(|e| e.contains(pos)).map(|e| e.number);
            (ordinal.map(|n| format!("{n}/{total_exons}")), None)
        }
    }
}

/// A transcript is degraded to nucleotide-only annotation (spec.md 4.3.5)
/// when it's declared protein-coding but the cache couldn't attach a usable
/// coding sequence, or the sequence length isn't a multiple of 3.
fn is_degraded_coding(transcript: &Transcript) -> bool {
    transcript.is_protein_coding()
        && (!transcript.has_coding_sequence() || transcript.cds_len() % 3 != 0)
}

/// Returns the composed SO terms plus, for CDS loci, the protein-level
/// effect (spec.md 4.3.3 steps 1-2).
fn classify(
    transcript: &Transcript,
    canonical: &CanonicalVariant,
    locus: &Locus,
    flank_window: i64,
) -> (Vec<String>, Option<ProteinEffect>) {
    match *locus {
        Locus::Cds { offset } => classify_cds(transcript, canonical, offset),
        Locus::Utr5 => (vec!["5_prime_UTR_variant".to_string()], None),
        Locus::Utr3 => (vec!["3_prime_UTR_variant".to_string()], None),
        Locus::NonCodingExon => (vec!["non_coding_transcript_exon_variant".to_string()], None),
        Locus::Intron {
            dist_from_donor,
            dist_from_acceptor,
            ..
        } => classify_intron(dist_from_donor, dist_from_acceptor),
        Locus::Upstream { distance } => {
            if distance <= flank_window {
                (vec!["upstream_gene_variant".to_string()], None)
            } else {
                (vec![], None)
            }
        }
        Locus::Downstream { distance } => {
            if distance <= flank_window {
                (vec!["downstream_gene_variant".to_string()], None)
            } else {
                (vec![], None)
            }
        }
    }
}

fn classify_intron(dist_from_donor: i64, dist_from_acceptor: i64) -> (Vec<String>, Option<ProteinEffect>) {
    if dist_from_donor <= 2 {
        (vec!["splice_donor_variant".to_string()], None)
    } else if dist_from_acceptor <= 2 {
        (vec!["splice_acceptor_variant".to_string()], None)
    } else if dist_from_donor <= 8 || dist_from_acceptor <= 8 {
        (
            vec!["intron_variant".to_string(), "splice_region_variant".to_string()],
            None,
        )
    } else {
        (vec!["intron_variant".to_string()], None)
    }
}

fn classify_cds(
    transcript: &Transcript,
    canonical: &CanonicalVariant,
    offset: u64,
) -> (Vec<String>, Option<ProteinEffect>) {
    if is_degraded_coding(transcript) {
        log::warn!(
            "transcript {}: degrading to coding_sequence_variant (missing or malformed coding sequence)",
            transcript.transcript_id
        );
        return (vec!["coding_sequence_variant".to_string()], None);
    }

    match canonical.kind {
        VariantKind::Snv | VariantKind::Mnv => classify_substitution(transcript, canonical, offset),
        VariantKind::Insertion | VariantKind::Deletion | VariantKind::Delins => {
            classify_indel(transcript, canonical, offset)
        }
    }
}

fn classify_substitution(
    transcript: &Transcript,
    canonical: &CanonicalVariant,
    offset: u64,
) -> (Vec<String>, Option<ProteinEffect>) {
    let Some(effect) = substitution_effect(transcript, canonical, offset) else {
        return (vec!["coding_sequence_variant".to_string()], None);
    };

    let codon_index = (offset / 3) as i64;
    let (old_aa, new_aa) = match aa_pair_from_effect(&effect) {
        Some(pair) => pair,
        None => return (vec!["coding_sequence_variant".to_string()], Some(effect)),
    };

    let term = if codon_index == 0 && old_aa == 'M' && new_aa != 'M' {
        "start_lost"
    } else if old_aa != '*' && new_aa == '*' {
        "stop_gained"
    } else if old_aa == '*' && new_aa == '*' {
        "stop_retained_variant"
    } else if old_aa == '*' && new_aa != '*' {
        "stop_lost"
    } else if old_aa == new_aa {
        "synonymous_variant"
    } else {
        "missense_variant"
    };

    (vec![term.to_string()], Some(effect))
}

/// Recovers the wildtype/mutant amino acids from a `ProteinEffect`'s
/// `amino_acids` field (`G/C` or bare `G` for synonymous/stop-retained).
fn aa_pair_from_effect(effect: &ProteinEffect) -> Option<(char, char)> {
    let aas = effect.amino_acids.as_deref()?;
    match aas.split_once('/') {
        Some((a, b)) => Some((a.chars().next()?, b.chars().next()?)),
        None => {
            let c = aas.chars().next()?;
            Some((c, c))
        }
    }
}

fn classify_indel(
    transcript: &Transcript,
    canonical: &CanonicalVariant,
    cds_pos_offset: u64,
) -> (Vec<String>, Option<ProteinEffect>) {
    let forward = transcript.strand.is_forward();
    let anchor_offset = match canonical.kind {
        VariantKind::Insertion => {
            let anchor_genomic = if forward { canonical.original_pos } else { canonical.original_pos + 1 };
            crate::annotate::position::cds_offset_at(transcript, anchor_genomic)
        }
        _ => {
            let first_deleted_genomic = if forward {
                canonical.pos
            } else {
                canonical.pos + canonical.reference.len() as i64 - 1
            };
            crate::annotate::position::cds_offset_at(transcript, first_deleted_genomic)
        }
    }
    .unwrap_or(cds_pos_offset);

    let ins_len = canonical.alternate.len() as i64;
    let del_len = if canonical.kind == VariantKind::Insertion {
        0
    } else {
        canonical.reference.len() as i64
    };
    let net = ins_len - del_len;
    let in_frame = net % 3 == 0;

    let Some(effect) = indel_effect(transcript, canonical, anchor_offset) else {
        return (vec!["coding_sequence_variant".to_string()], None);
    };

    let term = if !in_frame {
        "frameshift_variant"
    } else if net > 0 {
        "inframe_insertion"
    } else {
        "inframe_deletion"
    };

    (vec![term.to_string()], Some(effect))
}
