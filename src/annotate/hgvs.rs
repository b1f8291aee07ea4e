//! HGVSc/HGVSp string construction (spec.md 4.3.3 steps 4-5).
//!
//! Coordinates are strand-aware: on `-`-strand transcripts, bases read from
//! the (always `+`-strand) genomic `Variant`/`CanonicalVariant` are
//! complemented, and multi-base sequences are reverse-complemented, before
//! being written into either string. Indel 3'-most-alignment is approximated
//! by always working from the already-left-trimmed `CanonicalVariant`
//! (spec.md 4.3.2); full re-alignment across repeat runs is not attempted,
//! matching the `dup_vs_ins` comparison category set aside for this gap.

use crate::annotate::position::{cdna_pos, cds_offset_at, last_cds_cdna_pos};
use crate::codon::{self, aa_one_to_three};
use crate::model::Transcript;
use crate::variant::{CanonicalVariant, VariantKind};

fn first_cds_base(transcript: &Transcript) -> Option<i64> {
    transcript
        .cds
        .first()
        .map(|s| if transcript.strand.is_forward() { s.start } else { s.end })
}

/// Coding-coordinate string for a single genomic position: plain digits in
/// the CDS, `-N` upstream of the start codon, `*N` downstream of the stop
/// codon, `N+K`/`N-K` for intronic offsets from the nearest exon boundary.
pub fn hgvsc_coordinate(transcript: &Transcript, pos: i64) -> String {
    let forward = transcript.strand.is_forward();

    for exon in &transcript.exons {
        if exon.contains(pos) {
            if let Some(offset) = cds_offset_at(transcript, pos) {
                return (offset + 1).to_string();
            }
            if transcript.cds.is_empty() {
                return String::new();
            }
            let cdna = cdna_pos(transcript, pos).unwrap_or(0);
            let cds_start_cdna = first_cds_base(transcript)
                .and_then(|b| cdna_pos(transcript, b))
                .unwrap_or(i64::MAX);
            return if cdna < cds_start_cdna {
                format!("-{}", cds_start_cdna - cdna)
            } else {
                let last_cdna = last_cds_cdna_pos(transcript).unwrap_or(cdna);
                format!("*{}", cdna - last_cdna)
            };
        }
    }

    for w in transcript.exons.windows(2) {
        let (upstream, downstream) = (&w[0], &w[1]);
        let in_intron = if forward {
            pos > upstream.end && pos < downstream.start
        } else {
            pos < upstream.start && pos > downstream.end
        };
        if in_intron {
            let dist_from_donor = if forward { pos - upstream.end } else { upstream.start - pos };
            let dist_from_acceptor = if forward { downstream.start - pos } else { pos - downstream.end };
            return if dist_from_donor <= dist_from_acceptor {
                let boundary = if forward { upstream.end } else { upstream.start };
                format!("{}+{}", hgvsc_coordinate(transcript, boundary), dist_from_donor)
            } else {
                let boundary = if forward { downstream.start } else { downstream.end };
                format!("{}-{}", hgvsc_coordinate(transcript, boundary), dist_from_acceptor)
            };
        }
    }

    String::new()
}

fn strand_base(transcript: &Transcript, s: &str) -> char {
    let c = s.chars().next().unwrap_or('N');
    if transcript.strand.is_forward() {
        c.to_ascii_uppercase()
    } else {
        codon::complement_base(c)
    }
}

fn strand_seq(transcript: &Transcript, s: &str) -> String {
    if transcript.strand.is_forward() {
        s.to_ascii_uppercase()
    } else {
        codon::reverse_complement(s)
    }
}

/// Builds the full `c.`-prefixed HGVSc for a canonicalized variant against a
/// protein-coding transcript. Empty for non-coding transcripts.
pub fn build_hgvsc(transcript: &Transcript, canonical: &CanonicalVariant) -> String {
    if !transcript.is_protein_coding() || transcript.cds.is_empty() {
        return String::new();
    }
    let forward = transcript.strand.is_forward();

    let body = match canonical.kind {
        VariantKind::Snv => {
            let pos = hgvsc_coordinate(transcript, canonical.pos);
            let r = strand_base(transcript, &canonical.reference);
            let a = strand_base(transcript, &canonical.alternate);
            format!("{pos}{r}>{a}")
        }
        VariantKind::Insertion => {
            let before = canonical.original_pos;
            let after = canonical.original_pos + 1;
            let (first_g, second_g) = if forward { (before, after) } else { (after, before) };
            let first = hgvsc_coordinate(transcript, first_g);
            let second = hgvsc_coordinate(transcript, second_g);
            let seq = strand_seq(transcript, &canonical.alternate);
            format!("{first}_{second}ins{seq}")
        }
        VariantKind::Mnv => {
            let start_g = canonical.pos;
            let end_g = canonical.pos + canonical.reference.len() as i64 - 1;
            let (first_g, second_g) = if forward { (start_g, end_g) } else { (end_g, start_g) };
            let first = hgvsc_coordinate(transcript, first_g);
            let second = hgvsc_coordinate(transcript, second_g);
            let range = if first == second { first } else { format!("{first}_{second}") };
            let seq = strand_seq(transcript, &canonical.alternate);
            format!("{range}delins{seq}")
        }
        VariantKind::Deletion | VariantKind::Delins => {
            let start_g = canonical.pos;
            let end_g = canonical.pos + canonical.reference.len() as i64 - 1;
            let (first_g, second_g) = if forward { (start_g, end_g) } else { (end_g, start_g) };
            let first = hgvsc_coordinate(transcript, first_g);
            let second = hgvsc_coordinate(transcript, second_g);
            let range = if first == second { first } else { format!("{first}_{second}") };
            match canonical.kind {
                VariantKind::Deletion => format!("{range}del"),
                _ => format!("{range}delins{}", strand_seq(transcript, &canonical.alternate)),
            }
        }
    };

    format!("c.{body}")
}

/// The protein-level fields the engine attaches to an `Annotation`: HGVSp (3
/// letter form), `amino_acids` (`G/C` form), `codons` (`Ggt/Tgt` form, the
/// changed base(s) uppercased), and the 1-based protein position.
#[derive(Debug, Clone, Default)]
pub struct ProteinEffect {
    pub hgvsp: String,
    pub amino_acids: Option<String>,
    pub codons: Option<String>,
    pub protein_position: Option<i64>,
}

fn case_mark(codon: &str, changed: &[usize]) -> String {
    codon
        .chars()
        .enumerate()
        .map(|(i, c)| if changed.contains(&i) { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
        .collect()
}

fn codon_at(seq: &str, codon_index: usize) -> Option<&str> {
    let start = codon_index * 3;
    seq.get(start..start + 3)
}

/// Splices `insert_seq` into `seq` starting at `codon_start + local_offset`,
/// removing `del_len` original bases first, and returns everything from that
/// point onward -- used to scan a frameshift forward for its next stop.
fn mutated_tail(seq: &str, codon_start: usize, local_offset: usize, del_len: usize, insert_seq: &str) -> Option<String> {
    let tail = seq.get(codon_start..)?;
    let after = local_offset.checked_add(del_len)?;
    if after > tail.len() {
        return None;
    }
    let mut out = String::with_capacity(tail.len() + insert_seq.len());
    out.push_str(&tail[..local_offset]);
    out.push_str(insert_seq);
    out.push_str(&tail[after..]);
    Some(out)
}

fn distance_to_stop(tail: &str) -> Option<i64> {
    for (i, chunk) in tail.as_bytes().chunks(3).enumerate() {
        if chunk.len() < 3 {
            return None;
        }
        let s = std::str::from_utf8(chunk).ok()?;
        if codon::is_stop(s) {
            return Some(i as i64 + 1);
        }
    }
    None
}

/// For a SNV/MNV already located inside a CDS segment (`cds_offset` is the
/// 0-based coding offset of `canonical.pos`).
pub fn substitution_effect(transcript: &Transcript, canonical: &CanonicalVariant, cds_offset: u64) -> Option<ProteinEffect> {
    let seq = transcript.cds_sequence.as_deref()?;
    let codon_index = (cds_offset / 3) as usize;
    let pos_in_codon = (cds_offset % 3) as usize;
    let old_codon = codon_at(seq, codon_index)?;
    let mut mutant = old_codon.as_bytes().to_vec();

    if canonical.kind == VariantKind::Snv {
        mutant[pos_in_codon] = strand_base(transcript, &canonical.alternate) as u8;
    } else {
        // MNV: splice in every changed base that lands in this codon; bases
        // spilling into neighbouring codons are covered by the caller
        // re-invoking this per affected codon is out of scope here, so we
        // degrade to a coding_sequence_variant by returning None when the
        // MNV doesn't fit inside one codon.
        let alt = strand_seq(transcript, &canonical.alternate);
        if pos_in_codon + alt.len() > 3 {
            return None;
        }
        for (i, b) in alt.bytes().enumerate() {
            mutant[pos_in_codon + i] = b;
        }
    }
    let mutant_codon = std::str::from_utf8(&mutant).ok()?;

    let old_aa = codon::translate_codon(old_codon)?;
    let new_aa = codon::translate_codon(mutant_codon)?;
    let protein_position = codon_index as i64 + 1;

    let changed: Vec<usize> = match canonical.kind {
        VariantKind::Snv => vec![pos_in_codon],
        _ => (pos_in_codon..pos_in_codon + canonical.alternate.len().min(3 - pos_in_codon)).collect(),
    };
    let codons = format!("{}/{}", case_mark(old_codon, &changed), case_mark(mutant_codon, &changed));
    let amino_acids = if old_aa == new_aa {
        old_aa.to_string()
    } else {
        format!("{old_aa}/{new_aa}")
    };

    let hgvsp = if old_aa == new_aa {
        format!("p.{}{}=", aa_one_to_three(old_aa), protein_position)
    } else if new_aa == '*' {
        format!("p.{}{}{}", aa_one_to_three(old_aa), protein_position, aa_one_to_three('*'))
    } else if old_aa == '*' {
        format!("p.{}{}{}ext*?", aa_one_to_three(old_aa), protein_position, aa_one_to_three(new_aa))
    } else {
        format!("p.{}{}{}", aa_one_to_three(old_aa), protein_position, aa_one_to_three(new_aa))
    };

    Some(ProteinEffect {
        hgvsp,
        amino_acids: Some(amino_acids),
        codons: Some(codons),
        protein_position: Some(protein_position),
    })
}

/// For an indel located inside a CDS (pure insertion, pure deletion, or
/// delins). `anchor_offset` is the 0-based coding offset of the last
/// transcription-order base unaffected by the edit (the base immediately
/// before the edit window).
pub fn indel_effect(
    transcript: &Transcript,
    canonical: &CanonicalVariant,
    anchor_offset: u64,
) -> Option<ProteinEffect> {
    let seq = transcript.cds_sequence.as_deref()?;
    let is_insertion = canonical.kind == VariantKind::Insertion;
    let del_len = if is_insertion { 0 } else { canonical.reference.len() };
    let insert_seq = strand_seq(transcript, &canonical.alternate);
    let ins_len = insert_seq.len();
    let net = ins_len as i64 - del_len as i64;

    let codon_index0 = (anchor_offset / 3) as usize;
    let pos_in_codon = (anchor_offset % 3) as usize;
    let split_local = if is_insertion { pos_in_codon + 1 } else { pos_in_codon };
    let codon_start = codon_index0 * 3;

    let tail = mutated_tail(seq, codon_start, split_local, del_len, &insert_seq)?;

    if net != 0 && net % 3 == 0 {
        let old_aa_start = codon::translate_codon(codon_at(seq, codon_index0)?)?;
        if is_insertion {
            let next_codon_idx = codon_index0 + 1;
            let next_aa = codon_at(seq, next_codon_idx).and_then(codon::translate_codon);
            let inserted_aas: Option<String> = insert_seq
                .as_bytes()
                .chunks(3)
                .map(|c| std::str::from_utf8(c).ok().and_then(codon::translate_codon).map(aa_one_to_three))
                .collect();
            let hgvsp = match (next_aa, inserted_aas) {
                (Some(next_aa), Some(aas)) => format!(
                    "p.{}{}_{}{}ins{}",
                    aa_one_to_three(old_aa_start),
                    codon_index0 + 1,
                    aa_one_to_three(next_aa),
                    codon_index0 + 2,
                    aas
                ),
                _ => format!("p.{}{}_ins", aa_one_to_three(old_aa_start), codon_index0 + 1),
            };
            Some(ProteinEffect {
                hgvsp,
                amino_acids: None,
                codons: None,
                protein_position: Some(codon_index0 as i64 + 1),
            })
        } else {
            let removed_codons = (del_len as i64 + pos_in_codon as i64 + 2) / 3; // ceil((pos_in_codon+del_len)/3)
            let last_codon_idx = codon_index0 + removed_codons.max(1) as usize - 1;
            let old_aa_end = codon_at(seq, last_codon_idx).and_then(codon::translate_codon).unwrap_or(old_aa_start);
            let hgvsp = if last_codon_idx == codon_index0 {
                format!("p.{}{}del", aa_one_to_three(old_aa_start), codon_index0 + 1)
            } else {
                format!(
                    "p.{}{}_{}{}del",
                    aa_one_to_three(old_aa_start),
                    codon_index0 + 1,
                    aa_one_to_three(old_aa_end),
                    last_codon_idx + 1
                )
            };
            Some(ProteinEffect {
                hgvsp,
                amino_acids: None,
                codons: None,
                protein_position: Some(codon_index0 as i64 + 1),
            })
        }
    } else {
        let old_aa = codon::translate_codon(codon_at(seq, codon_index0)?)?;
        let dist = distance_to_stop(&tail);
        let hgvsp = match dist {
            Some(n) => format!("p.{}{}fsTer{}", aa_one_to_three(old_aa), codon_index0 + 1, n),
            None => format!("p.{}{}fs", aa_one_to_three(old_aa), codon_index0 + 1),
        };
        Some(ProteinEffect {
            hgvsp,
            amino_acids: None,
            codons: None,
            protein_position: Some(codon_index0 as i64 + 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CdsSegment, Exon, Strand, Transcript, TranscriptId};
    use crate::variant::Variant;

    fn kras_like_transcript() -> Transcript {
        // Minimal minus-strand transcript standing in for ENST00000311936
        // around codon 12: CDS offset 33 (0-based) is the first base of
        // codon 12 (1-based codon index 12, c.34).
        let mut cds_sequence = String::new();
        cds_sequence.push_str(&"A".repeat(33)); // codons 1..11
        cds_sequence.push_str("GGT"); // codon 12, Gly
        cds_sequence.push_str(&"A".repeat(30));
        Transcript {
            id: TranscriptId(1),
            transcript_id: "ENST00000311936.8".to_string(),
            unversioned_id: "ENST00000311936".to_string(),
            gene_id: None,
            chrom: "12".to_string(),
            start: 25205246,
            end: 25250929,
            strand: Strand::Minus,
            biotype: "protein_coding".to_string(),
            canonical: true,
            exons: vec![Exon { start: 25245274, end: 25245384, number: 2 }],
            cds: vec![CdsSegment { start: 25245274, end: 25245384, cds_offset: 0 }],
            cds_sequence: Some(cds_sequence),
        }
    }

    #[test]
    fn kras_g12c_hgvsc_and_hgvsp_match_spec_scenario_1() {
        let t = kras_like_transcript();
        let v = Variant {
            chrom: "12".to_string(),
            pos: 25245351,
            reference: "C".to_string(),
            alternate: "A".to_string(),
        };
        let canonical = v.canonicalize();
        let hgvsc = build_hgvsc(&t, &canonical);
        assert_eq!(hgvsc, "c.34G>T");

        let offset = cds_offset_at(&t, canonical.pos).unwrap();
        assert_eq!(offset, 33);
        let effect = substitution_effect(&t, &canonical, offset).unwrap();
        assert_eq!(effect.hgvsp, "p.Gly12Cys");
        assert_eq!(effect.protein_position, Some(12));
        assert_eq!(effect.amino_acids.as_deref(), Some("G/C"));
        assert_eq!(effect.codons.as_deref(), Some("Ggt/Tgt"));
    }

    #[test]
    fn synonymous_change_renders_equals_form() {
        let mut t = kras_like_transcript();
        t.strand = Strand::Plus;
        // third position of codon 12 (GGT -> GGC) is still Gly.
        let canonical = Variant {
            chrom: "12".to_string(),
            pos: 25245384,
            reference: "T".to_string(),
            alternate: "C".to_string(),
        }
        .canonicalize();
        let offset = 35u64; // third base of codon 12 (0-based 35)
        let effect = substitution_effect(&t, &canonical, offset).unwrap();
        assert_eq!(effect.hgvsp, "p.Gly12=");
    }

    #[test]
    fn frameshift_reports_distance_to_next_in_frame_stop() {
        let mut cds_sequence = String::new();
        cds_sequence.push_str("ATGAAACCCGGGTAA"); // M K P G stop
        let t = Transcript {
            id: TranscriptId(2),
            transcript_id: "ENST00000000002.1".to_string(),
            unversioned_id: "ENST00000000002".to_string(),
            gene_id: None,
            chrom: "1".to_string(),
            start: 100,
            end: 200,
            strand: Strand::Plus,
            biotype: "protein_coding".to_string(),
            canonical: false,
            exons: vec![Exon { start: 100, end: 200, number: 1 }],
            cds: vec![CdsSegment { start: 100, end: 200, cds_offset: 0 }],
            cds_sequence: Some(cds_sequence),
        };
        // A single-base deletion of the first base of codon 2 (offset 3).
        let canonical = Variant {
            chrom: "1".to_string(),
            pos: 103,
            reference: "AA".to_string(),
            alternate: "A".to_string(),
        }
        .canonicalize();
        let anchor_offset = cds_offset_at(&t, canonical.pos).unwrap();
        let effect = indel_effect(&t, &canonical, anchor_offset).unwrap();
        assert!(effect.hgvsp.starts_with("p.Lys2fs"));
    }
}
