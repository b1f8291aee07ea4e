//! Locates a genomic position relative to a transcript's exon/CDS structure
//! (spec.md 4.3.3 step 1): CDS, UTR, intron (with splice-boundary distances),
//! or upstream/downstream of the transcript body.

use crate::model::Transcript;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locus {
    Cds {
        /// 0-based cumulative coding offset.
        offset: u64,
    },
    Utr5,
    Utr3,
    /// Exonic, but the transcript has no CDS at all (non-coding biotype).
    NonCodingExon,
    Intron {
        /// 1-based exon ordinal immediately 5' of the intron (transcription order).
        upstream_exon: u32,
        /// 1-based exon ordinal immediately 3' of the intron.
        downstream_exon: u32,
        /// Distance in bases from the upstream exon's boundary (the donor
        /// site side), `1` being the first intronic base.
        dist_from_donor: i64,
        /// Distance in bases from the downstream exon's boundary (the
        /// acceptor site side).
        dist_from_acceptor: i64,
    },
    Upstream {
        distance: i64,
    },
    Downstream {
        distance: i64,
    },
}

/// cDNA position (1-based, transcription order), or `None` if `pos` is intronic.
pub fn cdna_pos(transcript: &Transcript, pos: i64) -> Option<i64> {
    let forward = transcript.strand.is_forward();
    let mut cumulative = 0i64;
    for exon in &transcript.exons {
        if exon.contains(pos) {
            let offset_in_exon = if forward { pos - exon.start } else { exon.end - pos };
            return Some(cumulative + offset_in_exon + 1);
        }
        cumulative += exon.len();
    }
    None
}

/// 0-based cumulative CDS offset at `pos`, or `None` if `pos` isn't in any CDS segment.
pub fn cds_offset_at(transcript: &Transcript, pos: i64) -> Option<u64> {
    let forward = transcript.strand.is_forward();
    for seg in &transcript.cds {
        if seg.contains(pos) {
            let within = if forward { pos - seg.start } else { seg.end - pos };
            return Some(seg.cds_offset + within as u64);
        }
    }
    None
}

fn first_cds_base(transcript: &Transcript) -> Option<i64> {
    transcript
        .cds
        .first()
        .map(|s| if transcript.strand.is_forward() { s.start } else { s.end })
}

fn last_cds_base(transcript: &Transcript) -> Option<i64> {
    transcript
        .cds
        .last()
        .map(|s| if transcript.strand.is_forward() { s.end } else { s.start })
}

pub fn locate(transcript: &Transcript, pos: i64) -> Locus {
    for exon in &transcript.exons {
        if exon.contains(pos) {
            if let Some(offset) = cds_offset_at(transcript, pos) {
                return Locus::Cds { offset };
            }
            if transcript.cds.is_empty() {
                return Locus::NonCodingExon;
            }
            let cdna = cdna_pos(transcript, pos).unwrap_or(0);
            let cds_start_cdna = first_cds_base(transcript)
                .and_then(|b| cdna_pos(transcript, b))
                .unwrap_or(i64::MAX);
            return if cdna < cds_start_cdna { Locus::Utr5 } else { Locus::Utr3 };
        }
    }

    let forward = transcript.strand.is_forward();
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
            return Locus::Intron {
                upstream_exon: upstream.number,
                downstream_exon: downstream.number,
                dist_from_donor,
                dist_from_acceptor,
            };
        }
    }

    if forward {
        if pos < transcript.start {
            Locus::Upstream { distance: transcript.start - pos }
        } else {
            Locus::Downstream { distance: pos - transcript.end }
        }
    } else if pos > transcript.end {
        Locus::Upstream { distance: pos - transcript.end }
    } else {
        Locus::Downstream { distance: transcript.start - pos }
    }
}

/// `Some(cds_start_cdna_1based)` bound used by callers that need to tell a
/// last-CDS-base boundary apart from an ordinary 3'UTR base (e.g. stop_lost).
pub fn last_cds_cdna_pos(transcript: &Transcript) -> Option<i64> {
    last_cds_base(transcript).and_then(|b| cdna_pos(transcript, b))
}
