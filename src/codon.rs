//! Standard nuclear genetic code and amino-acid letter tables, used to
//! translate codons for missense/nonsense/synonymous classification and for
//! HGVSp construction (spec.md 4.3.3, supplemented per SPEC_FULL.md 4.3).

/// Translates a single codon (case-insensitive) to its one-letter amino acid
/// code, or `*` for a stop codon. Returns `None` for anything that isn't
/// exactly 3 unambiguous IUPAC bases.
pub fn translate_codon(codon: &str) -> Option<char> {
    if codon.len() != 3 {
        return None;
    }
    let mut bytes = [0u8; 3];
    for (i, c) in codon.chars().enumerate() {
        bytes[i] = c.to_ascii_uppercase() as u8;
    }
    let aa = match &bytes {
        b"TTT" | b"TTC" => 'F',
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => 'L',
        b"ATT" | b"ATC" | b"ATA" => 'I',
        b"ATG" => 'M',
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => 'V',
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => 'S',
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => 'P',
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => 'T',
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => 'A',
        b"TAT" | b"TAC" => 'Y',
        b"TAA" | b"TAG" | b"TGA" => '*',
        b"CAT" | b"CAC" => 'H',
        b"CAA" | b"CAG" => 'Q',
        b"AAT" | b"AAC" => 'N',
        b"AAA" | b"AAG" => 'K',
        b"GAT" | b"GAC" => 'D',
        b"GAA" | b"GAG" => 'E',
        b"TGT" | b"TGC" => 'C',
        b"TGG" => 'W',
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => 'R',
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => 'G',
        _ => return None,
    };
    Some(aa)
}

pub fn is_stop(codon: &str) -> bool {
    translate_codon(codon) == Some('*')
}

/// 1-letter -> 3-letter amino acid code, `*` -> `Ter` (spec.md 4.3.3).
pub fn aa_one_to_three(one: char) -> &'static str {
    match one.to_ascii_uppercase() {
        'A' => "Ala",
        'R' => "Arg",
        'N' => "Asn",
        'D' => "Asp",
        'C' => "Cys",
        'Q' => "Gln",
        'E' => "Glu",
        'G' => "Gly",
        'H' => "His",
        'I' => "Ile",
        'L' => "Leu",
        'K' => "Lys",
        'M' => "Met",
        'F' => "Phe",
        'P' => "Pro",
        'S' => "Ser",
        'T' => "Thr",
        'W' => "Trp",
        'Y' => "Tyr",
        'V' => "Val",
        '*' => "Ter",
        _ => "Xaa",
    }
}

/// 3-letter -> 1-letter amino acid code, `Ter` -> `*`.
pub fn aa_three_to_one(three: &str) -> Option<char> {
    Some(match three {
        "Ala" => 'A',
        "Arg" => 'R',
        "Asn" => 'N',
        "Asp" => 'D',
        "Cys" => 'C',
        "Gln" => 'Q',
        "Glu" => 'E',
        "Gly" => 'G',
        "His" => 'H',
        "Ile" => 'I',
        "Leu" => 'L',
        "Lys" => 'K',
        "Met" => 'M',
        "Phe" => 'F',
        "Pro" => 'P',
        "Ser" => 'S',
        "Thr" => 'T',
        "Trp" => 'W',
        "Tyr" => 'Y',
        "Val" => 'V',
        "Ter" => '*',
        "Xaa" => 'X',
        _ => return None,
    })
}

use std::sync::OnceLock;

use regex::Regex;

fn three_letter_aa_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z][a-z]{2}").unwrap())
}

fn one_letter_aa_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z*]").unwrap())
}

/// Rewrites an HGVSp string's 3-letter amino-acid codes to their 1-letter
/// form, e.g. `p.Gly12Cys` -> `p.G12C` (spec.md 4.5.2: MAF rows commonly
/// carry the short form).
pub fn hgvsp_to_short(long: &str) -> String {
    three_letter_aa_re()
        .replace_all(long, |caps: &regex::Captures| match aa_three_to_one(&caps[0]) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Rewrites an HGVSp string's 1-letter amino-acid codes to their 3-letter
/// form, e.g. `p.G12C` -> `p.Gly12Cys`.
pub fn hgvsp_to_long(short: &str) -> String {
    one_letter_aa_re()
        .replace_all(short, |caps: &regex::Captures| {
            let c = caps[0].chars().next().unwrap();
            aa_one_to_three(c).to_string()
        })
        .into_owned()
}

pub fn complement_base(b: char) -> char {
    match b.to_ascii_uppercase() {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'N' => 'N',
        other => other,
    }
}

pub fn reverse_complement(seq: &str) -> String {
    seq.chars().rev().map(complement_base).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_kras_codon_12_wildtype_and_mutant() {
        assert_eq!(translate_codon("GGT"), Some('G'));
        assert_eq!(translate_codon("TGT"), Some('C'));
    }

    #[test]
    fn recognizes_all_three_stop_codons() {
        assert!(is_stop("TAA"));
        assert!(is_stop("TAG"));
        assert!(is_stop("TGA"));
        assert!(!is_stop("TGG"));
    }

    #[test]
    fn amino_acid_letter_round_trips() {
        for one in "ACDEFGHIKLMNPQRSTVWY*".chars() {
            let three = aa_one_to_three(one);
            assert_eq!(aa_three_to_one(three), Some(one));
        }
    }

    #[test]
    fn reverse_complement_matches_expected() {
        assert_eq!(reverse_complement("ATGC"), "GCAT");
    }

    #[test]
    fn hgvsp_short_and_long_round_trip_for_missense() {
        let long = "p.Gly12Cys";
        let short = hgvsp_to_short(long);
        assert_eq!(short, "p.G12C");
        assert_eq!(hgvsp_to_long(&short), long);
    }

    #[test]
    fn hgvsp_short_and_long_round_trip_for_frameshift() {
        let long = "p.Lys2fsTer3";
        let short = hgvsp_to_short(long);
        assert_eq!(short, "p.K2fs*3");
        assert_eq!(hgvsp_to_long(&short), long);
    }

    #[test]
    fn hgvsp_short_and_long_round_trip_for_synonymous() {
        let long = "p.Gly12=";
        let short = hgvsp_to_short(long);
        assert_eq!(short, "p.G12=");
        assert_eq!(hgvsp_to_long(&short), long);
    }
}
