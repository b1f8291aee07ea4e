//! Streaming FASTA reader for the protein-coding transcript sequence file.
//! Record identifiers are the versioned transcript id (the first whitespace-
//! delimited token on the header line).

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::CacheError;

/// Reads every record into memory, keyed by the versioned transcript id.
/// The cache loader is the only caller; for reference data of this size
/// (one line per transcript's coding sequence) holding it all at once is
/// simpler than streaming record-by-record into the loader.
pub fn read_all<R: BufRead>(reader: R) -> Result<HashMap<String, String>, CacheError> {
    let mut out = HashMap::new();
    let mut current_id: Option<String> = None;
    let mut current_seq = String::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| CacheError::Io {
            path: "fasta".to_string(),
            source: e,
        })?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(id) = current_id.take() {
                out.insert(id, std::mem::take(&mut current_seq));
            }
            let id = header.split_whitespace().next().unwrap_or("").to_string();
            if id.is_empty() {
                return Err(CacheError::Parse(
                    "fasta".to_string(),
                    line_no + 1,
                    "empty record identifier".to_string(),
                ));
            }
            current_id = Some(id);
        } else {
            current_seq.push_str(line.trim_end());
        }
    }
    if let Some(id) = current_id.take() {
        out.insert(id, current_seq);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_multi_record_fasta_joining_wrapped_lines() {
        let data = ">ENST00000311936.8 cds\nATGACT\nGAGTAC\n>ENST00000256078.10\nATG\n";
        let seqs = read_all(Cursor::new(data)).unwrap();
        assert_eq!(seqs.get("ENST00000311936.8").unwrap(), "ATGACTGAGTAC");
        assert_eq!(seqs.get("ENST00000256078.10").unwrap(), "ATG");
    }
}
