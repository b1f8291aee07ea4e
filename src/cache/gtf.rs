//! Line-level parsing of the GTF-like gene-model dialect: 9 tab-separated
//! columns, the 9th holding `key "value";` attribute pairs (a `tag`
//! attribute may repeat).

use std::collections::HashMap;

use crate::error::CacheError;

/// Features the loader consults; everything else is skipped (spec.md 4.1).
pub const ACCEPTED_FEATURES: &[&str] =
    &["gene", "transcript", "exon", "CDS", "start_codon", "stop_codon"];

#[derive(Debug, Clone)]
pub struct GtfRecord {
    pub seqname: String,
    pub feature: String,
    pub start: i64,
    pub end: i64,
    pub strand: String,
    pub attributes: HashMap<String, Vec<String>>,
}

impl GtfRecord {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.first()).map(|s| s.as_str())
    }

    pub fn attr_all(&self, key: &str) -> &[String] {
        self.attributes.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.attr_all("tag").iter().any(|t| t == tag)
    }
}

/// Parses one data line (comments and blank lines must be filtered by the
/// caller). `line_no` is used only to annotate errors.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<GtfRecord>, CacheError> {
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 9 {
        return Err(CacheError::Parse(
            "gene model".to_string(),
            line_no,
            format!("expected >= 9 tab-separated columns, found {}", cols.len()),
        ));
    }
    let feature = cols[2].to_string();
    if !ACCEPTED_FEATURES.contains(&feature.as_str()) {
        return Ok(None);
    }
    let start: i64 = cols[3].parse().map_err(|_| {
        CacheError::Parse("gene model".to_string(), line_no, format!("bad start: {}", cols[3]))
    })?;
    let end: i64 = cols[4].parse().map_err(|_| {
        CacheError::Parse("gene model".to_string(), line_no, format!("bad end: {}", cols[4]))
    })?;
    let attributes = parse_attributes(cols[8], line_no)?;

    Ok(Some(GtfRecord {
        seqname: cols[0].to_string(),
        feature,
        start,
        end,
        strand: cols[6].to_string(),
        attributes,
    }))
}

fn parse_attributes(raw: &str, line_no: usize) -> Result<HashMap<String, Vec<String>>, CacheError> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for entry in raw.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mut parts = entry.splitn(2, char::is_whitespace);
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim().trim_matches('"');
        if key.is_empty() {
            return Err(CacheError::Parse(
                "gene model".to_string(),
                line_no,
                format!("malformed attribute entry: {entry:?}"),
            ));
        }
        out.entry(key.to_string()).or_default().push(value.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exon_line_with_repeated_tag() {
        let line = "12\tensembl_havana\texon\t25245274\t25245395\t.\t-\t.\tgene_id \"ENSG00000133703\"; gene_name \"KRAS\"; gene_biotype \"protein_coding\"; transcript_id \"ENST00000311936.8\"; transcript_biotype \"protein_coding\"; exon_number \"2\"; tag \"basic\"; tag \"Ensembl_canonical\";";
        let record = parse_line(line, 1).unwrap().unwrap();
        assert_eq!(record.feature, "exon");
        assert_eq!(record.seqname, "12");
        assert_eq!(record.attr("gene_name"), Some("KRAS"));
        assert_eq!(record.attr_all("tag"), &["basic".to_string(), "Ensembl_canonical".to_string()]);
        assert!(record.has_tag("Ensembl_canonical"));
    }

    #[test]
    fn skips_non_accepted_features() {
        assert!(parse_line(
            "12\tensembl\tUTR\t1\t10\t.\t+\t.\tgene_id \"G\";",
            2
        )
        .unwrap()
        .is_none());
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        assert!(parse_line("", 3).unwrap().is_none());
        assert!(parse_line("# a comment", 4).unwrap().is_none());
    }
}
