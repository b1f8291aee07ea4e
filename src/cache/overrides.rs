//! Canonical-overrides table: gene symbol -> preferred (versioned) transcript
//! id, taking precedence over the gene model's own canonical tag (spec.md 4.1).

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct CanonicalOverrides {
    by_symbol: HashMap<String, String>,
}

impl CanonicalOverrides {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ConfigError> {
        let mut by_symbol = HashMap::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ConfigError::InvalidOverrideRow(line_no + 1, e.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split('\t');
            let symbol = cols
                .next()
                .ok_or_else(|| ConfigError::InvalidOverrideRow(line_no + 1, "missing gene symbol column".to_string()))?;
            let transcript_id = cols
                .next()
                .ok_or_else(|| ConfigError::InvalidOverrideRow(line_no + 1, "missing transcript id column".to_string()))?;
            by_symbol.insert(symbol.to_string(), transcript_id.to_string());
        }
        Ok(Self { by_symbol })
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.by_symbol.get(symbol).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_symbol.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_two_column_tsv_skipping_comments() {
        let data = "# gene\\ttranscript\nKRAS\tENST00000311936.8\n\nTP53\tENST00000269305.9\n";
        let overrides = CanonicalOverrides::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(overrides.get("KRAS"), Some("ENST00000311936.8"));
        assert_eq!(overrides.get("TP53"), Some("ENST00000269305.9"));
        assert_eq!(overrides.get("EGFR"), None);
    }
}
