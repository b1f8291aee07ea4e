//! Minimal VCF row reader: header passthrough plus multi-allelic ALT
//! splitting (spec.md 6).

use crate::variant::Variant;

/// One parsed VCF data line, before multi-allelic ALT splitting.
#[derive(Debug, Clone)]
pub struct VcfDataRow {
    pub chrom: String,
    pub pos: i64,
    pub id: String,
    pub reference: String,
    pub alt: String,
    pub qual: Option<f64>,
    pub filter: String,
    pub info: String,
    pub format_and_samples: Option<String>,
}

/// Splits `##`/`#`-prefixed header lines from data lines. Header lines are
/// returned verbatim for passthrough by the output writer (spec.md 6).
pub fn split_header<'a>(lines: impl Iterator<Item = &'a str>) -> (Vec<String>, Vec<String>) {
    let mut header = Vec::new();
    let mut data = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            header.push(line.to_string());
        } else {
            data.push(line.to_string());
        }
    }
    (header, data)
}

pub fn parse_data_line(line: &str) -> Option<VcfDataRow> {
    let mut fields = line.split('\t');
    let chrom = fields.next()?.to_string();
    let pos: i64 = fields.next()?.parse().ok()?;
    let id = fields.next()?.to_string();
    let reference = fields.next()?.to_string();
    let alt = fields.next()?.to_string();
    let qual_raw = fields.next()?;
    let qual = if qual_raw == "." { None } else { qual_raw.parse().ok() };
    let filter = fields.next()?.to_string();
    let info = fields.next().unwrap_or("").to_string();
    let rest: Vec<&str> = fields.collect();
    let format_and_samples = if rest.is_empty() { None } else { Some(rest.join("\t")) };
    Some(VcfDataRow {
        chrom,
        pos,
        id,
        reference,
        alt,
        qual,
        filter,
        info,
        format_and_samples,
    })
}

/// Splits a multi-allelic `ALT` field into independent variants sharing
/// `CHROM`/`POS`/`REF` (spec.md 6).
pub fn split_multiallelic(row: &VcfDataRow) -> Vec<Variant> {
    row.alt
        .split(',')
        .map(|alt| Variant {
            chrom: row.chrom.clone(),
            pos: row.pos,
            reference: row.reference.clone(),
            alternate: alt.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_header_lines_from_data_lines() {
        let text = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n12\t25245351\t.\tC\tA\t.\tPASS\t.\n";
        let (header, data) = split_header(text.lines());
        assert_eq!(header.len(), 2);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn multiallelic_row_splits_into_independent_variants_sharing_position() {
        let row = parse_data_line("12\t25245351\t.\tC\tA,T\t.\tPASS\t.").unwrap();
        let variants = split_multiallelic(&row);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].alternate, "A");
        assert_eq!(variants[1].alternate, "T");
        assert_eq!(variants[0].pos, variants[1].pos);
    }
}
