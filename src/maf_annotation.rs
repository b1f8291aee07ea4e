//! `MAFAnnotation`: the shape of a pre-existing, externally produced
//! annotation read off a MAF row (spec.md 3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MAFAnnotation {
    pub gene_symbol: Option<String>,
    /// MAF vocabulary allowed (e.g. `Missense_Mutation`), not necessarily SO.
    pub consequence: Option<String>,
    /// Single-letter form, e.g. `p.G12C`.
    pub hgvsp: Option<String>,
    /// Possibly versioned (`ENST....N`).
    pub transcript_id: Option<String>,
    /// Possibly prefixed with `transcriptID:`.
    pub hgvsc: Option<String>,
    pub variant_type: Option<String>,
    pub build: Option<String>,
}

impl MAFAnnotation {
    pub fn unversioned_transcript_id(&self) -> Option<String> {
        self.transcript_id.as_deref().map(crate::model::strip_version).map(str::to_string)
    }

    /// HGVSc with any `transcriptID:` prefix stripped (spec.md 4.5.3).
    pub fn hgvsc_without_prefix(&self) -> Option<&str> {
        self.hgvsc.as_deref().map(|s| match s.split_once(':') {
            Some((_, rest)) => rest,
            None => s,
        })
    }
}
