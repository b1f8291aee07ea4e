//! A bundled example `AnnotationSource`: a flat gene-symbol list, standing
//! in for "OncoKB gene lists" (spec.md 1) without implementing real fetching.

use std::collections::HashSet;

use crate::source::{AnnotationSource, ColumnDef};

pub struct GeneListSource {
    name: String,
    genes: HashSet<String>,
    columns: Vec<ColumnDef>,
}

impl GeneListSource {
    pub fn new(name: &str, genes: Vec<String>) -> Self {
        GeneListSource {
            name: name.to_string(),
            genes: genes.into_iter().collect(),
            columns: vec![ColumnDef {
                name: "is_known".to_string(),
            }],
        }
    }
}

impl AnnotationSource for GeneListSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn annotate(&self, gene_symbol: Option<&str>, annotations: &mut [crate::annotate::Annotation]) {
        let is_known = gene_symbol.is_some_and(|s| self.genes.contains(s));
        for annotation in annotations.iter_mut() {
            annotation
                .extra
                .insert((self.name.clone(), "is_known".to_string()), is_known.to_string());
        }
    }
}
