//! Auxiliary annotation sources (spec.md 9): a capability set side-effecting
//! `Annotation.extra`, registered at startup and discovered by output
//! writers via interrogation rather than a fixed schema.

mod gene_list;

pub use gene_list::GeneListSource;

/// One extra column an `AnnotationSource` contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
}

/// An external collaborator that annotates variants with information the
/// core engine doesn't compute itself (e.g. curated gene lists, clinical
/// knowledgebases). Bundled here is a minimal gene-list example; real
/// fetches against an external service are out of scope (spec.md 1).
pub trait AnnotationSource: Send + Sync {
    fn name(&self) -> &str;
    fn columns(&self) -> &[ColumnDef];
    /// Side-effects `annotations[i].extra` for every transcript hit at this
    /// variant, keyed `(name(), column)`.
    fn annotate(&self, gene_symbol: Option<&str>, annotations: &mut [crate::annotate::Annotation]);
}

/// Sources are applied in registration order; output writers append their
/// columns in the same order (spec.md 6, 9).
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Box<dyn AnnotationSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Box<dyn AnnotationSource>) {
        self.sources.push(source);
    }

    pub fn apply_all(&self, gene_symbol: Option<&str>, annotations: &mut [crate::annotate::Annotation]) {
        for source in &self.sources {
            source.annotate(gene_symbol, annotations);
        }
    }

    /// `(source_name, column_name)` pairs in registration order, the order
    /// output writers must emit `vibe.<source>.<column>` / CSQ sub-fields in.
    pub fn column_order(&self) -> Vec<(String, String)> {
        self.sources
            .iter()
            .flat_map(|s| s.columns().iter().map(move |c| (s.name().to_string(), c.name.clone())))
            .collect()
    }
}
