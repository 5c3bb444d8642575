mod document;
mod graph;
mod load;

pub use graph::{Component, NodeRecord, Relation, TaxonomyGraph};
pub use load::load_taxonomy;
