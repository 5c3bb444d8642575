use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::document::{parse_components, parse_document};
use super::graph::TaxonomyGraph;

/// Loads and normalizes a taxonomy document. A separate components document
/// may be supplied; its entries replace whatever the main document declares
/// inline, mirroring the original split between the two sources. Structural
/// errors (unreadable file, undecodable document, node without a level)
/// surface here, before anything is drawn.
pub fn load_taxonomy(document_path: &Path, components_path: Option<&Path>) -> Result<TaxonomyGraph> {
    let raw = fs::read_to_string(document_path)
        .with_context(|| format!("failed to read taxonomy document {}", document_path.display()))?;
    let mut document = parse_document(document_path, &raw)?;

    if let Some(components_path) = components_path {
        let raw_components = fs::read_to_string(components_path).with_context(|| {
            format!(
                "failed to read components document {}",
                components_path.display()
            )
        })?;
        document.components = parse_components(components_path, &raw_components)?;
    }

    Ok(TaxonomyGraph::from_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("taxograph-test-{name}"));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_document_with_separate_components() {
        let doc = write_temp(
            "doc.yaml",
            "nodes:\n  api:\n    level: 1\ncomponents:\n  api:\n    content: inline\n",
        );
        let components = write_temp("components.yaml", "api:\n  content: external\n");

        let graph = load_taxonomy(&doc, Some(&components)).unwrap();
        let component = graph.node("api").unwrap().component.as_ref().unwrap();
        assert_eq!(component.body(), Some("external"));
    }

    #[test]
    fn missing_document_is_an_error() {
        let error = load_taxonomy(Path::new("/nonexistent/taxonomy.yaml"), None).unwrap_err();
        assert!(error.to_string().contains("failed to read"));
    }
}
