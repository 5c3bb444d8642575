use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Immutable serde view of a taxonomy document. Nodes and components are
/// insertion-ordered maps: node order drives the layout ordinal and component
/// key order drives badge concatenation, so plain hash maps would lose
/// meaning here.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawDocument {
    #[serde(default)]
    pub(super) nodes: IndexMap<String, RawNode>,
    #[serde(default)]
    pub(super) relations: Vec<RawRelation>,
    #[serde(default)]
    pub(super) components: IndexMap<String, IndexMap<String, String>>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    // Required: a node without a level has no vertical placement, so the
    // document is rejected at load time rather than drawn wrong.
    pub(super) level: u32,
    #[serde(default)]
    pub(super) label: Option<String>,
    #[serde(default)]
    pub(super) icon: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawRelation {
    pub(super) from: String,
    pub(super) to: String,
    #[serde(default)]
    pub(super) label: Option<String>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

pub(super) fn parse_document(path: &Path, raw: &str) -> Result<RawDocument> {
    if is_yaml(path) {
        serde_yaml::from_str(raw)
            .with_context(|| format!("invalid YAML taxonomy document: {}", path.display()))
    } else {
        serde_json::from_str(raw)
            .with_context(|| format!("invalid JSON taxonomy document: {}", path.display()))
    }
}

/// A standalone components document maps component ids straight to their
/// documentation entries, with no node/relation sections around them.
pub(super) fn parse_components(
    path: &Path,
    raw: &str,
) -> Result<IndexMap<String, IndexMap<String, String>>> {
    if is_yaml(path) {
        serde_yaml::from_str(raw)
            .with_context(|| format!("invalid YAML components document: {}", path.display()))
    } else {
        serde_json::from_str(raw)
            .with_context(|| format!("invalid JSON components document: {}", path.display()))
    }
}
