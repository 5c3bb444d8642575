use std::collections::HashMap;

use indexmap::IndexMap;

use super::document::RawDocument;

/// Reserved component key holding the free-text documentation body. Every
/// other key is a badge (name -> link).
pub const CONTENT_KEY: &str = "content";

/// Documentation payload attached to a node. Entry order is the document's
/// insertion order, which the panel composition depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Component {
    pub entries: IndexMap<String, String>,
}

impl Component {
    pub fn body(&self) -> Option<&str> {
        self.entries.get(CONTENT_KEY).map(String::as_str)
    }

    pub fn badges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(key, _)| key.as_str() != CONTENT_KEY)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Normalized node record, owned by the graph. Produced from the raw
/// document without mutating it.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub level: u32,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub component: Option<Component>,
}

impl NodeRecord {
    /// Display text falls back to the id when no label is declared.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TaxonomyGraph {
    /// Nodes in document declaration order. Layout ordinals depend on it.
    pub nodes: Vec<NodeRecord>,
    pub relations: Vec<Relation>,
    pub index_by_id: HashMap<String, usize>,
}

impl TaxonomyGraph {
    /// Node normalization: the keyed node map becomes an ordered record
    /// sequence, each record carrying its key as `id` and the component
    /// stored under the same key, if any. Ids are unique by construction of
    /// the source map, so there is no dedup step.
    pub(super) fn from_document(mut document: RawDocument) -> Self {
        let mut nodes = Vec::with_capacity(document.nodes.len());
        let mut index_by_id = HashMap::with_capacity(document.nodes.len());

        for (id, raw) in document.nodes {
            let component = document
                .components
                .shift_remove(&id)
                .map(|entries| Component { entries });

            index_by_id.insert(id.clone(), nodes.len());
            nodes.push(NodeRecord {
                id,
                level: raw.level,
                label: raw.label,
                icon: raw.icon,
                component,
            });
        }

        let relations = document
            .relations
            .into_iter()
            .map(|raw| Relation {
                from: raw.from,
                to: raw.to,
                label: raw.label,
            })
            .collect();

        Self {
            nodes,
            relations,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::super::document::parse_document;
    use super::*;

    fn graph_from_yaml(raw: &str) -> TaxonomyGraph {
        TaxonomyGraph::from_document(parse_document(Path::new("test.yaml"), raw).unwrap())
    }

    #[test]
    fn normalization_keeps_document_order_and_attaches_components() {
        let graph = graph_from_yaml(
            "\
nodes:
  b:
    level: 1
  a:
    level: 2
components:
  a:
    content: documented
  ghost:
    content: never attached
",
        );

        let ids = graph.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["b", "a"]);
        assert!(graph.node("b").unwrap().component.is_none());
        assert_eq!(
            graph.node("a").unwrap().component.as_ref().unwrap().body(),
            Some("documented")
        );
        assert_eq!(graph.index_by_id["a"], 1);
    }

    #[test]
    fn display_label_falls_back_to_id() {
        let graph = graph_from_yaml("nodes:\n  db:\n    level: 1\n  api:\n    level: 1\n    label: API\n");
        assert_eq!(graph.node("db").unwrap().display_label(), "db");
        assert_eq!(graph.node("api").unwrap().display_label(), "API");
    }

    #[test]
    fn component_badges_skip_the_body() {
        let component = Component {
            entries: IndexMap::from([
                ("docs".to_owned(), "http://x".to_owned()),
                ("content".to_owned(), "body".to_owned()),
                ("source".to_owned(), "http://y".to_owned()),
            ]),
        };

        let badges = component.badges().collect::<Vec<_>>();
        assert_eq!(badges, [("docs", "http://x"), ("source", "http://y")]);
        assert_eq!(component.body(), Some("body"));
    }
}
