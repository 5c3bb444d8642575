use eframe::egui::Vec2;
use tracing::debug;

use crate::taxonomy::TaxonomyGraph;

use super::{Diagram, DiagramNode, Link};

impl Diagram {
    /// Builds the renderable diagram: one `DiagramNode` per graph node (same
    /// index), plus the links resolved from the relation list. Positions are
    /// zeroed here; the hierarchical layout fills them in once the canvas
    /// size is known.
    pub(super) fn resolve(graph: &TaxonomyGraph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|_| DiagramNode {
                world_pos: Vec2::ZERO,
                velocity: Vec2::ZERO,
                anchor: Vec2::ZERO,
            })
            .collect::<Vec<_>>();

        let links = resolve_links(graph);
        let forces = vec![Vec2::ZERO; nodes.len()];

        Self {
            nodes,
            links,
            forces,
        }
    }
}

/// Resolves relations against node ids. A relation with a missing endpoint
/// is dropped, not reported: the diagram stays usable with a partially
/// inconsistent document. Every resolved link points its single arrowhead at
/// the target.
fn resolve_links(graph: &TaxonomyGraph) -> Vec<Link> {
    graph
        .relations
        .iter()
        .filter_map(|relation| {
            let source = graph.index_by_id.get(&relation.from).copied();
            let target = graph.index_by_id.get(&relation.to).copied();

            match (source, target) {
                (Some(source), Some(target)) => Some(Link {
                    source,
                    target,
                    left: false,
                    right: true,
                    label: relation.label.clone(),
                }),
                _ => {
                    debug!(
                        from = relation.from.as_str(),
                        to = relation.to.as_str(),
                        "dropping relation with unresolved endpoint"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::taxonomy::{NodeRecord, Relation};

    use super::*;

    fn graph(ids: &[&str], relations: Vec<Relation>) -> TaxonomyGraph {
        let nodes = ids
            .iter()
            .map(|id| NodeRecord {
                id: (*id).to_owned(),
                level: 1,
                label: None,
                icon: None,
                component: None,
            })
            .collect::<Vec<_>>();
        let index_by_id = ids
            .iter()
            .enumerate()
            .map(|(index, id)| ((*id).to_owned(), index))
            .collect::<HashMap<_, _>>();

        TaxonomyGraph {
            nodes,
            relations,
            index_by_id,
        }
    }

    fn relation(from: &str, to: &str) -> Relation {
        Relation {
            from: from.to_owned(),
            to: to.to_owned(),
            label: None,
        }
    }

    #[test]
    fn links_point_their_arrowhead_at_the_target() {
        let graph = graph(&["a", "c"], vec![relation("a", "c")]);
        let links = resolve_links(&graph);

        assert_eq!(links.len(), 1);
        assert_eq!((links[0].source, links[0].target), (0, 1));
        assert!(!links[0].left);
        assert!(links[0].right);
    }

    #[test]
    fn dangling_relations_are_dropped_silently() {
        let graph = graph(
            &["a", "b"],
            vec![
                relation("a", "z"),
                relation("z", "b"),
                relation("a", "b"),
            ],
        );

        // Only the relation with both endpoints present survives.
        let links = resolve_links(&graph);
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].source, links[0].target), (0, 1));
    }

    #[test]
    fn no_relations_means_no_links() {
        let graph = graph(&["a"], Vec::new());
        assert!(resolve_links(&graph).is_empty());
    }

    #[test]
    fn link_labels_carry_over() {
        let graph = graph(
            &["a", "b"],
            vec![Relation {
                from: "a".to_owned(),
                to: "b".to_owned(),
                label: Some("feeds".to_owned()),
            }],
        );

        assert_eq!(resolve_links(&graph)[0].label.as_deref(), Some("feeds"));
    }
}
