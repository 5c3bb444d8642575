use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::taxonomy::NodeRecord;

/// Assigns every node an initial canvas position from its declared level.
///
/// Vertical: levels are normalized so the smallest declared level maps to
/// band 1, the canvas height is divided into one band per distinct-level
/// span, and each node sits at the vertical center of its band. A
/// single-level graph is one band spanning the full height, so there is no
/// division by zero however levels were numbered.
///
/// Horizontal: nodes sharing a level are siblings, kept in document order;
/// the width is divided into `sibling_count + 1` segments and the node with
/// 1-based ordinal `p` sits at `segment * p`, leaving a margin on both sides.
///
/// Deterministic and idempotent for a given node order. Coordinates are in
/// canvas space with the origin at the top-left.
pub(super) fn assign_positions(nodes: &[NodeRecord], width: f32, height: f32) -> Vec<Vec2> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let min_level = nodes.iter().map(|node| node.level).min().unwrap_or(0);
    let max_level = nodes.iter().map(|node| node.level).max().unwrap_or(0);
    let band_count = (max_level - min_level + 1) as f32;
    let band_height = height / band_count;

    let mut sibling_totals: HashMap<u32, usize> = HashMap::new();
    for node in nodes {
        *sibling_totals.entry(node.level).or_insert(0) += 1;
    }

    let mut placed_in_level: HashMap<u32, usize> = HashMap::new();
    nodes
        .iter()
        .map(|node| {
            let band = (node.level - min_level + 1) as f32;
            let y = (band_height * band) - (band_height / 2.0);

            let ordinal = {
                let slot = placed_in_level.entry(node.level).or_insert(0);
                *slot += 1;
                *slot as f32
            };
            let segment = width / (sibling_totals[&node.level] + 1) as f32;
            let x = segment * ordinal;

            vec2(x, y)
        })
        .collect()
}
