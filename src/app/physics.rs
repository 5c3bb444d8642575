use eframe::egui::{Vec2, vec2};

use super::{Diagram, PhysicsConfig};

const REPULSION_BASE: f32 = 26_000.0;
const SPRING_BASE: f32 = 0.02;
const SPRING_DAMPING: f32 = 0.22;
const ANCHOR_PULL: f32 = 0.012;
const PREFERRED_LINK_LENGTH: f32 = 170.0;
const SOFTENING: f32 = 480.0;
const MAX_FORCE: f32 = 180.0;
const MAX_SPEED: f32 = 16.0;
const MIN_SLEEP_SPEED_SQ: f32 = 0.02 * 0.02;
const MIN_SLEEP_FORCE_SQ: f32 = 0.08 * 0.08;

/// One tick of the refinement loop: pairwise repulsion, spring attraction
/// along links, and a weak pull back toward each node's hierarchical anchor.
/// Returns whether anything still moved this tick.
///
/// Ticks never overlap: the host frame scheduler drives this once per frame
/// on the UI thread, so node positions need no synchronization.
pub(super) fn step(diagram: &mut Diagram, config: PhysicsConfig) -> bool {
    let node_count = diagram.nodes.len();
    if node_count < 2 {
        return false;
    }

    diagram.forces.resize(node_count, Vec2::ZERO);
    diagram.forces.fill(Vec2::ZERO);

    let repulsion_strength = REPULSION_BASE * config.repulsion.clamp(0.2, 2.5);
    let spring_strength = SPRING_BASE * config.spring.clamp(0.2, 2.5);
    let damping = config.damping.clamp(0.6, 0.99);
    let time_step_scale = (config.delta_seconds * 60.0).clamp(0.25, 3.0);
    let damping_factor = damping.powf(time_step_scale);

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = diagram.nodes[i].world_pos - diagram.nodes[j].world_pos;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                vec2(1.0, 0.0)
            };

            let push = direction * (repulsion_strength / (distance_sq + SOFTENING));
            diagram.forces[i] += push;
            diagram.forces[j] -= push;
        }
    }

    for link in &diagram.links {
        let (source, target) = (link.source, link.target);
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let delta = diagram.nodes[source].world_pos - diagram.nodes[target].world_pos;
        let distance_sq = delta.length_sq();
        if distance_sq <= 0.0001 {
            continue;
        }
        let distance = distance_sq.sqrt();
        let direction = delta / distance;

        let spring = (distance - PREFERRED_LINK_LENGTH) * spring_strength;
        let relative_velocity = diagram.nodes[source].velocity - diagram.nodes[target].velocity;
        let damping_force = relative_velocity.dot(direction) * SPRING_DAMPING;
        let correction = direction * (spring + damping_force);

        diagram.forces[source] -= correction;
        diagram.forces[target] += correction;
    }

    for (index, force) in diagram.forces.iter_mut().enumerate() {
        let node = &diagram.nodes[index];
        *force -= (node.world_pos - node.anchor) * ANCHOR_PULL;
    }

    let mut any_motion = false;
    for index in 0..node_count {
        let mut force = diagram.forces[index];
        let force_sq = force.length_sq();
        if force_sq > MAX_FORCE * MAX_FORCE {
            force *= MAX_FORCE / force_sq.sqrt();
        }

        let node = &mut diagram.nodes[index];
        let mut velocity = (node.velocity + force * (0.055 * time_step_scale)) * damping_factor;
        let mut speed_sq = velocity.length_sq();
        if speed_sq > MAX_SPEED * MAX_SPEED {
            velocity *= MAX_SPEED / speed_sq.sqrt();
            speed_sq = MAX_SPEED * MAX_SPEED;
        }

        if speed_sq < MIN_SLEEP_SPEED_SQ && force_sq < MIN_SLEEP_FORCE_SQ {
            velocity = Vec2::ZERO;
            speed_sq = 0.0;
        }

        node.velocity = velocity;
        node.world_pos += velocity * time_step_scale;
        if speed_sq > 0.000_001 {
            any_motion = true;
        }
    }

    any_motion
}
