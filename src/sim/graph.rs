//! Node graph connection pass
//!
//! Builds a bounded-degree proximity graph over every node in the space.
//! Distances are measured in 3D (screen position plus the width-derived
//! depth) and normalized by the mean width of the two owning entities, so a
//! pixel gap between two small entities counts as further apart than the
//! same gap between two large ones.

use std::cmp::Ordering;

use glam::Vec3;

use super::ease::vector3_distance;
use super::state::{Entity, Node, Space};
use crate::settings::Config;

/// Scale-normalized distance between two nodes. A zero mean width collapses
/// the distance to zero instead of dividing by it.
pub fn node_distance(a: &Node, b: &Node, entities: &[Entity]) -> f32 {
    let distance = vector3_distance(
        Vec3::new(a.position.x, a.position.y, a.position_z),
        Vec3::new(b.position.x, b.position.y, b.position_z),
    );
    let mean_width = (entities[a.entity].width + entities[b.entity].width) / 2.0;
    if mean_width > 0.0 {
        distance / mean_width
    } else {
        0.0
    }
}

/// One connection pass. Every node with no outgoing edges scans for partners
/// that are in range, below their degree cap, and not already linked from
/// either side, then keeps only its nearest `node_max_connections`.
pub fn connect_nodes(nodes: &mut [Node], entities: &[Entity], space: &Space, config: &Config) {
    let max_distance = space.node_max_distance(config);

    for a in 0..nodes.len() {
        if !nodes[a].connections.is_empty() {
            continue;
        }

        let mut picked: Vec<usize> = Vec::new();
        for b in 0..nodes.len() {
            if b == a {
                continue;
            }
            if nodes[b].connections.len() >= config.node_max_connections {
                continue;
            }
            if nodes[a].connected_to(b) || nodes[b].connected_to(a) {
                continue;
            }
            if node_distance(&nodes[a], &nodes[b], entities) > max_distance {
                continue;
            }
            picked.push(b);
        }

        if picked.len() > config.node_max_connections {
            picked.sort_by(|&b1, &b2| {
                let d1 = node_distance(&nodes[a], &nodes[b1], entities).powi(2);
                let d2 = node_distance(&nodes[a], &nodes[b2], entities).powi(2);
                d1.partial_cmp(&d2).unwrap_or(Ordering::Equal)
            });
            picked.truncate(config.node_max_connections);
        }

        nodes[a].connections = picked;
    }
}
