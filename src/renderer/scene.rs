//! Scene paint pass
//!
//! A read-only walk over the simulation in stacking order: background,
//! entities far-to-near, graph edges, node dots shallow-to-deep, flairs.
//! All geometry was derived during the step; nothing here mutates state.

use glam::Vec2;

use super::surface::Surface;
use crate::consts::ENTITY_MIN_DRAW_SIZE;
use crate::settings::EntityShape;
use crate::sim::ease::inverse_lerp;
use crate::sim::graph::node_distance;
use crate::sim::{FrameInput, Wormhole};

/// Advance the simulation one step and paint it. The host calls this once
/// per displayed frame; a resolution change resizes the surface before any
/// painting happens.
pub fn render_frame<S: Surface>(
    world: &mut Wormhole,
    input: &FrameInput,
    elapsed_ms: f32,
    surface: &mut S,
) {
    if world.step(input, elapsed_ms) {
        surface.resize(world.space.resolution.x as u32, world.space.resolution.y as u32);
    }
    draw(world, surface);
}

/// Paint the current state
pub fn draw<S: Surface>(world: &Wormhole, surface: &mut S) {
    surface.set_alpha(1.0);
    surface.fill_background(world.config.background);

    // Nothing else is drawable until a viewport push sizes the space
    if world.space.resolution_size <= 0.0 {
        return;
    }

    draw_entities(world, surface);
    draw_edges(world, surface);
    draw_nodes(world, surface);
    draw_flairs(world, surface);
}

fn draw_entities<S: Surface>(world: &Wormhole, surface: &mut S) {
    for &index in &world.draw_order {
        let entity = &world.entities[index];
        if entity.rect_width.min(entity.rect_height) <= ENTITY_MIN_DRAW_SIZE {
            continue;
        }

        surface.set_alpha(entity.opacity);
        surface.set_fill_color(entity.display_color());

        let center = entity.position(&world.space);
        let scaled = Vec2::new(entity.scaled_rect_width(), entity.scaled_rect_height());
        match world.config.entity_shape {
            EntityShape::Ellipse => {
                surface.fill_ellipse(center, scaled * 0.5, entity.rotation.to_radians());
            }
            EntityShape::Rectangle => {
                surface.fill_rect(center, scaled);
            }
        }
    }
}

/// Edges fade with the dimmer endpoint and with distance across the
/// connection band
fn draw_edges<S: Surface>(world: &Wormhole, surface: &mut S) {
    let min_distance = world.space.node_min_distance(&world.config);
    let max_distance = world.space.node_max_distance(&world.config);

    surface.save();
    surface.set_stroke_color(world.config.edge_color);
    for node in &world.nodes {
        for &other in &node.connections {
            let peer = &world.nodes[other];
            let distance = node_distance(node, peer, &world.entities);
            let distance_ratio = 1.0 - inverse_lerp(min_distance, max_distance, distance);
            let alpha = node.opacity.min(peer.opacity) * distance_ratio;
            if alpha <= 0.0 {
                continue;
            }
            surface.set_alpha(alpha);
            surface.stroke_line(node.position, peer.position);
        }
    }
    surface.restore();
}

fn draw_nodes<S: Surface>(world: &Wormhole, surface: &mut S) {
    surface.set_fill_color(world.config.node_color);
    for &index in &world.node_order {
        let node = &world.nodes[index];
        if node.radius <= 0.0 || node.opacity <= 0.0 {
            continue;
        }
        surface.set_alpha(node.opacity);
        surface.fill_ellipse(node.position, Vec2::splat(node.radius), 0.0);
    }
}

/// Flair fade rides in the gradient stops, so the pass pins the global
/// alpha back to opaque
fn draw_flairs<S: Surface>(world: &Wormhole, surface: &mut S) {
    surface.save();
    surface.set_alpha(1.0);
    for flair in &world.flairs {
        if flair.radius < 1.0 || flair.alpha <= 0.0 {
            continue;
        }
        surface.fill_radial_gradient(
            flair.position,
            flair.radius,
            world.config.flair_color,
            flair.alpha,
        );
    }
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TARGET_FRAME_MS;
    use crate::renderer::surface::{Op, RecordingSurface};
    use crate::settings::Config;

    fn sized_world(frames: usize) -> Wormhole {
        let mut world = Wormhole::new(Config::default(), 7);
        let mut input = FrameInput {
            cursor: Vec2::splat(0.5),
            viewport: Some((1280.0, 720.0)),
        };
        for _ in 0..frames {
            world.step(&input, TARGET_FRAME_MS);
            input.viewport = None;
        }
        world
    }

    fn op_position(ops: &[Op], wanted: impl Fn(&Op) -> bool) -> Option<usize> {
        ops.iter().position(wanted)
    }

    #[test]
    fn test_unsized_frame_paints_background_only() {
        let mut world = Wormhole::new(Config::default(), 7);
        world.step(&FrameInput::default(), TARGET_FRAME_MS);
        let mut surface = RecordingSurface::new();
        draw(&world, &mut surface);
        assert_eq!(
            surface.ops,
            vec![Op::Alpha(1.0), Op::Background(world.config.background)]
        );
    }

    #[test]
    fn test_shape_counts_match_visible_population() {
        let world = sized_world(30);
        let mut surface = RecordingSurface::new();
        draw(&world, &mut surface);

        let visible_entities = world
            .entities
            .iter()
            .filter(|e| e.rect_width.min(e.rect_height) > ENTITY_MIN_DRAW_SIZE)
            .count();
        let visible_nodes = world
            .nodes
            .iter()
            .filter(|n| n.radius > 0.0 && n.opacity > 0.0)
            .count();
        let ellipses = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Ellipse { .. }))
            .count();
        assert_eq!(ellipses, visible_entities + visible_nodes);

        let visible_flairs = world
            .flairs
            .iter()
            .filter(|f| f.radius >= 1.0 && f.alpha > 0.0)
            .count();
        let gradients = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Gradient { .. }))
            .count();
        assert_eq!(gradients, visible_flairs);
        assert!(visible_entities > 0);
        assert!(visible_flairs > 0);
    }

    #[test]
    fn test_edge_lines_bounded_by_connections() {
        let world = sized_world(2);
        let mut surface = RecordingSurface::new();
        draw(&world, &mut surface);
        let lines = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Line { .. }))
            .count();
        assert!(lines <= world.connection_count());
        assert!(lines > 0);
    }

    #[test]
    fn test_pass_order() {
        let world = sized_world(30);
        let mut surface = RecordingSurface::new();
        draw(&world, &mut surface);
        let ops = &surface.ops;

        let background = op_position(ops, |op| matches!(op, Op::Background(_))).unwrap();
        let edge_pass =
            op_position(ops, |op| *op == Op::StrokeColor(world.config.edge_color)).unwrap();
        let node_pass =
            op_position(ops, |op| *op == Op::FillColor(world.config.node_color)).unwrap();
        let flair_pass = op_position(ops, |op| matches!(op, Op::Gradient { .. })).unwrap();

        assert!(background < edge_pass);
        assert!(edge_pass < node_pass);
        assert!(node_pass < flair_pass);

        // Every entity footprint lands before the edge pass
        let last_entity_fill = ops
            .iter()
            .rposition(|op| matches!(op, Op::FillColor(c) if *c != world.config.node_color))
            .unwrap();
        assert!(last_entity_fill < edge_pass);
    }

    #[test]
    fn test_rectangle_shape_config() {
        let mut config = Config::default();
        config.entity_shape = EntityShape::Rectangle;
        let mut world = Wormhole::new(config, 7);
        let input = FrameInput {
            cursor: Vec2::splat(0.5),
            viewport: Some((1280.0, 720.0)),
        };
        world.step(&input, TARGET_FRAME_MS);

        let mut surface = RecordingSurface::new();
        draw(&world, &mut surface);
        let rects = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Rect { .. }))
            .count();
        let visible_entities = world
            .entities
            .iter()
            .filter(|e| e.rect_width.min(e.rect_height) > ENTITY_MIN_DRAW_SIZE)
            .count();
        assert_eq!(rects, visible_entities);
    }

    #[test]
    fn test_entity_paint_follows_draw_order() {
        let world = sized_world(5);
        let mut surface = RecordingSurface::new();
        draw(&world, &mut surface);

        // Footprint sizes along the op stream shrink with descending progress,
        // modulo the shockwave squeeze; just check the first is the largest
        let areas: Vec<f32> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Ellipse { radii, .. } if radii.x != radii.y => Some(radii.x * radii.y),
                _ => None,
            })
            .collect();
        assert!(!areas.is_empty());
        let first = areas[0];
        assert!(areas.iter().all(|&a| a <= first + 1.0));
    }

    #[test]
    fn test_render_frame_resizes_then_paints() {
        let mut world = Wormhole::new(Config::default(), 7);
        let mut surface = RecordingSurface::new();
        let input = FrameInput {
            cursor: Vec2::splat(0.5),
            viewport: Some((1280.0, 720.0)),
        };
        render_frame(&mut world, &input, TARGET_FRAME_MS, &mut surface);
        assert_eq!(surface.ops[0], Op::Resize(1280, 720));
        assert!(surface.shape_count() > 0);

        // Steady frame, no viewport push, no resize
        surface.clear();
        render_frame(&mut world, &FrameInput::default(), TARGET_FRAME_MS, &mut surface);
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Resize(..))));
    }
}
