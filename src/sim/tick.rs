//! Frame orchestration
//!
//! One `step` advances the whole animation by one frame from a single
//! elapsed-milliseconds push; the host scheduler stays outside. Per-frame
//! order matters: pacing and resolution first, then the source chase, the
//! shockwave phase, entities, the node graph, flairs, and finally the
//! timer advance so gated work runs with the frame that crossed its
//! interval.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::color::ColorRamp;
use super::ease::{distribute, inverse_lerp, lerp, rotate_clamp};
use super::graph;
use super::state::{Entity, Flair, Node, Space};
use super::timer::TimerBank;
use crate::consts::*;
use crate::settings::Config;

/// Host pushes for a single frame (deterministic)
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// Latest normalized pointer position, both axes in [0, 1]
    pub cursor: Vec2,
    /// Container size in pixels, pushed when it changes
    pub viewport: Option<(f32, f32)>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            cursor: Vec2::splat(0.5),
            viewport: None,
        }
    }
}

/// The whole animation: shared space, populations, timers, and paint order
pub struct Wormhole {
    pub config: Config,
    pub space: Space,
    pub entities: Vec<Entity>,
    pub nodes: Vec<Node>,
    pub flairs: Vec<Flair>,
    pub timers: TimerBank,
    pub color_ramp: ColorRamp,
    /// Entity indices in paint order, progress descending
    pub draw_order: Vec<usize>,
    /// Node indices in paint order, depth ascending
    pub node_order: Vec<usize>,
    /// Whether the graph has had its initial build on a sized frame
    graph_built: bool,
}

impl Wormhole {
    /// Build the full population from a seed. Entities start evenly spread
    /// across the progress cycle; node and flair attributes are the only
    /// random draws, so equal seeds give equal runs.
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let color_ramp = ColorRamp::generate(
            config.color_ramp_start,
            config.color_ramp_end,
            COLOR_PRECISION,
            |t| t,
        );

        let fragment = 1.0 / config.entity_count.max(1) as f32;
        let entities: Vec<Entity> = (0..config.entity_count)
            .map(|i| Entity::new(i, i as f32 * fragment, &color_ramp))
            .collect();

        let mut nodes = Vec::new();
        let mut flairs = Vec::new();
        for entity in &entities {
            let node_count = rng.random_range(config.node_count[0]..=config.node_count[1]);
            for _ in 0..node_count {
                let index = nodes.len();
                nodes.push(Node::new(
                    index,
                    entity.index,
                    rng.random_range(0.0..360.0),
                    rng.random_range(config.node_distance_range[0]..config.node_distance_range[1]),
                    rng.random_range(config.node_scale_range[0]..config.node_scale_range[1]),
                ));
            }

            let flair_count = rng.random_range(config.flair_count[0]..=config.flair_count[1]);
            for _ in 0..flair_count {
                flairs.push(spawn_flair(&mut rng, entity.index, &config));
            }
        }

        log::info!(
            "wormhole ready: {} entities, {} nodes, {} flairs (seed {seed})",
            entities.len(),
            nodes.len(),
            flairs.len()
        );

        let draw_order = (0..entities.len()).collect();
        let node_order = (0..nodes.len()).collect();

        Self {
            config,
            space: Space::new(),
            entities,
            nodes,
            flairs,
            timers: TimerBank::new(),
            color_ramp,
            draw_order,
            node_order,
            graph_built: false,
        }
    }

    /// Advance the simulation one frame. Returns true when the internal
    /// resolution changed and the host surface needs a resize.
    pub fn step(&mut self, input: &FrameInput, elapsed_ms: f32) -> bool {
        self.space.frame_time = elapsed_ms;
        self.space.framerate_speed = elapsed_ms / TARGET_FRAME_MS;

        // Viewport pushes take effect immediately at full scale
        let mut resized = false;
        if let Some((width, height)) = input.viewport {
            self.space.set_viewport(width, height);
            self.space.update_resolution(false);
            resized = true;
            log::info!(
                "viewport {width}x{height}, render {}x{}",
                self.space.resolution.x,
                self.space.resolution.y
            );
        }

        // Off-target frames re-derive the resolution, at most a couple of
        // times per second so the scale settles instead of oscillating
        if (self.space.framerate_speed - 1.0).abs() > 0.1
            && self
                .timers
                .tick("framerate_smoothing", self.config.framerate_smoothing_interval)
        {
            let before = self.space.resolution;
            self.space.update_resolution(true);
            if self.space.resolution != before {
                resized = true;
                log::debug!(
                    "framerate {:.2}x target, render scale {:.2}",
                    self.space.framerate_speed,
                    self.space.resolution_scale
                );
            }
        }

        // The source chases the mirrored pointer inside the travel band
        let travel = self.config.source_travel;
        self.space.target_source = Vec2::new(
            lerp(travel[0], travel[1], 1.0 - input.cursor.x),
            lerp(travel[0], travel[1], 1.0 - input.cursor.y),
        );
        let follow = (self.config.source_smoothing * self.space.framerate_speed).clamp(0.0, 1.0);
        self.space.source = self.space.source.lerp(self.space.target_source, follow);

        // Shockwave phase rides entity speed and wraps in [0, 1]
        let delta = self.space.entity_speed(&self.config)
            * self.config.shockwave_speed_multiplier
            * 0.001;
        let (phase, _) = rotate_clamp(self.space.shock_wave + delta, 0.0, 1.0);
        self.space.shock_wave = phase;

        for entity in &mut self.entities {
            entity.tick(&self.space, &self.config);
            entity.update(&self.space, &self.config, &self.color_ramp);
        }

        // Larger footprints paint first so younger entities stack over them
        let entities = &self.entities;
        self.draw_order.sort_by(|&a, &b| {
            entities[b]
                .progress
                .partial_cmp(&entities[a].progress)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Nodes ride their entities; a wrapped entity sheds its stale edges
        for node in &mut self.nodes {
            let entity = &self.entities[node.entity];
            node.refresh(entity, &self.space, &self.config);
            if entity.wrapped && !node.connections.is_empty() {
                node.connections.clear();
            }
        }

        // Periodic full reshuffle of the graph, plus one initial build on
        // the first sized frame
        let reconnect = self
            .timers
            .tick("node_reconnect", self.config.reconnect_interval);
        if self.space.resolution_size > 0.0 && (reconnect || !self.graph_built) {
            if reconnect {
                for node in &mut self.nodes {
                    node.connections.clear();
                }
            }
            graph::connect_nodes(&mut self.nodes, &self.entities, &self.space, &self.config);
            self.graph_built = true;
        }

        // Shallow nodes paint first
        let nodes = &self.nodes;
        self.node_order.sort_by(|&a, &b| {
            nodes[a]
                .position_z
                .partial_cmp(&nodes[b].position_z)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for flair in &mut self.flairs {
            flair.refresh(&self.entities[flair.entity], &self.space, &self.config);
        }

        // Last, so timer-gated work above ran against this frame's elapsed
        self.timers.advance_all(self.space.frame_time);

        resized
    }

    /// Total live edges, counting each initiated edge once
    pub fn connection_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum()
    }
}

/// Flair placement: offsets bunch around the footprint center and thin out
/// toward (and slightly past) the rim; the fade peak follows the flair's
/// position inside the scale range so small flairs light up early
fn spawn_flair(rng: &mut Pcg32, entity: usize, config: &Config) -> Flair {
    let spread =
        |rng: &mut Pcg32| 0.5 + 0.6 * distribute(rng.random_range(0.0..1.0), |x| x * x, 0.0, 1.0);
    let offset = Vec2::new(spread(rng), spread(rng));
    let scale = rng.random_range(config.flair_scale_range[0]..config.flair_scale_range[1]);
    let fade_peak = inverse_lerp(config.flair_scale_range[0], config.flair_scale_range[1], scale)
        .clamp(0.15, 0.85);
    Flair::new(entity, offset, scale, fade_peak)
}
