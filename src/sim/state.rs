//! Simulation state: the shared space plus entities, nodes, and flairs
//!
//! Derived visual attributes live as plain fields refreshed once per frame,
//! so the graph pass and the paint pass read positions without recomputing
//! getter chains. Nodes and flairs reference their owning entity by index;
//! nothing here holds pointers into sibling collections.

use glam::{Vec2, Vec3};

use super::color::{ColorRamp, Rgb};
use super::ease::{cutoff, distance_multiplier, lerp, lerp_scaled, rotate_clamp};
use crate::consts::*;
use crate::polar_offset;
use crate::settings::Config;

/// Shared per-run context: the pointer-driven source point, resolution
/// bookkeeping, frame pacing, and the global shockwave phase
#[derive(Debug, Clone)]
pub struct Space {
    /// Smoothed perspective origin, both axes in [0, 1]
    pub source: Vec2,
    /// Where the source is headed, from the latest pointer push
    pub target_source: Vec2,
    /// Elapsed wall-clock milliseconds for the current frame
    pub frame_time: f32,
    /// frame_time / TARGET_FRAME_MS; scales every per-frame delta
    pub framerate_speed: f32,
    /// Container size in CSS pixels
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Smaller container dimension
    pub canvas_size: f32,
    /// Internal render resolution (container scaled by resolution_scale)
    pub resolution: Vec2,
    pub resolution_size: f32,
    pub resolution_scale: f32,
    /// Resolution-aware size normalizer against the target screen size
    pub screen_scale: f32,
    /// Global cyclic phase perturbing entity sizing, in [0, 1]
    pub shock_wave: f32,
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl Space {
    pub fn new() -> Self {
        Self {
            source: Vec2::splat(0.5),
            target_source: Vec2::splat(0.5),
            frame_time: TARGET_FRAME_MS,
            framerate_speed: 1.0,
            canvas_width: 0.0,
            canvas_height: 0.0,
            canvas_size: 0.0,
            resolution: Vec2::ZERO,
            resolution_size: 0.0,
            resolution_scale: 1.0,
            screen_scale: 0.0,
            shock_wave: 1.0,
        }
    }

    /// Per-frame progress delta, scaled for the actual frame cadence
    #[inline]
    pub fn entity_speed(&self, config: &Config) -> f32 {
        config.entity_speed * self.framerate_speed
    }

    #[inline]
    pub fn shockwave_squared(&self) -> f32 {
        self.shock_wave * self.shock_wave
    }

    /// Node radius base in render pixels
    #[inline]
    pub fn node_size(&self, config: &Config) -> f32 {
        config.node_size * self.screen_scale
    }

    /// Synthetic depth per unit of entity width
    #[inline]
    pub fn node_z(&self, config: &Config) -> f32 {
        self.resolution_size * config.node_z_scale
    }

    /// Connection distance band in render pixels
    #[inline]
    pub fn node_min_distance(&self, config: &Config) -> f32 {
        self.resolution_size * config.node_min_distance
    }

    #[inline]
    pub fn node_max_distance(&self, config: &Config) -> f32 {
        self.resolution_size * config.node_max_distance
    }

    /// Record a container size push from the host
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.canvas_width = width;
        self.canvas_height = height;
        self.canvas_size = width.min(height);
    }

    /// Recompute the internal resolution. With `auto_framerate`, the scale
    /// shrinks toward the MINIMUM_RESOLUTION pixel-area floor while frames
    /// run slower than the target; otherwise it resets to 1.
    pub fn update_resolution(&mut self, auto_framerate: bool) {
        self.resolution_scale = 1.0;
        if auto_framerate {
            let canvas_resolution = self.canvas_width * self.canvas_height;
            if canvas_resolution > 0.0 {
                let minimum = canvas_resolution.min(MINIMUM_RESOLUTION);
                let performance_index = if self.framerate_speed > 0.0 {
                    1.0 / self.framerate_speed
                } else {
                    0.0
                };
                self.resolution_scale = lerp(minimum / canvas_resolution, 1.0, performance_index);
            }
        }
        self.screen_scale = self.canvas_size / TARGET_SCREEN_SIZE * self.resolution_scale;
        self.resolution = Vec2::new(
            (self.canvas_width * self.resolution_scale).round(),
            (self.canvas_height * self.resolution_scale).round(),
        );
        self.resolution_size = self.resolution.x.min(self.resolution.y);
    }
}

/// One pulsing shape cycling through the wormhole
#[derive(Debug, Clone)]
pub struct Entity {
    pub index: usize,
    /// Cyclic counter in [0, ENTITY_PRECISION]
    pub virtual_progress: f32,
    /// round(virtual_progress) / ENTITY_PRECISION
    pub progress: f32,
    /// True for exactly the frame the counter wrapped
    pub wrapped: bool,

    // Derived once per frame by `update`
    /// Unitless footprint scale, progress squared times two
    pub width: f32,
    pub height: f32,
    /// Footprint in render pixels, before the shockwave multiplier
    pub rect_width: f32,
    pub rect_height: f32,
    pub opacity: f32,
    /// Degrees; drives the ellipse tilt and node orbits
    pub rotation: f32,
    /// Shockwave squeeze on the footprint, 1 when untouched
    pub size_multiplier: f32,
    /// Smoothed display color, channels in 0..=255
    pub color: Vec3,
}

impl Entity {
    pub fn new(index: usize, progress: f32, ramp: &ColorRamp) -> Self {
        let mut entity = Self {
            index,
            virtual_progress: progress * ENTITY_PRECISION,
            progress: 0.0,
            wrapped: false,
            width: 0.0,
            height: 0.0,
            rect_width: 0.0,
            rect_height: 0.0,
            opacity: 0.0,
            rotation: 0.0,
            size_multiplier: 1.0,
            color: ramp.sample(progress).to_vec3(),
        };
        entity.snap_progress();
        entity
    }

    fn snap_progress(&mut self) {
        self.progress = lerp_scaled(0.0, 1.0, self.virtual_progress.round(), ENTITY_PRECISION);
    }

    /// Advance the cyclic counter one frame, recording a wrap
    pub fn tick(&mut self, space: &Space, config: &Config) {
        self.virtual_progress += space.entity_speed(config) * (ENTITY_PRECISION / 1000.0);
        let (value, wrapped) = rotate_clamp(self.virtual_progress, 0.0, ENTITY_PRECISION);
        self.virtual_progress = value;
        self.wrapped = wrapped;
        self.snap_progress();
    }

    /// Recompute the derived visual attributes for this frame
    pub fn update(&mut self, space: &Space, config: &Config, ramp: &ColorRamp) {
        self.width = self.progress * self.progress * 2.0;
        self.height = self.width;
        self.rect_width = self.width * space.resolution_size * config.rectangle_width;
        self.rect_height = self.height * space.resolution_size * config.rectangle_height;

        let [cut, a, b, c] = config.opacity_curve;
        self.opacity = cutoff(self.progress, cut, a, b, c);
        let [cut, a, b, c] = config.rotation_curve;
        self.rotation = cutoff(self.progress, cut, a, b, c);

        let shockwave = self.shockwave_distance(space, config);
        self.size_multiplier = lerp(1.0, config.shockwave_size_multiplier, shockwave);

        let target = ramp.sample(self.progress).to_vec3();
        if config.color_smoothing > 0.0 {
            let follow = (config.color_smoothing * space.framerate_speed).clamp(0.0, 1.0);
            self.color = self.color.lerp(target, follow);
        } else {
            self.color = target;
        }
    }

    /// Proximity of this entity's progress to the traveling shockwave phase,
    /// in [0, 1]. The reach narrows and the response fades as the entity ages
    /// so the front reads strongest near the center.
    fn shockwave_distance(&self, space: &Space, config: &Config) -> f32 {
        let faded_max = lerp(config.shockwave_max_distance, 0.0, self.progress.sqrt());
        let proximity =
            distance_multiplier(self.progress, space.shockwave_squared(), faded_max, true);
        lerp(proximity, 0.0, self.progress * 2.0)
    }

    #[inline]
    pub fn scaled_rect_width(&self) -> f32 {
        self.rect_width * self.size_multiplier
    }

    #[inline]
    pub fn scaled_rect_height(&self) -> f32 {
        self.rect_height * self.size_multiplier
    }

    /// Smaller scaled footprint dimension
    #[inline]
    pub fn scaled_rect_size(&self) -> f32 {
        self.scaled_rect_width().min(self.scaled_rect_height())
    }

    /// Center position in render pixels. The source maps across the space
    /// left over after the footprint, so entities never overflow the edges.
    pub fn position(&self, space: &Space) -> Vec2 {
        let scaled = Vec2::new(self.scaled_rect_width(), self.scaled_rect_height());
        space.source * (space.resolution - scaled) + scaled * 0.5
    }

    pub fn display_color(&self) -> Rgb {
        Rgb::from_vec3(self.color)
    }
}

/// Satellite point orbiting an entity. Connections are indices into the flat
/// node list; only the initiating side records an edge, and lookups treat
/// the pair as undirected.
#[derive(Debug, Clone)]
pub struct Node {
    pub index: usize,
    /// Owning entity index, fixed at creation
    pub entity: usize,
    /// Polar placement around the entity center, degrees
    pub angle: f32,
    /// Orbit distance as a fraction of the footprint size
    pub distance: f32,
    /// Per-node size multiplier
    pub size: f32,
    /// Outgoing edges by node index
    pub connections: Vec<usize>,

    // Derived once per frame by `refresh`
    pub position: Vec2,
    /// Synthetic depth, larger for wider entities
    pub position_z: f32,
    /// Draw radius in render pixels
    pub radius: f32,
    pub opacity: f32,
}

impl Node {
    pub fn new(index: usize, entity: usize, angle: f32, distance: f32, size: f32) -> Self {
        Self {
            index,
            entity,
            angle,
            distance,
            size,
            connections: Vec::new(),
            position: Vec2::ZERO,
            position_z: 0.0,
            radius: 0.0,
            opacity: 0.0,
        }
    }

    /// Recompute position, depth, radius, and fade from the owning entity.
    /// The orbit counter-rotates against the entity so nodes hold steady
    /// while the footprint spins under them.
    pub fn refresh(&mut self, entity: &Entity, space: &Space, config: &Config) {
        let offset = polar_offset(
            self.angle - entity.rotation,
            self.distance * entity.scaled_rect_size(),
        );
        self.position = entity.position(space) + offset;
        self.position_z = entity.width * space.node_z(config);
        self.radius = space.node_size(config) * self.size * entity.width;
        self.opacity = lerp(
            1.0 - entity.progress,
            0.0,
            1.0 - entity.progress.sqrt(),
        );
    }

    /// True if this node initiated an edge to `other`
    pub fn connected_to(&self, other: usize) -> bool {
        self.connections.contains(&other)
    }
}

/// Decorative sprite pinned to a fixed spot on an entity's footprint
#[derive(Debug, Clone)]
pub struct Flair {
    /// Owning entity index, fixed at creation
    pub entity: usize,
    /// Relative placement across the footprint; slightly outside [0, 1] so
    /// sprites can spill past the rim
    pub offset: Vec2,
    /// Size multiplier within the configured scale range
    pub scale: f32,
    /// Progress where the fade peaks; smaller flairs peak earlier
    pub fade_peak: f32,

    // Derived once per frame by `refresh`
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

impl Flair {
    pub fn new(entity: usize, offset: Vec2, scale: f32, fade_peak: f32) -> Self {
        Self {
            entity,
            offset,
            scale,
            fade_peak,
            position: Vec2::ZERO,
            radius: 0.0,
            alpha: 0.0,
        }
    }

    /// Recompute position, radius, and fade from the owning entity
    pub fn refresh(&mut self, entity: &Entity, space: &Space, config: &Config) {
        let scaled = Vec2::new(entity.scaled_rect_width(), entity.scaled_rect_height());
        let top_left = entity.position(space) - scaled * 0.5;
        self.position = top_left + self.offset * scaled;
        self.radius = config.flair_size * space.screen_scale * self.scale * entity.width;
        self.alpha = cutoff(entity.progress, self.fade_peak, 0.0, config.flair_max_alpha, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_space(width: f32, height: f32) -> Space {
        let mut space = Space::new();
        space.set_viewport(width, height);
        space.update_resolution(false);
        space
    }

    fn test_ramp(config: &Config) -> ColorRamp {
        ColorRamp::generate(config.color_ramp_start, config.color_ramp_end, COLOR_PRECISION, |t| t)
    }

    #[test]
    fn test_resolution_full_scale() {
        let space = sized_space(1920.0, 1080.0);
        assert_eq!(space.resolution, Vec2::new(1920.0, 1080.0));
        assert_eq!(space.resolution_size, 1080.0);
        assert_eq!(space.resolution_scale, 1.0);
        assert!((space.screen_scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_resolution_downscales_under_load() {
        let mut space = sized_space(1920.0, 1080.0);
        // Frames taking twice the target pull the scale toward the floor
        space.framerate_speed = 2.0;
        space.update_resolution(true);
        assert!(space.resolution_scale < 1.0);
        let floor = MINIMUM_RESOLUTION / (1920.0 * 1080.0);
        assert!(space.resolution_scale >= floor - 1e-6);
        assert!(space.resolution.x < 1920.0);
        // A later plain resize resets the scale
        space.update_resolution(false);
        assert_eq!(space.resolution_scale, 1.0);
    }

    #[test]
    fn test_resolution_small_canvas_never_upscales() {
        let mut space = sized_space(640.0, 480.0);
        space.framerate_speed = 3.0;
        space.update_resolution(true);
        // Canvas area is already below the floor
        assert!(space.resolution_scale <= 1.0 + 1e-6);
    }

    #[test]
    fn test_entity_tick_wraps_backward() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.0, &ramp);
        assert_eq!(entity.progress, 0.0);

        // Default speed is negative, so the first step wraps to the top
        entity.tick(&space, &config);
        assert!(entity.wrapped);
        assert!(entity.progress > 0.99);

        entity.tick(&space, &config);
        assert!(!entity.wrapped);
    }

    #[test]
    fn test_entity_tick_delta() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.5, &ramp);
        assert_eq!(entity.virtual_progress, 2500.0);

        // Speed -0.25 over precision 5000 moves the counter -1.25 per
        // target frame; the snapped numerator rounds to the nearest integer
        entity.tick(&space, &config);
        assert!((entity.virtual_progress - 2498.75).abs() < 1e-3);
        assert!((entity.progress - 2499.0 / 5000.0).abs() < 1e-6);
    }

    #[test]
    fn test_progress_bounded_over_long_runs() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.25, &ramp);
        for _ in 0..10_000 {
            entity.tick(&space, &config);
            assert!((0.0..=1.0).contains(&entity.progress));
            assert!((0.0..=ENTITY_PRECISION).contains(&entity.virtual_progress));
        }
    }

    #[test]
    fn test_entity_footprint_formulas() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.5, &ramp);
        entity.update(&space, &config, &ramp);

        assert!((entity.width - 0.5).abs() < 1e-3);
        assert!((entity.rect_width - 0.5 * 720.0 * 2.0).abs() < 1.0);
        assert!((entity.rect_height - 0.5 * 720.0 * 1.3).abs() < 1.0);
        // Opacity curve peaks at its breakpoint
        assert!((entity.opacity - 0.7).abs() < 1e-2);
    }

    #[test]
    fn test_entity_position_stays_inside() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let mut space = sized_space(1280.0, 720.0);
        // Footprint fits the resolution at this progress, so extreme source
        // positions pin the entity flush against the edges
        let mut entity = Entity::new(0, 0.5, &ramp);
        entity.update(&space, &config, &ramp);

        for corner in [Vec2::ZERO, Vec2::ONE] {
            space.source = corner;
            let pos = entity.position(&space);
            let half = Vec2::new(entity.scaled_rect_width(), entity.scaled_rect_height()) * 0.5;
            assert!(pos.x - half.x >= -1e-3 && pos.x + half.x <= space.resolution.x + 1e-3);
            assert!(pos.y - half.y >= -1e-3 && pos.y + half.y <= space.resolution.y + 1e-3);
        }
    }

    #[test]
    fn test_shockwave_squeezes_matching_progress() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let mut space = sized_space(1280.0, 720.0);

        // Phase square sits exactly on the entity's progress
        space.shock_wave = 0.5;
        let mut on_front = Entity::new(0, 0.25, &ramp);
        on_front.update(&space, &config, &ramp);
        assert!(on_front.size_multiplier < 1.0);

        // Far from the front, the footprint is untouched
        space.shock_wave = 0.95;
        let mut off_front = Entity::new(1, 0.25, &ramp);
        off_front.update(&space, &config, &ramp);
        assert!((off_front.size_multiplier - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_shockwave_ignores_old_entities() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let mut space = sized_space(1280.0, 720.0);
        space.shock_wave = (0.9f32).sqrt();
        let mut entity = Entity::new(0, 0.9, &ramp);
        entity.update(&space, &config, &ramp);
        // progress * 2 >= 1 fades the response out entirely
        assert!((entity.size_multiplier - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_color_smoothing_chases_ramp() {
        let mut config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);

        let mut entity = Entity::new(0, 0.0, &ramp);
        entity.progress = 1.0;
        entity.update(&space, &config, &ramp);
        let target = ramp.sample(1.0).to_vec3();
        let after_one = entity.color.distance(target);
        assert!(after_one > 0.0);
        for _ in 0..400 {
            entity.update(&space, &config, &ramp);
        }
        assert!(entity.color.distance(target) < 1.0);

        // Smoothing off snaps immediately
        config.color_smoothing = 0.0;
        let mut snap = Entity::new(0, 0.0, &ramp);
        snap.progress = 1.0;
        snap.update(&space, &config, &ramp);
        assert_eq!(snap.display_color(), ramp.sample(1.0));
    }

    #[test]
    fn test_node_orbit_counter_rotates() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.5, &ramp);
        entity.update(&space, &config, &ramp);

        let mut node = Node::new(0, 0, 90.0, 1.0, 1.0);
        node.refresh(&entity, &space, &config);
        let first = node.position;

        entity.rotation += 90.0;
        node.refresh(&entity, &space, &config);
        assert!(node.position.distance(first) > 1.0);

        // Depth scales with entity width
        assert!((node.position_z - entity.width * space.node_z(&config)).abs() < 1e-3);
    }

    #[test]
    fn test_node_opacity_vanishes_at_cycle_ends() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.0, &ramp);

        entity.progress = 0.0;
        let mut node = Node::new(0, 0, 0.0, 1.0, 1.0);
        node.refresh(&entity, &space, &config);
        assert!(node.opacity.abs() < 1e-6);

        entity.progress = 1.0;
        node.refresh(&entity, &space, &config);
        assert!(node.opacity.abs() < 1e-6);

        entity.progress = 0.4;
        node.refresh(&entity, &space, &config);
        assert!(node.opacity > 0.3);
    }

    #[test]
    fn test_flair_rides_footprint() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.6, &ramp);
        entity.update(&space, &config, &ramp);

        let mut flair = Flair::new(0, Vec2::splat(0.5), 0.6, 0.5);
        flair.refresh(&entity, &space, &config);
        // Center offset lands on the entity center
        assert!(flair.position.distance(entity.position(&space)) < 1e-3);
        assert!(flair.radius > 0.0);

        let mut corner = Flair::new(0, Vec2::ZERO, 0.6, 0.5);
        corner.refresh(&entity, &space, &config);
        let expected = entity.position(&space)
            - Vec2::new(entity.scaled_rect_width(), entity.scaled_rect_height()) * 0.5;
        assert!(corner.position.distance(expected) < 1e-3);
    }

    #[test]
    fn test_flair_fade_peaks_at_threshold() {
        let config = Config::default();
        let ramp = test_ramp(&config);
        let space = sized_space(1280.0, 720.0);
        let mut entity = Entity::new(0, 0.0, &ramp);
        let mut flair = Flair::new(0, Vec2::splat(0.5), 0.6, 0.4);

        entity.progress = 0.4;
        flair.refresh(&entity, &space, &config);
        assert!((flair.alpha - config.flair_max_alpha).abs() < 1e-3);

        entity.progress = 1.0;
        flair.refresh(&entity, &space, &config);
        assert!(flair.alpha.abs() < 1e-3);
    }
}
