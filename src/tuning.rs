//! Data-driven game balance
//!
//! All numeric knobs the sim consumes. Values are validated only by
//! clamping - a bad file never rejects, it degrades to something playable.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Numeric configuration for a run. Construct via `Default`, `load`, or a
/// struct literal in tests; call `sanitize` after hand-editing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Gap randomization ===
    pub gap_min: f32,
    pub gap_max: f32,
    /// Safe margin from top and ground (world units)
    pub gate_margin: f32,
    /// Extra safety margin the spawner feeds the solver
    pub top_margin: f32,

    // === Spawn & movement ===
    pub scroll_speed: f32,
    /// World units between gates (distance-based feel)
    pub spawn_spacing_x: f32,
    /// Where new gates appear (right side)
    pub spawn_x: f32,
    /// When past left side, recycle
    pub despawn_x: f32,
    pub pool_warm_size: usize,

    // === Score zone ===
    pub score_zone_width: f32,

    // === Trail growth ===
    pub trail_cap_points: usize,
    /// Trail target = min(cap, score * points_per_score)
    pub points_per_score: u32,
    /// Seconds between trail samples
    pub sample_interval: f32,

    // === Avatar physics ===
    pub flap_velocity: f32,
    pub gravity: f32,
    pub max_upward_velocity: f32,
    pub clamp_top_of_screen: bool,
    pub top_clamp_y: f32,
    pub player_half_extent: f32,

    // === World ===
    pub world_min_y: f32,
    pub world_max_y: f32,
    pub ground_top_y: f32,
    pub ground_tile_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gap_min: consts::GAP_MIN,
            gap_max: consts::GAP_MAX,
            gate_margin: consts::GATE_MARGIN,
            top_margin: consts::TOP_MARGIN,

            scroll_speed: consts::SCROLL_SPEED,
            spawn_spacing_x: consts::SPAWN_SPACING_X,
            spawn_x: consts::SPAWN_X,
            despawn_x: consts::DESPAWN_X,
            pool_warm_size: consts::POOL_WARM_SIZE,

            score_zone_width: consts::SCORE_ZONE_WIDTH,

            trail_cap_points: consts::TRAIL_CAP_POINTS,
            points_per_score: consts::POINTS_PER_SCORE,
            sample_interval: consts::SAMPLE_INTERVAL,

            flap_velocity: consts::FLAP_VELOCITY,
            gravity: consts::GRAVITY,
            max_upward_velocity: consts::MAX_UPWARD_VELOCITY,
            clamp_top_of_screen: false,
            top_clamp_y: consts::TOP_CLAMP_Y,
            player_half_extent: consts::PLAYER_HALF_EXTENT,

            world_min_y: consts::WORLD_MIN_Y,
            world_max_y: consts::WORLD_MAX_Y,
            ground_top_y: consts::GROUND_TOP_Y,
            ground_tile_width: consts::GROUND_TILE_WIDTH,
        }
    }
}

impl Tuning {
    /// Clamp every field into a usable range. Never rejects.
    pub fn sanitize(&mut self) {
        fn finite_or(v: f32, fallback: f32) -> f32 {
            if v.is_finite() { v } else { fallback }
        }

        self.gap_min = finite_or(self.gap_min, consts::GAP_MIN).max(0.1);
        self.gap_max = finite_or(self.gap_max, consts::GAP_MAX).max(self.gap_min);
        self.gate_margin = finite_or(self.gate_margin, consts::GATE_MARGIN).max(0.0);
        self.top_margin = finite_or(self.top_margin, consts::TOP_MARGIN).max(0.0);

        self.scroll_speed = finite_or(self.scroll_speed, consts::SCROLL_SPEED).max(0.01);
        self.spawn_spacing_x = finite_or(self.spawn_spacing_x, consts::SPAWN_SPACING_X).max(0.1);
        if !self.spawn_x.is_finite() {
            self.spawn_x = consts::SPAWN_X;
        }
        self.despawn_x = finite_or(self.despawn_x, consts::DESPAWN_X).min(self.spawn_x);
        self.pool_warm_size = self.pool_warm_size.min(256);

        self.score_zone_width = finite_or(self.score_zone_width, consts::SCORE_ZONE_WIDTH).max(0.01);

        self.trail_cap_points = self.trail_cap_points.clamp(1, 4096);
        self.sample_interval = finite_or(self.sample_interval, consts::SAMPLE_INTERVAL).max(0.001);

        self.flap_velocity = finite_or(self.flap_velocity, consts::FLAP_VELOCITY).max(0.0);
        self.gravity = finite_or(self.gravity, consts::GRAVITY).max(0.0);
        self.max_upward_velocity =
            finite_or(self.max_upward_velocity, consts::MAX_UPWARD_VELOCITY).max(0.0);
        if !self.top_clamp_y.is_finite() {
            self.top_clamp_y = consts::TOP_CLAMP_Y;
        }
        self.player_half_extent =
            finite_or(self.player_half_extent, consts::PLAYER_HALF_EXTENT).max(0.01);

        self.world_min_y = finite_or(self.world_min_y, consts::WORLD_MIN_Y);
        self.world_max_y = finite_or(self.world_max_y, consts::WORLD_MAX_Y).max(self.world_min_y);
        self.ground_top_y = finite_or(self.ground_top_y, consts::GROUND_TOP_Y)
            .clamp(self.world_min_y, self.world_max_y);
        self.ground_tile_width =
            finite_or(self.ground_tile_width, consts::GROUND_TILE_WIDTH).max(0.1);
    }

    /// Load from a JSON file; any error falls back to defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Tuning>(&json) {
                Ok(mut tuning) => {
                    tuning.sanitize();
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Best-effort save.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Failed to save tuning to {}: {e}", path.display());
                } else {
                    log::info!("Tuning saved to {}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize tuning: {e}"),
        }
    }
}
