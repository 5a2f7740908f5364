//! Petal Dash - a side-scrolling flower-gate flapping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gate lifecycle, trail, run state)
//! - `tuning`: Data-driven game balance, clamped on load
//! - `store`: Key-value persistence port (best score)

pub mod sim;
pub mod store;
pub mod tuning;

pub use store::{JsonFileStore, KvStore, MemStore};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible world vertical span (orthographic half-height 5)
    pub const WORLD_MIN_Y: f32 = -5.0;
    pub const WORLD_MAX_Y: f32 = 5.0;
    /// Top of the ground strip in world units
    pub const GROUND_TOP_Y: f32 = -4.0;

    /// Gap randomization bounds (world units)
    pub const GAP_MIN: f32 = 1.2;
    pub const GAP_MAX: f32 = 2.2;
    /// Safe margin from the top of the world and from the ground
    pub const GATE_MARGIN: f32 = 0.6;
    /// Extra safety margin supplied by the spawner
    pub const TOP_MARGIN: f32 = 0.6;

    /// World scroll speed (units/s), shared by gates, trail, and ground
    pub const SCROLL_SPEED: f32 = 2.5;
    /// Horizontal distance between consecutive gates
    pub const SPAWN_SPACING_X: f32 = 3.0;
    /// Where new gates appear (right of the visible area)
    pub const SPAWN_X: f32 = 7.5;
    /// Where gates are recycled (left of the visible area)
    pub const DESPAWN_X: f32 = -7.5;
    /// Gates pre-constructed at startup
    pub const POOL_WARM_SIZE: usize = 8;

    /// Score-zone trigger width (height spans the gap)
    pub const SCORE_ZONE_WIDTH: f32 = 0.6;

    /// Trail ring-buffer capacity
    pub const TRAIL_CAP_POINTS: usize = 80;
    /// Trail target length = min(cap, score * points_per_score)
    pub const POINTS_PER_SCORE: u32 = 10;
    /// Seconds between trail samples
    pub const SAMPLE_INTERVAL: f32 = 0.05;

    /// Avatar physics
    pub const FLAP_VELOCITY: f32 = 6.5;
    pub const GRAVITY: f32 = 9.81 * 1.6;
    pub const MAX_UPWARD_VELOCITY: f32 = 10.0;
    pub const TOP_CLAMP_Y: f32 = 5.0;
    pub const PLAYER_HALF_EXTENT: f32 = 0.25;

    /// Ground tile width in world units (sprite width)
    pub const GROUND_TILE_WIDTH: f32 = 10.0;
}
