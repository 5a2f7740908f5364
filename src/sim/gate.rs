//! Flower gate obstacles and the gap-placement solver
//!
//! A gate is two head/stem assemblies with a randomized gap between them.
//! The solver is pure: given the visible world bounds and the constraint
//! set it produces a `GateGeometry` that is always feasible (bounds clamp
//! instead of failing) and whose score zone exactly spans the gap.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, center + full size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size * 0.5;
        (point.x - self.center.x).abs() <= half.x && (point.y - self.center.y).abs() <= half.y
    }

    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let half = (self.size + other.size) * 0.5;
        (other.center.x - self.center.x).abs() <= half.x
            && (other.center.y - self.center.y).abs() <= half.y
    }
}

/// Visible vertical span the spawner derives from the camera each spawn.
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub min_y: f32,
    pub max_y: f32,
    /// Top of the ground strip; gaps never reach below this plus margin
    pub ground_top_y: f32,
}

/// Authored part measurements, captured once from the prefab layout.
///
/// Stems are fixed-length: they reposition rigidly with their paired head
/// and never scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateLayout {
    /// Rendered sizes of the head sprites (world units)
    pub head_size: Vec2,
    /// Rendered sizes of the stem sprites (world units)
    pub stem_size: Vec2,
    /// Rigid offset of each stem from its paired head, from the authored
    /// prefab (top stem sits above the top head, bottom stem below)
    pub top_stem_offset: Vec2,
    pub bottom_stem_offset: Vec2,
    /// Authored fudge: the bottom head sits slightly lower than symmetric
    pub bottom_head_y_offset: f32,
    /// Base scale of the stem sprites (reset on every reuse, never changed)
    pub stem_base_scale: Vec2,
}

impl Default for GateLayout {
    fn default() -> Self {
        Self {
            head_size: Vec2::new(0.9, 0.9),
            stem_size: Vec2::new(0.35, 2.0),
            top_stem_offset: Vec2::new(0.0, 1.45),
            bottom_stem_offset: Vec2::new(0.0, -1.45),
            bottom_head_y_offset: -0.15,
            stem_base_scale: Vec2::ONE,
        }
    }
}

/// Constraint set for gap placement, sourced from tuning.
#[derive(Debug, Clone, Copy)]
pub struct GateConstraints {
    pub gap_min: f32,
    pub gap_max: f32,
    /// Safe margin from the top of the world and from the ground
    pub margin: f32,
    pub score_zone_width: f32,
}

/// Solver output: one valid gate placement. Computed fresh per spawn.
#[derive(Debug, Clone, Copy)]
pub struct GateGeometry {
    pub gap_center_y: f32,
    pub gap_top_y: f32,
    pub gap_bottom_y: f32,
    pub top_head_center_y: f32,
    pub bottom_head_center_y: f32,
    /// Trigger box spanning the gap, positioned relative to the gate's x
    pub score_zone: Rect,
}

impl GateConstraints {
    /// Compute a valid gate placement within `bounds`.
    ///
    /// `safe_margin` is the caller's extra margin; the larger of it and the
    /// configured margin wins. A world too short for margin + gap collapses
    /// the placement band to its midpoint instead of failing.
    pub fn solve(
        &self,
        bounds: WorldBounds,
        safe_margin: f32,
        layout: &GateLayout,
        rng: &mut Pcg32,
    ) -> GateGeometry {
        let m = self.margin.max(safe_margin);
        let ground_top_y = bounds.ground_top_y.max(bounds.min_y);

        // 1) Random gap size in [gap_min, gap_max]
        let gap = if self.gap_max > self.gap_min {
            rng.random_range(self.gap_min..=self.gap_max)
        } else {
            self.gap_min
        };
        let half_gap = gap * 0.5;

        // 2) Random vertical placement within safe bounds
        let mut min_center_y = ground_top_y + m + half_gap;
        let mut max_center_y = (bounds.max_y - m) - half_gap;

        if max_center_y < min_center_y {
            let mid = (min_center_y + max_center_y) * 0.5;
            min_center_y = mid;
            max_center_y = mid;
        }

        let gap_center_y = if max_center_y > min_center_y {
            rng.random_range(min_center_y..=max_center_y)
        } else {
            min_center_y
        };
        let gap_top_y = gap_center_y + half_gap;
        let gap_bottom_y = gap_center_y - half_gap;

        // Heads anchor to the gap edges: near edge touches the boundary
        let top_head_center_y = gap_top_y + layout.head_size.y * 0.5;
        let bottom_head_center_y = gap_bottom_y - layout.head_size.y * 0.5;

        GateGeometry {
            gap_center_y,
            gap_top_y,
            gap_bottom_y,
            top_head_center_y,
            bottom_head_center_y,
            score_zone: Rect::new(
                Vec2::new(0.0, gap_center_y),
                Vec2::new(self.score_zone_width, gap),
            ),
        }
    }
}

/// One pooled gate obstacle.
///
/// Part positions are stored relative to the gate origin so that world
/// drift only touches `pos`. The stem offsets are copied from the layout
/// at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct GateInstance {
    /// Gate origin in world space (y is always 0; parts carry their own y)
    pub pos: Vec2,
    pub active: bool,
    /// One-shot latch: set on first avatar entry, cleared on reuse
    pub scored: bool,
    layout: GateLayout,
    /// Part centers relative to the gate origin
    top_head: Vec2,
    bottom_head: Vec2,
    top_stem: Vec2,
    bottom_stem: Vec2,
    /// Current stem scale; reset to the base scale on every reuse
    pub stem_scale: Vec2,
    score_zone: Rect,
}

impl GateInstance {
    pub fn new(layout: GateLayout) -> Self {
        Self {
            pos: Vec2::ZERO,
            active: false,
            scored: false,
            layout,
            top_head: Vec2::ZERO,
            bottom_head: Vec2::ZERO,
            top_stem: Vec2::ZERO,
            bottom_stem: Vec2::ZERO,
            stem_scale: layout.stem_base_scale,
            score_zone: Rect::new(Vec2::ZERO, Vec2::ZERO),
        }
    }

    /// Apply a solved placement. Clears the scored latch and restores the
    /// stem base scale (pooled transforms: fixed stems never stretch).
    pub fn configure(&mut self, geom: &GateGeometry) {
        self.scored = false;
        self.stem_scale = self.layout.stem_base_scale;

        self.top_head = Vec2::new(0.0, geom.top_head_center_y);
        self.bottom_head = Vec2::new(0.0, geom.bottom_head_center_y);

        // Stems move as rigid pairs: reposition only, no scaling
        self.top_stem = self.top_head + self.layout.top_stem_offset;
        self.bottom_stem = self.bottom_head
            + self.layout.bottom_stem_offset
            + Vec2::new(0.0, self.layout.bottom_head_y_offset);

        self.score_zone = geom.score_zone;
    }

    /// Score-zone trigger box in world space.
    pub fn score_zone_world(&self) -> Rect {
        Rect::new(self.score_zone.center + self.pos, self.score_zone.size)
    }

    /// Solid part boxes in world space, for avatar collision.
    pub fn body_rects_world(&self) -> [Rect; 4] {
        let l = &self.layout;
        [
            Rect::new(self.top_head + self.pos, l.head_size),
            Rect::new(self.bottom_head + self.pos, l.head_size),
            Rect::new(self.top_stem + self.pos, l.stem_size * self.stem_scale),
            Rect::new(self.bottom_stem + self.pos, l.stem_size * self.stem_scale),
        ]
    }
}
