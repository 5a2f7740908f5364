//! Ring-buffered avatar trail
//!
//! Samples the avatar position on a fixed interval and exposes a drifting
//! polyline whose target length grows with score. Stored samples drift
//! left with the world every tick, even between samples, so the trail
//! stays glued to the scrolling scenery.

use glam::Vec2;

use super::ringbuf::RingBuffer;
use crate::tuning::Tuning;

pub struct TrailTracker {
    ring: RingBuffer<Vec2>,
    /// Reused oldest-to-newest scratch for the polyline (no per-frame alloc)
    ordered: Vec<Vec2>,
    sample_timer: f32,
    sample_interval: f32,
    scroll_speed: f32,
    points_per_score: u32,
    target_len: usize,
}

impl TrailTracker {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ring: RingBuffer::new(tuning.trail_cap_points),
            ordered: Vec::with_capacity(tuning.trail_cap_points),
            sample_timer: 0.0,
            sample_interval: tuning.sample_interval,
            scroll_speed: tuning.scroll_speed,
            points_per_score: tuning.points_per_score,
            target_len: 0,
        }
    }

    /// Recompute the target length: min(capacity, score * points_per_score).
    /// Dropping to zero clears the rendered line immediately.
    pub fn on_score_changed(&mut self, score: u32) {
        let points = (score as usize).saturating_mul(self.points_per_score as usize);
        self.target_len = points.min(self.ring.capacity());
        if self.target_len == 0 {
            self.ordered.clear();
        }
    }

    /// Clear all ring state and the rendered line.
    pub fn reset(&mut self) {
        self.ring.clear();
        self.ordered.clear();
        self.sample_timer = 0.0;
        self.target_len = 0;
    }

    /// Drift, sample, and rebuild the polyline for one frame. Call only
    /// while the run is playing.
    pub fn tick(&mut self, dt: f32, avatar_pos: Vec2) {
        // Drift all stored points left, whether or not we sample this frame
        if !self.ring.is_empty() {
            let dx = self.scroll_speed * dt;
            for p in self.ring.iter_mut() {
                p.x -= dx;
            }
        }

        if self.target_len == 0 {
            self.ordered.clear();
            return;
        }

        self.sample_timer += dt;
        while self.sample_timer >= self.sample_interval {
            self.sample_timer -= self.sample_interval;
            self.ring.push(avatar_pos);
        }

        // Rebuild every frame so drift stays visible between samples
        self.ordered.clear();
        self.ordered
            .extend(self.ring.iter_last(self.target_len).copied());
    }

    /// Points for the external polyline renderer, oldest to newest.
    #[inline]
    pub fn polyline(&self) -> &[Vec2] {
        &self.ordered
    }

    #[inline]
    pub fn target_len(&self) -> usize {
        self.target_len
    }
}
