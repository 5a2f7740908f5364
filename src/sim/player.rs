//! Avatar physics: gravity plus a flap impulse
//!
//! The flap request is deferred to the next fixed tick so velocity changes
//! stay synchronized with the physics cadence instead of landing mid-frame.

use glam::Vec2;

use super::gate::Rect;
use crate::tuning::Tuning;

/// Cosmetic facing derived from vertical velocity sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    start_pos: Vec2,
    half_extent: Vec2,
    flap_velocity: f32,
    gravity: f32,
    max_upward_velocity: f32,
    top_clamp_y: f32,
    clamp_top: bool,
    sim_enabled: bool,
    flap_requested: bool,
}

impl Player {
    pub fn new(tuning: &Tuning, start_pos: Vec2) -> Self {
        Self {
            pos: start_pos,
            vel: Vec2::ZERO,
            start_pos,
            half_extent: Vec2::splat(tuning.player_half_extent),
            flap_velocity: tuning.flap_velocity,
            gravity: tuning.gravity,
            max_upward_velocity: tuning.max_upward_velocity,
            top_clamp_y: tuning.top_clamp_y,
            clamp_top: tuning.clamp_top_of_screen,
            sim_enabled: false,
            flap_requested: false,
        }
    }

    /// Enable or disable simulation. Disabling zeroes velocity and drops
    /// any pending flap, controlled solely by the run state machine.
    pub fn set_sim_enabled(&mut self, enabled: bool) {
        self.sim_enabled = enabled;
        if !enabled {
            self.vel = Vec2::ZERO;
            self.flap_requested = false;
        }
    }

    #[inline]
    pub fn sim_enabled(&self) -> bool {
        self.sim_enabled
    }

    /// Queue a flap; applied on the next fixed tick.
    pub fn request_flap(&mut self) {
        if !self.sim_enabled {
            return;
        }
        self.flap_requested = true;
    }

    /// Back to the start pose for a fresh run.
    pub fn reset(&mut self) {
        self.pos = self.start_pos;
        self.vel = Vec2::ZERO;
        self.flap_requested = false;
    }

    /// Physics step: apply any pending flap, integrate gravity, clamp.
    pub fn fixed_tick(&mut self, dt: f32) {
        if !self.sim_enabled {
            return;
        }

        if self.flap_requested {
            self.flap_requested = false;
            self.vel.y = self.flap_velocity.min(self.max_upward_velocity);
        }

        self.vel.y -= self.gravity * dt;
        self.pos += self.vel * dt;

        if self.clamp_top && self.pos.y > self.top_clamp_y {
            self.pos.y = self.top_clamp_y;
            if self.vel.y > 0.0 {
                self.vel.y = 0.0;
            }
        }
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        if self.vel.y > 0.01 {
            Facing::Ascending
        } else {
            Facing::Descending
        }
    }

    /// Collision box in world space.
    #[inline]
    pub fn aabb(&self) -> Rect {
        Rect::new(self.pos, self.half_extent * 2.0)
    }
}
