//! Distance-consistent gate spawning and recycling
//!
//! Spawning is time-scheduled but distance-derived: the interval is
//! spacing / scroll speed, so the visual spacing between gates stays
//! constant regardless of frame rate. The timer subtracts whole intervals
//! instead of resetting so fractional carry-over never drifts.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::gate::{GateConstraints, GateGeometry, GateInstance, GateLayout, Rect, WorldBounds};
use super::pool::ObjectPool;
use crate::tuning::Tuning;

pub struct GateSpawner {
    pool: ObjectPool<GateInstance>,
    layout: GateLayout,
    constraints: GateConstraints,
    scroll_speed: f32,
    spawn_spacing_x: f32,
    spawn_x: f32,
    despawn_x: f32,
    /// Extra safety margin passed through to the solver
    top_margin: f32,
    spawning_enabled: bool,
    spawn_timer: f32,
    spawn_interval: f32,
    spawn_count: u64,
}

impl GateSpawner {
    pub fn new(tuning: &Tuning) -> Self {
        let layout = GateLayout::default();
        let mut pool = ObjectPool::new(move || GateInstance::new(layout));
        pool.warm_up(tuning.pool_warm_size);

        let mut spawner = Self {
            pool,
            layout,
            constraints: GateConstraints {
                gap_min: tuning.gap_min,
                gap_max: tuning.gap_max,
                margin: tuning.gate_margin,
                score_zone_width: tuning.score_zone_width,
            },
            scroll_speed: tuning.scroll_speed,
            spawn_spacing_x: tuning.spawn_spacing_x,
            spawn_x: tuning.spawn_x,
            despawn_x: tuning.despawn_x,
            top_margin: tuning.top_margin,
            spawning_enabled: false,
            spawn_timer: 0.0,
            spawn_interval: 1.0,
            spawn_count: 0,
        };
        spawner.recompute_interval();
        spawner
    }

    /// Time-based scheduler matching a distance spacing:
    /// distance = speed * time  =>  time = distance / speed.
    /// A degenerate scroll speed degrades to a no-op spawner.
    fn recompute_interval(&mut self) {
        self.spawn_interval = if self.scroll_speed <= 1e-4 {
            f32::INFINITY
        } else {
            self.spawn_spacing_x / self.scroll_speed
        };
    }

    /// Enable or disable spawning. Disabling zeroes the timer so
    /// re-enabling never produces a backlog burst.
    pub fn set_spawning_enabled(&mut self, enabled: bool) {
        self.spawning_enabled = enabled;
        if !enabled {
            self.spawn_timer = 0.0;
        }
    }

    #[inline]
    pub fn spawning_enabled(&self) -> bool {
        self.spawning_enabled
    }

    /// Recycle all active gates and clear scheduling state. Called on every
    /// run restart so stale gates never reappear mid-run.
    pub fn reset(&mut self) {
        for i in (0..self.pool.active_len()).rev() {
            let id = self.pool.active()[i];
            self.pool.get_mut(id).active = false;
            self.pool.release(id);
        }
        self.spawn_timer = 0.0;
    }

    /// Advance, recycle, and spawn gates for one frame.
    pub fn tick(&mut self, dt: f32, bounds: WorldBounds, rng: &mut Pcg32) {
        if !self.spawning_enabled {
            return;
        }

        // Move active gates left; scan in reverse for in-place removal
        for i in (0..self.pool.active_len()).rev() {
            let id = self.pool.active()[i];
            let gate = self.pool.get_mut(id);
            gate.pos.x -= self.scroll_speed * dt;

            if gate.pos.x < self.despawn_x {
                gate.active = false;
                self.pool.release(id);
            }
        }

        self.spawn_timer += dt;
        while self.spawn_timer >= self.spawn_interval {
            self.spawn_timer -= self.spawn_interval;
            self.spawn_gate(bounds, rng);
        }
    }

    fn spawn_gate(&mut self, bounds: WorldBounds, rng: &mut Pcg32) {
        self.spawn_count += 1;

        let geom: GateGeometry = self
            .constraints
            .solve(bounds, self.top_margin, &self.layout, rng);

        let id = self.pool.acquire();
        let gate = self.pool.get_mut(id);
        gate.pos = Vec2::new(self.spawn_x, 0.0);
        gate.active = true;
        gate.configure(&geom);

        log::debug!(
            "spawned gate #{} at x={} gap_center_y={:.2}",
            self.spawn_count,
            self.spawn_x,
            geom.gap_center_y
        );
    }

    /// One-shot score-zone triggers: returns how many gates the avatar
    /// entered for the first time this frame. The latch stays armed until
    /// the instance is recycled and reconfigured.
    pub fn check_score_zones(&mut self, avatar: &Rect) -> u32 {
        let mut scored = 0;
        for i in 0..self.pool.active_len() {
            let id = self.pool.active()[i];
            let gate = self.pool.get_mut(id);
            if !gate.scored && gate.score_zone_world().intersects(avatar) {
                gate.scored = true;
                scored += 1;
            }
        }
        scored
    }

    /// Does the avatar box overlap any solid gate part?
    pub fn collides(&self, avatar: &Rect) -> bool {
        self.pool.active().iter().any(|id| {
            self.pool
                .get(*id)
                .body_rects_world()
                .iter()
                .any(|r| r.intersects(avatar))
        })
    }

    /// Visit active gates (for rendering glue / inspection).
    pub fn for_each_active(&self, mut f: impl FnMut(&GateInstance)) {
        for id in self.pool.active() {
            f(self.pool.get(*id));
        }
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.pool.active_len()
    }

    #[inline]
    pub fn pool_total(&self) -> usize {
        self.pool.total()
    }

    #[inline]
    pub fn pool_free_len(&self) -> usize {
        self.pool.free_len()
    }

    #[inline]
    pub fn spawn_count(&self) -> u64 {
        self.spawn_count
    }

    #[inline]
    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;

    fn bounds() -> WorldBounds {
        WorldBounds {
            min_y: -5.0,
            max_y: 5.0,
            ground_top_y: -4.0,
        }
    }

    fn spawner() -> GateSpawner {
        let mut s = GateSpawner::new(&Tuning::default());
        s.set_spawning_enabled(true);
        s
    }

    #[test]
    fn test_interval_matches_spacing() {
        let s = spawner();
        // spacing 3.0 / speed 2.5
        assert!((s.spawn_interval() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_count_over_duration() {
        let mut s = spawner();
        let mut rng = Pcg32::seed_from_u64(1);

        let total_time = 30.0;
        let steps = (total_time / SIM_DT) as u32;
        for _ in 0..steps {
            s.tick(SIM_DT, bounds(), &mut rng);
        }

        let expected = (total_time / s.spawn_interval()).floor() as i64;
        let got = s.spawn_count() as i64;
        assert!(
            (got - expected).abs() <= 1,
            "expected ~{expected} spawns, got {got}"
        );
    }

    #[test]
    fn test_gates_despawn_and_recycle() {
        let mut s = spawner();
        let mut rng = Pcg32::seed_from_u64(2);

        // Long enough for the first gates to cross the whole world
        // (15 units at 2.5 u/s = 6 s per crossing)
        for _ in 0..(60.0 / SIM_DT) as u32 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }

        // Steady state: only the gates in flight stay active, and the pool
        // stopped growing once recycling caught up
        assert!(s.active_len() <= 7);
        assert!(s.pool_total() <= 8, "warm pool should absorb steady state");
        assert_eq!(s.pool_free_len() + s.active_len(), s.pool_total());
    }

    #[test]
    fn test_disable_zeroes_timer_no_burst() {
        let mut s = spawner();
        let mut rng = Pcg32::seed_from_u64(3);

        // Accumulate most of an interval, then disable
        for _ in 0..(1.0 / SIM_DT) as u32 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        s.set_spawning_enabled(false);
        let before = s.spawn_count();

        // Time passes while disabled; nothing accumulates
        for _ in 0..(10.0 / SIM_DT) as u32 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        assert_eq!(s.spawn_count(), before);

        // Re-enable: next spawn only after a full fresh interval
        s.set_spawning_enabled(true);
        let mut elapsed = 0.0;
        while s.spawn_count() == before {
            s.tick(SIM_DT, bounds(), &mut rng);
            elapsed += SIM_DT;
            assert!(elapsed < 2.0, "spawner stalled after re-enable");
        }
        assert!(
            elapsed >= s.spawn_interval() - SIM_DT,
            "burst spawn after re-enable: {elapsed}"
        );
        assert_eq!(s.spawn_count(), before + 1);
    }

    #[test]
    fn test_reset_recycles_all_active() {
        let mut s = spawner();
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..(5.0 / SIM_DT) as u32 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        assert!(s.active_len() > 0);

        s.reset();
        assert_eq!(s.active_len(), 0);
        assert_eq!(s.pool_free_len(), s.pool_total());
    }

    #[test]
    fn test_score_zone_latch_once_per_active_period() {
        let mut s = spawner();
        let mut rng = Pcg32::seed_from_u64(5);

        // Force one spawn
        while s.spawn_count() == 0 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }

        // A giant avatar box that covers the whole world: guaranteed entry
        let avatar = Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(s.check_score_zones(&avatar), 1);
        assert_eq!(s.check_score_zones(&avatar), 0, "latch must hold");
    }

    #[test]
    fn test_recycled_gate_scores_again() {
        let mut s = spawner();
        let mut rng = Pcg32::seed_from_u64(6);

        while s.spawn_count() == 0 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        let avatar = Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(s.check_score_zones(&avatar), 1);

        // Recycle everything, then respawn from the pool
        s.reset();
        while s.active_len() == 0 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        assert_eq!(s.check_score_zones(&avatar), 1, "latch cleared on reuse");
    }

    #[test]
    fn test_disabled_spawner_is_inert() {
        let mut s = GateSpawner::new(&Tuning::default());
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        assert_eq!(s.spawn_count(), 0);
        assert_eq!(s.active_len(), 0);
    }

    #[test]
    fn test_zero_scroll_speed_degrades_to_noop() {
        let tuning = Tuning {
            scroll_speed: 0.0,
            ..Tuning::default()
        };
        // sanitize() floors scroll speed, so build directly to test the
        // solver-side guard
        let mut s = GateSpawner::new(&tuning);
        s.set_spawning_enabled(true);
        let mut rng = Pcg32::seed_from_u64(8);
        for _ in 0..1000 {
            s.tick(SIM_DT, bounds(), &mut rng);
        }
        assert_eq!(s.spawn_count(), 0);
    }
}
