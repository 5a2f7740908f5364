//! Run state machine and world composition
//!
//! One aggregate owns every sim component and a single score; state
//! transitions toggle spawner and avatar enablement atomically so no frame
//! ever sees them disagree on run-active status. The best score is read
//! from the persistence port at construction and written the moment a run
//! exceeds it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::gate::WorldBounds;
use super::ground::GroundScroller;
use super::player::Player;
use super::spawner::GateSpawner;
use super::trail::TrailTracker;
use crate::store::{BEST_SCORE_KEY, KvStore};
use crate::tuning::Tuning;

/// Current phase of a run. Exactly one value; transitions only through the
/// methods on `RunWorld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Idle, simulation frozen, waiting for the start action
    Ready,
    /// Full simulation
    Playing,
    /// Simulation frozen, results shown
    GameOver,
}

/// Things external collaborators (UI, audio glue) react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    Flapped,
    Scored { total: u32 },
    Died { score: u32 },
    BestBeaten { best: u32 },
}

/// The whole game world: composition root for one run loop.
pub struct RunWorld {
    pub state: RunState,
    pub score: u32,
    pub best_score: u32,
    /// Score snapshot of the just-finished run
    pub last_run_score: u32,
    pub time_ticks: u64,
    seed: u64,
    rng: Pcg32,
    pub player: Player,
    pub spawner: GateSpawner,
    pub trail: TrailTracker,
    pub ground: GroundScroller,
    bounds: WorldBounds,
    events: Vec<RunEvent>,
    store: Box<dyn KvStore>,
}

impl RunWorld {
    pub fn new(seed: u64, mut tuning: Tuning, store: Box<dyn KvStore>) -> Self {
        tuning.sanitize();

        let best_score = store
            .get_i64(BEST_SCORE_KEY)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        log::info!("New world, seed {seed}, best score {best_score}");

        let bounds = WorldBounds {
            min_y: tuning.world_min_y,
            max_y: tuning.world_max_y,
            ground_top_y: tuning.ground_top_y,
        };

        Self {
            state: RunState::Ready,
            score: 0,
            best_score,
            last_run_score: 0,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning, Vec2::new(-3.0, 0.0)),
            spawner: GateSpawner::new(&tuning),
            trail: TrailTracker::new(&tuning),
            ground: GroundScroller::new(&tuning),
            bounds,
            events: Vec::new(),
            store,
        }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Start a run from Ready; also queues the initial flap impulse.
    pub fn start(&mut self) {
        if self.state != RunState::Ready {
            return;
        }
        self.reset_run();
        self.set_state(RunState::Playing);
        self.player.request_flap();
        self.events.push(RunEvent::Flapped);
    }

    /// Player input while playing.
    pub fn flap(&mut self) {
        if self.state != RunState::Playing {
            return;
        }
        self.player.request_flap();
        self.events.push(RunEvent::Flapped);
    }

    /// From GameOver back to Ready with a full run reset.
    pub fn play_again(&mut self) {
        if self.state != RunState::GameOver {
            return;
        }
        self.reset_run();
        self.set_state(RunState::Ready);
    }

    /// Per-frame update: spawner, score zones, trail, ground, in that order.
    pub fn tick(&mut self, dt: f32) {
        if self.state != RunState::Playing {
            return;
        }
        self.time_ticks += 1;

        self.spawner.tick(dt, self.bounds, &mut self.rng);

        let avatar = self.player.aabb();
        let passed = self.spawner.check_score_zones(&avatar);
        for _ in 0..passed {
            self.add_score(1);
        }

        self.trail.tick(dt, self.player.pos);
        self.ground.tick(dt);
    }

    /// Physics-cadence update: applies the deferred flap, integrates the
    /// avatar, and turns any collision into the GameOver transition.
    pub fn fixed_tick(&mut self, dt: f32) {
        if self.state != RunState::Playing {
            return;
        }
        self.player.fixed_tick(dt);

        let avatar = self.player.aabb();
        let hit_ground = avatar.center.y - avatar.size.y * 0.5 <= self.bounds.ground_top_y;
        if hit_ground || self.spawner.collides(&avatar) {
            self.game_over();
        }
    }

    /// Drain events accumulated since the last call.
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    fn add_score(&mut self, amount: u32) {
        if self.state != RunState::Playing {
            return;
        }
        self.score += amount;
        self.trail.on_score_changed(self.score);
        self.events.push(RunEvent::Scored { total: self.score });
    }

    fn game_over(&mut self) {
        if self.state != RunState::Playing {
            return;
        }
        self.last_run_score = self.score;

        // Commit best before anything reacts to the transition
        if self.score > self.best_score {
            self.best_score = self.score;
            self.store.set_i64(BEST_SCORE_KEY, i64::from(self.best_score));
            self.events.push(RunEvent::BestBeaten {
                best: self.best_score,
            });
            log::info!("New best score: {}", self.best_score);
        }

        self.set_state(RunState::GameOver);
        self.events.push(RunEvent::Died { score: self.score });
    }

    /// Spawner enablement and avatar simulation flip atomically with the
    /// state change.
    fn set_state(&mut self, new_state: RunState) {
        log::info!("Run state: {:?} -> {:?}", self.state, new_state);
        self.state = new_state;

        let playing = new_state == RunState::Playing;
        self.spawner.set_spawning_enabled(playing);
        self.player.set_sim_enabled(playing);
    }

    fn reset_run(&mut self) {
        self.score = 0;
        self.last_run_score = 0;
        self.spawner.reset();
        self.player.reset();
        self.trail.reset();
        self.ground.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::store::MemStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared handle so tests can inspect the store the world owns.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemStore>>);

    impl KvStore for SharedStore {
        fn get_i64(&self, key: &str) -> Option<i64> {
            self.0.borrow().get_i64(key)
        }
        fn set_i64(&mut self, key: &str, value: i64) {
            self.0.borrow_mut().set_i64(key, value)
        }
    }

    /// Wide-gap tuning so a bang-bang autopilot can thread gates forever.
    fn easy_tuning() -> Tuning {
        Tuning {
            gap_min: 6.0,
            gap_max: 6.0,
            gate_margin: 0.2,
            top_margin: 0.2,
            ..Tuning::default()
        }
    }

    fn step(world: &mut RunWorld) {
        world.tick(SIM_DT);
        world.fixed_tick(SIM_DT);
    }

    /// Hover around y = 0 by flapping whenever falling below the line.
    fn autopilot(world: &mut RunWorld) {
        if world.player.pos.y < 0.3 && world.player.vel.y < 0.0 {
            world.flap();
        }
    }

    #[test]
    fn test_start_enables_everything_atomically() {
        let mut world = RunWorld::new(1, Tuning::default(), Box::new(MemStore::new()));
        assert_eq!(world.state, RunState::Ready);
        assert!(!world.spawner.spawning_enabled());
        assert!(!world.player.sim_enabled());

        world.start();
        assert_eq!(world.state, RunState::Playing);
        assert!(world.spawner.spawning_enabled());
        assert!(world.player.sim_enabled());
        assert!(world.drain_events().contains(&RunEvent::Flapped));
    }

    #[test]
    fn test_start_only_from_ready() {
        let mut world = RunWorld::new(1, Tuning::default(), Box::new(MemStore::new()));
        world.start();
        step(&mut world);
        let ticks = world.time_ticks;
        world.start(); // no-op while playing
        assert_eq!(world.state, RunState::Playing);
        assert_eq!(world.time_ticks, ticks);
    }

    #[test]
    fn test_fall_to_ground_is_game_over() {
        let mut world = RunWorld::new(2, Tuning::default(), Box::new(MemStore::new()));
        world.start();

        // Never flap: gravity takes the avatar into the ground
        let mut steps = 0;
        while world.state == RunState::Playing {
            step(&mut world);
            steps += 1;
            assert!(steps < 10_000, "avatar never died");
        }
        assert_eq!(world.state, RunState::GameOver);
        assert!(!world.spawner.spawning_enabled());
        assert!(!world.player.sim_enabled());
        assert!(
            world
                .drain_events()
                .iter()
                .any(|e| matches!(e, RunEvent::Died { .. }))
        );
    }

    #[test]
    fn test_frozen_states_do_not_tick() {
        let mut world = RunWorld::new(3, Tuning::default(), Box::new(MemStore::new()));
        for _ in 0..100 {
            step(&mut world);
        }
        assert_eq!(world.time_ticks, 0);
        assert_eq!(world.spawner.spawn_count(), 0);
    }

    #[test]
    fn test_play_again_resets_run() {
        let mut world = RunWorld::new(4, Tuning::default(), Box::new(MemStore::new()));
        world.start();
        while world.state == RunState::Playing {
            step(&mut world);
        }

        world.play_again();
        assert_eq!(world.state, RunState::Ready);
        assert_eq!(world.score, 0);
        assert_eq!(world.last_run_score, 0);
        assert_eq!(world.spawner.active_len(), 0);
        assert!(world.trail.polyline().is_empty());
    }

    /// Pilot a run until `target` gates are scored, then let the avatar
    /// drop dead. Panics if scoring stalls or the pilot dies early.
    fn play_run_to_score(world: &mut RunWorld, target: u32) {
        world.start();
        let mut steps = 0u32;
        while world.score < target {
            autopilot(world);
            step(world);
            steps += 1;
            assert!(
                world.state == RunState::Playing,
                "died early at score {}",
                world.score
            );
            assert!(steps < 2_000_000, "scoring stalled at {}", world.score);
        }
        while world.state == RunState::Playing {
            step(world);
        }
    }

    #[test]
    fn test_best_score_commit_and_persist() {
        let store = SharedStore::default();
        store.0.borrow_mut().set_i64(BEST_SCORE_KEY, 50);

        let mut world = RunWorld::new(5, easy_tuning(), Box::new(store.clone()));
        assert_eq!(world.best_score, 50);

        // Score 3: best remains 50, nothing written
        play_run_to_score(&mut world, 3);
        assert_eq!(world.last_run_score, 3);
        assert_eq!(world.best_score, 50);
        assert_eq!(store.get_i64(BEST_SCORE_KEY), Some(50));

        // Score 60: best committed and persisted immediately
        world.play_again();
        play_run_to_score(&mut world, 60);
        assert_eq!(world.best_score, 60);
        assert_eq!(store.get_i64(BEST_SCORE_KEY), Some(60));
        assert!(
            world
                .drain_events()
                .contains(&RunEvent::BestBeaten { best: 60 })
        );
    }

    #[test]
    fn test_scoring_grows_trail_and_emits_events() {
        let mut world = RunWorld::new(6, easy_tuning(), Box::new(MemStore::new()));
        world.start();
        world.drain_events();

        let mut steps = 0u32;
        while world.score < 2 {
            autopilot(&mut world);
            step(&mut world);
            steps += 1;
            assert!(steps < 200_000);
        }

        let events = world.drain_events();
        assert!(events.contains(&RunEvent::Scored { total: 1 }));
        assert!(events.contains(&RunEvent::Scored { total: 2 }));
        assert_eq!(world.trail.target_len(), 20);
        assert!(!world.trail.polyline().is_empty());
    }

    #[test]
    fn test_determinism() {
        let mk = || RunWorld::new(99, easy_tuning(), Box::new(MemStore::new()));
        let mut a = mk();
        let mut b = mk();
        a.start();
        b.start();

        for i in 0..5000u32 {
            if i % 37 == 0 {
                a.flap();
                b.flap();
            }
            step(&mut a);
            step(&mut b);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.state, b.state);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.spawner.spawn_count(), b.spawner.spawn_count());
    }
}
