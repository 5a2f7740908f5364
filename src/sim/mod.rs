//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single-threaded ownership, mutated only inside the owner's tick
//! - No rendering or platform dependencies

pub mod gate;
pub mod ground;
pub mod player;
pub mod pool;
pub mod ringbuf;
pub mod spawner;
pub mod state;
pub mod trail;

pub use gate::{GateConstraints, GateGeometry, GateInstance, GateLayout, Rect, WorldBounds};
pub use ground::GroundScroller;
pub use player::{Facing, Player};
pub use pool::{ObjectPool, PoolId};
pub use ringbuf::RingBuffer;
pub use spawner::GateSpawner;
pub use state::{RunEvent, RunState, RunWorld};
pub use trail::TrailTracker;
