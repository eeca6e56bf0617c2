//! Ballpit - a mouse-drawn 2D gravity playground
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, platform, collisions, per-tick step)
//! - `config`: Simulation policy knobs, persisted as JSON
//!
//! Windowing, raw input and drawing live in the binary. The simulation only
//! consumes `TickInput` commands and exposes a `RenderSnapshot` once per tick.

pub mod config;
pub mod sim;

pub use config::{PairResolution, SimConfig};

use glam::Vec2;

/// Playground configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration, units per tick squared
    pub const GRAVITY: f32 = 0.1;
    /// Horizontal damping applied every tick, contact or not
    pub const FRICTION: f32 = 0.999;
    /// Radius-to-mass conversion: mass = radius / MASS_DIVISOR
    pub const MASS_DIVISOR: f32 = 15.0;
    /// Per-unit-mass velocity loss on a bounce: restitution = 1 - mass * RESTITUTION_LOSS
    pub const RESTITUTION_LOSS: f32 = 0.05;
    /// Added to the separation distance so resolved bodies end fully apart
    pub const OVERLAP_EPSILON: f32 = 1.0;
    /// Smallest radius a drag may spawn; keeps mass well away from zero
    pub const MIN_BODY_RADIUS: f32 = 1.0;
    /// Drag vector to initial horizontal velocity divisor
    pub const DRAG_VELOCITY_DIVISOR: f32 = 10.0;

    /// Platform geometry and steering speed
    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const PLATFORM_SPEED: f32 = 10.0;

    /// Kick speed gained per tick a direction key is held. Equivalent to
    /// milliseconds-held over TICK_RATE at the fixed 60 Hz rate: one second
    /// held charges a kick of ~16.7 units.
    pub const KICK_CHARGE_PER_TICK: f32 = 1000.0 / (TICK_RATE * TICK_RATE);
}

/// Euclidean distance between two points
#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle of the vector pointing from `from` toward `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}
