//! Simulation entities and the owning context
//!
//! All state that must be persisted for save/replay determinism lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::snapshot::{Color, SPAWN_PALETTE};
use crate::config::SimConfig;
use crate::consts::*;
use crate::dist;

/// Direction of a charged kick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KickDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Platform steering command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformMotion {
    Left,
    Right,
    Stop,
}

impl PlatformMotion {
    pub fn velocity(self) -> f32 {
        match self {
            PlatformMotion::Left => -PLATFORM_SPEED,
            PlatformMotion::Right => PLATFORM_SPEED,
            PlatformMotion::Stop => 0.0,
        }
    }
}

/// A simulated circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed at creation
    pub radius: f32,
    /// radius / MASS_DIVISOR, fixed at creation
    pub mass: f32,
    /// 1 - mass * RESTITUTION_LOSS, computed once and never mutated. Not
    /// clamped: goes negative for mass > 20.
    pub coll_coeff: f32,
    /// Render tag only, no physics effect; rewritten by the selection pass
    pub color: Color,
    /// Color restored whenever the body is not selected
    pub base_color: Color,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, color: Color) -> Self {
        let mass = radius / MASS_DIVISOR;
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
            coll_coeff: 1.0 - mass * RESTITUTION_LOSS,
            color,
            base_color: color,
        }
    }

    /// Build a body from a completed mouse drag: the start point fixes the
    /// center, the drag length the radius, the horizontal drag component the
    /// initial velocity. Drags shorter than `MIN_BODY_RADIUS` yield nothing;
    /// a near-zero mass would blow up the impulse formulas.
    pub fn from_drag(start: Vec2, end: Vec2, color: Color) -> Option<Self> {
        let radius = dist(start, end);
        if radius < MIN_BODY_RADIUS {
            return None;
        }
        let mut body = Self::new(start, radius, color);
        body.vel.x = (end.x - start.x) / DRAG_VELOCITY_DIVISOR;
        Some(body)
    }

    /// Bottom edge of the circle
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    /// Apply a directional impulse. Speed is unbounded by design.
    pub fn kick(&mut self, speed: f32, direction: KickDirection) {
        match direction {
            KickDirection::Up => self.vel.y -= speed,
            KickDirection::Left => self.vel.x -= speed,
            KickDirection::Right => self.vel.x += speed,
            KickDirection::Down => self.vel.y += speed,
        }
    }

    /// True once the body has fallen fully below the playfield
    #[inline]
    pub fn past_lower_bound(&self) -> bool {
        self.pos.y > SCREEN_HEIGHT + self.radius
    }
}

/// The user-steered platform. Infinite effective mass: collisions never
/// displace it, and it is never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub vel_x: f32,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                SCREEN_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0,
                SCREEN_HEIGHT - 20.0,
            ),
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
            vel_x: 0.0,
        }
    }
}

impl Platform {
    pub fn set_motion(&mut self, motion: PlatformMotion) {
        self.vel_x = motion.velocity();
    }

    /// Advance one tick; the platform never leaves the playfield.
    pub fn update(&mut self) {
        self.pos.x += self.vel_x;
        self.pos.x = self.pos.x.clamp(0.0, SCREEN_WIDTH - self.width);
    }

    pub fn left_corner(&self) -> Vec2 {
        self.pos
    }

    pub fn right_corner(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width, self.pos.y)
    }
}

/// RNG wrapper that stays serializable: the stream is re-derived from the
/// seed and a draw counter instead of persisting generator internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Deterministic pick in `[0, n)`
    pub fn pick(&mut self, n: usize) -> usize {
        let mut rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.draws));
        self.draws += 1;
        rng.random_range(0..n)
    }
}

/// Kick charge accumulated while a direction key is held, advanced once per
/// simulation tick so kick strength is decoupled from frame-rate jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickCharge {
    pub direction: KickDirection,
    pub ticks: u32,
}

/// An in-progress mouse drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub start: Vec2,
    pub current: Vec2,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: SimConfig,
    pub rng_state: RngState,
    /// Live bodies, oldest first
    pub bodies: Vec<Body>,
    pub platform: Platform,
    /// Selection cursor routing kick commands; normalized against the live
    /// list every tick
    pub selected: usize,
    pub floor_enabled: bool,
    /// In-progress mouse drag, if any
    pub drag: Option<DragState>,
    /// Pending kick charge, if a direction key is held
    pub charge: Option<KickCharge>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(config: SimConfig) -> Self {
        Self {
            rng_state: RngState::new(config.seed),
            config,
            bodies: Vec::new(),
            platform: Platform::default(),
            selected: 0,
            floor_enabled: true,
            drag: None,
            charge: None,
            time_ticks: 0,
        }
    }

    /// Body currently addressed by kick commands, if any
    pub fn selected_body(&mut self) -> Option<&mut Body> {
        if self.bodies.is_empty() {
            return None;
        }
        let i = self.selected % self.bodies.len();
        self.bodies.get_mut(i)
    }

    /// Spawn a body from a completed drag; a no-op for degenerate drags.
    pub fn spawn_from_drag(&mut self, start: Vec2, end: Vec2) {
        let color = SPAWN_PALETTE[self.rng_state.pick(SPAWN_PALETTE.len())];
        match Body::from_drag(start, end, color) {
            Some(body) => {
                log::debug!(
                    "spawned body r={:.1} at ({:.0}, {:.0})",
                    body.radius,
                    body.pos.x,
                    body.pos.y
                );
                self.bodies.push(body);
            }
            None => log::debug!("drag too short, no body spawned"),
        }
    }

    /// Fire a directional kick at the selected body. `elapsed_ticks` is how
    /// long the direction was held, in simulation ticks; a no-op when no
    /// body is live.
    pub fn release_kick(&mut self, direction: KickDirection, elapsed_ticks: u32) {
        let speed = elapsed_ticks as f32 * KICK_CHARGE_PER_TICK;
        if let Some(body) = self.selected_body() {
            body.kick(speed, direction);
        }
    }

    /// Advance the selection cursor by one; wrapping happens against the
    /// live list during the tick's selection pass.
    pub fn advance_selection(&mut self) {
        self.selected = self.selected.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_and_restitution_derive_from_radius() {
        let body = Body::new(Vec2::new(100.0, 100.0), 40.0, Color::BLACK);
        assert!((body.mass - 40.0 / 15.0).abs() < 1e-6);
        assert!((body.coll_coeff - (1.0 - body.mass * 0.05)).abs() < 1e-6);
    }

    #[test]
    fn coll_coeff_unclamped_for_heavy_bodies() {
        // mass 30 puts the formula past zero; that is the documented behavior
        let body = Body::new(Vec2::ZERO, 450.0, Color::BLACK);
        assert!((body.mass - 30.0).abs() < 1e-4);
        assert!(body.coll_coeff < 0.0);
    }

    #[test]
    fn drag_spawns_with_horizontal_velocity() {
        let start = Vec2::new(100.0, 100.0);
        let end = Vec2::new(140.0, 130.0);
        let body = Body::from_drag(start, end, Color::BLACK).unwrap();
        assert_eq!(body.pos, start);
        assert!((body.radius - 50.0).abs() < 1e-4);
        assert!((body.vel.x - 4.0).abs() < 1e-6);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn degenerate_drag_rejected() {
        let p = Vec2::new(100.0, 100.0);
        assert!(Body::from_drag(p, p, Color::BLACK).is_none());
        assert!(Body::from_drag(p, p + Vec2::new(0.5, 0.0), Color::BLACK).is_none());
    }

    #[test]
    fn kick_adjusts_the_right_component() {
        let mut body = Body::new(Vec2::ZERO, 15.0, Color::BLACK);
        body.kick(2.0, KickDirection::Up);
        assert_eq!(body.vel, Vec2::new(0.0, -2.0));
        body.kick(3.0, KickDirection::Right);
        assert_eq!(body.vel, Vec2::new(3.0, -2.0));
        body.kick(1.0, KickDirection::Left);
        assert_eq!(body.vel, Vec2::new(2.0, -2.0));
        body.kick(4.0, KickDirection::Down);
        assert_eq!(body.vel, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn rng_state_is_reproducible() {
        let mut a = RngState::new(7);
        let mut b = RngState::new(7);
        for _ in 0..16 {
            assert_eq!(a.pick(SPAWN_PALETTE.len()), b.pick(SPAWN_PALETTE.len()));
        }
    }

    #[test]
    fn kick_on_empty_state_is_noop() {
        let mut state = SimState::new(SimConfig::default());
        state.release_kick(KickDirection::Up, 100);
        assert!(state.bodies.is_empty());
    }
}
