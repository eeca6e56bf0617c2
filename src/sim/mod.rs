//! Deterministic simulation module
//!
//! All playground logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (body list order)
//! - No rendering or windowing dependencies

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{resolve_body_pair, resolve_floor, resolve_platform, resolve_walls};
pub use snapshot::{Color, DragLine, DrawOp, RenderSnapshot, Shape, SPAWN_PALETTE};
pub use state::{Body, KickDirection, Platform, PlatformMotion, SimState};
pub use tick::{TickInput, tick};
