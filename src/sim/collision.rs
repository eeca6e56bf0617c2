//! Wall, floor, platform, and pairwise collision resolution
//!
//! Velocity-impulse resolution as pure functions: nothing here allocates or
//! touches state beyond the bodies involved, so every branch is directly
//! testable.

use glam::Vec2;

use super::state::{Body, Platform};
use crate::consts::*;
use crate::{angle_between, dist};

/// Integrate one tick of kinematics in strict order: gravity, wall
/// reflection, horizontal damping, floor bounce (when enabled), then plain
/// Euler integration. No sub-stepping.
pub fn update_kinematics(body: &mut Body, floor_enabled: bool) {
    body.vel.y += GRAVITY;
    resolve_walls(body);
    body.vel.x *= FRICTION;
    if floor_enabled {
        resolve_floor(body);
    }
    body.pos += body.vel;
}

/// Reflect horizontal velocity off the side walls, clamping the body back
/// inside the playfield. Restitution uses the same mass-based formula as
/// the floor.
pub fn resolve_walls(body: &mut Body) {
    let restitution = 1.0 - body.mass * RESTITUTION_LOSS;
    if body.pos.x - body.radius < 0.0 {
        body.pos.x = body.radius;
        body.vel.x = -body.vel.x * restitution;
    }
    if body.pos.x + body.radius > SCREEN_WIDTH {
        body.pos.x = SCREEN_WIDTH - body.radius;
        body.vel.x = -body.vel.x * restitution;
    }
}

/// Bounce off the floor when the bottom edge sits inside the contact band
/// `[SCREEN_HEIGHT, SCREEN_HEIGHT + 2r]`: snap the bottom edge to the floor
/// and reflect vertical velocity by the body's restitution coefficient.
/// Bodies already below the band are left to fall; culling handles them.
pub fn resolve_floor(body: &mut Body) {
    let bottom = body.bottom();
    if bottom >= SCREEN_HEIGHT && bottom <= SCREEN_HEIGHT + 2.0 * body.radius {
        body.pos.y = SCREEN_HEIGHT - body.radius;
        body.vel.y = -body.vel.y * body.coll_coeff;
    }
}

/// Resolve one ordered body-body contact with a repulsion impulse scaled
/// inversely by each body's mass: `a` is pushed along the center line away
/// from `b`, `b` the opposite way. No positional correction; overlapping
/// bodies may stay overlapped for a frame until the impulse separates them.
pub fn resolve_body_pair(a: &mut Body, b: &mut Body) {
    let d = dist(a.pos, b.pos);
    if d >= a.radius + b.radius {
        return;
    }
    let overlap = (a.radius + b.radius) - d + OVERLAP_EPSILON;
    let angle = angle_between(b.pos, a.pos);
    let push = Vec2::new(angle.cos(), angle.sin()) * overlap;
    a.vel += push / (2.0 * a.mass);
    b.vel -= push / (2.0 * b.mass);
}

/// Resolve a body against the platform: snap-and-bounce when resting on
/// top, corner repulsion when brushing an edge. The platform itself is
/// never displaced.
pub fn resolve_platform(platform: &Platform, body: &mut Body) {
    let bottom = body.bottom();
    let in_top_band = platform.pos.y <= bottom && bottom <= platform.pos.y + platform.height;
    let in_span = platform.pos.x <= body.pos.x && body.pos.x <= platform.pos.x + platform.width;
    if in_top_band && in_span {
        body.pos.y = platform.pos.y - body.radius;
        body.vel.y = -body.vel.y * (1.0 - body.mass * RESTITUTION_LOSS);
        return;
    }

    let corner_dist = dist(platform.left_corner(), body.pos).min(dist(platform.right_corner(), body.pos));
    if corner_dist < body.radius {
        // The nearer top corner acts as the other center of a circle contact
        let corner_x = if platform.pos.x > body.pos.x {
            platform.left_corner().x
        } else {
            platform.right_corner().x
        };
        let dx = corner_x - body.pos.x;
        let dy = platform.pos.y - body.pos.y;
        let overlap = body.radius - corner_dist + OVERLAP_EPSILON;
        let angle = dy.atan2(dx);
        body.vel.x -= overlap * angle.cos() / (2.0 * body.mass);
        body.vel.y -= overlap * angle.sin() / (2.0 * body.mass);
    }
}

/// Mutable references to two distinct list entries
pub(crate) fn pair_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i != j);
    if i < j {
        let (lo, hi) = slice.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = slice.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
