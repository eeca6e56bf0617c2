//! Fixed timestep simulation tick
//!
//! Orchestrates one step: queued commands, platform motion, per-body
//! kinematics and collision resolution, culling, selection highlight.

use glam::Vec2;

use super::collision::{pair_mut, resolve_body_pair, resolve_platform, update_kinematics};
use super::snapshot::Color;
use super::state::{DragState, KickCharge, KickDirection, PlatformMotion, SimState};
use crate::config::PairResolution;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Mouse press position: starts a new drag
    pub begin_draw: Option<Vec2>,
    /// Current pointer position while the button is held
    pub drag_pos: Option<Vec2>,
    /// Mouse release position: completes the drag and spawns a body
    pub end_draw: Option<Vec2>,
    /// Platform steering change; `None` keeps the current velocity
    pub platform_motion: Option<PlatformMotion>,
    /// Toggle the floor on/off
    pub toggle_floor: bool,
    /// Kick direction held this tick; advances the charge accumulator
    pub charge: Option<KickDirection>,
    /// Kick direction released this tick; fires the charged kick
    pub release_kick: Option<KickDirection>,
    /// Advance the selection cursor
    pub advance_selection: bool,
}

/// Advance the simulation by one fixed tick.
///
/// The order is load-bearing: commands, then platform motion, then each body
/// in list order (kinematics, platform contact, every other body), then
/// culling, then the selection highlight. Pair resolution sees the current
/// tick's sequentially-integrated positions, and culling runs after all
/// resolution but before any snapshot can be taken.
pub fn tick(state: &mut SimState, input: &TickInput) {
    apply_commands(state, input);

    state.platform.update();

    let single = state.config.pair_resolution == PairResolution::Single;
    for i in 0..state.bodies.len() {
        {
            let floor = state.floor_enabled;
            let body = &mut state.bodies[i];
            update_kinematics(body, floor);
            resolve_platform(&state.platform, body);
        }
        for j in 0..state.bodies.len() {
            if j == i || (single && j < i) {
                continue;
            }
            let (a, b) = pair_mut(&mut state.bodies, i, j);
            resolve_body_pair(a, b);
        }
    }

    state.bodies.retain(|b| !b.past_lower_bound());

    refresh_selection(state);

    state.time_ticks += 1;
}

fn apply_commands(state: &mut SimState, input: &TickInput) {
    if input.toggle_floor {
        state.floor_enabled = !state.floor_enabled;
        log::debug!("floor enabled: {}", state.floor_enabled);
    }

    if let Some(motion) = input.platform_motion {
        state.platform.set_motion(motion);
    }

    if let Some(start) = input.begin_draw {
        state.drag = Some(DragState {
            start,
            current: start,
        });
    }
    if let Some(pos) = input.drag_pos {
        if let Some(drag) = &mut state.drag {
            drag.current = pos;
        }
    }
    if let Some(end) = input.end_draw {
        if let Some(drag) = state.drag.take() {
            state.spawn_from_drag(drag.start, end);
        }
    }

    // One charge accumulator, advanced once per held tick; switching
    // direction restarts it.
    if let Some(direction) = input.charge {
        state.charge = match state.charge {
            Some(c) if c.direction == direction => Some(KickCharge {
                direction,
                ticks: c.ticks + 1,
            }),
            _ => Some(KickCharge { direction, ticks: 1 }),
        };
    }
    if let Some(direction) = input.release_kick {
        let ticks = match state.charge.take() {
            Some(c) if c.direction == direction => c.ticks,
            _ => 0,
        };
        state.release_kick(direction, ticks);
    }

    if input.advance_selection {
        state.advance_selection();
    }
}

/// Re-normalize the cursor against the live list and repaint: every body its
/// base color, the selected one the highlight.
fn refresh_selection(state: &mut SimState) {
    if state.bodies.is_empty() {
        state.selected = 0;
        return;
    }
    state.selected %= state.bodies.len();
    for body in &mut state.bodies {
        body.color = body.base_color;
    }
    let i = state.selected;
    state.bodies[i].color = Color::GREEN;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::consts::*;
    use crate::sim::state::Body;
    use proptest::prelude::*;

    /// Fresh state with the platform parked at the far left so floor and
    /// free-fall scenarios (placed at x >= 300) never touch it.
    fn parked_state() -> SimState {
        let mut state = SimState::new(SimConfig::default());
        state.platform.pos.x = 0.0;
        state
    }

    fn add_body(state: &mut SimState, x: f32, y: f32, radius: f32) {
        state
            .bodies
            .push(Body::new(Vec2::new(x, y), radius, Color::BLACK));
    }

    #[test]
    fn gravity_adds_exactly_g_per_tick() {
        let mut state = parked_state();
        add_body(&mut state, 600.0, 100.0, 10.0);
        let before = state.bodies[0].vel.y;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bodies[0].vel.y, before + GRAVITY);
    }

    #[test]
    fn drag_commands_spawn_body() {
        let mut state = parked_state();
        let begin = TickInput {
            begin_draw: Some(Vec2::new(300.0, 100.0)),
            drag_pos: Some(Vec2::new(300.0, 100.0)),
            ..Default::default()
        };
        tick(&mut state, &begin);
        assert!(state.snapshot().drag_line.is_some());

        let end = TickInput {
            end_draw: Some(Vec2::new(340.0, 130.0)),
            ..Default::default()
        };
        tick(&mut state, &end);
        assert!(state.snapshot().drag_line.is_none());
        assert_eq!(state.bodies.len(), 1);

        let b = &state.bodies[0];
        assert!((b.radius - 50.0).abs() < 1e-4);
        // the spawning tick already ran kinematics once
        assert!((b.vel.x - 4.0 * FRICTION).abs() < 1e-5);
        assert_eq!(b.vel.y, GRAVITY);
    }

    #[test]
    fn degenerate_drag_spawns_nothing() {
        let mut state = parked_state();
        let begin = TickInput {
            begin_draw: Some(Vec2::new(300.0, 100.0)),
            ..Default::default()
        };
        tick(&mut state, &begin);
        let end = TickInput {
            end_draw: Some(Vec2::new(300.0, 100.0)),
            ..Default::default()
        };
        tick(&mut state, &end);
        assert!(state.bodies.is_empty());
    }

    #[test]
    fn floor_toggle_lets_bodies_fall_through() {
        let mut state = parked_state();
        // bottom edge inside the floor band
        add_body(&mut state, 600.0, SCREEN_HEIGHT - 8.0, 10.0);
        let toggle = TickInput {
            toggle_floor: true,
            ..Default::default()
        };
        tick(&mut state, &toggle);
        assert!(!state.floor_enabled);
        // no bounce happened: still sinking
        assert!(state.bodies[0].vel.y > 0.0);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.bodies.is_empty(), "body should fall off-screen");
    }

    #[test]
    fn culling_boundary_is_exact() {
        let mut state = parked_state();
        state.floor_enabled = false;
        // after one tick: y = 809.1, not past 810 -> kept
        add_body(&mut state, 600.0, SCREEN_HEIGHT + 9.0, 10.0);
        // after one tick: y = 810.6 > 810 -> culled
        add_body(&mut state, 300.0, SCREEN_HEIGHT + 10.5, 10.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bodies.len(), 1);
        assert_eq!(state.bodies[0].pos.x, 600.0);
    }

    #[test]
    fn held_direction_charges_by_tick() {
        let mut state = parked_state();
        add_body(&mut state, 600.0, 100.0, 15.0);
        let held = TickInput {
            charge: Some(KickDirection::Up),
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &held);
        }
        let vy_before = state.bodies[0].vel.y;

        let release = TickInput {
            release_kick: Some(KickDirection::Up),
            ..Default::default()
        };
        tick(&mut state, &release);
        // the kick lands before this tick's gravity increment
        let expected = vy_before - 30.0 * KICK_CHARGE_PER_TICK + GRAVITY;
        assert!((state.bodies[0].vel.y - expected).abs() < 1e-3);
        assert!(state.charge.is_none());
    }

    #[test]
    fn switching_direction_restarts_charge() {
        let mut state = parked_state();
        add_body(&mut state, 600.0, 100.0, 15.0);
        let up = TickInput {
            charge: Some(KickDirection::Up),
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &up);
        }
        let left = TickInput {
            charge: Some(KickDirection::Left),
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &left);
        }
        let vx_before = state.bodies[0].vel.x;
        let release = TickInput {
            release_kick: Some(KickDirection::Left),
            ..Default::default()
        };
        tick(&mut state, &release);
        let expected = (vx_before - 5.0 * KICK_CHARGE_PER_TICK) * FRICTION;
        assert!((state.bodies[0].vel.x - expected).abs() < 1e-3);
    }

    #[test]
    fn release_without_charge_kicks_nothing() {
        let mut state = parked_state();
        add_body(&mut state, 600.0, 100.0, 15.0);
        let release = TickInput {
            release_kick: Some(KickDirection::Right),
            ..Default::default()
        };
        tick(&mut state, &release);
        assert_eq!(state.bodies[0].vel.x, 0.0);
    }

    #[test]
    fn platform_motion_commands_steer_and_stop() {
        let mut state = SimState::new(SimConfig::default());
        let start_x = state.platform.pos.x;
        let left = TickInput {
            platform_motion: Some(PlatformMotion::Left),
            ..Default::default()
        };
        tick(&mut state, &left);
        assert_eq!(state.platform.pos.x, start_x - PLATFORM_SPEED);
        // velocity persists until an explicit Stop
        tick(&mut state, &TickInput::default());
        assert_eq!(state.platform.pos.x, start_x - 2.0 * PLATFORM_SPEED);
        let stop = TickInput {
            platform_motion: Some(PlatformMotion::Stop),
            ..Default::default()
        };
        tick(&mut state, &stop);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.platform.pos.x, start_x - 2.0 * PLATFORM_SPEED);
    }

    #[test]
    fn double_policy_doubles_pair_impulse() {
        let run_policy = |pair_resolution: PairResolution| {
            let mut state = parked_state();
            state.config.pair_resolution = pair_resolution;
            add_body(&mut state, 600.0, 300.0, 15.0);
            add_body(&mut state, 620.0, 300.0, 15.0);
            tick(&mut state, &TickInput::default());
            state
        };
        let single = run_policy(PairResolution::Single);
        let double = run_policy(PairResolution::Double);
        // both repel, but the ordered double pass lands a second impulse
        assert!(single.bodies[0].vel.x < 0.0);
        assert!(double.bodies[0].vel.x < 0.0);
        assert!(double.bodies[0].vel.x.abs() > single.bodies[0].vel.x.abs() * 1.2);
    }

    #[test]
    fn selection_highlight_reapplied_every_tick() {
        let mut state = parked_state();
        add_body(&mut state, 300.0, 200.0, 10.0);
        add_body(&mut state, 600.0, 200.0, 10.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bodies[0].color, Color::GREEN);
        assert_eq!(state.bodies[1].color, Color::BLACK);

        let advance = TickInput {
            advance_selection: true,
            ..Default::default()
        };
        tick(&mut state, &advance);
        assert_eq!(state.bodies[0].color, Color::BLACK);
        assert_eq!(state.bodies[1].color, Color::GREEN);
    }

    #[test]
    fn selection_resets_when_list_empties() {
        let mut state = parked_state();
        state.floor_enabled = false;
        add_body(&mut state, 600.0, SCREEN_HEIGHT + 20.0, 10.0);
        state.selected = 5;
        tick(&mut state, &TickInput::default());
        assert!(state.bodies.is_empty());
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn dropped_body_settles_on_floor() {
        let mut state = parked_state();
        let begin = TickInput {
            begin_draw: Some(Vec2::new(600.0, 100.0)),
            ..Default::default()
        };
        tick(&mut state, &begin);
        let end = TickInput {
            end_draw: Some(Vec2::new(600.0, 140.0)),
            ..Default::default()
        };
        tick(&mut state, &end);
        assert_eq!(state.bodies.len(), 1);
        assert!((state.bodies[0].radius - 40.0).abs() < 1e-4);

        for _ in 0..6000 {
            tick(&mut state, &TickInput::default());
        }
        let b = &state.bodies[0];
        assert!(
            (b.bottom() - SCREEN_HEIGHT).abs() <= 1.0,
            "bottom edge at {}",
            b.bottom()
        );
        assert!(b.vel.y.abs() < 1.0, "vy = {}", b.vel.y);
    }

    proptest! {
        #[test]
        fn gravity_monotonic_in_free_fall(y in 50.0f32..400.0, vy in -3.0f32..3.0) {
            let mut state = parked_state();
            add_body(&mut state, 600.0, y, 10.0);
            state.bodies[0].vel.y = vy;
            let before = state.bodies[0].vel.y;
            tick(&mut state, &TickInput::default());
            prop_assert_eq!(state.bodies[0].vel.y, before + GRAVITY);
        }

        #[test]
        fn wall_containment_entering_left(x in -80.0f32..5.0, vx in -20.0f32..0.0) {
            let mut state = parked_state();
            add_body(&mut state, 600.0, 300.0, 10.0);
            state.bodies[0].pos.x = x;
            state.bodies[0].vel.x = vx;
            tick(&mut state, &TickInput::default());
            let b = &state.bodies[0];
            prop_assert!(b.pos.x >= b.radius);
            prop_assert!(b.pos.x <= SCREEN_WIDTH - b.radius);
        }

        #[test]
        fn wall_containment_entering_right(x in 1195.0f32..1280.0, vx in 0.0f32..20.0) {
            let mut state = parked_state();
            add_body(&mut state, 600.0, 300.0, 10.0);
            state.bodies[0].pos.x = x;
            state.bodies[0].vel.x = vx;
            tick(&mut state, &TickInput::default());
            let b = &state.bodies[0];
            prop_assert!(b.pos.x >= b.radius);
            prop_assert!(b.pos.x <= SCREEN_WIDTH - b.radius);
        }

        #[test]
        fn selection_wraps_after_n_advances(n in 1usize..8) {
            let mut state = parked_state();
            for i in 0..n {
                add_body(&mut state, 150.0 + 120.0 * i as f32, 200.0, 10.0);
            }
            tick(&mut state, &TickInput::default());
            let start = state.selected;
            let advance = TickInput { advance_selection: true, ..Default::default() };
            for _ in 0..n {
                tick(&mut state, &advance);
            }
            prop_assert_eq!(state.selected, start);
        }
    }
}
