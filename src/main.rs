//! Windowed frontend: input polling, fixed-timestep driver, drawing
//!
//! All behavior lives in the `ballpit` library; this binary only translates
//! window events into `TickInput` commands and paints snapshots.

use std::fs;

use macroquad::prelude::{
    clear_background, draw_circle, draw_line, draw_rectangle, get_frame_time, is_key_down,
    is_key_pressed, is_key_released, is_mouse_button_down, is_mouse_button_pressed,
    is_mouse_button_released, mouse_position, next_frame, Conf, KeyCode, MouseButton,
};

use glam::Vec2;

use ballpit::consts::{MAX_SUBSTEPS, SCREEN_HEIGHT, SCREEN_WIDTH, SIM_DT};
use ballpit::sim::{tick, Color, KickDirection, PlatformMotion, RenderSnapshot, Shape, SimState, TickInput};
use ballpit::SimConfig;

const CONFIG_PATH: &str = "ballpit.json";
const SAVE_PATH: &str = "ballpit_save.json";

/// Direction keys mapped to kick directions, in scan priority order.
const DIRECTION_KEYS: [(KeyCode, KickDirection); 4] = [
    (KeyCode::Up, KickDirection::Up),
    (KeyCode::Down, KickDirection::Down),
    (KeyCode::Left, KickDirection::Left),
    (KeyCode::Right, KickDirection::Right),
];

fn window_conf() -> Conf {
    Conf {
        window_title: "Ballpit".to_owned(),
        window_width: SCREEN_WIDTH as i32,
        window_height: SCREEN_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let mut config = SimConfig::load(CONFIG_PATH);
    if config.seed == 0 {
        config.seed = macroquad::miniquad::date::now() as u64;
        log::info!("seeding from clock: {}", config.seed);
    }
    let mut state = SimState::new(config);

    let mut input = TickInput::default();
    let mut accumulator: f32 = 0.0;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::F5) {
            save_state(&state);
        }
        if is_key_pressed(KeyCode::F9) {
            if let Some(loaded) = load_state() {
                state = loaded;
            }
        }

        poll_input(&mut input);

        // Cap the carried time so a long hitch cannot trigger a tick burst.
        accumulator += get_frame_time().min(0.1);
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input);
            clear_one_shots(&mut input);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        draw(&state.snapshot());
        next_frame().await;
    }
}

/// Fold this frame's window events into the pending tick input. Edge events
/// (press/release) are one-shots consumed by the next tick; level state
/// (held keys, pointer position) is refreshed every frame.
fn poll_input(input: &mut TickInput) {
    let (mx, my) = mouse_position();
    let mouse = Vec2::new(mx, my);
    if is_mouse_button_pressed(MouseButton::Left) {
        input.begin_draw = Some(mouse);
    }
    if is_mouse_button_down(MouseButton::Left) {
        input.drag_pos = Some(mouse);
    }
    if is_mouse_button_released(MouseButton::Left) {
        input.end_draw = Some(mouse);
    }

    if is_key_pressed(KeyCode::Tab) {
        input.toggle_floor = true;
    }
    if is_key_pressed(KeyCode::Space) {
        input.advance_selection = true;
    }

    if is_key_pressed(KeyCode::A) {
        input.platform_motion = Some(PlatformMotion::Left);
    } else if is_key_pressed(KeyCode::D) {
        input.platform_motion = Some(PlatformMotion::Right);
    } else if (is_key_released(KeyCode::A) && !is_key_down(KeyCode::D))
        || (is_key_released(KeyCode::D) && !is_key_down(KeyCode::A))
    {
        input.platform_motion = Some(PlatformMotion::Stop);
    }

    input.charge = held_direction();
    for (key, direction) in DIRECTION_KEYS {
        if is_key_released(key) {
            input.release_kick = Some(direction);
        }
    }
}

fn held_direction() -> Option<KickDirection> {
    DIRECTION_KEYS
        .iter()
        .find(|(key, _)| is_key_down(*key))
        .map(|(_, direction)| *direction)
}

/// Reset the edge-triggered commands once a tick has consumed them. Held
/// state (charge, pointer position) persists across ticks.
fn clear_one_shots(input: &mut TickInput) {
    input.begin_draw = None;
    input.end_draw = None;
    input.platform_motion = None;
    input.toggle_floor = false;
    input.release_kick = None;
    input.advance_selection = false;
}

fn save_state(state: &SimState) {
    match serde_json::to_string(state) {
        Ok(json) => match fs::write(SAVE_PATH, json) {
            Ok(()) => log::info!("saved state to {SAVE_PATH}"),
            Err(err) => log::error!("writing {SAVE_PATH}: {err}"),
        },
        Err(err) => log::error!("serializing state: {err}"),
    }
}

fn load_state() -> Option<SimState> {
    let json = match fs::read_to_string(SAVE_PATH) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("reading {SAVE_PATH}: {err}");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(state) => {
            log::info!("loaded state from {SAVE_PATH}");
            Some(state)
        }
        Err(err) => {
            log::error!("parsing {SAVE_PATH}: {err}");
            None
        }
    }
}

fn draw(snapshot: &RenderSnapshot) {
    clear_background(to_mq(Color::WHITE));
    for op in &snapshot.ops {
        match op.shape {
            Shape::Circle { center, radius } => {
                draw_circle(center.x, center.y, radius, to_mq(op.color));
            }
            Shape::Rect { pos, size } => {
                draw_rectangle(pos.x, pos.y, size.x, size.y, to_mq(op.color));
            }
        }
    }
    if let Some(line) = snapshot.drag_line {
        draw_line(
            line.start.x,
            line.start.y,
            line.current.x,
            line.current.y,
            2.0,
            to_mq(Color::BLACK),
        );
    }
}

fn to_mq(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::from_rgba(color.r, color.g, color.b, 255)
}
