//! Render snapshot: what the frontend draws each tick
//!
//! The sim hands the renderer an owned, ordered list of draw operations
//! instead of letting it walk live state. Bodies whose position cannot be
//! represented by the rasterizer are skipped here, deterministically, rather
//! than letting a draw call overflow mid-frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::SimState;

/// RGB render tag; carries no physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const DARK_GREY: Color = Color::rgb(40, 50, 45);
    /// Selection highlight
    pub const GREEN: Color = Color::rgb(30, 250, 70);
    /// Platform
    pub const RED: Color = Color::rgb(250, 40, 50);
}

/// Colors handed out to freshly drawn bodies
pub const SPAWN_PALETTE: [Color; 4] = [
    Color::BLACK,
    Color::DARK_GREY,
    Color::rgb(25, 40, 95),
    Color::rgb(95, 30, 45),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { pos: Vec2, size: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    pub shape: Shape,
    pub color: Color,
}

/// In-progress drag line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragLine {
    pub start: Vec2,
    pub current: Vec2,
}

/// Everything the renderer needs for one frame, in draw order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub ops: Vec<DrawOp>,
    pub drag_line: Option<DragLine>,
}

/// Largest coordinate the rasterizer is asked to handle. Positions beyond
/// this, or non-finite ones, skip drawing for the tick instead of failing
/// the frame.
const DRAW_LIMIT: f32 = 1.0e7;

fn drawable(center: Vec2, radius: f32) -> bool {
    center.is_finite()
        && radius.is_finite()
        && center.x.abs() <= DRAW_LIMIT
        && center.y.abs() <= DRAW_LIMIT
}

impl SimState {
    /// Copy out this tick's draw list: platform first, bodies in list order,
    /// the selected body last so its highlight paints over any overlap.
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut ops = Vec::with_capacity(self.bodies.len() + 1);
        ops.push(DrawOp {
            shape: Shape::Rect {
                pos: self.platform.pos,
                size: Vec2::new(self.platform.width, self.platform.height),
            },
            color: Color::RED,
        });

        let selected = if self.bodies.is_empty() {
            None
        } else {
            Some(self.selected % self.bodies.len())
        };
        for (i, body) in self.bodies.iter().enumerate() {
            if Some(i) == selected || !drawable(body.pos, body.radius) {
                continue;
            }
            ops.push(DrawOp {
                shape: Shape::Circle {
                    center: body.pos,
                    radius: body.radius,
                },
                color: body.color,
            });
        }
        if let Some(i) = selected {
            let body = &self.bodies[i];
            if drawable(body.pos, body.radius) {
                ops.push(DrawOp {
                    shape: Shape::Circle {
                        center: body.pos,
                        radius: body.radius,
                    },
                    color: body.color,
                });
            }
        }

        RenderSnapshot {
            ops,
            drag_line: self.drag.map(|d| DragLine {
                start: d.start,
                current: d.current,
            }),
        }
    }
}
