#![forbid(unsafe_code)]

//! Paint surfaces.
//!
//! [`Paintbrush`] is the minimal drawing surface handed to components when the
//! canvas paints overlays. It carries a translatable coordinate origin so a
//! component can draw in its own local frame without knowing where it sits on
//! the canvas.
//!
//! [`RecordingBrush`] is a display-list implementation: every operation is
//! stored in absolute canvas coordinates, which makes it the natural backend
//! for tests and for hosts that replay drawing onto a real toolkit surface.
//!
//! # Invariants
//!
//! 1. Translation is cumulative: `translate(a, b)` then `translate(c, d)` is
//!    equivalent to `translate(a + c, b + d)`.
//! 2. Recorded operations never depend on the origin at replay time; they are
//!    resolved to absolute coordinates when recorded.

use crate::geometry::{Bounds, Location};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Highlight used for in-progress poke overlays.
    pub const POKE: Self = Self::rgb(255, 0, 255);

    /// Opaque color from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A drawing surface with a translatable coordinate origin.
pub trait Paintbrush {
    /// Shift the coordinate origin by `(dx, dy)`.
    fn translate_coordinates(&mut self, dx: i32, dy: i32);

    /// Current origin in absolute canvas coordinates.
    fn origin(&self) -> Location;

    /// Set the color for subsequent operations.
    fn set_color(&mut self, color: Color);

    /// Draw a line segment.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    /// Stroke a rectangle outline.
    fn draw_rect(&mut self, bounds: Bounds);

    /// Fill a rectangle.
    fn fill_rect(&mut self, bounds: Bounds);

    /// Draw text with its baseline-left corner at `(x, y)`.
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
}

/// A recorded drawing operation, in absolute canvas coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOp {
    Line {
        from: Location,
        to: Location,
        color: Color,
    },
    StrokeRect {
        bounds: Bounds,
        color: Color,
    },
    FillRect {
        bounds: Bounds,
        color: Color,
    },
    Text {
        at: Location,
        text: String,
        color: Color,
    },
}

/// Display-list [`Paintbrush`].
#[derive(Debug, Clone, Default)]
pub struct RecordingBrush {
    origin: Location,
    color: Color,
    ops: Vec<PaintOp>,
}

impl RecordingBrush {
    /// Create an empty recording with the origin at `(0, 0)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations in drawing order.
    #[must_use]
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Whether anything has been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Take the recorded operations, leaving the brush empty.
    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    fn abs(&self, x: i32, y: i32) -> Location {
        self.origin.translate(x, y)
    }
}

impl Paintbrush for RecordingBrush {
    fn translate_coordinates(&mut self, dx: i32, dy: i32) {
        self.origin = self.origin.translate(dx, dy);
    }

    fn origin(&self) -> Location {
        self.origin
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.ops.push(PaintOp::Line {
            from: self.abs(x0, y0),
            to: self.abs(x1, y1),
            color: self.color,
        });
    }

    fn draw_rect(&mut self, bounds: Bounds) {
        self.ops.push(PaintOp::StrokeRect {
            bounds: bounds.offset(self.origin),
            color: self.color,
        });
    }

    fn fill_rect(&mut self, bounds: Bounds) {
        self.ops.push(PaintOp::FillRect {
            bounds: bounds.offset(self.origin),
            color: self.color,
        });
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        self.ops.push(PaintOp::Text {
            at: self.abs(x, y),
            text: text.to_owned(),
            color: self.color,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
