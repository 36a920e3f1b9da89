#![forbid(unsafe_code)]

//! Canonical pointer event delivered by the canvas host.
//!
//! The host normalizes whatever its windowing toolkit reports into a
//! [`PointerEvent`] in canvas coordinates before handing it to the active
//! gesture. Gestures never see toolkit types.

use crate::geometry::Location;

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Primary button (left mouse button, touch contact).
    #[default]
    Primary,

    /// Secondary button (right mouse button).
    Secondary,

    /// Middle button (scroll wheel click).
    Middle,
}

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// X coordinate on the canvas.
    pub x: i32,

    /// Y coordinate on the canvas.
    pub y: i32,

    /// The button that drives this interaction.
    pub button: PointerButton,
}

impl PointerEvent {
    /// Create a primary-button pointer event.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// Create an event at a location.
    #[must_use]
    pub const fn at(loc: Location) -> Self {
        Self::new(loc.x, loc.y)
    }

    /// Set the driving button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Whether the primary button drives this event.
    #[inline]
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(self.button, PointerButton::Primary)
    }

    /// The pointer position as a [`Location`].
    #[inline]
    #[must_use]
    pub const fn location(&self) -> Location {
        Location::new(self.x, self.y)
    }
}
