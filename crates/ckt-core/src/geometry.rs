#![forbid(unsafe_code)]

//! Geometric primitives in canvas coordinates.
//!
//! Canvas coordinates are signed: components may be placed left of or above
//! the visible origin, and pointer positions translated into a component's
//! local frame are routinely negative.

use std::ops::{Add, Neg, Sub};

/// A point on the canvas (or in a component's local frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new location.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Express `self` relative to `origin`.
    ///
    /// This is the conversion from canvas coordinates into the local frame of
    /// a component placed at `origin`.
    #[inline]
    #[must_use]
    pub const fn relative_to(self, origin: Location) -> Self {
        Self {
            x: self.x.wrapping_sub(origin.x),
            y: self.y.wrapping_sub(origin.y),
        }
    }
}

impl From<(i32, i32)> for Location {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Location {
    type Output = Location;

    fn add(self, rhs: Location) -> Location {
        self.translate(rhs.x, rhs.y)
    }
}

impl Sub for Location {
    type Output = Location;

    fn sub(self, rhs: Location) -> Location {
        self.relative_to(rhs)
    }
}

impl Neg for Location {
    type Output = Location;

    fn neg(self) -> Location {
        Location::new(self.x.wrapping_neg(), self.y.wrapping_neg())
    }
}

/// An axis-aligned rectangle used for component extents and hit testing.
///
/// Component bounds are usually expressed relative to the component's
/// location, so `x`/`y` may be negative (e.g. a pin anchored at the center).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in canvas units.
    pub width: i32,
    /// Height in canvas units.
    pub height: i32,
}

impl Bounds {
    /// Create new bounds. Negative extents are clamped to zero.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Bounds anchored at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the bounds have zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the bounds.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if a location is inside the bounds.
    #[inline]
    pub const fn contains_location(&self, loc: Location) -> bool {
        self.contains(loc.x, loc.y)
    }

    /// Move the bounds by an offset (local frame to canvas frame).
    #[inline]
    #[must_use]
    pub const fn offset(&self, by: Location) -> Bounds {
        Bounds {
            x: self.x.saturating_add(by.x),
            y: self.y.saturating_add(by.y),
            width: self.width,
            height: self.height,
        }
    }

    /// Grow the bounds by `margin` on every side. Negative margins shrink.
    #[must_use]
    pub fn expand(&self, margin: i32) -> Bounds {
        Bounds::new(
            self.x.saturating_sub(margin),
            self.y.saturating_sub(margin),
            self.width.saturating_add(margin.saturating_mul(2)),
            self.height.saturating_add(margin.saturating_mul(2)),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
