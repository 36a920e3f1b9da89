#![forbid(unsafe_code)]

//! Gesture contract and the host's active-gesture slot.
//!
//! A [`Gesture`] handles one continuous pointer interaction. The canvas host
//! owns a single [`GestureSlot`]: at most one gesture is registered there at
//! a time. Gestures deregister themselves on terminal transitions, and a
//! gesture may hand the rest of an interaction to a replacement by
//! installing it in the slot.
//!
//! # Invariants
//!
//! 1. [`GestureSlot::active`] names at most one gesture.
//! 2. An installed replacement is always the registered gesture at the moment
//!    it is installed.
//! 3. [`GestureSlot::clear_if`] never clears a gesture other than the one it
//!    names, so a late cancel cannot evict a newer gesture.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ckt_core::{Paintbrush, PointerEvent};

use crate::canvas::LayoutCanvasModel;

static NEXT_GESTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one gesture instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GestureId(u64);

impl GestureId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_GESTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gesture#{}", self.0)
    }
}

/// Stateful handler for one pointer interaction (start, moves, end or cancel).
pub trait Gesture: fmt::Debug {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    fn id(&self) -> GestureId;

    fn gesture_start(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent);

    fn gesture_move(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent);

    fn gesture_complete(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent);

    fn gesture_cancel(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent);

    /// Paint in-progress feedback. Default: nothing.
    fn paint(&self, brush: &mut dyn Paintbrush) {
        let _ = brush;
    }
}

/// The host's single active-gesture slot.
#[derive(Default)]
pub struct GestureSlot {
    active: Option<GestureId>,
    installed: Option<Box<dyn Gesture>>,
}

impl GestureSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registered gesture, if any.
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<GestureId> {
        self.active
    }

    #[must_use]
    pub fn is_registered(&self, id: GestureId) -> bool {
        self.active == Some(id)
    }

    /// Register a gesture the driver already owns.
    pub fn register(&mut self, id: GestureId) {
        self.active = Some(id);
    }

    /// Register `gesture` and hand its ownership to the driver.
    pub fn install(&mut self, gesture: Box<dyn Gesture>) {
        self.active = Some(gesture.id());
        self.installed = Some(gesture);
    }

    /// Clear the slot. Returns the id that was registered.
    pub fn clear(&mut self) -> Option<GestureId> {
        self.installed = None;
        self.active.take()
    }

    /// Clear the slot only while `id` is the registered gesture.
    pub fn clear_if(&mut self, id: GestureId) -> bool {
        if self.active != Some(id) {
            return false;
        }
        self.clear();
        true
    }

    /// Hand an installed replacement over to the driver.
    pub fn take_installed(&mut self) -> Option<Box<dyn Gesture>> {
        self.installed.take()
    }
}

impl fmt::Debug for GestureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureSlot")
            .field("active", &self.active)
            .field("installed", &self.installed.as_ref().map(|g| g.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Noop(GestureId);

    impl Gesture for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn id(&self) -> GestureId {
            self.0
        }

        fn gesture_start(&mut self, _: &mut LayoutCanvasModel, _: &PointerEvent) {}
        fn gesture_move(&mut self, _: &mut LayoutCanvasModel, _: &PointerEvent) {}
        fn gesture_complete(&mut self, _: &mut LayoutCanvasModel, _: &PointerEvent) {}
        fn gesture_cancel(&mut self, _: &mut LayoutCanvasModel, _: &PointerEvent) {}
    }

    #[test]
    fn ids_are_unique() {
        let a = GestureId::next();
        let b = GestureId::next();
        assert_ne!(a, b);
        assert!(a.raw() < b.raw());
    }

    #[test]
    fn clear_if_guards_against_stale_ids() {
        let mut slot = GestureSlot::new();
        let old = GestureId::next();
        let new = GestureId::next();
        slot.register(old);
        slot.register(new);
        assert!(!slot.clear_if(old));
        assert!(slot.is_registered(new));
        assert!(slot.clear_if(new));
        assert_eq!(slot.active(), None);
    }

    #[test]
    fn install_registers_and_hands_over() {
        let mut slot = GestureSlot::new();
        let id = GestureId::next();
        slot.install(Box::new(Noop(id)));
        assert!(slot.is_registered(id));
        let taken = slot.take_installed().unwrap();
        assert_eq!(taken.id(), id);
        assert!(slot.take_installed().is_none());
        assert!(slot.is_registered(id));
    }

    #[test]
    fn clear_drops_pending_install() {
        let mut slot = GestureSlot::new();
        let id = GestureId::next();
        slot.install(Box::new(Noop(id)));
        assert_eq!(slot.clear(), Some(id));
        assert!(slot.take_installed().is_none());
    }
}
