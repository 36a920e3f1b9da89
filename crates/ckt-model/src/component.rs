#![forbid(unsafe_code)]

//! The component contract and the poke capability.
//!
//! Every placed element implements [`Component`]. Elements that support
//! direct manipulation additionally implement [`Pokeable`] and advertise it
//! through [`Component::pokeable`]. Absence of the capability is a normal
//! answer, never a failure: the canvas simply does not poke such elements.

use std::fmt;
use std::sync::Arc;

use ckt_core::{Bounds, Paintbrush};

use crate::ids::ComponentId;
use crate::instance::InstanceView;
use crate::poke::PokeEvent;

/// A circuit element that can be placed in a layout.
pub trait Component: Send + Sync + fmt::Debug {
    /// Short type name for diagnostics ("Switch", "Slider", ...).
    fn name(&self) -> &str;

    /// Extent relative to the component's location, used for hit testing.
    fn bounds(&self) -> Bounds;

    /// The poke capability, if this element supports direct manipulation.
    fn pokeable(&self) -> Option<&dyn Pokeable> {
        None
    }
}

/// Direct-manipulation capability.
///
/// Implementations answer a [`PokeEvent`] by setting response fields on it.
/// They never touch model state directly: mutations are expressed as a
/// deferred state update that the canvas runs inside a transaction.
pub trait Pokeable {
    /// Handle one poke event. Coordinates are in the component's local frame.
    fn process_poke_event(&self, event: &mut PokeEvent);

    /// Paint in-progress feedback. The painter's brush is already translated
    /// into the component's local frame.
    fn paint_poke_progress(&self, painter: &mut ComponentPainter<'_>);
}

/// A placed component: identity plus shared behavior.
#[derive(Clone)]
pub struct ComponentInstance {
    id: ComponentId,
    component: Arc<dyn Component>,
}

impl ComponentInstance {
    #[must_use]
    pub fn new(id: ComponentId, component: Arc<dyn Component>) -> Self {
        Self { id, component }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    #[must_use]
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// Shorthand for `self.component().pokeable()`.
    #[must_use]
    pub fn pokeable(&self) -> Option<&dyn Pokeable> {
        self.component.pokeable()
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", &self.id)
            .field("component", &self.component.name())
            .finish()
    }
}

impl PartialEq for ComponentInstance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentInstance {}

/// Brush plus read-only state handed to [`Pokeable::paint_poke_progress`].
pub struct ComponentPainter<'a> {
    brush: &'a mut dyn Paintbrush,
    state: InstanceView,
}

impl<'a> ComponentPainter<'a> {
    pub fn new(brush: &'a mut dyn Paintbrush, state: InstanceView) -> Self {
        Self { brush, state }
    }

    /// Drawing surface in the component's local frame.
    pub fn brush(&mut self) -> &mut dyn Paintbrush {
        &mut *self.brush
    }

    /// Read-only view of the component's runtime state.
    #[must_use]
    pub fn state(&self) -> &InstanceView {
        &self.state
    }
}

impl fmt::Debug for ComponentPainter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentPainter")
            .field("origin", &self.brush.origin())
            .field("state", &self.state)
            .finish()
    }
}
