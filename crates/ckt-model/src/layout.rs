#![forbid(unsafe_code)]

//! Layout state: which component instances are placed where.
//!
//! Placements are kept in stacking order; later placements sit on top, and
//! hit testing returns the topmost match.

use std::sync::Arc;

use ckt_core::Location;

use crate::component::{Component, ComponentInstance};
use crate::ids::ComponentId;
use crate::transaction::Model;

/// Handle to a layout.
pub type LayoutModel = Model<LayoutState>;

/// A component instance at a canvas location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub instance: ComponentInstance,
    pub location: Location,
}

/// The arrangement of component instances on one canvas.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    placements: Vec<Placement>,
    next_id: u64,
}

impl LayoutState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap this layout in a model handle.
    #[must_use]
    pub fn into_model(self) -> LayoutModel {
        Model::new(self)
    }

    /// Place `component` at `location` on top of everything else.
    pub fn add(&mut self, component: Arc<dyn Component>, location: Location) -> ComponentInstance {
        self.next_id += 1;
        let instance = ComponentInstance::new(ComponentId::new(self.next_id), component);
        self.placements.push(Placement {
            instance: instance.clone(),
            location,
        });
        instance
    }

    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.instance.id() == id)
    }

    #[must_use]
    pub fn instance(&self, id: ComponentId) -> Option<&ComponentInstance> {
        self.get(id).map(|p| &p.instance)
    }

    #[must_use]
    pub fn location_of(&self, id: ComponentId) -> Option<Location> {
        self.get(id).map(|p| p.location)
    }

    /// Move a placed instance. Returns its previous location.
    pub fn move_to(&mut self, id: ComponentId, location: Location) -> Option<Location> {
        let placement = self.placements.iter_mut().find(|p| p.instance.id() == id)?;
        Some(std::mem::replace(&mut placement.location, location))
    }

    pub fn remove(&mut self, id: ComponentId) -> Option<Placement> {
        let index = self.placements.iter().position(|p| p.instance.id() == id)?;
        Some(self.placements.remove(index))
    }

    /// Topmost instance whose bounds, grown by `tolerance`, contain `point`.
    #[must_use]
    pub fn component_at(&self, point: Location, tolerance: i32) -> Option<&ComponentInstance> {
        self.placements
            .iter()
            .rev()
            .find(|p| {
                p.instance
                    .component()
                    .bounds()
                    .expand(tolerance)
                    .contains_location(point - p.location)
            })
            .map(|p| &p.instance)
    }

    /// Placements in stacking order (bottom first).
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
