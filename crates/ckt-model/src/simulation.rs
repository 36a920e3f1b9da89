#![forbid(unsafe_code)]

//! Live simulation state.
//!
//! [`SimulationState`] is the value behind a [`SimulationModel`]. It holds one
//! [`InstanceRecord`] per component instance plus the set of instances
//! scheduled for re-evaluation. The propagation engine itself lives elsewhere;
//! it drains the dirty set with [`SimulationState::take_dirty`].

use std::collections::BTreeSet;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::ids::{ComponentId, SimulationId};
use crate::transaction::Model;
use crate::value::Value;

/// Handle to a live simulation.
pub type SimulationModel = Model<SimulationState>;

/// Runtime state of one component instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceRecord {
    /// Component-private state (switch position, slider value, ...).
    pub state: Value,
    /// Port values, indexed by port number.
    pub ports: SmallVec<[Value; 4]>,
}

impl InstanceRecord {
    /// Value on port `index`, or [`Value::Unknown`] if never driven.
    #[must_use]
    pub fn port(&self, index: usize) -> Value {
        self.ports.get(index).copied().unwrap_or_default()
    }

    /// Drive port `index`, growing the port list as needed.
    pub fn set_port(&mut self, index: usize, value: Value) {
        if index >= self.ports.len() {
            self.ports.resize(index + 1, Value::Unknown);
        }
        self.ports[index] = value;
    }
}

/// Simulation state for one module instance tree.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    id: SimulationId,
    instances: AHashMap<ComponentId, InstanceRecord>,
    dirty: BTreeSet<ComponentId>,
}

impl SimulationState {
    /// Empty state for the simulation `id`.
    #[must_use]
    pub fn new(id: SimulationId) -> Self {
        Self {
            id,
            instances: AHashMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    /// Wrap fresh state in a model handle.
    #[must_use]
    pub fn into_model(self) -> SimulationModel {
        Model::new(self)
    }

    #[must_use]
    pub fn id(&self) -> SimulationId {
        self.id
    }

    /// Record for `instance`, if it has ever been written.
    #[must_use]
    pub fn instance(&self, instance: ComponentId) -> Option<&InstanceRecord> {
        self.instances.get(&instance)
    }

    /// Record for `instance`, created empty on first access.
    pub fn instance_mut(&mut self, instance: ComponentId) -> &mut InstanceRecord {
        self.instances.entry(instance).or_default()
    }

    /// Schedule `instance` for re-evaluation on the next propagation pass.
    ///
    /// Returns `true` if it was not already scheduled.
    pub fn mark_instance_dirty(&mut self, instance: ComponentId) -> bool {
        self.dirty.insert(instance)
    }

    #[must_use]
    pub fn is_dirty(&self, instance: ComponentId) -> bool {
        self.dirty.contains(&instance)
    }

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Drain the dirty set in ascending id order.
    pub fn take_dirty(&mut self) -> Vec<ComponentId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}
