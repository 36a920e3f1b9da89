#![forbid(unsafe_code)]

//! Per-instance state handles.
//!
//! [`InstanceState`] is a write handle: it borrows the working copy of a
//! simulation inside an open transaction scope, so it cannot outlive the
//! scope that created it. [`InstanceView`] is the detached read-only
//! counterpart handed to progress painters: every read returns the default
//! value.

use std::fmt;

use crate::ids::ComponentId;
use crate::simulation::SimulationState;
use crate::value::Value;

/// Write access to one instance's runtime state within a transaction.
pub struct InstanceState<'t> {
    sim: &'t mut SimulationState,
    instance: ComponentId,
    poke_rejected: bool,
}

impl<'t> InstanceState<'t> {
    /// Bind a handle to `instance` within the scope's simulation working copy.
    pub fn new(sim: &'t mut SimulationState, instance: ComponentId) -> Self {
        Self {
            sim,
            instance,
            poke_rejected: false,
        }
    }

    #[must_use]
    pub fn instance(&self) -> ComponentId {
        self.instance
    }

    #[must_use]
    pub fn state(&self) -> Value {
        self.sim
            .instance(self.instance)
            .map(|r| r.state)
            .unwrap_or_default()
    }

    pub fn set_state(&mut self, value: Value) {
        self.sim.instance_mut(self.instance).state = value;
    }

    #[must_use]
    pub fn port(&self, index: usize) -> Value {
        self.sim
            .instance(self.instance)
            .map(|r| r.port(index))
            .unwrap_or_default()
    }

    pub fn set_port(&mut self, index: usize, value: Value) {
        self.sim.instance_mut(self.instance).set_port(index, value);
    }

    /// Reject the poke that scheduled this update.
    ///
    /// Whatever the update already wrote is still committed; only the
    /// dispatch result changes.
    pub fn reject_poke(&mut self) {
        self.poke_rejected = true;
    }

    #[must_use]
    pub fn is_poke_rejected(&self) -> bool {
        self.poke_rejected
    }
}

impl fmt::Debug for InstanceState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceState")
            .field("instance", &self.instance)
            .field("simulation", &self.sim.id())
            .field("poke_rejected", &self.poke_rejected)
            .finish()
    }
}

/// Read-only view of one instance, detached from any transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceView {
    instance: ComponentId,
}

impl InstanceView {
    /// A view with no backing state: every read returns the default.
    #[must_use]
    pub fn detached(instance: ComponentId) -> Self {
        Self { instance }
    }

    #[must_use]
    pub fn instance(&self) -> ComponentId {
        self.instance
    }

    #[must_use]
    pub fn state(&self) -> Value {
        Value::default()
    }

    #[must_use]
    pub fn port(&self, _index: usize) -> Value {
        Value::default()
    }
}
