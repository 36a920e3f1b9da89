#![forbid(unsafe_code)]

//! Model: layout and simulation state, scoped transactions, and the poke
//! capability contract.
//!
//! # Role in the workspace
//! The canvas edits two independently owned models. The **layout model**
//! ([`LayoutModel`]) stores where components sit; the **simulation model**
//! ([`SimulationModel`]) stores their live runtime state. Both are
//! [`Model`] handles that publish committed state atomically, and every read
//! or write goes through a [`Transaction`] whose scope commits on exit.
//!
//! Components that support direct manipulation expose a [`Pokeable`]
//! capability. The canvas hands them a [`PokeEvent`] envelope; they answer by
//! filling in response fields, which the envelope turns into a
//! [`PokeResponse`] for the dispatcher to act on.
//!
//! # Primary types
//! - [`Transaction`] / [`TransactionScope`]: declare accesses, start, commit on drop.
//! - [`LayoutState`]: placed component instances and hit testing.
//! - [`SimulationState`]: per-instance records and the dirty set.
//! - [`InstanceState`] / [`InstanceView`]: write and read handles for one instance.
//! - [`Component`], [`Pokeable`], [`ComponentPainter`]: the component contract.

pub mod component;
pub mod error;
pub mod ids;
pub mod instance;
pub mod layout;
pub mod poke;
pub mod simulation;
pub mod transaction;
pub mod value;

pub use component::{Component, ComponentInstance, ComponentPainter, Pokeable};
pub use error::TransactionError;
pub use ids::{ComponentId, ModelId, ModuleId, SimulationId, TransactionId};
pub use instance::{InstanceState, InstanceView};
pub use layout::{LayoutModel, LayoutState, Placement};
pub use poke::{PokeEvent, PokeEventType, PokeResponse, SimEffect, StateUpdate, ViewRequest};
pub use simulation::{InstanceRecord, SimulationModel, SimulationState};
pub use transaction::{
    AccessMode, Model, ModelState, ReadKey, Transaction, TransactionScope, WriteKey,
};
pub use value::Value;
