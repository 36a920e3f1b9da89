#![forbid(unsafe_code)]

//! Canvas: the poke gesture protocol and the host it runs in.
//!
//! # Role in the workspace
//! A press on the schematic canvas becomes a [`Gesture`]. When the press
//! lands on a component, that gesture is a [`GesturePoke`]: it snapshots the
//! component's location, translates each pointer event into the component's
//! local frame, and delivers it as a [`ckt_model::PokeEvent`]. Whatever the
//! component asks for in response is committed through the
//! [`bridge`] in a single simulation transaction. A press that pokes nothing
//! becomes a [`NullGesture`], which selects.
//!
//! # Primary types
//! - [`LayoutCanvas`]: pointer driver owning the model and the running gesture.
//! - [`LayoutCanvasModel`]: models, gesture slot, selection, host requests.
//! - [`GesturePoke`] / [`PokeOutcome`]: the poke state machine and its results.
//! - [`CanvasConfig`]: hit tolerance and fallback policy.

pub mod bridge;
pub mod canvas;
pub mod config;
pub mod gesture;
pub mod null_gesture;
pub mod poke_gesture;

pub use bridge::EffectOutcome;
pub use canvas::{LayoutCanvas, LayoutCanvasModel};
pub use config::{CanvasConfig, ConfigError};
pub use gesture::{Gesture, GestureId, GestureSlot};
pub use null_gesture::NullGesture;
pub use poke_gesture::{GesturePoke, PokeOutcome, PokeState};
