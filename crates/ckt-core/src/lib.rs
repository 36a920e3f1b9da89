#![forbid(unsafe_code)]

//! Core: geometry, pointer events, and paint surfaces for the circuit canvas.
//!
//! # Role in the workspace
//! `ckt-core` is the leaf crate. It owns the coordinate types shared by the
//! layout model and the canvas, the normalized pointer event the canvas host
//! feeds into gestures, and the [`paint::Paintbrush`] surface that components
//! draw progress overlays onto.
//!
//! # How it fits in the system
//! `ckt-model` builds layout and simulation state on top of these types, and
//! `ckt-canvas` drives gestures from [`event::PointerEvent`] values. Nothing in
//! this crate knows about transactions or components.

pub mod event;
pub mod geometry;
pub mod paint;

pub use event::{PointerButton, PointerEvent};
pub use geometry::{Bounds, Location};
pub use paint::{Color, PaintOp, Paintbrush, RecordingBrush};
