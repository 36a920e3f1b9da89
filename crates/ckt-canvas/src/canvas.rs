#![forbid(unsafe_code)]

//! Canvas host model and pointer driver.
//!
//! [`LayoutCanvasModel`] is the state gestures talk to: the two models, the
//! active-gesture slot, the selection, and the pending repaint and view
//! requests. [`LayoutCanvas`] owns the model plus the running gesture and
//! turns raw pointer input into gesture calls.
//!
//! # Invariants
//!
//! 1. After every driver call the running gesture, if any, is the one
//!    registered in the slot. A gesture that deregistered itself is dropped;
//!    a gesture installed as a replacement takes over.
//! 2. Pointer events reach the running gesture in the order they arrive.
//!
//! # Failure Modes
//!
//! - Pointer move/up/cancel with no running gesture: ignored.
//! - Press while a gesture is running: the running gesture is cancelled
//!   first, or the press is ignored when `cancel_on_new_press` is off.

use std::collections::VecDeque;

use ckt_core::{Location, Paintbrush, PointerEvent};
use ckt_model::{ComponentId, ComponentInstance, LayoutModel, SimulationModel, ViewRequest};

use crate::config::CanvasConfig;
use crate::gesture::{Gesture, GestureId, GestureSlot};
use crate::null_gesture::NullGesture;
use crate::poke_gesture::GesturePoke;

// ---------------------------------------------------------------------------
// LayoutCanvasModel
// ---------------------------------------------------------------------------

/// Host-side canvas state shared with the running gesture.
#[derive(Debug)]
pub struct LayoutCanvasModel {
    layout: LayoutModel,
    simulation: SimulationModel,
    config: CanvasConfig,
    slot: GestureSlot,
    selection: Option<ComponentId>,
    view_requests: VecDeque<ViewRequest>,
    repaint: bool,
}

impl LayoutCanvasModel {
    #[must_use]
    pub fn new(layout: LayoutModel, simulation: SimulationModel) -> Self {
        Self::with_config(layout, simulation, CanvasConfig::default())
    }

    #[must_use]
    pub fn with_config(
        layout: LayoutModel,
        simulation: SimulationModel,
        config: CanvasConfig,
    ) -> Self {
        Self {
            layout,
            simulation,
            config,
            slot: GestureSlot::new(),
            selection: None,
            view_requests: VecDeque::new(),
            repaint: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &LayoutModel {
        &self.layout
    }

    #[inline]
    #[must_use]
    pub fn simulation(&self) -> &SimulationModel {
        &self.simulation
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Topmost component under `point`, widened by the configured tolerance.
    #[must_use]
    pub fn hit_test(&self, point: Location) -> Option<ComponentInstance> {
        self.layout
            .snapshot()
            .component_at(point, self.config.hit_tolerance)
            .cloned()
    }

    // --- active-gesture slot ---

    /// The registered gesture, if any.
    #[must_use]
    pub fn gesture(&self) -> Option<GestureId> {
        self.slot.active()
    }

    /// Register a gesture owned by the driver.
    pub fn register_gesture(&mut self, id: GestureId) {
        tracing::debug!(target: "ckt.canvas", gesture = %id, "gesture registered");
        self.slot.register(id);
    }

    /// Register `gesture` as a replacement for the running one.
    pub fn set_gesture(&mut self, gesture: Box<dyn Gesture>) {
        tracing::debug!(
            target: "ckt.canvas",
            gesture = %gesture.id(),
            kind = gesture.name(),
            "gesture installed"
        );
        self.slot.install(gesture);
    }

    /// Clear the slot unconditionally.
    pub fn clear_gesture(&mut self) -> Option<GestureId> {
        let cleared = self.slot.clear();
        if let Some(id) = cleared {
            tracing::debug!(target: "ckt.canvas", gesture = %id, "gesture cleared");
        }
        cleared
    }

    /// Clear the slot only while `id` is still registered.
    pub fn clear_gesture_if(&mut self, id: GestureId) -> bool {
        let cleared = self.slot.clear_if(id);
        tracing::debug!(target: "ckt.canvas", gesture = %id, cleared, "conditional gesture clear");
        cleared
    }

    pub(crate) fn take_installed_gesture(&mut self) -> Option<Box<dyn Gesture>> {
        self.slot.take_installed()
    }

    // --- selection ---

    #[must_use]
    pub fn selection(&self) -> Option<ComponentId> {
        self.selection
    }

    /// Replace the selection. A change schedules a repaint.
    pub fn select(&mut self, selection: Option<ComponentId>) {
        if self.selection != selection {
            self.selection = selection;
            self.request_repaint();
        }
    }

    // --- host requests ---

    /// Queue a request to switch the visible design view.
    pub fn request_view(&mut self, request: ViewRequest) {
        tracing::debug!(
            target: "ckt.canvas",
            module = %request.module,
            simulation = %request.simulation,
            "view switch requested"
        );
        self.view_requests.push_back(request);
    }

    /// Oldest pending view request.
    pub fn take_view_request(&mut self) -> Option<ViewRequest> {
        self.view_requests.pop_front()
    }

    #[must_use]
    pub fn pending_view_requests(&self) -> usize {
        self.view_requests.len()
    }

    pub fn request_repaint(&mut self) {
        if !self.repaint {
            tracing::trace!(target: "ckt.canvas", "repaint requested");
        }
        self.repaint = true;
    }

    #[must_use]
    pub fn repaint_pending(&self) -> bool {
        self.repaint
    }

    /// Drain the repaint flag.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }
}

// ---------------------------------------------------------------------------
// LayoutCanvas
// ---------------------------------------------------------------------------

/// Pointer driver: owns the canvas model and the running gesture.
#[derive(Debug)]
pub struct LayoutCanvas {
    model: LayoutCanvasModel,
    gesture: Option<Box<dyn Gesture>>,
}

impl LayoutCanvas {
    #[must_use]
    pub fn new(model: LayoutCanvasModel) -> Self {
        Self {
            model,
            gesture: None,
        }
    }

    #[must_use]
    pub fn model(&self) -> &LayoutCanvasModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut LayoutCanvasModel {
        &mut self.model
    }

    /// The running gesture, if any.
    #[must_use]
    pub fn active_gesture(&self) -> Option<&dyn Gesture> {
        self.gesture.as_deref()
    }

    /// Start a gesture for a press at `event`.
    ///
    /// Only primary-button presses start gestures; other buttons are ignored.
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        if !event.is_primary() {
            tracing::debug!(
                target: "ckt.canvas",
                button = ?event.button,
                "non-primary press ignored"
            );
            return;
        }
        if let Some(mut running) = self.gesture.take() {
            if !self.model.config.cancel_on_new_press {
                tracing::debug!(
                    target: "ckt.canvas",
                    gesture = %running.id(),
                    "press ignored while a gesture is running"
                );
                self.gesture = Some(running);
                return;
            }
            running.gesture_cancel(&mut self.model, event);
            self.model.clear_gesture_if(running.id());
        }

        let mut gesture = self.pick_gesture(event);
        self.model.register_gesture(gesture.id());
        gesture.gesture_start(&mut self.model, event);
        self.settle(gesture);
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        gesture.gesture_move(&mut self.model, event);
        self.settle(gesture);
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        gesture.gesture_complete(&mut self.model, event);
        self.settle(gesture);
    }

    pub fn pointer_cancel(&mut self, event: &PointerEvent) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        gesture.gesture_cancel(&mut self.model, event);
        self.settle(gesture);
    }

    /// Paint the running gesture's feedback.
    pub fn paint(&self, brush: &mut dyn Paintbrush) {
        if let Some(gesture) = &self.gesture {
            gesture.paint(brush);
        }
    }

    fn pick_gesture(&self, event: &PointerEvent) -> Box<dyn Gesture> {
        let Some(target) = self.model.hit_test(event.location()) else {
            return Box::new(NullGesture::new());
        };
        let id = target.id();
        match GesturePoke::new(&self.model, target) {
            Ok(poke) => Box::new(poke),
            Err(err) => {
                tracing::error!(
                    target: "ckt.canvas",
                    component = %id,
                    error = %err,
                    "could not snapshot poke target"
                );
                Box::new(NullGesture::new())
            }
        }
    }

    fn settle(&mut self, gesture: Box<dyn Gesture>) {
        if let Some(replacement) = self.model.take_installed_gesture() {
            tracing::debug!(
                target: "ckt.canvas",
                from = %gesture.id(),
                to = %replacement.id(),
                "gesture handed over"
            );
            self.gesture = Some(replacement);
        } else if self.model.gesture() == Some(gesture.id()) {
            self.gesture = Some(gesture);
        } else {
            self.gesture = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ckt_core::Bounds;
    use ckt_model::{Component, LayoutState, ModuleId, SimulationId, SimulationState};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Plate;

    impl Component for Plate {
        fn name(&self) -> &str {
            "Plate"
        }

        fn bounds(&self) -> Bounds {
            Bounds::from_size(10, 10)
        }
    }

    fn model() -> (LayoutCanvasModel, ComponentId) {
        let mut layout = LayoutState::new();
        let plate = layout.add(Arc::new(Plate), Location::new(20, 20));
        let sim = SimulationState::new(SimulationId::new(1));
        (
            LayoutCanvasModel::new(layout.into_model(), sim.into_model()),
            plate.id(),
        )
    }

    #[test]
    fn hit_test_uses_tolerance() {
        let (model, plate) = model();
        assert_eq!(model.hit_test(Location::new(25, 25)).map(|i| i.id()), Some(plate));
        assert_eq!(model.hit_test(Location::new(19, 25)).map(|i| i.id()), Some(plate));
        assert!(model.hit_test(Location::new(0, 0)).is_none());
    }

    #[test]
    fn select_requests_repaint_only_on_change() {
        let (mut model, plate) = model();
        model.select(Some(plate));
        assert!(model.take_repaint());
        model.select(Some(plate));
        assert!(!model.take_repaint());
        assert_eq!(model.selection(), Some(plate));
    }

    #[test]
    fn view_requests_queue_in_order() {
        let (mut model, _) = model();
        let first = ViewRequest {
            module: ModuleId::new(1),
            simulation: SimulationId::new(2),
        };
        let second = ViewRequest {
            module: ModuleId::new(3),
            simulation: SimulationId::new(4),
        };
        model.request_view(first);
        model.request_view(second);
        assert_eq!(model.pending_view_requests(), 2);
        assert_eq!(model.take_view_request(), Some(first));
        assert_eq!(model.take_view_request(), Some(second));
        assert_eq!(model.take_view_request(), None);
    }

    #[test]
    fn press_on_empty_canvas_clears_selection() {
        let (mut model, plate) = model();
        model.select(Some(plate));
        let mut canvas = LayoutCanvas::new(model);
        canvas.pointer_down(&PointerEvent::new(0, 0));
        assert_eq!(canvas.model().selection(), None);
        assert!(canvas.active_gesture().is_some());
        canvas.pointer_up(&PointerEvent::new(0, 0));
        assert!(canvas.active_gesture().is_none());
        assert_eq!(canvas.model().gesture(), None);
    }

    #[test]
    fn press_on_plain_component_falls_back_to_selection() {
        let (model, plate) = model();
        let mut canvas = LayoutCanvas::new(model);
        canvas.pointer_down(&PointerEvent::new(22, 22));
        assert_eq!(canvas.model().selection(), Some(plate));
        let running = canvas.active_gesture().map(|g| g.name());
        assert_eq!(running, Some("null"));
        assert_eq!(
            canvas.model().gesture(),
            canvas.active_gesture().map(|g| g.id())
        );
    }

    #[test]
    fn move_without_gesture_is_ignored() {
        let (model, _) = model();
        let mut canvas = LayoutCanvas::new(model);
        canvas.pointer_move(&PointerEvent::new(1, 1));
        canvas.pointer_up(&PointerEvent::new(1, 1));
        canvas.pointer_cancel(&PointerEvent::new(1, 1));
        assert!(canvas.active_gesture().is_none());
    }
}
