#![forbid(unsafe_code)]

//! Neutral gesture: a press that does not poke anything selects instead.

use ckt_core::{Location, PointerEvent};

use crate::canvas::LayoutCanvasModel;
use crate::gesture::{Gesture, GestureId};

/// Selection gesture used when no poke takes place.
#[derive(Debug)]
pub struct NullGesture {
    id: GestureId,
    press: Option<Location>,
}

impl Default for NullGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl NullGesture {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: GestureId::next(),
            press: None,
        }
    }

    /// Where the press landed, once started.
    #[must_use]
    pub fn press_location(&self) -> Option<Location> {
        self.press
    }

    /// Take over a press that another gesture declined, and install `self`
    /// as the canvas's gesture for the rest of the interaction.
    pub fn start_without_poke(mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        self.select_under(canvas, event);
        canvas.set_gesture(Box::new(self));
    }

    fn select_under(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        let at = event.location();
        let hit = canvas.hit_test(at).map(|instance| instance.id());
        canvas.select(hit);
        self.press = Some(at);
    }
}

impl Gesture for NullGesture {
    fn name(&self) -> &'static str {
        "null"
    }

    fn id(&self) -> GestureId {
        self.id
    }

    fn gesture_start(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        self.select_under(canvas, event);
    }

    fn gesture_move(&mut self, _canvas: &mut LayoutCanvasModel, _event: &PointerEvent) {}

    fn gesture_complete(&mut self, canvas: &mut LayoutCanvasModel, _event: &PointerEvent) {
        canvas.clear_gesture();
    }

    fn gesture_cancel(&mut self, canvas: &mut LayoutCanvasModel, _event: &PointerEvent) {
        canvas.clear_gesture_if(self.id);
    }
}
