#![forbid(unsafe_code)]

//! Momentary push button.

use std::sync::atomic::{AtomicBool, Ordering};

use ckt_core::{Bounds, Color};
use ckt_model::{Component, ComponentPainter, PokeEvent, PokeEventType, Pokeable, Value};

use crate::OUTPUT_PORT;

/// Drives its output high from press to release.
#[derive(Debug)]
pub struct PushButton {
    size: i32,
    pressed: AtomicBool,
}

impl Default for PushButton {
    fn default() -> Self {
        Self::new()
    }
}

impl PushButton {
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: 16,
            pressed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn size(mut self, size: i32) -> Self {
        self.size = size.max(1);
        self
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }

    fn drive(&self, event: &mut PokeEvent, level: Value) {
        self.pressed.store(level == Value::HIGH, Ordering::Relaxed);
        event.set_state_update(move |state| {
            state.set_state(level);
            state.set_port(OUTPUT_PORT, level);
        });
        event.repropagate();
        event.repaint();
    }
}

impl Component for PushButton {
    fn name(&self) -> &str {
        "PushButton"
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_size(self.size, self.size)
    }

    fn pokeable(&self) -> Option<&dyn Pokeable> {
        Some(self)
    }
}

impl Pokeable for PushButton {
    fn process_poke_event(&self, event: &mut PokeEvent) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "component_poke",
            component = "PushButton",
            kind = event.kind().as_str()
        )
        .entered();

        match event.kind() {
            PokeEventType::Start => self.drive(event, Value::HIGH),
            PokeEventType::Move => {}
            PokeEventType::End | PokeEventType::Cancel => self.drive(event, Value::LOW),
        }
    }

    fn paint_poke_progress(&self, painter: &mut ComponentPainter<'_>) {
        if self.is_pressed() {
            let brush = painter.brush();
            brush.set_color(Color::POKE);
            brush.fill_rect(Bounds::from_size(self.size, self.size));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::poke;
    use ckt_core::Location;
    use ckt_model::{ComponentId, SimulationId, SimulationState};

    #[test]
    fn output_follows_press_and_release() {
        let button = PushButton::new();
        let mut sim = SimulationState::new(SimulationId::new(1));
        let id = ComponentId::new(9);

        poke(&button, PokeEventType::Start, Location::new(2, 2), &mut sim, id);
        assert!(button.is_pressed());
        assert_eq!(sim.instance(id).map(|r| r.port(OUTPUT_PORT)), Some(Value::HIGH));
        assert_eq!(sim.take_dirty(), vec![id]);

        let out = poke(&button, PokeEventType::Move, Location::new(40, 40), &mut sim, id);
        assert!(!out.ran_update);
        assert!(button.is_pressed());

        poke(&button, PokeEventType::End, Location::new(40, 40), &mut sim, id);
        assert!(!button.is_pressed());
        assert_eq!(sim.instance(id).map(|r| r.state), Some(Value::LOW));
        assert!(sim.is_dirty(id));
    }

    #[test]
    fn cancel_releases() {
        let button = PushButton::new();
        let mut sim = SimulationState::new(SimulationId::new(1));
        let id = ComponentId::new(9);
        poke(&button, PokeEventType::Start, Location::ORIGIN, &mut sim, id);
        poke(&button, PokeEventType::Cancel, Location::ORIGIN, &mut sim, id);
        assert_eq!(sim.instance(id).map(|r| r.state), Some(Value::LOW));
    }
}
