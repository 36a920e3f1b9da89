#![forbid(unsafe_code)]

//! Toggle switch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ckt_core::{Bounds, Color};
use ckt_model::{Component, ComponentPainter, PokeEvent, PokeEventType, Pokeable, Value};

use crate::OUTPUT_PORT;

/// While this port reads high the switch refuses to flip.
pub const LOCK_PORT: usize = 1;

/// A two-state switch that flips its output on every accepted press.
///
/// The lock is only visible inside the state update, so a locked press is
/// rejected after the fact: the transaction still commits (and marks the
/// switch dirty) but the dispatch reports a rejection. The press highlight
/// is armed from inside the update, so a locked or failed press never arms it.
#[derive(Debug)]
pub struct ToggleSwitch {
    size: i32,
    pressed: Arc<AtomicBool>,
}

impl Default for ToggleSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl ToggleSwitch {
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: 20,
            pressed: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn size(mut self, size: i32) -> Self {
        self.size = size.max(1);
        self
    }

    /// Whether an accepted press is currently held on the switch.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }
}

impl Component for ToggleSwitch {
    fn name(&self) -> &str {
        "ToggleSwitch"
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_size(self.size, self.size)
    }

    fn pokeable(&self) -> Option<&dyn Pokeable> {
        Some(self)
    }
}

impl Pokeable for ToggleSwitch {
    fn process_poke_event(&self, event: &mut PokeEvent) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "component_poke",
            component = "ToggleSwitch",
            kind = event.kind().as_str(),
            x = event.x(),
            y = event.y()
        )
        .entered();

        match event.kind() {
            PokeEventType::Start => {
                let pressed = Arc::clone(&self.pressed);
                event.set_state_update(move |state| {
                    if state.port(LOCK_PORT) == Value::HIGH {
                        state.reject_poke();
                        return;
                    }
                    pressed.store(true, Ordering::Relaxed);
                    let next = Value::from(!state.state().as_bit().unwrap_or(false));
                    state.set_state(next);
                    state.set_port(OUTPUT_PORT, next);
                });
                event.repropagate();
                event.repaint();
            }
            PokeEventType::Move => {}
            PokeEventType::End | PokeEventType::Cancel => {
                self.pressed.store(false, Ordering::Relaxed);
                event.repaint();
            }
        }
    }

    fn paint_poke_progress(&self, painter: &mut ComponentPainter<'_>) {
        if !self.is_pressed() {
            return;
        }
        let brush = painter.brush();
        brush.set_color(Color::POKE.with_alpha(96));
        brush.fill_rect(Bounds::new(2, 2, self.size - 4, self.size - 4));
        brush.set_color(Color::POKE);
        brush.draw_rect(Bounds::from_size(self.size, self.size));
    }
}
