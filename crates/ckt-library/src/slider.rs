#![forbid(unsafe_code)]

//! Horizontal slider producing a word value.
//!
//! The track runs from local x = 0 to x = `length`. A press must land on the
//! track; once pressed, dragging anywhere keeps updating the value, clamped
//! to the track ends. The knob follows committed updates only.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use ckt_core::{Bounds, Color};
use ckt_model::{Component, ComponentPainter, PokeEvent, PokeEventType, Pokeable, Value};

use crate::OUTPUT_PORT;

const NO_KNOB: i32 = i32::MIN;

#[derive(Debug)]
pub struct Slider {
    length: i32,
    height: i32,
    max: u64,
    bit_width: u8,
    knob: Arc<AtomicI32>,
}

impl Slider {
    /// A slider `length` units long mapping onto `0..=max`.
    #[must_use]
    pub fn new(length: i32, max: u64) -> Self {
        Self {
            length: length.max(1),
            height: 8,
            max,
            bit_width: 8,
            knob: Arc::new(AtomicI32::new(NO_KNOB)),
        }
    }

    #[must_use]
    pub fn height(mut self, height: i32) -> Self {
        self.height = height.max(1);
        self
    }

    /// Width of the produced word (1..=64).
    #[must_use]
    pub fn bit_width(mut self, width: u8) -> Self {
        self.bit_width = width.clamp(1, 64);
        self
    }

    /// Value for a pointer at local `x`, clamped to the track.
    #[must_use]
    pub fn value_at(&self, x: i32) -> u64 {
        let x = x.clamp(0, self.length);
        let scaled = u128::from(self.max) * x as u128 / self.length as u128;
        scaled as u64
    }

    /// Knob position while dragging.
    #[must_use]
    pub fn knob(&self) -> Option<i32> {
        match self.knob.load(Ordering::Relaxed) {
            NO_KNOB => None,
            x => Some(x),
        }
    }

    fn track(&self) -> Bounds {
        Bounds::from_size(self.length + 1, self.height)
    }
}

impl Component for Slider {
    fn name(&self) -> &str {
        "Slider"
    }

    fn bounds(&self) -> Bounds {
        self.track()
    }

    fn pokeable(&self) -> Option<&dyn Pokeable> {
        Some(self)
    }
}

impl Pokeable for Slider {
    fn process_poke_event(&self, event: &mut PokeEvent) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "component_poke",
            component = "Slider",
            kind = event.kind().as_str(),
            x = event.x()
        )
        .entered();

        match event.kind() {
            PokeEventType::Start if !self.track().contains_location(event.position()) => {
                event.reject_poke();
            }
            PokeEventType::Start | PokeEventType::Move => {
                let x = event.x().clamp(0, self.length);
                let knob = Arc::clone(&self.knob);
                let value = Value::word(self.bit_width, self.value_at(x));
                event.set_state_update(move |state| {
                    knob.store(x, Ordering::Relaxed);
                    state.set_state(value);
                    state.set_port(OUTPUT_PORT, value);
                });
                event.repropagate();
                event.repaint();
            }
            PokeEventType::End | PokeEventType::Cancel => {
                self.knob.store(NO_KNOB, Ordering::Relaxed);
                event.repaint();
            }
        }
    }

    fn paint_poke_progress(&self, painter: &mut ComponentPainter<'_>) {
        let Some(x) = self.knob() else {
            return;
        };
        let mid = self.height / 2;
        let brush = painter.brush();
        brush.set_color(Color::BLACK);
        brush.draw_line(0, mid, self.length, mid);
        brush.set_color(Color::POKE);
        brush.draw_line(x, 0, x, self.height - 1);
    }
}
