#![forbid(unsafe_code)]

//! Subcircuit block: clicking it opens the module it instantiates.

use std::sync::atomic::{AtomicBool, Ordering};

use ckt_core::{Bounds, Color};
use ckt_model::{
    Component, ComponentPainter, ModuleId, PokeEvent, PokeEventType, Pokeable, SimulationId,
};

/// A placed instance of another module.
///
/// Press arms the block; releasing inside it asks the canvas to switch to
/// the module's view under the block's simulation. Dragging out disarms.
#[derive(Debug)]
pub struct SubcircuitBlock {
    label: String,
    module: ModuleId,
    simulation: SimulationId,
    width: i32,
    height: i32,
    armed: AtomicBool,
}

impl SubcircuitBlock {
    #[must_use]
    pub fn new(label: impl Into<String>, module: ModuleId, simulation: SimulationId) -> Self {
        Self {
            label: label.into(),
            module,
            simulation,
            width: 40,
            height: 30,
            armed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }
}

impl Component for SubcircuitBlock {
    fn name(&self) -> &str {
        "Subcircuit"
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_size(self.width, self.height)
    }

    fn pokeable(&self) -> Option<&dyn Pokeable> {
        Some(self)
    }
}

impl Pokeable for SubcircuitBlock {
    fn process_poke_event(&self, event: &mut PokeEvent) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "component_poke",
            component = "Subcircuit",
            kind = event.kind().as_str()
        )
        .entered();

        let inside = self.bounds().contains_location(event.position());
        match event.kind() {
            PokeEventType::Start => {
                self.armed.store(true, Ordering::Relaxed);
                event.repaint();
            }
            PokeEventType::Move => {
                if self.armed.swap(inside, Ordering::Relaxed) != inside {
                    event.repaint();
                }
            }
            PokeEventType::End => {
                if self.armed.swap(false, Ordering::Relaxed) && inside {
                    event.request_view(self.module, self.simulation);
                }
                event.repaint();
            }
            PokeEventType::Cancel => {
                self.armed.store(false, Ordering::Relaxed);
                event.repaint();
            }
        }
    }

    fn paint_poke_progress(&self, painter: &mut ComponentPainter<'_>) {
        if !self.is_armed() {
            return;
        }
        let brush = painter.brush();
        brush.set_color(Color::POKE);
        brush.draw_rect(Bounds::from_size(self.width, self.height));
        brush.draw_text(2, 2, &self.label);
    }
}
