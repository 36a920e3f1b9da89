#![forbid(unsafe_code)]

//! Interactive circuit components.
//!
//! Each component implements [`ckt_model::Component`]; the interactive ones
//! also implement [`ckt_model::Pokeable`] and answer poke events by
//! scheduling state updates, never by writing state directly.
//!
//! | Component | Poke behavior |
//! |---|---|
//! | [`ToggleSwitch`] | Flips its output on press; a high lock port rejects the press. |
//! | [`PushButton`] | Drives its output high while held. |
//! | [`Slider`] | Maps the pointer's x position onto a word value. |
//! | [`SubcircuitBlock`] | Opens its module's view on release. |
//! | [`Label`] | Not pokeable. |

pub mod button;
pub mod label;
pub mod slider;
pub mod subcircuit;
pub mod toggle;

pub use button::PushButton;
pub use label::Label;
pub use slider::Slider;
pub use subcircuit::SubcircuitBlock;
pub use toggle::{LOCK_PORT, ToggleSwitch};

/// Port every library component drives with its value.
pub const OUTPUT_PORT: usize = 0;

#[cfg(test)]
pub(crate) mod test_support {
    use ckt_core::Location;
    use ckt_model::{
        ComponentId, InstanceState, PokeEvent, PokeEventType, PokeResponse, Pokeable,
        SimulationState, ViewRequest,
    };

    /// What one dispatch did, as seen by the canvas.
    #[derive(Debug, Default)]
    pub(crate) struct Dispatched {
        pub rejected: bool,
        pub repaint: bool,
        pub ran_update: bool,
        pub repropagated: bool,
        pub view: Option<ViewRequest>,
    }

    /// Deliver one event and apply the response to `sim` the way the canvas
    /// bridge does.
    pub(crate) fn poke(
        target: &dyn Pokeable,
        kind: PokeEventType,
        at: Location,
        sim: &mut SimulationState,
        id: ComponentId,
    ) -> Dispatched {
        let mut event = PokeEvent::new(kind, at);
        target.process_poke_event(&mut event);
        let mut out = Dispatched {
            repaint: event.repaint_requested(),
            ..Dispatched::default()
        };
        let (effect, view) = match event.into_response() {
            PokeResponse::Rejected => {
                out.rejected = true;
                return out;
            }
            PokeResponse::Accepted { effect, view } => (effect, view),
        };
        if let Some(effect) = effect {
            let (update, repropagate) = effect.into_parts();
            if let Some(update) = update {
                let mut state = InstanceState::new(sim, id);
                update(&mut state);
                out.ran_update = true;
                out.rejected = state.is_poke_rejected();
            }
            if repropagate {
                sim.mark_instance_dirty(id);
                out.repropagated = true;
            }
        }
        if !out.rejected {
            out.view = view;
        }
        out
    }
}
