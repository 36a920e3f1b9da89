#![forbid(unsafe_code)]

//! The poke event envelope and its response.
//!
//! A [`PokeEvent`] is created fresh for every dispatch. The target's
//! [`Pokeable::process_poke_event`](crate::Pokeable::process_poke_event)
//! fills in response fields; the dispatcher then consumes the envelope with
//! [`PokeEvent::into_response`] and pattern-matches the resulting
//! [`PokeResponse`].
//!
//! # Invariants
//!
//! 1. A rejected envelope converts to [`PokeResponse::Rejected`] regardless of
//!    any other field that was set; rejection short-circuits every effect.
//! 2. [`SimEffect`] exists only when at least one simulation change was
//!    requested, so "open a transaction" and "there is an effect" coincide.
//! 3. Repaint requests are independent of acceptance and are read from the
//!    envelope before it is consumed.

use std::fmt;

use ckt_core::Location;

use crate::ids::{ModuleId, SimulationId};
use crate::instance::InstanceState;

/// Phase of the poke gesture an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokeEventType {
    Start,
    Move,
    End,
    Cancel,
}

impl PokeEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Move => "move",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for PokeEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to switch the canvas to another design view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewRequest {
    pub module: ModuleId,
    pub simulation: SimulationId,
}

/// Deferred mutation run against the target's state inside a transaction.
pub type StateUpdate = Box<dyn FnOnce(&mut InstanceState<'_>)>;

/// Simulation-side effect of an accepted poke.
pub enum SimEffect {
    /// Run a state update.
    Update(StateUpdate),
    /// Mark the target dirty for re-evaluation.
    Repropagate,
    /// Run a state update, then mark the target dirty, in one commit.
    UpdateAndRepropagate(StateUpdate),
}

impl SimEffect {
    /// Split into the optional update and the repropagation flag.
    #[must_use]
    pub fn into_parts(self) -> (Option<StateUpdate>, bool) {
        match self {
            Self::Update(update) => (Some(update), false),
            Self::Repropagate => (None, true),
            Self::UpdateAndRepropagate(update) => (Some(update), true),
        }
    }

    #[must_use]
    pub fn repropagates(&self) -> bool {
        matches!(self, Self::Repropagate | Self::UpdateAndRepropagate(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update(_) => "update",
            Self::Repropagate => "repropagate",
            Self::UpdateAndRepropagate(_) => "update+repropagate",
        }
    }
}

impl fmt::Debug for SimEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the target answered.
#[derive(Debug)]
pub enum PokeResponse {
    Rejected,
    Accepted {
        effect: Option<SimEffect>,
        view: Option<ViewRequest>,
    },
}

impl PokeResponse {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Request/response envelope for one poke dispatch.
pub struct PokeEvent {
    kind: PokeEventType,
    position: Location,
    state_update: Option<StateUpdate>,
    repropagate: bool,
    rejected: bool,
    view: Option<ViewRequest>,
    repaint: bool,
}

impl PokeEvent {
    /// Envelope for `kind` at `position` in the target's local frame.
    #[must_use]
    pub fn new(kind: PokeEventType, position: Location) -> Self {
        Self {
            kind,
            position,
            state_update: None,
            repropagate: false,
            rejected: false,
            view: None,
            repaint: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> PokeEventType {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> i32 {
        self.position.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Pointer position in the target's local frame.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Location {
        self.position
    }

    /// Schedule a state update. A later call replaces an earlier one.
    pub fn set_state_update<F>(&mut self, update: F)
    where
        F: FnOnce(&mut InstanceState<'_>) + 'static,
    {
        self.state_update = Some(Box::new(update));
    }

    #[must_use]
    pub fn has_state_update(&self) -> bool {
        self.state_update.is_some()
    }

    /// Ask for the target to be re-evaluated by the simulation engine.
    pub fn repropagate(&mut self) {
        self.repropagate = true;
    }

    #[must_use]
    pub fn repropagate_requested(&self) -> bool {
        self.repropagate
    }

    /// Decline the poke.
    pub fn reject_poke(&mut self) {
        self.rejected = true;
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Ask the canvas to switch to `module` running under `simulation`.
    pub fn request_view(&mut self, module: ModuleId, simulation: SimulationId) {
        self.view = Some(ViewRequest { module, simulation });
    }

    #[must_use]
    pub fn view_request(&self) -> Option<ViewRequest> {
        self.view
    }

    /// Ask the canvas to repaint.
    pub fn repaint(&mut self) {
        self.repaint = true;
    }

    #[must_use]
    pub fn repaint_requested(&self) -> bool {
        self.repaint
    }

    /// Consume the envelope into the handler's answer.
    #[must_use]
    pub fn into_response(self) -> PokeResponse {
        if self.rejected {
            return PokeResponse::Rejected;
        }
        let effect = match (self.state_update, self.repropagate) {
            (Some(update), true) => Some(SimEffect::UpdateAndRepropagate(update)),
            (Some(update), false) => Some(SimEffect::Update(update)),
            (None, true) => Some(SimEffect::Repropagate),
            (None, false) => None,
        };
        PokeResponse::Accepted {
            effect,
            view: self.view,
        }
    }
}

impl fmt::Debug for PokeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PokeEvent")
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("state_update", &self.state_update.is_some())
            .field("repropagate", &self.repropagate)
            .field("rejected", &self.rejected)
            .field("view", &self.view)
            .field("repaint", &self.repaint)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
