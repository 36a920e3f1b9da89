#![forbid(unsafe_code)]

//! The poke gesture: delivers one pointer interaction to one pokeable
//! component.
//!
//! # State Machine
//!
//! ```text
//! Idle --start accepted--> Active --end / cancel--> Terminated
//!   |
//!   +--start rejected--> Terminated (press handed to the selection gesture)
//! ```
//!
//! # Invariants
//!
//! 1. The target's layout location is read once, in [`GesturePoke::new`],
//!    and every later event is translated by that same value.
//! 2. A dispatch that produces no state update and no repropagation opens no
//!    transaction.
//! 3. Once the target is cleared, every dispatch is a no-op that reports
//!    [`PokeOutcome::NoTarget`].
//! 4. `gesture_complete` always clears the host slot; `gesture_cancel` clears
//!    it only while this gesture is still the registered one.
//! 5. A move before the start has been dispatched is dropped; only `Active`
//!    and `Terminated` gestures dispatch moves (the latter as `NoTarget`).
//! 6. A rejected move or end suppresses that event's effect only. A move
//!    rejection leaves the gesture `Active`; an end always clears the slot.
//!
//! # Failure Modes
//!
//! - Target without the poke capability: dispatch reports `NoTarget`, and a
//!   start falls back to selection.
//! - Simulation write conflict: logged at error level, reported as
//!   [`PokeOutcome::Failed`], nothing applied.
//! - Rejection raised by the update itself: the update stays committed, the
//!   dispatch reports `Rejected`.

use ckt_core::{Location, Paintbrush, PointerEvent};
use ckt_model::{
    ComponentInstance, ComponentPainter, InstanceView, PokeEvent, PokeEventType, PokeResponse,
    TransactionError,
};
use tracing::field::{self, Empty};

use crate::bridge::{self, EffectOutcome};
use crate::canvas::LayoutCanvasModel;
use crate::gesture::{Gesture, GestureId};
use crate::null_gesture::NullGesture;

/// Lifecycle state of a [`GesturePoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokeState {
    Idle,
    Active,
    Terminated,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokeOutcome {
    Accepted,
    /// The handler, or its state update, declined the poke.
    Rejected,
    /// No target, or a target without the poke capability.
    NoTarget,
    /// The simulation transaction could not be started.
    Failed,
}

impl PokeOutcome {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::NoTarget => "no_target",
            Self::Failed => "failed",
        }
    }
}

/// Gesture that pokes a single component.
#[derive(Debug)]
pub struct GesturePoke {
    id: GestureId,
    target: Option<ComponentInstance>,
    location: Location,
    state: PokeState,
    last: Option<PokeOutcome>,
}

impl GesturePoke {
    /// Build a gesture for `target`, snapshotting its layout location.
    pub fn new(
        canvas: &LayoutCanvasModel,
        target: ComponentInstance,
    ) -> Result<Self, TransactionError> {
        let location = bridge::read_location(canvas.layout(), target.id())?;
        Ok(Self {
            id: GestureId::next(),
            target: Some(target),
            location,
            state: PokeState::Idle,
            last: None,
        })
    }

    /// The component being poked, until the gesture ends.
    #[must_use]
    pub fn target(&self) -> Option<&ComponentInstance> {
        self.target.as_ref()
    }

    /// Target location captured at construction.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn state(&self) -> PokeState {
        self.state
    }

    /// Outcome of the most recent dispatch.
    #[must_use]
    pub fn last_outcome(&self) -> Option<PokeOutcome> {
        self.last
    }

    /// Dispatch one `kind` event at the raw canvas position of `event`.
    pub fn send(
        &mut self,
        kind: PokeEventType,
        canvas: &mut LayoutCanvasModel,
        event: &PointerEvent,
    ) -> PokeOutcome {
        let span = tracing::debug_span!(
            "poke.dispatch",
            kind = kind.as_str(),
            component = Empty,
            local_x = Empty,
            local_y = Empty,
            outcome = Empty,
        );
        let _guard = span.enter();
        let outcome = self.dispatch(kind, canvas, event, &span);
        span.record("outcome", outcome.as_str());
        self.last = Some(outcome);
        outcome
    }

    fn dispatch(
        &self,
        kind: PokeEventType,
        canvas: &mut LayoutCanvasModel,
        event: &PointerEvent,
        span: &tracing::Span,
    ) -> PokeOutcome {
        let Some(target) = &self.target else {
            return PokeOutcome::NoTarget;
        };
        span.record("component", field::display(target.id()));
        let Some(pokeable) = target.pokeable() else {
            tracing::debug!(
                target: "ckt.poke",
                component = %target.id(),
                name = target.component().name(),
                "target has no poke capability"
            );
            return PokeOutcome::NoTarget;
        };

        let local = event.location() - self.location;
        span.record("local_x", local.x);
        span.record("local_y", local.y);

        let mut envelope = PokeEvent::new(kind, local);
        pokeable.process_poke_event(&mut envelope);
        if envelope.repaint_requested() {
            canvas.request_repaint();
        }

        let (effect, view) = match envelope.into_response() {
            PokeResponse::Rejected => {
                tracing::debug!(target: "ckt.poke", %kind, "poke rejected by target");
                return PokeOutcome::Rejected;
            }
            PokeResponse::Accepted { effect, view } => (effect, view),
        };

        if let Some(effect) = effect {
            match bridge::apply_effect(canvas.simulation(), target.id(), effect) {
                Ok(EffectOutcome::Committed) => {}
                Ok(EffectOutcome::CommittedThenRejected) => {
                    tracing::warn!(
                        target: "ckt.poke",
                        %kind,
                        component = %target.id(),
                        "poke rejected after its state update committed"
                    );
                    return PokeOutcome::Rejected;
                }
                Err(err) => {
                    tracing::error!(
                        target: "ckt.poke",
                        %kind,
                        component = %target.id(),
                        error = %err,
                        "poke effect was not applied"
                    );
                    return PokeOutcome::Failed;
                }
            }
        }

        if let Some(view) = view {
            canvas.request_view(view);
        }
        tracing::debug!(target: "ckt.poke", %kind, "poke accepted");
        PokeOutcome::Accepted
    }

    fn terminate(&mut self) {
        self.target = None;
        self.state = PokeState::Terminated;
    }
}

impl Gesture for GesturePoke {
    fn name(&self) -> &'static str {
        "poke"
    }

    fn id(&self) -> GestureId {
        self.id
    }

    fn gesture_start(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        let outcome = self.send(PokeEventType::Start, canvas, event);
        if outcome.is_accepted() {
            self.state = PokeState::Active;
            return;
        }
        self.terminate();
        if canvas.config().fallback_on_rejected_start {
            tracing::debug!(
                target: "ckt.poke",
                gesture = %self.id,
                outcome = outcome.as_str(),
                "start not accepted; press handed to selection"
            );
            NullGesture::new().start_without_poke(canvas, event);
        } else {
            canvas.clear_gesture_if(self.id);
        }
    }

    fn gesture_move(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        if self.state == PokeState::Idle {
            tracing::debug!(target: "ckt.poke", gesture = %self.id, "move before start dropped");
            return;
        }
        self.send(PokeEventType::Move, canvas, event);
    }

    fn gesture_complete(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        self.send(PokeEventType::End, canvas, event);
        canvas.clear_gesture();
        self.terminate();
    }

    fn gesture_cancel(&mut self, canvas: &mut LayoutCanvasModel, event: &PointerEvent) {
        self.send(PokeEventType::Cancel, canvas, event);
        canvas.clear_gesture_if(self.id);
        self.terminate();
    }

    fn paint(&self, brush: &mut dyn Paintbrush) {
        let Some(target) = &self.target else {
            return;
        };
        let Some(pokeable) = target.pokeable() else {
            return;
        };
        let Location { x, y } = self.location;
        brush.translate_coordinates(x, y);
        {
            let mut painter = ComponentPainter::new(&mut *brush, InstanceView::detached(target.id()));
            pokeable.paint_poke_progress(&mut painter);
        }
        brush.translate_coordinates(-x, -y);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
