#![forbid(unsafe_code)]

//! Transactional bridge between the gesture core and the two models.
//!
//! The layout model is only ever read, once per gesture, through
//! [`read_location`]. The simulation model is written only through
//! [`apply_effect`], which opens exactly one write-scoped transaction per
//! effect and lets the scope commit on exit.
//!
//! # Invariants
//!
//! 1. A state update and a dirty mark from the same effect land in the same
//!    commit; an observer never sees one without the other.
//! 2. A retroactive rejection raised inside the update does not roll the
//!    commit back. It is reported through [`EffectOutcome`].
//!
//! # Failure Modes
//!
//! - Another writer holds the simulation model: `start()` fails with
//!   [`TransactionError::WriteConflict`] and nothing is applied.
//! - The target was removed from the layout before the gesture was built:
//!   [`read_location`] fails with [`TransactionError::UnknownComponent`].

use ckt_core::Location;
use ckt_model::{
    ComponentId, InstanceState, LayoutModel, SimEffect, SimulationModel, Transaction,
    TransactionError,
};

/// Result of committing a [`SimEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect committed and the poke stands.
    Committed,
    /// The effect committed, but the update rejected the poke while it ran.
    CommittedThenRejected,
}

impl EffectOutcome {
    #[must_use]
    pub fn is_rejected(self) -> bool {
        matches!(self, Self::CommittedThenRejected)
    }
}

/// Read the layout location of `instance` under a read-scoped transaction.
pub fn read_location(
    layout: &LayoutModel,
    instance: ComponentId,
) -> Result<Location, TransactionError> {
    let mut xn = Transaction::new();
    let key = xn.request_read_access(layout);
    let scope = xn.start()?;
    scope
        .read(key)?
        .location_of(instance)
        .ok_or(TransactionError::UnknownComponent(instance))
}

/// Apply `effect` to `instance` in one write-scoped simulation transaction.
pub fn apply_effect(
    simulation: &SimulationModel,
    instance: ComponentId,
    effect: SimEffect,
) -> Result<EffectOutcome, TransactionError> {
    let label = effect.as_str();
    let (update, repropagate) = effect.into_parts();

    let mut xn = Transaction::new();
    let key = xn.request_write_access(simulation);
    let mut scope = xn.start().inspect_err(|err| {
        tracing::error!(
            target: "ckt.txn",
            component = %instance,
            effect = label,
            error = %err,
            "simulation transaction failed to start"
        );
    })?;
    let txn = scope.id();

    let sim = scope.write(key)?;
    let mut rejected = false;
    if let Some(update) = update {
        let mut state = InstanceState::new(sim, instance);
        update(&mut state);
        rejected = state.is_poke_rejected();
    }
    if repropagate {
        sim.mark_instance_dirty(instance);
    }
    drop(scope);

    tracing::debug!(
        target: "ckt.txn",
        %txn,
        component = %instance,
        effect = label,
        rejected,
        "simulation effect committed"
    );

    Ok(if rejected {
        EffectOutcome::CommittedThenRejected
    } else {
        EffectOutcome::Committed
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ckt_core::Bounds;
    use ckt_model::{Component, LayoutState, SimulationId, SimulationState, Value};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Pad;

    impl Component for Pad {
        fn name(&self) -> &str {
            "Pad"
        }

        fn bounds(&self) -> Bounds {
            Bounds::from_size(4, 4)
        }
    }

    fn sim() -> SimulationModel {
        SimulationState::new(SimulationId::new(1)).into_model()
    }

    #[test]
    fn read_location_returns_placement() {
        let mut layout = LayoutState::new();
        let placed = layout.add(Arc::new(Pad), Location::new(10, 20));
        let layout = layout.into_model();
        assert_eq!(
            read_location(&layout, placed.id()),
            Ok(Location::new(10, 20))
        );
        assert_eq!(layout.commit_count(), 0);
    }

    #[test]
    fn read_location_of_missing_component_fails() {
        let layout = LayoutState::new().into_model();
        let id = ComponentId::new(7);
        assert_eq!(
            read_location(&layout, id),
            Err(TransactionError::UnknownComponent(id))
        );
    }

    #[test]
    fn update_and_repropagate_share_one_commit() {
        let sim = sim();
        let id = ComponentId::new(3);
        let outcome = apply_effect(
            &sim,
            id,
            SimEffect::UpdateAndRepropagate(Box::new(|s| s.set_state(Value::HIGH))),
        );
        assert_eq!(outcome, Ok(EffectOutcome::Committed));
        assert_eq!(sim.commit_count(), 1);
        let snap = sim.snapshot();
        assert_eq!(snap.instance(id).map(|r| r.state), Some(Value::HIGH));
        assert!(snap.is_dirty(id));
    }

    #[test]
    fn repropagate_only_marks_dirty() {
        let sim = sim();
        let id = ComponentId::new(3);
        apply_effect(&sim, id, SimEffect::Repropagate).unwrap();
        let snap = sim.snapshot();
        assert!(snap.is_dirty(id));
        assert!(snap.instance(id).is_none());
    }

    #[test]
    fn retroactive_rejection_still_commits() {
        let sim = sim();
        let id = ComponentId::new(3);
        let outcome = apply_effect(
            &sim,
            id,
            SimEffect::Update(Box::new(|s| {
                s.set_state(Value::LOW);
                s.reject_poke();
            })),
        )
        .unwrap();
        assert!(outcome.is_rejected());
        assert_eq!(sim.commit_count(), 1);
        assert_eq!(
            sim.snapshot().instance(id).map(|r| r.state),
            Some(Value::LOW)
        );
    }

    #[test]
    fn held_writer_conflicts() {
        let sim = sim();
        let mut outer = Transaction::new();
        let _key = outer.request_write_access(&sim);
        let _scope = outer.start().unwrap();

        let err = apply_effect(&sim, ComponentId::new(1), SimEffect::Repropagate).unwrap_err();
        assert!(matches!(err, TransactionError::WriteConflict { .. }));
    }
}
