#![forbid(unsafe_code)]

//! Property-based invariant tests for scoped transactions.
//!
//! 1. Committed state equals the replay of exactly the committed scopes.
//! 2. `commit_count` counts committed write scopes, never aborted ones.
//! 3. A read scope opened before a commit keeps seeing its pinned snapshot.
//! 4. The writer flag is always released when a scope ends.

use std::collections::BTreeMap;
use std::sync::Arc;

use ckt_model::{
    ComponentId, InstanceState, SimulationId, SimulationState, Transaction, TransactionError,
    Value,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Step {
    instance: u64,
    level: bool,
    mark_dirty: bool,
    abort: bool,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (1u64..6, any::<bool>(), any::<bool>(), prop::bool::weighted(0.25)).prop_map(
        |(instance, level, mark_dirty, abort)| Step {
            instance,
            level,
            mark_dirty,
            abort,
        },
    )
}

proptest! {
    #[test]
    fn committed_state_replays_committed_scopes(steps in prop::collection::vec(step_strategy(), 0..30)) {
        let sim = SimulationState::new(SimulationId::new(1)).into_model();
        let mut expected: BTreeMap<u64, Value> = BTreeMap::new();
        let mut dirty = std::collections::BTreeSet::new();
        let mut commits = 0u64;

        for step in &steps {
            let mut xn = Transaction::new();
            let key = xn.request_write_access(&sim);
            let mut scope = xn.start().unwrap();
            let id = ComponentId::new(step.instance);
            {
                let state = scope.write(key).unwrap();
                InstanceState::new(&mut *state, id).set_state(Value::from(step.level));
                if step.mark_dirty {
                    state.mark_instance_dirty(id);
                }
            }
            if step.abort {
                scope.abort();
            } else {
                drop(scope);
                expected.insert(step.instance, Value::from(step.level));
                if step.mark_dirty {
                    dirty.insert(id);
                }
                commits += 1;
            }
            prop_assert!(!sim.is_write_locked());
        }

        prop_assert_eq!(sim.commit_count(), commits);
        let snap = sim.snapshot();
        for (&raw, &value) in &expected {
            prop_assert_eq!(snap.instance(ComponentId::new(raw)).map(|r| r.state), Some(value));
        }
        let mut snap = (*snap).clone();
        prop_assert_eq!(snap.take_dirty(), dirty.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn pinned_reads_ignore_later_commits(first in any::<bool>(), second in any::<bool>()) {
        let sim = SimulationState::new(SimulationId::new(1)).into_model();
        let id = ComponentId::new(1);
        let write = |level: bool| {
            let mut xn = Transaction::new();
            let key = xn.request_write_access(&sim);
            let mut scope = xn.start().unwrap();
            scope.write(key).unwrap().instance_mut(id).state = Value::from(level);
        };

        write(first);
        let mut reader = Transaction::new();
        let key = reader.request_read_access(&sim);
        let scope = reader.start().unwrap();
        let pinned: Arc<SimulationState> = sim.snapshot();

        write(second);
        let seen = scope.read(key).unwrap().instance(id).map(|r| r.state);
        prop_assert_eq!(seen, Some(Value::from(first)));
        prop_assert_eq!(pinned.instance(id).map(|r| r.state), Some(Value::from(first)));
        prop_assert_eq!(
            sim.snapshot().instance(id).map(|r| r.state),
            Some(Value::from(second))
        );
    }

    #[test]
    fn overlapping_writers_conflict(held_first in any::<bool>()) {
        let a = SimulationState::new(SimulationId::new(1)).into_model();
        let b = SimulationState::new(SimulationId::new(2)).into_model();

        let mut outer = Transaction::new();
        let _k = if held_first {
            outer.request_write_access(&a)
        } else {
            outer.request_write_access(&b)
        };
        let outer_scope = outer.start().unwrap();

        let mut inner = Transaction::new();
        let _ka = inner.request_write_access(&a);
        let _kb = inner.request_write_access(&b);
        let err = inner.start().unwrap_err();
        let is_conflict = matches!(err, TransactionError::WriteConflict { .. });
        prop_assert!(is_conflict);

        // The failed start must not leave the free model locked.
        let free = if held_first { &b } else { &a };
        prop_assert!(!free.is_write_locked());
        drop(outer_scope);
        prop_assert!(!a.is_write_locked() && !b.is_write_locked());
    }
}
