#![forbid(unsafe_code)]

//! Scoped transactions over copy-on-write models.
//!
//! A [`Model<S>`] publishes its committed state through [`ArcSwap`], so
//! readers always load a complete snapshot and never observe a half-applied
//! write. Mutation happens on a private working copy inside a
//! [`TransactionScope`]; the copy is published when the scope is dropped.
//!
//! # Usage
//!
//! ```
//! use ckt_model::{Model, Transaction};
//!
//! let counter = Model::new(0u32);
//!
//! let mut xn = Transaction::new();
//! let key = xn.request_write_access(&counter);
//! {
//!     let mut scope = xn.start()?;
//!     *scope.write(key)? += 1;
//! } // commits here
//!
//! assert_eq!(*counter.snapshot(), 1);
//! assert_eq!(counter.commit_count(), 1);
//! # Ok::<(), ckt_model::TransactionError>(())
//! ```
//!
//! # Invariants
//!
//! 1. Accesses are declared before [`Transaction::start`]; keys are only
//!    valid against the scope produced by the same transaction.
//! 2. At most one scope holds write access to a given model at a time.
//!    Write locks are taken in model-id order and released on drop.
//! 3. Every written model is published exactly once per scope, when the
//!    scope is dropped, including on early return through `?`.
//! 4. Read snapshots are pinned at start; writes committed by other scopes
//!    afterwards are not visible through a read key.
//!
//! # Failure Modes
//!
//! - **Nested write**: starting a second write scope on a model whose writer
//!   is still live returns [`TransactionError::WriteConflict`] instead of
//!   blocking. The UI thread is single-threaded, so waiting could never
//!   succeed.
//! - **Panic inside a scope**: staged writes are discarded rather than
//!   published, leaving the committed state untouched.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwap;

use crate::error::{Result, TransactionError};
use crate::ids::{ModelId, TransactionId};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TRANSACTION_ID: AtomicU64 = AtomicU64::new(1);

/// State types that can live in a [`Model`].
pub trait ModelState: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> ModelState for T {}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

struct ModelCell<S> {
    id: ModelId,
    committed: ArcSwap<S>,
    writer: AtomicBool,
    commits: AtomicU64,
}

/// Shared handle to a transactionally edited state value.
///
/// Cloning the handle is cheap and yields another handle to the same model.
pub struct Model<S> {
    cell: Arc<ModelCell<S>>,
}

impl<S> Clone for Model<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<S> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.cell.id)
            .field("commits", &self.cell.commits.load(Ordering::Relaxed))
            .field("write_locked", &self.cell.writer.load(Ordering::Relaxed))
            .finish()
    }
}

impl<S: ModelState> Model<S> {
    /// Create a model holding `state` as its first committed value.
    pub fn new(state: S) -> Self {
        Self {
            cell: Arc::new(ModelCell {
                id: ModelId::new(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed)),
                committed: ArcSwap::from_pointee(state),
                writer: AtomicBool::new(false),
                commits: AtomicU64::new(0),
            }),
        }
    }

    /// Process-unique identity of this model.
    #[must_use]
    pub fn id(&self) -> ModelId {
        self.cell.id
    }

    /// Latest committed state. Never blocks and never sees staged writes.
    #[must_use]
    pub fn snapshot(&self) -> Arc<S> {
        self.cell.committed.load_full()
    }

    /// Number of write scopes that have published to this model.
    #[must_use]
    pub fn commit_count(&self) -> u64 {
        self.cell.commits.load(Ordering::Acquire)
    }

    /// Whether a write scope is currently live on this model.
    #[must_use]
    pub fn is_write_locked(&self) -> bool {
        self.cell.writer.load(Ordering::Acquire)
    }
}

/// Type-erased operations the transaction needs from a model.
trait ErasedCell: Send + Sync {
    fn model_id(&self) -> ModelId;
    fn load(&self) -> Arc<dyn Any + Send + Sync>;
    fn working_copy(&self) -> Box<dyn Any + Send>;
    fn try_lock_writer(&self) -> bool;
    fn unlock_writer(&self);
    fn publish(&self, working: Box<dyn Any + Send>);
}

impl<S: ModelState> ErasedCell for ModelCell<S> {
    fn model_id(&self) -> ModelId {
        self.id
    }

    fn load(&self) -> Arc<dyn Any + Send + Sync> {
        self.committed.load_full()
    }

    fn working_copy(&self) -> Box<dyn Any + Send> {
        let current = self.committed.load();
        Box::new(S::clone(&current))
    }

    fn try_lock_writer(&self) -> bool {
        self.writer
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn unlock_writer(&self) {
        self.writer.store(false, Ordering::Release);
    }

    fn publish(&self, working: Box<dyn Any + Send>) {
        if let Ok(state) = working.downcast::<S>() {
            self.committed.store(Arc::from(state));
            self.commits.fetch_add(1, Ordering::AcqRel);
        }
    }
}

// ---------------------------------------------------------------------------
// Access keys
// ---------------------------------------------------------------------------

/// Kind of access declared for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    Read,
    Write,
}

/// Declared read access to a `Model<S>`, resolved through a started scope.
pub struct ReadKey<S> {
    txn: TransactionId,
    slot: usize,
    _state: PhantomData<fn() -> S>,
}

/// Declared write access to a `Model<S>`, resolved through a started scope.
pub struct WriteKey<S> {
    txn: TransactionId,
    slot: usize,
    _state: PhantomData<fn() -> S>,
}

macro_rules! key_impls {
    ($key:ident) => {
        impl<S> Clone for $key<S> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<S> Copy for $key<S> {}

        impl<S> fmt::Debug for $key<S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($key))
                    .field("txn", &self.txn)
                    .field("slot", &self.slot)
                    .finish()
            }
        }

        impl<S> $key<S> {
            fn new(txn: TransactionId, slot: usize) -> Self {
                Self {
                    txn,
                    slot,
                    _state: PhantomData,
                }
            }
        }
    };
}

key_impls!(ReadKey);
key_impls!(WriteKey);

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

struct Request {
    cell: Arc<dyn ErasedCell>,
    mode: AccessMode,
}

/// A set of declared model accesses, not yet started.
pub struct Transaction {
    id: TransactionId,
    requests: Vec<Request>,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("requests", &self.requests.len())
            .finish()
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    /// Create an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TransactionId::new(NEXT_TRANSACTION_ID.fetch_add(1, Ordering::Relaxed)),
            requests: Vec::with_capacity(2),
        }
    }

    /// Identity of this transaction (and of the scope it starts).
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Declare read access to `model`.
    pub fn request_read_access<S: ModelState>(&mut self, model: &Model<S>) -> ReadKey<S> {
        let slot = self.push(model, AccessMode::Read);
        ReadKey::new(self.id, slot)
    }

    /// Declare write access to `model`.
    ///
    /// Declaring write access to the same model twice yields keys for the same
    /// working copy.
    pub fn request_write_access<S: ModelState>(&mut self, model: &Model<S>) -> WriteKey<S> {
        let existing = self.requests.iter().position(|r| {
            r.mode == AccessMode::Write && r.cell.model_id() == model.id()
        });
        let slot = match existing {
            Some(slot) => slot,
            None => self.push(model, AccessMode::Write),
        };
        WriteKey::new(self.id, slot)
    }

    fn push<S: ModelState>(&mut self, model: &Model<S>, mode: AccessMode) -> usize {
        let cell: Arc<dyn ErasedCell> = model.cell.clone();
        self.requests.push(Request { cell, mode });
        self.requests.len() - 1
    }

    /// Begin the transaction: take write locks and pin read snapshots.
    ///
    /// The returned scope commits every written model when dropped.
    pub fn start(self) -> Result<TransactionScope> {
        let mut write_order: Vec<usize> = self
            .requests
            .iter()
            .enumerate()
            .filter(|(_, r)| r.mode == AccessMode::Write)
            .map(|(i, _)| i)
            .collect();
        write_order.sort_by_key(|&i| self.requests[i].cell.model_id());

        for (n, &i) in write_order.iter().enumerate() {
            let cell = &self.requests[i].cell;
            if !cell.try_lock_writer() {
                for &held in &write_order[..n] {
                    self.requests[held].cell.unlock_writer();
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "ckt.txn",
                    txn = %self.id,
                    model = %cell.model_id(),
                    "write conflict on start"
                );
                return Err(TransactionError::WriteConflict {
                    model: cell.model_id(),
                });
            }
        }

        let slots = self
            .requests
            .into_iter()
            .map(|r| match r.mode {
                AccessMode::Read => Slot::Read {
                    snapshot: r.cell.load(),
                },
                AccessMode::Write => Slot::Write {
                    working: Some(r.cell.working_copy()),
                    cell: r.cell,
                },
            })
            .collect::<Vec<_>>();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "ckt.txn",
            txn = %self.id,
            slots = slots.len(),
            "transaction started"
        );

        Ok(TransactionScope {
            id: self.id,
            slots,
            aborted: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

enum Slot {
    Read {
        snapshot: Arc<dyn Any + Send + Sync>,
    },
    Write {
        cell: Arc<dyn ErasedCell>,
        working: Option<Box<dyn Any + Send>>,
    },
}

/// A started transaction. Declared accesses are valid only while it lives.
///
/// Dropping the scope commits every written model.
#[must_use = "dropping a scope commits it immediately"]
pub struct TransactionScope {
    id: TransactionId,
    slots: Vec<Slot>,
    aborted: bool,
}

impl fmt::Debug for TransactionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionScope")
            .field("id", &self.id)
            .field("slots", &self.slots.len())
            .field("aborted", &self.aborted)
            .finish()
    }
}

impl TransactionScope {
    /// Identity of the transaction that started this scope.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    fn check(&self, txn: TransactionId) -> Result<()> {
        if txn == self.id {
            Ok(())
        } else {
            Err(TransactionError::ForeignKey {
                expected: self.id,
                found: txn,
            })
        }
    }

    /// Resolve a read key to the snapshot pinned at start.
    pub fn read<S: ModelState>(&self, key: ReadKey<S>) -> Result<&S> {
        self.check(key.txn)?;
        match self.slots.get(key.slot) {
            Some(Slot::Read { snapshot }) => (**snapshot)
                .downcast_ref::<S>()
                .ok_or(TransactionError::SlotKind { slot: key.slot }),
            _ => Err(TransactionError::SlotKind { slot: key.slot }),
        }
    }

    /// Resolve a write key to the scope's working copy.
    pub fn write<S: ModelState>(&mut self, key: WriteKey<S>) -> Result<&mut S> {
        self.check(key.txn)?;
        match self.slots.get_mut(key.slot) {
            Some(Slot::Write {
                working: Some(working),
                ..
            }) => working
                .downcast_mut::<S>()
                .ok_or(TransactionError::SlotKind { slot: key.slot }),
            _ => Err(TransactionError::SlotKind { slot: key.slot }),
        }
    }

    /// Discard every staged write and release locks without publishing.
    pub fn abort(mut self) {
        self.aborted = true;
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        let discard = self.aborted || std::thread::panicking();
        let mut published = 0usize;
        for slot in self.slots.drain(..) {
            if let Slot::Write { cell, working } = slot {
                if !discard && let Some(working) = working {
                    cell.publish(working);
                    published += 1;
                }
                cell.unlock_writer();
            }
        }

        #[cfg(feature = "tracing")]
        if discard {
            tracing::debug!(target: "ckt.txn", txn = %self.id, "transaction aborted");
        } else {
            tracing::debug!(
                target: "ckt.txn",
                txn = %self.id,
                published = published,
                "transaction committed"
            );
        }
        #[cfg(not(feature = "tracing"))]
        let _ = published;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
