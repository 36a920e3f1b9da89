#![forbid(unsafe_code)]

//! Errors raised by the transaction engine and model lookups.
//!
//! A rejected poke is *not* an error: it travels through the poke response.
//! Everything here is an infrastructure failure that the caller should log.

use thiserror::Error;

use crate::ids::{ComponentId, ModelId, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Another scope already holds write access to the model.
    #[error("{model} is already held for writing by another transaction")]
    WriteConflict { model: ModelId },
    /// An access key was presented to a scope it was not issued for.
    #[error("access key issued by {found} used in {expected}")]
    ForeignKey {
        expected: TransactionId,
        found: TransactionId,
    },
    /// The key's slot does not hold the requested access kind or state type.
    #[error("transaction slot {slot} does not hold the requested access")]
    SlotKind { slot: usize },
    /// The component is not placed in the layout being read.
    #[error("{0} is not placed in the layout")]
    UnknownComponent(ComponentId),
}

pub type Result<T> = std::result::Result<T, TransactionError>;
