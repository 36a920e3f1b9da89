#![forbid(unsafe_code)]

//! Identifier newtypes.

use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub u64);

        impl $name {
            /// Create an ID from a raw value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw ID value.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// A placed component instance in a layout.
    ComponentId,
    "component"
);

id_type!(
    /// A design module (top-level circuit or subcircuit definition).
    ModuleId,
    "module"
);

id_type!(
    /// A running simulation of some module.
    SimulationId,
    "simulation"
);

id_type!(
    /// A [`Model`](crate::Model) handle, unique per process.
    ModelId,
    "model"
);

id_type!(
    /// A [`Transaction`](crate::Transaction), unique per process.
    TransactionId,
    "txn"
);
