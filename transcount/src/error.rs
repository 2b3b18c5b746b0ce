//! Errors of the costing pipeline.

use compact_str::CompactString;
use itertools::Itertools;
use svmodparse::ParseError;

/// Everything that can stop a transistor count.
///
/// Parse errors abort the module they occur in; every other variant
/// aborts the whole run, as a top-level count is meaningless with
/// any dependency missing.
#[derive(Debug, thiserror::Error)]
pub enum TransCountError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An instance names something that is neither a primitive nor a
    /// module of the design.
    #[error("module `{module}` instantiates unknown component `{component}`")]
    UnknownComponent {
        module: CompactString,
        component: CompactString,
    },

    /// Modules instantiate each other in a loop.
    #[error("circular instantiation through module `{module}` (cycle members: {})",
            .cycle.iter().join(", "))]
    DependencyCycle {
        module: CompactString,
        cycle: Vec<CompactString>,
    },

    /// A module's transistor count does not fit in a `u64`.
    #[error("transistor count of module `{module}` overflows u64")]
    CountOverflow {
        module: CompactString,
    },

    /// A primitive the assign estimator relies on was removed or
    /// registered with the wrong cost kind.
    #[error("primitive `{name}` is missing or not {kind}")]
    MissingPrimitive {
        name: &'static str,
        kind: &'static str,
    },

    #[error("invalid primitive cost `{spec}`: {reason}")]
    InvalidPrimitiveSpec {
        spec: String,
        reason: &'static str,
    },

    #[error("top module `{name}` not found in the design")]
    TopModuleNotFound {
        name: String,
    },

    #[error("the design contains no module")]
    EmptyDesign,
}
