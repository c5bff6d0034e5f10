//! ## Crate layout
//! - `core`: runtime values, entity models, field maps, scan plans, the
//!   materializer and the tree merger.
//! - `derive`: `#[derive(Entity)]`, generating an entity's static model and
//!   its record accessors.
//!
//! Core modules are re-exported at the crate root so generated code can name
//! them as `::scansion::model`, `::scansion::traits`, and so on.

pub use scansion_core as core;
pub use scansion_derive as derive;

pub use scansion_core::{
    PATH_SEPARATOR, SENTINEL_PREFIX, config, error, map, materialize, merge, model, obs, plan,
    scan, source, traits, value,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Entrypoints
//

pub use scansion_core::{
    config::ScanConfig,
    error::{ScanError, ScanErrorKind},
    merge::{Merged, ScanMode, TreeMerger},
    scan::{Scanner, scan_many, scan_one},
    source::{MemoryRows, RowSource},
};
pub use scansion_derive::Entity;

///
/// Prelude
/// Entity vocabulary plus the derive; using _ brings traits into scope.
///

pub mod prelude {
    pub use crate::{
        config::ScanConfig,
        error::ScanError,
        merge::ScanMode,
        scan::{Scanner, scan_many, scan_one},
        source::{MemoryRows, RowSource as _},
        traits::{Entity, FieldValue, Record as _},
        value::Value,
    };
    pub use scansion_derive::Entity;
}
