//! Core runtime for scansion: values, entity models, the field map, scan
//! plans, row materialization and the tree merger that folds joined rows into
//! nested entities.
#![warn(unreachable_pub)]

extern crate self as scansion;

// public exports are one module level down
pub mod config;
pub mod error;
pub mod map;
pub mod materialize;
pub mod merge;
pub mod model;
pub mod obs;
pub mod plan;
pub mod scan;
pub mod source;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Column-name prefix that marks the start of a nested entity's columns.
pub const SENTINEL_PREFIX: &str = "scan:";

/// Path separator used when joining nested field names into a scoped path.
pub const PATH_SEPARATOR: char = '.';

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, plans, or mergers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{EntityFieldKind, EntityFieldModel, EntityModel},
        traits::{Entity, FieldValue, Record},
        value::Value,
    };
}
