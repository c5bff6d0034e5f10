//! Static schema descriptors.
//!
//! Types in `model` are emitted once per entity by `#[derive(Entity)]` (or
//! written by hand) and stand in for runtime reflection: they tell the field
//! map builder which fields exist, how they are annotated, and which of them
//! lead into nested entities.
//!
//! In general:
//! - `model` describes *what an entity declares*
//! - `map` describes *what a scan can address*

pub mod entity;
pub mod field;

pub use entity::{EntityModel, model_of, new_record};
pub use field::{Annotation, EntityFieldKind, EntityFieldModel};
