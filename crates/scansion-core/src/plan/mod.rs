//! Scan plan: partitions a result's column list into per-path runs.
//!
//! Columns before the first sentinel belong to the root. Each sentinel
//! column `scan:<path>` starts a run for `<path>` and is itself part of no
//! run; its value is ignored by the materializer.


use crate::{
    config::ScanConfig,
    error::ScanError,
    map::{EntryKind, FieldMap, path_depth, split_path},
    model::EntityModel,
};
use std::{collections::BTreeSet, ops::Range};

///
/// RunRelation
/// How a run's entity attaches to its parent.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunRelation {
    Root,
    One,
    Many,
}

///
/// ScanRun
///
/// One contiguous block of columns filling the scalar fields of the entity
/// at `path`.
///

#[derive(Clone, Debug)]
pub struct ScanRun {
    pub path: String,
    /// Column positions within the row.
    pub columns: Range<usize>,
    pub entity: &'static EntityModel,
    /// Declare indices of the scalar fields, matched to `columns` in order.
    pub fields: Vec<usize>,
    /// An all-null run means "absent" rather than a row to decode.
    pub optional: bool,
    /// Declare index of the entity's `pk` field; `None` when it does not
    /// declare exactly one, which fails the first merge that needs a key.
    pub key: Option<usize>,
    pub relation: RunRelation,
    /// Position of the parent run in the plan (root: none).
    pub parent: Option<usize>,
    /// Declare index of the relation field in the parent entity (root: none).
    pub field: Option<usize>,
}

impl ScanRun {
    #[must_use]
    pub fn depth(&self) -> usize {
        path_depth(&self.path)
    }
}

///
/// ScanPlan
///
/// Immutable once parsed; reusable for every row of a result with the same
/// column list.
///

#[derive(Clone, Debug)]
pub struct ScanPlan {
    root: &'static EntityModel,
    runs: Vec<ScanRun>,
    column_count: usize,
    merge_order: Vec<usize>,
}

impl ScanPlan {
    pub fn parse<S: AsRef<str>>(
        columns: &[S],
        map: &FieldMap,
        config: &ScanConfig,
    ) -> Result<Self, ScanError> {
        config.validate()?;

        let mut bounds = vec![(String::new(), 0)];
        let mut seen = BTreeSet::new();

        for (position, column) in columns.iter().enumerate() {
            let Some(path) = config.sentinel_path(column.as_ref()) else {
                continue;
            };

            if path.is_empty() {
                return Err(ScanError::structural(format!(
                    "sentinel column '{}' names the root path",
                    column.as_ref()
                )));
            }
            if !seen.insert(path) {
                return Err(ScanError::structural(format!(
                    "scan path '{path}' appears more than once"
                )));
            }

            bounds.push((path.to_string(), position + 1));
        }

        let mut runs = Vec::with_capacity(bounds.len());
        for (i, (path, start)) in bounds.iter().enumerate() {
            let end = match bounds.get(i + 1) {
                // the next run starts just past its sentinel
                Some((_, next)) => next - 1,
                None => columns.len(),
            };

            runs.push(Self::build_run(map, path, *start..end)?);
        }
        Self::link_parents(&mut runs)?;

        let mut merge_order: Vec<usize> = (0..runs.len()).collect();
        merge_order.sort_by_key(|&i| runs[i].depth());

        log::debug!(
            "scan plan for '{}': {} runs over {} columns",
            map.root().entity_name,
            runs.len(),
            columns.len()
        );

        Ok(Self {
            root: map.root(),
            runs,
            column_count: columns.len(),
            merge_order,
        })
    }

    fn build_run(
        map: &FieldMap,
        path: &str,
        columns: Range<usize>,
    ) -> Result<ScanRun, ScanError> {
        let entry = map.get(path).ok_or_else(|| ScanError::unknown_path(path))?;

        let (entity, relation) = match entry.kind {
            EntryKind::Root(model) => (model, RunRelation::Root),
            EntryKind::One(model) => (model, RunRelation::One),
            EntryKind::Many(model) => (model, RunRelation::Many),
            EntryKind::Scalar => return Err(ScanError::unknown_path(path)),
        };

        let fields = map.scalar_fields(path)?;
        if fields.len() != columns.len() {
            return Err(ScanError::ColumnMismatch {
                path: path.to_string(),
                expected: fields.len(),
                found: columns.len(),
            });
        }

        let field = match relation {
            RunRelation::Root => None,
            RunRelation::One | RunRelation::Many => Some(entry.index),
        };

        log::trace!("run '{path}': columns {columns:?}");

        Ok(ScanRun {
            path: path.to_string(),
            columns,
            entity,
            fields,
            optional: entry.path_optional(),
            key: entity.primary_key_index().ok(),
            relation,
            parent: None,
            field,
        })
    }

    // A parent may appear after its child in column order; merging goes by depth.
    fn link_parents(runs: &mut [ScanRun]) -> Result<(), ScanError> {
        for i in 0..runs.len() {
            let Some((parent_path, _)) = split_path(&runs[i].path) else {
                continue;
            };

            let parent = runs
                .iter()
                .position(|run| run.path == parent_path)
                .ok_or_else(|| {
                    ScanError::structural(format!(
                        "scan path '{}' has no run for its parent '{parent_path}'",
                        runs[i].path
                    ))
                })?;

            runs[i].parent = Some(parent);
        }

        Ok(())
    }

    #[must_use]
    pub const fn root(&self) -> &'static EntityModel {
        self.root
    }

    #[must_use]
    pub fn runs(&self) -> &[ScanRun] {
        &self.runs
    }

    /// Total row width, sentinel columns included.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Run positions ordered shallowest path first; ties keep column order.
    #[must_use]
    pub fn merge_order(&self) -> &[usize] {
        &self.merge_order
    }
}
