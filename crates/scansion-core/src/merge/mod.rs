//! Tree merger: folds each row's partial entities into the accumulated result.
//!
//! Runs are merged shallowest first. Every merged entity is remembered for
//! the rest of the row as a locator (root position plus the relation steps
//! taken from it), so deeper runs can find their parent again without
//! holding a borrow across runs.


use crate::{
    error::ScanError,
    map::primary_key_at,
    materialize::{Partial, materialize_row},
    obs::sink::{self, ScanEvent, Span},
    plan::{RunRelation, ScanPlan, ScanRun},
    traits::{Entity, Record, RelationMut, downcast_record},
    value::Value,
};
use derive_more::Display;

///
/// ScanMode
/// Whether the caller expects one root entity or an ordered sequence.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ScanMode {
    #[display("one")]
    One,
    #[display("many")]
    Many,
}

///
/// Merged
///

#[derive(Debug)]
pub enum Merged<E> {
    One(E),
    Many(Vec<E>),
}

///
/// Step
/// One relation hop from a merged entity to a child.
///

#[derive(Clone, Copy, Debug)]
struct Step {
    field: usize,
    /// Position within a one-to-many field; `None` for a single relation.
    position: Option<usize>,
}

///
/// Locator
///

#[derive(Clone, Debug)]
struct Locator {
    root: usize,
    steps: Vec<Step>,
}

impl Locator {
    fn child(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);

        Self {
            root: self.root,
            steps,
        }
    }
}

///
/// TreeMerger
///
/// Owns the result while rows are pushed; `finish` hands it to the caller.
/// Children only ever grow and keep first-seen order.
///

pub struct TreeMerger<'p, E: Entity> {
    plan: &'p ScanPlan,
    mode: ScanMode,
    roots: Vec<E>,
    root_keys: Vec<Value>,
    rows: u64,
    span: Span<E>,
}

impl<'p, E: Entity> TreeMerger<'p, E> {
    pub fn new(plan: &'p ScanPlan, mode: ScanMode) -> Result<Self, ScanError> {
        if !plan.root().is_same_type(E::MODEL) {
            return Err(ScanError::structural(format!(
                "scan plan was built for '{}', not '{}'",
                plan.root().path,
                E::MODEL.path
            )));
        }

        Ok(Self {
            plan,
            mode,
            roots: Vec::new(),
            root_keys: Vec::new(),
            rows: 0,
            span: Span::new(mode),
        })
    }

    #[must_use]
    pub const fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Rows merged so far.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Roots accumulated so far, in first-seen order.
    #[must_use]
    pub fn roots(&self) -> &[E] {
        &self.roots
    }

    /// Materialize one row and merge it.
    pub fn push_row(&mut self, row: &[Value]) -> Result<(), ScanError> {
        let partials = materialize_row(self.plan, row)?;

        self.merge_partials(partials)
    }

    /// Merge one row's partials, given in plan run order.
    pub fn merge_partials(&mut self, mut partials: Vec<Partial>) -> Result<(), ScanError> {
        let plan = self.plan;
        let runs = plan.runs();

        if partials.len() != runs.len() {
            return Err(ScanError::structural(format!(
                "expected {} partial entities per row, got {}",
                runs.len(),
                partials.len()
            )));
        }

        let mut located: Vec<Option<Locator>> = vec![None; runs.len()];

        for &i in plan.merge_order() {
            let run = &runs[i];

            let Some(record) = partials[i].take() else {
                if run.relation == RunRelation::Root {
                    return Err(ScanError::structural("row has no root entity"));
                }
                Self::skip(run, "absent on this row");
                continue;
            };

            located[i] = match (run.relation, run.parent, run.field) {
                (RunRelation::Root, _, _) => Some(self.merge_root(run, record)?),
                (_, Some(parent), Some(field)) => match located[parent].clone() {
                    Some(parent) => Some(self.merge_child(run, &parent, field, record)?),
                    None => {
                        Self::skip(run, "parent absent on this row");
                        None
                    }
                },
                _ => {
                    return Err(ScanError::structural(format!(
                        "scan path '{}' is not linked to a parent",
                        run.path
                    )));
                }
            };
        }

        self.rows += 1;
        self.span.set_rows(self.rows);
        self.span.set_roots(u64::try_from(self.roots.len()).unwrap_or(u64::MAX));
        sink::record(ScanEvent::RowMerged {
            entity_path: E::MODEL.path,
        });

        Ok(())
    }

    /// Hand over the result.
    pub fn finish(self) -> Result<Merged<E>, ScanError> {
        let Self {
            mode,
            roots,
            rows,
            ..
        } = self;

        log::debug!(
            "scan of '{}' ({mode}) finished: {rows} rows, {} roots",
            E::MODEL.entity_name,
            roots.len()
        );

        match mode {
            ScanMode::One => roots
                .into_iter()
                .next()
                .map(Merged::One)
                .ok_or(ScanError::NoRows {
                    entity: E::MODEL.entity_name,
                }),
            ScanMode::Many => Ok(Merged::Many(roots)),
        }
    }

    /// The single root; fails with `NoRows` when no row was merged.
    pub fn finish_one(self) -> Result<E, ScanError> {
        match self.finish()? {
            Merged::One(root) => Ok(root),
            Merged::Many(_) => Err(ScanError::structural(
                "finish_one called on a many-rows merger",
            )),
        }
    }

    /// All roots in first-seen order; possibly empty.
    pub fn finish_many(self) -> Result<Vec<E>, ScanError> {
        match self.finish()? {
            Merged::One(root) => Ok(vec![root]),
            Merged::Many(roots) => Ok(roots),
        }
    }

    fn merge_root(&mut self, run: &ScanRun, record: Box<dyn Record>) -> Result<Locator, ScanError> {
        let key = primary_key_at(record.as_ref(), key_index(run)?)?;

        let existing = match self.mode {
            ScanMode::One => match self.root_keys.first() {
                None => None,
                Some(first) if first.key_eq(&key) => Some(0),
                Some(first) => {
                    return Err(ScanError::structural(format!(
                        "single-root scan of '{}' got root key {key} after {first}",
                        E::MODEL.entity_name
                    )));
                }
            },
            ScanMode::Many => self.root_keys.iter().position(|k| k.key_eq(&key)),
        };

        let root = match existing {
            Some(position) => position,
            None => {
                log::trace!("new root '{}' with key {key}", E::MODEL.entity_name);

                self.roots.push(downcast_record::<E>(record)?);
                self.root_keys.push(key);
                sink::record(ScanEvent::EntityAppended {
                    entity_path: E::MODEL.path,
                });

                self.roots.len() - 1
            }
        };

        Ok(Locator {
            root,
            steps: Vec::new(),
        })
    }

    fn merge_child(
        &mut self,
        run: &ScanRun,
        parent: &Locator,
        field: usize,
        record: Box<dyn Record>,
    ) -> Result<Locator, ScanError> {
        let index = key_index(run)?;
        let key = primary_key_at(record.as_ref(), index)?;
        let parent_record = self.resolve_mut(parent)?;
        let parent_name = parent_record.model().entity_name;

        let relation = parent_record.relation_mut(field).ok_or_else(|| {
            ScanError::structural(format!(
                "entity '{parent_name}' has no relation field at index {field}"
            ))
        })?;

        let step = match relation {
            RelationMut::Many(slot) => {
                let position = match slot.position_of(index, &key)? {
                    Some(position) => position,
                    None => {
                        log::trace!("append '{}' key {key}", run.path);
                        sink::record(ScanEvent::EntityAppended {
                            entity_path: run.entity.path,
                        });

                        slot.push(record)?
                    }
                };

                Step {
                    field,
                    position: Some(position),
                }
            }
            RelationMut::One(slot) => {
                match slot.get() {
                    Some(existing) => {
                        let existing = primary_key_at(existing, index)?;
                        if !existing.key_eq(&key) {
                            return Err(ScanError::InconsistentSingleRelation {
                                path: run.path.clone(),
                                existing,
                                found: key,
                            });
                        }
                    }
                    None => {
                        log::trace!("set '{}' key {key}", run.path);
                        sink::record(ScanEvent::EntityAppended {
                            entity_path: run.entity.path,
                        });

                        slot.set(record)?;
                    }
                }

                Step {
                    field,
                    position: None,
                }
            }
        };

        Ok(parent.child(step))
    }

    fn resolve_mut(&mut self, locator: &Locator) -> Result<&mut dyn Record, ScanError> {
        let lost = || ScanError::structural("merged entity is no longer reachable");

        let mut current: &mut dyn Record = self.roots.get_mut(locator.root).ok_or_else(lost)?;

        for step in &locator.steps {
            let next = match (current.relation_mut(step.field), step.position) {
                (Some(RelationMut::Many(slot)), Some(position)) => slot.get_mut(position),
                (Some(RelationMut::One(slot)), None) => slot.get_mut(),
                _ => None,
            };
            current = next.ok_or_else(lost)?;
        }

        Ok(current)
    }

    fn skip(run: &ScanRun, reason: &str) {
        log::trace!("skip '{}': {reason}", run.path);
        sink::record(ScanEvent::RelationSkipped {
            entity_path: run.entity.path,
        });
    }
}

// Declare index of a run's key field, resolved when the plan was parsed.
fn key_index(run: &ScanRun) -> Result<usize, ScanError> {
    match run.key {
        Some(index) => Ok(index),
        None => run.entity.primary_key_index(),
    }
}
