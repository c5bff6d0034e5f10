//! Scanner: field map and scan plan prepared once, then reused for every
//! result with the same root type and column list.

use crate::{
    config::ScanConfig,
    error::ScanError,
    map::FieldMap,
    merge::{ScanMode, TreeMerger},
    plan::ScanPlan,
    source::RowSource,
    traits::Entity,
};
use std::marker::PhantomData;

///
/// Scanner
///
/// Caller-owned; holds no state between scans.
///

#[derive(Clone, Debug)]
pub struct Scanner<E: Entity> {
    columns: Vec<String>,
    map: FieldMap,
    plan: ScanPlan,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Scanner<E> {
    pub fn prepare<S: AsRef<str>>(columns: &[S], config: &ScanConfig) -> Result<Self, ScanError> {
        let map = FieldMap::of::<E>()?;
        let plan = ScanPlan::parse(columns, &map, config)?;

        Ok(Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            map,
            plan,
            _marker: PhantomData,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn map(&self) -> &FieldMap {
        &self.map
    }

    #[must_use]
    pub const fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    /// A merger for callers who feed rows themselves.
    pub fn merger(&self, mode: ScanMode) -> Result<TreeMerger<'_, E>, ScanError> {
        TreeMerger::new(&self.plan, mode)
    }

    /// Drain `rows` into a single root entity.
    pub fn scan_one<R: RowSource + ?Sized>(&self, rows: &mut R) -> Result<E, ScanError> {
        self.drain(rows, ScanMode::One)?.finish_one()
    }

    /// Drain `rows` into root entities in first-seen order.
    pub fn scan_many<R: RowSource + ?Sized>(&self, rows: &mut R) -> Result<Vec<E>, ScanError> {
        self.drain(rows, ScanMode::Many)?.finish_many()
    }

    fn drain<R: RowSource + ?Sized>(
        &self,
        rows: &mut R,
        mode: ScanMode,
    ) -> Result<TreeMerger<'_, E>, ScanError> {
        if rows.columns() != self.columns.as_slice() {
            return Err(ScanError::structural(format!(
                "row source columns {:?} differ from the prepared columns {:?}",
                rows.columns(),
                self.columns
            )));
        }

        let mut merger = self.merger(mode)?;
        while let Some(row) = rows.next_row()? {
            merger.push_row(&row)?;
        }

        Ok(merger)
    }
}

/// Scan a result expected to hold exactly one root entity.
pub fn scan_one<E: Entity, R: RowSource + ?Sized>(rows: &mut R) -> Result<E, ScanError> {
    Scanner::<E>::prepare(rows.columns(), &ScanConfig::default())?.scan_one(rows)
}

/// Scan a result into root entities in first-seen order.
pub fn scan_many<E: Entity, R: RowSource + ?Sized>(rows: &mut R) -> Result<Vec<E>, ScanError> {
    Scanner::<E>::prepare(rows.columns(), &ScanConfig::default())?.scan_many(rows)
}
