//! Row sources: the cursor a scan pulls rows from.

use crate::{error::ScanError, value::Value};
use std::collections::VecDeque;

///
/// RowSource
///
/// Supplies the ordered column names once, then one ordered row of values
/// per call until exhausted. Errors abort the scan that is pulling.
///

pub trait RowSource {
    fn columns(&self) -> &[String];

    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ScanError>;
}

impl<R: RowSource + ?Sized> RowSource for &mut R {
    fn columns(&self) -> &[String] {
        (**self).columns()
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ScanError> {
        (**self).next_row()
    }
}

///
/// MemoryRows
/// Rows already buffered in memory, yielded in insertion order.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryRows {
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
}

impl MemoryRows {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: impl Into<Vec<Value>>) -> Self {
        self.push_row(row);
        self
    }

    pub fn push_row(&mut self, row: impl Into<Vec<Value>>) {
        self.rows.push_back(row.into());
    }

    /// Rows not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemoryRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ScanError> {
        Ok(self.rows.pop_front())
    }
}
