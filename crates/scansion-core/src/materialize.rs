//! Row materializer: one row of values into one partial entity per run.

use crate::{
    error::ScanError,
    plan::{ScanPlan, ScanRun},
    traits::Record,
    value::Value,
};

/// A freshly decoded entity for one run of one row; `None` when the run is
/// a relation path whose columns were all null.
pub type Partial = Option<Box<dyn Record>>;

/// Decode every run of `row`, in plan order.
pub fn materialize_row(plan: &ScanPlan, row: &[Value]) -> Result<Vec<Partial>, ScanError> {
    if row.len() != plan.column_count() {
        return Err(ScanError::RowWidth {
            expected: plan.column_count(),
            found: row.len(),
        });
    }

    plan.runs()
        .iter()
        .map(|run| materialize_run(run, &row[run.columns.clone()]))
        .collect()
}

/// Decode a single run from its slice of the row.
pub fn materialize_run(run: &ScanRun, values: &[Value]) -> Result<Partial, ScanError> {
    if run.optional && Value::all_null(values) {
        log::trace!("'{}' absent: all {} columns null", run.path, values.len());
        return Ok(None);
    }

    let mut record = (run.entity.new_record)();
    for (&index, value) in run.fields.iter().zip(values) {
        record.set_scalar(index, value)?;
    }

    Ok(Some(record))
}
