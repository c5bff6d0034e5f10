use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// ScanCounters
/// Ephemeral, thread-local counters for scans run on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ScanCounters {
    pub ops: ScanOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// ScanOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ScanOps {
    // Entrypoints
    pub scan_one_calls: u64,
    pub scan_many_calls: u64,

    // Rows and results
    pub rows_merged: u64,
    pub roots_returned: u64,

    // Merge decisions
    pub entities_appended: u64,
    pub relations_skipped: u64,
}

///
/// EntityCounters
/// Keyed by entity type path.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub scans: u64,
    pub rows_seen: u64,
    pub rows_merged: u64,
    pub roots_returned: u64,
    pub appended: u64,
    pub skipped: u64,
}

thread_local! {
    static SCAN_STATE: RefCell<ScanCounters> = RefCell::new(ScanCounters::default());
}

/// Borrow counters immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&ScanCounters) -> R) -> R {
    SCAN_STATE.with(|m| f(&m.borrow()))
}

/// Borrow counters mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut ScanCounters) -> R) -> R {
    SCAN_STATE.with(|m| f(&mut m.borrow_mut()))
}

pub(crate) fn reset() {
    with_state_mut(|m| *m = ScanCounters::default());
}

///
/// ScanReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ScanReport {
    pub counters: ScanCounters,
    /// Per-entity counters with averages, ordered by entity path.
    pub entity_summaries: Vec<EntitySummary>,
}

///
/// EntitySummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntitySummary {
    pub path: String,
    pub scans: u64,
    pub rows_merged: u64,
    pub roots_returned: u64,
    pub appended: u64,
    pub avg_rows_per_scan: f64,
    pub avg_roots_per_scan: f64,
}

/// Build a report from the in-memory counters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> ScanReport {
    let counters = with_state(Clone::clone);

    let entity_summaries = counters
        .entities
        .iter()
        .map(|(path, entry)| {
            let per_scan = |n: u64| {
                if entry.scans > 0 {
                    n as f64 / entry.scans as f64
                } else {
                    0.0
                }
            };

            EntitySummary {
                path: path.clone(),
                scans: entry.scans,
                rows_merged: entry.rows_merged,
                roots_returned: entry.roots_returned,
                appended: entry.appended,
                avg_rows_per_scan: per_scan(entry.rows_merged),
                avg_roots_per_scan: per_scan(entry.roots_returned),
            }
        })
        .collect();

    ScanReport {
        counters,
        entity_summaries,
    }
}
