//! Scan event sink boundary.
//!
//! Merge and scan logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through ScanEvent and ScanSink.
use crate::{merge::ScanMode, obs::metrics, traits::Entity};
use std::{cell::RefCell, marker::PhantomData};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn ScanSink>> = RefCell::new(None);
}

///
/// ScanEvent
///

#[derive(Clone, Copy, Debug)]
pub enum ScanEvent {
    ScanStart {
        mode: ScanMode,
        entity_path: &'static str,
    },
    ScanFinish {
        mode: ScanMode,
        entity_path: &'static str,
        rows: u64,
        roots: u64,
    },
    RowMerged {
        entity_path: &'static str,
    },
    /// A new entity was attached: a root, or a child under its parent.
    EntityAppended {
        entity_path: &'static str,
    },
    /// A run contributed nothing on one row: absent value or absent parent.
    RelationSkipped {
        entity_path: &'static str,
    },
}

///
/// ScanSink
///

pub trait ScanSink {
    fn record(&self, event: ScanEvent);
}

/// GlobalScanSink
/// Default thread-local sink that writes into the scan counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalScanSink;

impl ScanSink for GlobalScanSink {
    fn record(&self, event: ScanEvent) {
        match event {
            ScanEvent::ScanStart { mode, entity_path } => {
                metrics::with_state_mut(|m| {
                    match mode {
                        ScanMode::One => m.ops.scan_one_calls = m.ops.scan_one_calls.saturating_add(1),
                        ScanMode::Many => {
                            m.ops.scan_many_calls = m.ops.scan_many_calls.saturating_add(1);
                        }
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.scans = entry.scans.saturating_add(1);
                });
            }

            ScanEvent::ScanFinish {
                entity_path,
                rows,
                roots,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_merged = m.ops.rows_merged.saturating_add(rows);
                    m.ops.roots_returned = m.ops.roots_returned.saturating_add(roots);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.rows_merged = entry.rows_merged.saturating_add(rows);
                    entry.roots_returned = entry.roots_returned.saturating_add(roots);
                });
            }

            ScanEvent::RowMerged { entity_path } => {
                metrics::with_state_mut(|m| {
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.rows_seen = entry.rows_seen.saturating_add(1);
                });
            }

            ScanEvent::EntityAppended { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.entities_appended = m.ops.entities_appended.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.appended = entry.appended.saturating_add(1);
                });
            }

            ScanEvent::RelationSkipped { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.relations_skipped = m.ops.relations_skipped.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.skipped = entry.skipped.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_SCAN_SINK: GlobalScanSink = GlobalScanSink;

pub(crate) fn record(event: ScanEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a live `&dyn ScanSink` in `with_scan_sink`,
        //   which restores the previous slot on every exit, unwinding included.
        // - `record` is synchronous and never keeps `ptr` past this call.
        // - Only a shared reference is materialized, matching the borrow it came from.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_SCAN_SINK.record(event);
    }
}

/// Snapshot the scan counters of the current thread.
#[must_use]
pub fn scan_report() -> metrics::ScanReport {
    metrics::report()
}

/// Reset the scan counters of the current thread.
pub fn scan_reset() {
    metrics::reset();
}

/// Run a closure with every scan event on this thread routed to `sink`.
/// Overrides nest; the previous sink is restored on return or unwind.
pub fn with_scan_sink<T>(sink: &dyn ScanSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn ScanSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The pointer is installed only for this dynamic scope and `Guard`
    //   restores the previous slot on all exits.
    // - `record` dereferences it synchronously and never persists it.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn ScanSink, *const dyn ScanSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

///
/// Span
/// RAII guard that emits start/finish events for one scan.
/// Finish is recorded even when the scan returns early with an error.
///

pub(crate) struct Span<E: Entity> {
    mode: ScanMode,
    rows: u64,
    roots: u64,
    _marker: PhantomData<E>,
}

impl<E: Entity> Span<E> {
    #[must_use]
    pub(crate) fn new(mode: ScanMode) -> Self {
        record(ScanEvent::ScanStart {
            mode,
            entity_path: E::MODEL.path,
        });

        Self {
            mode,
            rows: 0,
            roots: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }

    pub(crate) const fn set_roots(&mut self, roots: u64) {
        self.roots = roots;
    }
}

impl<E: Entity> Drop for Span<E> {
    fn drop(&mut self) {
        record(ScanEvent::ScanFinish {
            mode: self.mode,
            entity_path: E::MODEL.path,
            rows: self.rows,
            roots: self.roots,
        });
    }
}
