//! The observer seam between the engine and the presentation layer.

use crate::snapshot::ExamSnapshot;

/// Receives read-only snapshots as the exam progresses.
///
/// The engine clones state out of the shared lock before calling, so
/// implementations never contend with the session loops and may render at
/// leisure.
pub trait SnapshotSink: Send + Sync {
    /// The observed state changed since the last push (or the run just started).
    fn on_snapshot(&self, snapshot: &ExamSnapshot);

    /// The last student's outcome has been recorded; `snapshot` is final.
    fn on_complete(&self, snapshot: &ExamSnapshot);
}

/// Discards every snapshot.
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn on_snapshot(&self, _: &ExamSnapshot) {}
    fn on_complete(&self, _: &ExamSnapshot) {}
}
