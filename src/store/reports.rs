use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{ReasonReport, ReasonRevision, ReasonStatusTransition, ReportStatus};
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    reports: HashMap<Uuid, ReasonReport>,
    transitions: HashMap<Uuid, Vec<ReasonStatusTransition>>,
    revisions_by_event: HashMap<Uuid, Vec<ReasonRevision>>,
}

/// Reports, their forward-only transition log, and the rescoring revisions
/// they can trigger. The duplicate-open-report guard is enforced one layer
/// up (`report_state_machine`) since it maps to a specific `ApiError` code,
/// not a generic store conflict.
#[derive(Clone, Default)]
pub struct ReportTable {
    inner: Arc<RwLock<Inner>>,
}

impl ReportTable {
    pub fn insert(&self, report: ReasonReport, transition: ReasonStatusTransition) -> ReasonReport {
        let mut inner = self.inner.write();
        inner.transitions.entry(report.id).or_default().push(transition);
        inner.reports.insert(report.id, report.clone());
        report
    }

    pub fn get(&self, report_id: Uuid) -> Result<ReasonReport, StoreError> {
        self.inner
            .read()
            .reports
            .get(&report_id)
            .cloned()
            .ok_or(StoreError::NotFound("report"))
    }

    pub fn open_reports_for_reason(&self, reason_id: Uuid) -> Vec<ReasonReport> {
        self.inner
            .read()
            .reports
            .values()
            .filter(|r| r.reason_id == reason_id && r.status != ReportStatus::Resolved)
            .cloned()
            .collect()
    }

    /// All reports ever filed against a reason, regardless of status. Used
    /// to decide whether any revision history exists at all for an event
    /// (as opposed to `open_reports_for_reason`, which only answers whether
    /// a new report would be a duplicate of one still in flight).
    pub fn all_reports_for_reason(&self, reason_id: Uuid) -> Vec<ReasonReport> {
        self.inner
            .read()
            .reports
            .values()
            .filter(|r| r.reason_id == reason_id)
            .cloned()
            .collect()
    }

    /// Append a validated forward transition and update the report's status.
    /// Forward-only ordering is enforced by the caller (`report_state_machine`);
    /// this just persists the result atomically.
    pub fn apply_transition(
        &self,
        report_id: Uuid,
        transition: ReasonStatusTransition,
    ) -> Result<ReasonReport, StoreError> {
        let mut inner = self.inner.write();
        let report = inner
            .reports
            .get_mut(&report_id)
            .ok_or(StoreError::NotFound("report"))?;
        report.status = transition.to_status;
        let updated = report.clone();
        inner.transitions.entry(report_id).or_default().push(transition);
        Ok(updated)
    }

    pub fn transitions_for(&self, report_id: Uuid) -> Vec<ReasonStatusTransition> {
        self.inner
            .read()
            .transitions
            .get(&report_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn add_revision(&self, revision: ReasonRevision) {
        self.inner
            .write()
            .revisions_by_event
            .entry(revision.event_id)
            .or_default()
            .push(revision);
    }

    pub fn revisions_for_event(&self, event_id: Uuid) -> Vec<ReasonRevision> {
        self.inner
            .read()
            .revisions_by_event
            .get(&event_id)
            .cloned()
            .unwrap_or_default()
    }
}
