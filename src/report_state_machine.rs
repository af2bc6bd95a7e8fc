//! Report lifecycle (spec.md §4.4), shaped on the teacher's
//! `MitigationController`: an explicit state enum, forward-only
//! transitions, and an append-only log of every change. The duplicate-open-
//! report guard and rerun trigger live here rather than in the store, since
//! they map onto specific `ApiError` codes the store doesn't know about.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::ids::IdGen;
use crate::models::{
    ReasonReport, ReasonRevision, ReasonStatusTransition, ReportStatus, ReportType,
};
use crate::store::Store;

/// Forward-only: received -> reviewed -> resolved, skipping reviewed is
/// allowed, no transition ever moves backward (spec.md §4.4).
fn is_forward(from: ReportStatus, to: ReportStatus) -> bool {
    use ReportStatus::*;
    matches!(
        (from, to),
        (Received, Reviewed) | (Received, Resolved) | (Reviewed, Resolved)
    )
}

pub fn file_report(
    store: &Store,
    clock: &dyn Clock,
    ids: &dyn IdGen,
    user_id: Uuid,
    reason_id: Uuid,
    report_type: ReportType,
    note: Option<String>,
) -> Result<ReasonReport, ApiError> {
    if !store.reports.open_reports_for_reason(reason_id).is_empty() {
        return Err(ApiError::DuplicateReasonReport);
    }

    let now = clock.now();
    let report = ReasonReport {
        id: ids.new_id(),
        user_id,
        reason_id,
        report_type,
        note,
        status: ReportStatus::Received,
        created_at_utc: now,
    };
    let transition = ReasonStatusTransition {
        id: ids.new_id(),
        report_id: report.id,
        from_status: None,
        to_status: ReportStatus::Received,
        transitioned_at_utc: now,
    };
    Ok(store.reports.insert(report, transition))
}

/// Advance a report's status. `trigger_revision` is populated when the
/// transition resolves the report and the reviewer chose to rerun the
/// reason engine; its `revised_at_utc` equals this transition's timestamp.
pub fn transition_report(
    store: &Store,
    clock: &dyn Clock,
    ids: &dyn IdGen,
    report_id: Uuid,
    to_status: ReportStatus,
) -> Result<ReasonReport, ApiError> {
    let current = store.reports.get(report_id)?;
    if !is_forward(current.status, to_status) {
        return Err(ApiError::Conflict {
            message: format!("cannot move report from {:?} to {:?}", current.status, to_status),
        });
    }

    let now = clock.now();
    let transition = ReasonStatusTransition {
        id: ids.new_id(),
        report_id,
        from_status: Some(current.status),
        to_status,
        transitioned_at_utc: now,
    };
    Ok(store.reports.apply_transition(report_id, transition)?)
}

/// Record a reviewer-triggered rescore of the report's target reason
/// (spec.md §4.4: resolving may trigger a Reason Engine rerun). The caller
/// is responsible for actually adjusting the reason's confidence and
/// supplying the before/after values.
#[allow(clippy::too_many_arguments)]
pub fn record_revision(
    store: &Store,
    ids: &dyn IdGen,
    event_id: Uuid,
    reason_id: Uuid,
    report_id: Uuid,
    confidence_before: f64,
    confidence_after: f64,
    revision_reason: String,
    revised_at_utc: DateTime<Utc>,
) -> ReasonRevision {
    let revision = ReasonRevision {
        id: ids.new_id(),
        event_id,
        reason_id,
        triggered_by_report_id: report_id,
        confidence_before,
        confidence_after,
        revision_reason,
        revised_at_utc,
    };
    store.reports.add_revision(revision.clone());
    revision
}

/// Resolution confidence penalty applied when a reviewer confirms a report's
/// complaint against a reason (spec.md §4.6 scenario: resolving a report may
/// trigger a rerun of scoring). A full adapter re-fetch is not warranted for
/// a single-reason revision; the reviewer's resolution directly revises the
/// reason's confidence.
const RESOLUTION_CONFIDENCE_PENALTY: f64 = 0.2;

/// Resolve a report and, if the reviewer confirms the underlying reason was
/// wrong, apply the revision in the same call: move the report to
/// `resolved`, lower the reason's confidence, and append a `ReasonRevision`
/// (spec.md §4.4, §4.6). `event_id` is supplied by the caller since a report
/// only carries `reason_id`, not the event it belongs to.
pub fn resolve_report_with_revision(
    store: &Store,
    clock: &dyn Clock,
    ids: &dyn IdGen,
    event_id: Uuid,
    report_id: Uuid,
    revision_reason: String,
) -> Result<(ReasonReport, ReasonRevision), ApiError> {
    let report = transition_report(store, clock, ids, report_id, ReportStatus::Resolved)?;
    let reason_id = report.reason_id;

    let confidence_before = store
        .events
        .get_reasons(event_id)
        .into_iter()
        .find(|r| r.id == reason_id)
        .map(|r| r.confidence_score)
        .ok_or_else(|| ApiError::not_found("reason"))?;
    let confidence_after = (confidence_before - RESOLUTION_CONFIDENCE_PENALTY).max(0.0);
    store.events.update_reason_confidence(event_id, reason_id, confidence_after).map_err(ApiError::from)?;

    let now = clock.now();
    let revision = record_revision(
        store,
        ids,
        event_id,
        reason_id,
        report_id,
        confidence_before,
        confidence_after,
        revision_reason,
        now,
    );
    Ok((report, revision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::ids::SequentialGen;

    fn setup() -> (Store, FixedClock, SequentialGen) {
        (Store::new(), FixedClock::new(Utc::now()), SequentialGen::default())
    }

    #[test]
    fn second_open_report_for_same_reason_is_rejected() {
        let (store, clock, ids) = setup();
        let user_id = Uuid::new_v4();
        let reason_id = Uuid::new_v4();
        file_report(&store, &clock, &ids, user_id, reason_id, ReportType::WrongSource, None).unwrap();
        let err = file_report(&store, &clock, &ids, user_id, reason_id, ReportType::Other, None).unwrap_err();
        assert!(matches!(err, ApiError::DuplicateReasonReport));
    }

    #[test]
    fn received_can_skip_straight_to_resolved() {
        let (store, clock, ids) = setup();
        let report = file_report(&store, &clock, &ids, Uuid::new_v4(), Uuid::new_v4(), ReportType::Other, None).unwrap();
        let updated = transition_report(&store, &clock, &ids, report.id, ReportStatus::Resolved).unwrap();
        assert!(matches!(updated.status, ReportStatus::Resolved));
    }

    #[test]
    fn backward_transition_is_rejected() {
        let (store, clock, ids) = setup();
        let report = file_report(&store, &clock, &ids, Uuid::new_v4(), Uuid::new_v4(), ReportType::Other, None).unwrap();
        transition_report(&store, &clock, &ids, report.id, ReportStatus::Resolved).unwrap();
        let err = transition_report(&store, &clock, &ids, report.id, ReportStatus::Reviewed).unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    fn seed_event_with_reason(store: &Store, ids: &SequentialGen, user_id: Uuid) -> (Uuid, Uuid) {
        use crate::models::{EventReason, Market, PriceEvent, ReasonType, SessionLabel};

        let event = PriceEvent {
            id: ids.new_id(),
            user_id,
            market: Market::Us,
            symbol: "AAPL".into(),
            change_pct: 5.0,
            window_minutes: 5,
            detected_at_utc: Utc::now(),
            exchange_timezone: "America/New_York".into(),
            session_label: SessionLabel::Regular,
            delta_realert: false,
        };
        let event_id = event.id;
        store.events.insert_detected(event);

        let reason = EventReason {
            id: ids.new_id(),
            event_id,
            rank: 1,
            reason_type: ReasonType::News,
            confidence_score: 0.8,
            summary: "company raises guidance".into(),
            source_url: "https://reuters.com/a".into(),
            published_at: Utc::now(),
            confidence_breakdown: None,
        };
        let reason_id = reason.id;
        store.events.set_reasons(event_id, vec![reason]).unwrap();
        (event_id, reason_id)
    }

    #[test]
    fn resolving_with_revision_lowers_confidence_and_records_history() {
        let (store, clock, ids) = setup();
        let user_id = Uuid::new_v4();
        let (event_id, reason_id) = seed_event_with_reason(&store, &ids, user_id);

        let report = file_report(&store, &clock, &ids, user_id, reason_id, ReportType::InaccurateReason, None).unwrap();

        let (resolved, revision) = resolve_report_with_revision(
            &store,
            &clock,
            &ids,
            event_id,
            report.id,
            "confirmed inaccurate after review".to_string(),
        )
        .unwrap();

        assert!(matches!(resolved.status, ReportStatus::Resolved));
        assert_eq!(revision.reason_id, reason_id);
        assert!(revision.confidence_after < revision.confidence_before);

        let reasons = store.events.get_reasons(event_id);
        let reason = reasons.iter().find(|r| r.id == reason_id).unwrap();
        assert!((reason.confidence_score - revision.confidence_after).abs() < 1e-9);

        let history = store.reports.revisions_for_event(event_id);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn resolving_without_revision_does_not_touch_confidence() {
        let (store, clock, ids) = setup();
        let user_id = Uuid::new_v4();
        let (event_id, reason_id) = seed_event_with_reason(&store, &ids, user_id);
        let report = file_report(&store, &clock, &ids, user_id, reason_id, ReportType::Other, None).unwrap();

        let resolved = transition_report(&store, &clock, &ids, report.id, ReportStatus::Resolved).unwrap();
        assert!(matches!(resolved.status, ReportStatus::Resolved));
        assert!(store.reports.revisions_for_event(event_id).is_empty());
    }
}
