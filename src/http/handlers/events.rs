//! Event listing/detail, feedback, reason-reports, reason-revisions,
//! evidence-compare.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::evidence_compare;
use crate::http::handlers::{fail, ok, wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::{
    ConfidenceBreakdown, EventReason, EvidenceCompare, Feedback, PriceEvent, ReasonReport,
    ReasonRevision, ReasonStatus, ReasonStatusTransition, ReportStatus, ReportType, Vote,
};
use crate::report_state_machine;

const EVENT_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_size")]
    pub size: usize,
    pub cursor: Option<DateTime<Utc>>,
}

fn default_size() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<PriceEvent>,
    pub next_cursor: Option<DateTime<Utc>>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> HandlerResult<ListResponse> {
    let now = state.clock.now();
    let cutoff = now - chrono::Duration::days(EVENT_LOOKBACK_DAYS);
    let size = params.size.clamp(1, 100);

    let events: Vec<PriceEvent> = state
        .store
        .events
        .list_for_user(auth_user.0)
        .into_iter()
        .filter(|e| e.detected_at_utc >= cutoff)
        .filter(|e| params.cursor.map(|c| e.detected_at_utc < c).unwrap_or(true))
        .take(size + 1)
        .collect();

    let has_more = events.len() > size;
    let mut items = events;
    items.truncate(size);
    let next_cursor = if has_more { items.last().map(|e| e.detected_at_utc) } else { None };

    ok(ListResponse { items, next_cursor })
}

fn owned_event(state: &AppState, auth_user: AuthUser, event_id: Uuid) -> Result<PriceEvent, ApiError> {
    let event = state.store.events.get(event_id).map_err(ApiError::from)?;
    if event.user_id != auth_user.0 {
        return Err(ApiError::not_found("event"));
    }
    Ok(event)
}

fn reason_in_event(state: &AppState, event_id: Uuid, reason_id: Uuid) -> Result<EventReason, ApiError> {
    state
        .store
        .events
        .get_reasons(event_id)
        .into_iter()
        .find(|r| r.id == reason_id)
        .ok_or_else(|| ApiError::not_found("reason"))
}

/// A short human-readable gloss of the top-ranked reason, for clients that
/// render it without inspecting the full breakdown.
fn explanation_text(reasons: &[EventReason]) -> String {
    match reasons.iter().find(|r| r.rank == 1) {
        Some(top) => format!(
            "Top reason ({:?}): {} (confidence {:.2})",
            top.reason_type, top.summary, top.confidence_score
        ),
        None => "No corroborating evidence has been found yet.".to_string(),
    }
}

fn revision_hint(revisions: &[ReasonRevision]) -> String {
    match revisions.last() {
        Some(latest) => format!(
            "revised {} time(s), most recent at {}",
            revisions.len(),
            latest.revised_at_utc.to_rfc3339()
        ),
        None => "no revisions yet".to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    pub event: PriceEvent,
    pub reasons: Vec<EventReason>,
    pub reason_status: ReasonStatus,
    pub confidence_breakdown: Option<ConfidenceBreakdown>,
    pub explanation_text: String,
    pub revision_hint: String,
}

pub async fn get(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> HandlerResult<EventDetailResponse> {
    let event = match owned_event(&state, auth_user, event_id) {
        Ok(event) => event,
        Err(err) => return fail(&request_id, err),
    };

    let reasons = state.store.events.get_reasons(event_id);
    let reason_status = crate::models::derive_reason_status(&reasons);
    let confidence_breakdown = reasons.iter().find(|r| r.rank == 1).and_then(|r| r.confidence_breakdown.clone());
    let explanation = explanation_text(&reasons);
    let revisions = state.store.reports.revisions_for_event(event_id);
    let hint = revision_hint(&revisions);

    ok(EventDetailResponse {
        event,
        reasons,
        reason_status,
        confidence_breakdown,
        explanation_text: explanation,
        revision_hint: hint,
    })
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub reason_id: Uuid,
    pub vote: Vote,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: Feedback,
    pub overwritten: bool,
}

pub async fn feedback(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
    axum::Json(payload): axum::Json<FeedbackRequest>,
) -> HandlerResult<FeedbackResponse> {
    if let Err(err) = owned_event(&state, auth_user, event_id) {
        return fail(&request_id, err);
    }
    if let Err(err) = reason_in_event(&state, event_id, payload.reason_id) {
        return fail(&request_id, err);
    }

    let overwritten = state
        .store
        .feedback
        .for_reason(payload.reason_id)
        .into_iter()
        .any(|f| f.user_id == auth_user.0);

    let feedback = state.store.feedback.submit(Feedback {
        id: state.ids.new_id(),
        user_id: auth_user.0,
        reason_id: payload.reason_id,
        vote: payload.vote,
        created_at_utc: state.clock.now(),
    });

    ok(FeedbackResponse { feedback, overwritten })
}

#[derive(Debug, Deserialize)]
pub struct ReasonReportRequest {
    pub reason_id: Uuid,
    pub report_type: ReportType,
    pub note: Option<String>,
}

pub async fn reason_reports(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
    axum::Json(payload): axum::Json<ReasonReportRequest>,
) -> Result<(StatusCode, Json<ReasonReport>), crate::error::ApiErrorResponse> {
    if let Err(err) = owned_event(&state, auth_user, event_id) {
        return Err(crate::error::ApiErrorResponse { error: err, request_id: request_id.as_str().to_string() });
    }
    if let Err(err) = reason_in_event(&state, event_id, payload.reason_id) {
        return Err(crate::error::ApiErrorResponse { error: err, request_id: request_id.as_str().to_string() });
    }

    let result = report_state_machine::file_report(
        &state.store,
        state.clock.as_ref(),
        state.ids.as_ref(),
        auth_user.0,
        payload.reason_id,
        payload.report_type,
        payload.note,
    );
    match result {
        Ok(report) => Ok((StatusCode::CREATED, Json(report))),
        Err(err) => Err(crate::error::ApiErrorResponse { error: err, request_id: request_id.as_str().to_string() }),
    }
}

#[derive(Debug, Serialize)]
pub struct ReasonRevisionHistoryResponse {
    pub reports: Vec<ReasonReport>,
    pub transitions: Vec<ReasonStatusTransition>,
    pub revisions: Vec<ReasonRevision>,
    pub has_revision_history: bool,
    pub latest_status: Option<ReportStatus>,
}

pub async fn reason_revisions(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> HandlerResult<ReasonRevisionHistoryResponse> {
    if let Err(err) = owned_event(&state, auth_user, event_id) {
        return fail(&request_id, err);
    }

    let reasons = state.store.events.get_reasons(event_id);
    let mut reports: Vec<ReasonReport> = Vec::new();
    for reason in &reasons {
        reports.extend(state.store.reports.all_reports_for_reason(reason.id));
    }

    if reports.is_empty() {
        return fail(&request_id, ApiError::ReasonRevisionHistoryNotFound);
    }

    reports.sort_by_key(|r| r.created_at_utc);
    let mut transitions: Vec<ReasonStatusTransition> = Vec::new();
    for report in &reports {
        transitions.extend(state.store.reports.transitions_for(report.id));
    }
    transitions.sort_by_key(|t| t.transitioned_at_utc);

    let mut revisions = state.store.reports.revisions_for_event(event_id);
    revisions.sort_by_key(|r| r.revised_at_utc);

    let latest_status = reports.last().map(|r| r.status);

    ok(ReasonRevisionHistoryResponse {
        reports,
        transitions,
        has_revision_history: !revisions.is_empty(),
        revisions,
        latest_status,
    })
}

#[derive(Debug, Deserialize)]
pub struct TransitionReasonReportRequest {
    pub to_status: ReportStatus,
    /// Only meaningful when `to_status` is `resolved`: whether the reviewer
    /// confirmed the report and wants the target reason's confidence revised.
    #[serde(default)]
    pub trigger_revision: bool,
    pub revision_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransitionReasonReportResponse {
    pub report: ReasonReport,
    pub revision: Option<ReasonRevision>,
}

/// Reviewer-facing report lifecycle transition (spec.md §4.4). Resolving
/// with `trigger_revision: true` additionally reruns the reason's scoring
/// and appends a `ReasonRevision` (spec.md §4.6).
pub async fn transition_reason_report(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path((event_id, report_id)): Path<(Uuid, Uuid)>,
    axum::Json(payload): axum::Json<TransitionReasonReportRequest>,
) -> HandlerResult<TransitionReasonReportResponse> {
    if let Err(err) = owned_event(&state, auth_user, event_id) {
        return fail(&request_id, err);
    }

    let result = if payload.to_status == ReportStatus::Resolved && payload.trigger_revision {
        report_state_machine::resolve_report_with_revision(
            &state.store,
            state.clock.as_ref(),
            state.ids.as_ref(),
            event_id,
            report_id,
            payload.revision_reason.unwrap_or_else(|| "reviewer confirmed report".to_string()),
        )
        .map(|(report, revision)| TransitionReasonReportResponse { report, revision: Some(revision) })
    } else {
        report_state_machine::transition_report(&state.store, state.clock.as_ref(), state.ids.as_ref(), report_id, payload.to_status)
            .map(|report| TransitionReasonReportResponse { report, revision: None })
    };

    wrap(&request_id, result)
}

pub async fn evidence_compare_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> HandlerResult<EvidenceCompare> {
    let now = state.clock.now();
    let result = evidence_compare::build_compare(&state.store, state.ids.as_ref(), &state.config, now, auth_user.0, event_id);
    wrap(&request_id, result)
}
