//! The in-memory transactional repository (spec.md §9 design note: "a
//! collection of per-aggregate owners, actor-like"). Each table is its own
//! type wrapping a `parking_lot::RwLock<HashMap<...>>`, mirroring the
//! teacher's one-owner-type-per-concern shape (`DbSignalStorage`) but
//! swapping the backing engine for in-process locks per the spec's explicit
//! "in-memory" requirement. Every write method enforces the aggregate's own
//! invariants and returns `StoreError` on violation; nothing here talks to
//! axum or knows about HTTP status codes.

mod briefs;
mod compare;
mod events;
mod feedback;
mod notifications;
mod reports;
mod thresholds;
mod users;
mod watchlist;

pub use briefs::BriefTable;
pub use compare::CompareTable;
pub use events::EventTable;
pub use feedback::FeedbackTable;
pub use notifications::NotificationTable;
pub use reports::ReportTable;
pub use thresholds::ThresholdTable;
pub use users::UserTable;
pub use watchlist::WatchlistTable;

/// Failure modes every aggregate table can produce. `error.rs` maps each
/// variant onto the external `ApiError` taxonomy.
#[derive(Debug, Clone)]
pub enum StoreError {
    NotFound(&'static str),
    Conflict(String),
    InvalidInput(String),
    Backpressure,
}

/// Composition root: one handle per aggregate, cheap to clone (each table is
/// internally `Arc`-backed). Built once in `http::state::AppState`.
#[derive(Clone, Default)]
pub struct Store {
    pub users: UserTable,
    pub watchlist: WatchlistTable,
    pub thresholds: ThresholdTable,
    pub events: EventTable,
    pub feedback: FeedbackTable,
    pub reports: ReportTable,
    pub notifications: NotificationTable,
    pub briefs: BriefTable,
    pub compares: CompareTable,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
