//! Shared application state, composed the way the teacher's `AppState`
//! bundles storage, broadcast channels, and service handles behind one
//! `Clone` struct passed to every router.

use std::sync::Arc;

use crate::auth::JwtHandler;
use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::config::Config;
use crate::detector::Detector;
use crate::ids::IdGen;
use crate::reason_engine::{EventQueue, ReasonEngine};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGen>,
    pub config: Arc<Config>,
    pub jwt_handler: Arc<JwtHandler>,
    pub detector: Arc<Detector>,
    pub reason_engine: Arc<ReasonEngine>,
    pub event_queue: EventQueue,
    pub catalog: Catalog,
}
