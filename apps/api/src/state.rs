use crate::auth::SessionVerifier;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ObjectStore,
    pub sessions: SessionVerifier,
}
