use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use changesim::session::{GameCode, GameSession, SessionStore, SessionStoreError};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store. Sessions live as long as the server does,
/// which matches the facilitated-workshop deployment model.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<GameCode, GameSession>>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: GameSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.code) {
            return Err(SessionStoreError::Duplicate(session.code));
        }
        guard.insert(session.code.clone(), session);
        Ok(())
    }

    fn update(&self, session: GameSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session.code.clone(), session);
        Ok(())
    }

    fn fetch(&self, code: &GameCode) -> Result<Option<GameSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(code).cloned())
    }
}
