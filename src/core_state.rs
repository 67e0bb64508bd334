//! Shared application state.
//!
//! `CoreState` is built once at startup and wrapped in `Arc` so every
//! request task shares the same model and session store. The model is
//! read-only after construction; the session store sits behind `RwLock`
//! and its guards are never held across an `.await`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::screening::{self, PredictionResult, RawAnswers, RiskModel, ValidationError};
use crate::session_store::{IssuedSession, SessionContext, SessionError, SessionStore, TokenHash};

/// Default inactivity timeout: 15 minutes.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 900;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// Process-lifetime risk model, shared read-only.
    model: Arc<dyn RiskModel>,
    /// Live user sessions.
    sessions: RwLock<SessionStore>,
    pub started_at: DateTime<Utc>,
}

impl CoreState {
    pub fn new(model: Arc<dyn RiskModel>, session_idle_timeout: Duration) -> Self {
        Self {
            model,
            sessions: RwLock::new(SessionStore::new(session_idle_timeout)),
            started_at: Utc::now(),
        }
    }

    pub fn model(&self) -> &dyn RiskModel {
        self.model.as_ref()
    }

    // ── Screening ───────────────────────────────────────────

    /// Encode, predict and map one submission. Does not touch sessions.
    pub fn assess(&self, raw: &RawAnswers) -> Result<PredictionResult, ValidationError> {
        screening::assess(self.model(), raw)
    }

    // ── Session access ──────────────────────────────────────

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionStore>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionStore>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    /// Start a session (login).
    pub fn open_session(&self, username: &str) -> Result<IssuedSession, CoreError> {
        Ok(self.write_sessions()?.open(username))
    }

    /// Resolve a bearer token, refreshing the session's activity time.
    pub fn resolve_session(&self, token: &str) -> Result<Option<SessionContext>, CoreError> {
        Ok(self.write_sessions()?.resolve(token))
    }

    pub fn record_prediction(
        &self,
        token_hash: &TokenHash,
        result: PredictionResult,
    ) -> Result<(), CoreError> {
        self.write_sessions()?
            .record_prediction(token_hash, result)
            .map_err(CoreError::from)
    }

    /// End a session (logout). Returns false if it had already ended.
    pub fn close_session(&self, token_hash: &TokenHash) -> Result<bool, CoreError> {
        Ok(self.write_sessions()?.close(token_hash))
    }

    /// Number of live sessions (idle ones may still be counted until swept).
    pub fn active_sessions(&self) -> usize {
        self.read_sessions().map(|s| s.len()).unwrap_or(0)
    }
}

// ═══════════════════════════════════════════════════════════
// Error types
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::encoder::tests::answers;
    use crate::screening::model::SmokingRuleModel;
    use crate::session_store::hash_token;

    fn state() -> CoreState {
        CoreState::new(
            Arc::new(SmokingRuleModel),
            Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        )
    }

    #[test]
    fn new_state_has_no_sessions() {
        assert_eq!(state().active_sessions(), 0);
    }

    #[test]
    fn assess_uses_shared_model() {
        let state = state();
        assert_eq!(state.assess(&answers("Yes")).unwrap().label, 1);
        assert_eq!(state.assess(&answers("No")).unwrap().label, 0);
    }

    #[test]
    fn session_lifecycle() {
        let state = state();
        let issued = state.open_session("alice").unwrap();
        assert_eq!(state.active_sessions(), 1);

        let ctx = state.resolve_session(&issued.token).unwrap().unwrap();
        let result = state.assess(&answers("Yes")).unwrap();
        state.record_prediction(&ctx.token_hash, result).unwrap();

        let ctx = state.resolve_session(&issued.token).unwrap().unwrap();
        assert_eq!(ctx.last_prediction.unwrap().label, 1);

        assert!(state.close_session(&ctx.token_hash).unwrap());
        assert!(state.resolve_session(&issued.token).unwrap().is_none());
        assert_eq!(state.active_sessions(), 0);
    }

    #[test]
    fn record_on_closed_session_fails() {
        let state = state();
        let result = state.assess(&answers("No")).unwrap();
        let err = state
            .record_prediction(&hash_token("gone"), result)
            .unwrap_err();
        assert!(matches!(err, CoreError::Session(SessionError::UnknownSession)));
    }
}
