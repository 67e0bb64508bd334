//! Per-user screening sessions.
//!
//! Replaces a process-wide session dict with explicit per-session state.
//! Lifecycle: created on login, touched on every authenticated request,
//! dropped on logout or after the idle timeout.
//!
//! Key properties:
//! - Bearer tokens are never stored; only their SHA-256 hash is kept
//! - Sessions exist only in memory and die with the process
//! - Each session holds at most one prediction, replaced on the next one

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::screening::PredictionResult;

/// Session count above which `open` sweeps idle sessions first.
const SWEEP_THRESHOLD: usize = 1000;

/// SHA-256 of a bearer token.
pub type TokenHash = [u8; 32];

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> TokenHash {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ═══════════════════════════════════════════════════════════
// Session: one logged-in user
// ═══════════════════════════════════════════════════════════

struct Session {
    id: Uuid,
    username: String,
    created_at: DateTime<Utc>,
    last_activity: Instant,
    last_prediction: Option<PredictionResult>,
}

impl Session {
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.duration_since(self.last_activity) > timeout
    }

    fn snapshot(&self, token_hash: TokenHash) -> SessionContext {
        SessionContext {
            session_id: self.id,
            username: self.username.clone(),
            token_hash,
            created_at: self.created_at,
            last_prediction: self.last_prediction.clone(),
        }
    }
}

/// Session view handed to request handlers by the auth middleware.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub username: String,
    pub token_hash: TokenHash,
    pub created_at: DateTime<Utc>,
    pub last_prediction: Option<PredictionResult>,
}

/// Returned once at login; the token is not recoverable afterwards.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: Uuid,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found or expired")]
    UnknownSession,
}

// ═══════════════════════════════════════════════════════════
// SessionStore: all live sessions
// ═══════════════════════════════════════════════════════════

pub struct SessionStore {
    sessions: HashMap<TokenHash, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }

    /// Start a session for `username` and issue its bearer token.
    pub fn open(&mut self, username: &str) -> IssuedSession {
        if self.sessions.len() > SWEEP_THRESHOLD {
            self.sweep_idle();
        }

        let token = generate_token();
        let session_id = Uuid::new_v4();
        self.sessions.insert(
            hash_token(&token),
            Session {
                id: session_id,
                username: username.to_string(),
                created_at: Utc::now(),
                last_activity: Instant::now(),
                last_prediction: None,
            },
        );
        tracing::info!(%session_id, username, "Session opened");
        IssuedSession { session_id, token }
    }

    /// Look up a session by bearer token and mark it active.
    /// Idle sessions are dropped and reported as absent.
    pub fn resolve(&mut self, token: &str) -> Option<SessionContext> {
        let hash = hash_token(token);
        let now = Instant::now();

        let idle = self.sessions.get(&hash)?.is_idle(now, self.idle_timeout);
        if idle {
            if let Some(expired) = self.sessions.remove(&hash) {
                tracing::info!(session_id = %expired.id, "Session expired after inactivity");
            }
            return None;
        }

        let session = self.sessions.get_mut(&hash)?;
        session.last_activity = now;
        Some(session.snapshot(hash))
    }

    /// Store the latest prediction, replacing any earlier one.
    pub fn record_prediction(
        &mut self,
        token_hash: &TokenHash,
        result: PredictionResult,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(token_hash)
            .ok_or(SessionError::UnknownSession)?;
        session.last_prediction = Some(result);
        session.last_activity = Instant::now();
        Ok(())
    }

    pub fn last_prediction(&self, token_hash: &TokenHash) -> Option<&PredictionResult> {
        self.sessions
            .get(token_hash)
            .and_then(|s| s.last_prediction.as_ref())
    }

    /// End a session. Returns false if it was already gone.
    pub fn close(&mut self, token_hash: &TokenHash) -> bool {
        match self.sessions.remove(token_hash) {
            Some(session) => {
                tracing::info!(session_id = %session.id, "Session closed");
                true
            }
            None => false,
        }
    }

    /// Drop every idle session. Returns how many were removed.
    pub fn sweep_idle(&mut self) -> usize {
        let now = Instant::now();
        let timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_idle(now, timeout));
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Swept idle sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::RiskLabel;

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(900))
    }

    #[test]
    fn hash_is_stable_and_distinct() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    #[test]
    fn generated_tokens_are_unique_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn open_then_resolve() {
        let mut store = store();
        let issued = store.open("alice");
        let ctx = store.resolve(&issued.token).unwrap();
        assert_eq!(ctx.username, "alice");
        assert_eq!(ctx.session_id, issued.session_id);
        assert!(ctx.last_prediction.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let mut store = store();
        store.open("alice");
        assert!(store.resolve("not-a-token").is_none());
    }

    #[test]
    fn sessions_are_isolated() {
        let mut store = store();
        let alice = store.open("alice");
        let bob = store.open("bob");

        let alice_hash = hash_token(&alice.token);
        store
            .record_prediction(&alice_hash, PredictionResult::new(RiskLabel::HighRisk))
            .unwrap();

        assert!(store.resolve(&alice.token).unwrap().last_prediction.is_some());
        assert!(store.resolve(&bob.token).unwrap().last_prediction.is_none());
    }

    #[test]
    fn prediction_is_replaced() {
        let mut store = store();
        let issued = store.open("alice");
        let hash = hash_token(&issued.token);
        store
            .record_prediction(&hash, PredictionResult::new(RiskLabel::HighRisk))
            .unwrap();
        store
            .record_prediction(&hash, PredictionResult::new(RiskLabel::NoRisk))
            .unwrap();
        assert_eq!(store.last_prediction(&hash).unwrap().label, 0);
    }

    #[test]
    fn close_forgets_session() {
        let mut store = store();
        let issued = store.open("alice");
        let hash = hash_token(&issued.token);
        assert!(store.close(&hash));
        assert!(!store.close(&hash));
        assert!(store.resolve(&issued.token).is_none());
        assert!(matches!(
            store.record_prediction(&hash, PredictionResult::new(RiskLabel::NoRisk)),
            Err(SessionError::UnknownSession)
        ));
    }

    #[test]
    fn idle_sessions_expire() {
        let mut store = SessionStore::new(Duration::from_millis(1));
        let issued = store.open("alice");
        std::thread::sleep(Duration::from_millis(10));
        assert!(store.resolve(&issued.token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_removes_only_idle() {
        let mut store = SessionStore::new(Duration::from_millis(50));
        store.open("old");
        std::thread::sleep(Duration::from_millis(80));
        let fresh = store.open("fresh");

        assert_eq!(store.sweep_idle(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.resolve(&fresh.token).is_some());
    }
}
