//! Shared types for the API layer.

use std::sync::Arc;
use std::time::Duration;

use crate::core_state::CoreState;

pub use crate::session_store::SessionContext;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    /// Cosmetic pause after a successful login.
    pub login_delay: Duration,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            login_delay: Duration::ZERO,
        }
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }
}
