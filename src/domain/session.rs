//! Authentication session state.

use serde::Serialize;

/// Lifecycle of the session store.
///
/// `Uninitialized → Initializing → {Authenticated, Unauthenticated}`; the
/// only later transitions are login and logout/expiry between the two
/// settled phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub phase: SessionPhase,
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            token: String::new(),
            email: String::new(),
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated && !self.token.is_empty()
    }

    pub fn is_initializing(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Uninitialized | SessionPhase::Initializing
        )
    }

    pub(crate) fn authenticated(token: String, email: String) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            token,
            email,
        }
    }

    pub(crate) fn signed_out() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            token: String::new(),
            email: String::new(),
        }
    }
}
