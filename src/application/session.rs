//! Session store: token lifecycle, remember-me persistence and revalidation.

use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::application::error::CmsError;
use crate::application::notify::{Notifier, Toast};
use crate::application::repos::{AuthGateway, EMAIL_KEY, SessionStorage, TOKEN_KEY};
use crate::domain::session::{Session, SessionPhase};
use crate::util::lock::{rw_read, rw_write};

const LOCK_TARGET: &str = "application::session";

/// Holds the single bearer token every CMS call reads.
///
/// Created once at start-up and shared by reference; storage and the auth
/// backend are injected so tests can substitute both.
pub struct SessionStore {
    auth: Arc<dyn AuthGateway>,
    storage: Arc<dyn SessionStorage>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<Session>,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            storage,
            notifier,
            state: RwLock::new(Session::default()),
        }
    }

    pub fn snapshot(&self) -> Session {
        rw_read(&self.state, LOCK_TARGET, "snapshot").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        rw_read(&self.state, LOCK_TARGET, "is_authenticated").is_authenticated()
    }

    pub fn is_initializing(&self) -> bool {
        rw_read(&self.state, LOCK_TARGET, "is_initializing").is_initializing()
    }

    pub fn email(&self) -> String {
        rw_read(&self.state, LOCK_TARGET, "email").email.clone()
    }

    /// Current token when authenticated.
    pub fn token(&self) -> Option<String> {
        let state = rw_read(&self.state, LOCK_TARGET, "token");
        state.is_authenticated().then(|| state.token.clone())
    }

    pub fn require_token(&self) -> Result<String, CmsError> {
        self.token().ok_or(CmsError::AuthRequired)
    }

    /// Restore a remembered session, if any, by validating it against the
    /// backend. Settles the phase exactly once; later calls return the
    /// current snapshot without touching the backend.
    ///
    /// A login or logout that lands while validation is pending wins: the
    /// outcome of the validation is then dropped, storage included.
    pub async fn initialize(&self) -> Session {
        {
            let mut state = rw_write(&self.state, LOCK_TARGET, "initialize.begin");
            if state.phase != SessionPhase::Uninitialized {
                return state.clone();
            }
            state.phase = SessionPhase::Initializing;
        }

        let Some((token, email)) = self.load_persisted() else {
            debug!("no remembered session");
            let mut state = rw_write(&self.state, LOCK_TARGET, "initialize.settle");
            if state.phase == SessionPhase::Initializing {
                *state = Session::signed_out();
            }
            return state.clone();
        };

        info!(email = %email, "found saved authentication, validating token");
        {
            let mut state = rw_write(&self.state, LOCK_TARGET, "initialize.restore");
            state.token = token.clone();
            state.email = email.clone();
        }

        let valid = self.validate_token(&token).await;

        let mut state = rw_write(&self.state, LOCK_TARGET, "initialize.settle");
        if state.phase != SessionPhase::Initializing {
            debug!(phase = ?state.phase, "session settled while validating; keeping it");
            return state.clone();
        }
        let toast = if valid {
            *state = Session::authenticated(token, email.clone());
            Toast::success(format!("Welcome back, {email}!"))
        } else {
            self.purge_persisted();
            *state = Session::signed_out();
            Toast::error("Session expired. Please login again.")
        };
        let settled = state.clone();
        drop(state);

        self.notifier.notify(toast);
        settled
    }

    /// Sign in; on success the token is held in memory and, when
    /// `remember_me` is set, persisted.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<(), CmsError> {
        let token = match self.auth.login(email, password).await {
            Ok(token) if !token.is_empty() => token,
            Ok(_) => {
                let err = CmsError::auth("backend returned an empty token");
                self.notifier.notify(Toast::error(err.to_string()));
                return Err(err);
            }
            Err(err) => {
                warn!(email, error = %err, "admin login failed");
                self.notifier.notify(Toast::error(err.to_string()));
                return Err(err);
            }
        };

        {
            // Storage changes only under the state lock, paired with the phase.
            let mut state = rw_write(&self.state, LOCK_TARGET, "login");
            if remember_me {
                self.persist(&token, email);
            }
            *state = Session::authenticated(token, email.to_string());
        }
        info!(email, remember_me, "signed in");
        self.notifier
            .notify(Toast::success("Successfully logged in as admin!"));
        Ok(())
    }

    /// Clear the in-memory and persisted session. Never fails.
    pub fn logout(&self) {
        {
            let mut state = rw_write(&self.state, LOCK_TARGET, "logout");
            self.purge_persisted();
            *state = Session::signed_out();
        }
        info!("signed out");
        self.notifier.notify(Toast::success("Successfully signed out!"));
    }

    pub async fn validate_token(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.auth.validate_token(token).await
    }

    fn load_persisted(&self) -> Option<(String, String)> {
        let read = |key: &str| match self.storage.get(key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                warn!(key, error = %err, "failed to read remembered session");
                None
            }
        };
        let token = read(TOKEN_KEY)?;
        let email = read(EMAIL_KEY)?;
        Some((token, email))
    }

    fn persist(&self, token: &str, email: &str) {
        let result = self
            .storage
            .set(TOKEN_KEY, token)
            .and_then(|()| self.storage.set(EMAIL_KEY, email));
        if let Err(err) = result {
            warn!(error = %err, "failed to remember session");
        }
    }

    fn purge_persisted(&self) {
        for key in [TOKEN_KEY, EMAIL_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, error = %err, "failed to clear remembered session");
            }
        }
    }
}
