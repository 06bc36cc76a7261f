//! Auth Context
//!
//! Stateful facade the UI layer talks to. Holds the current session, a
//! loading flag and the last error message; every operation reports its
//! failure both as a return value and through [`AuthContext::error`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::rate_limit::RateLimiter;
use platform::storage::KeyValueStore;

use crate::application::check_session::{
    CheckSessionUseCase, RefreshSessionUseCase, RestoredSession,
};
use crate::application::config::AuthConfig;
use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthGateway, SessionRepository};
use crate::error::{AuthError, AuthResult};

/// Auth state machine
pub struct AuthContext<G, S, K>
where
    G: AuthGateway,
    S: SessionRepository,
    K: KeyValueStore + Send + Sync,
{
    sign_in: SignInUseCase<G, S, Arc<K>>,
    sign_up: SignUpUseCase<G, Arc<K>>,
    sign_out: SignOutUseCase<G, S>,
    check_session: CheckSessionUseCase<G, S>,
    refresh_session: RefreshSessionUseCase<G, S>,
    session: Option<AuthSession>,
    is_loading: bool,
    error: Option<String>,
}

impl<G, S, K> AuthContext<G, S, K>
where
    G: AuthGateway,
    S: SessionRepository,
    K: KeyValueStore + Send + Sync,
{
    /// Rate-limit counters are kept in `store`
    pub fn new(gateway: Arc<G>, session_repo: Arc<S>, store: Arc<K>, config: &AuthConfig) -> Self {
        let login_limiter = Arc::new(RateLimiter::new(
            Arc::clone(&store),
            config.login_rate_limit.clone(),
        ));
        let register_limiter = Arc::new(RateLimiter::new(
            store,
            config.register_rate_limit.clone(),
        ));

        Self {
            sign_in: SignInUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&session_repo),
                login_limiter,
            ),
            sign_up: SignUpUseCase::new(Arc::clone(&gateway), register_limiter),
            sign_out: SignOutUseCase::new(Arc::clone(&gateway), Arc::clone(&session_repo)),
            check_session: CheckSessionUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&session_repo),
            ),
            refresh_session: RefreshSessionUseCase::new(gateway, session_repo),
            session: None,
            is_loading: false,
            error: None,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Restore the stored session; runs once at startup
    ///
    /// Never fails. A session that cannot be restored leaves the context
    /// signed out, with an error only when a refresh was attempted.
    pub async fn initialize(&mut self) {
        self.is_loading = true;

        match self.check_session.execute().await {
            Ok(RestoredSession::Anonymous) => self.session = None,
            Ok(RestoredSession::Resumed(session)) => self.session = Some(session),
            Ok(RestoredSession::NeedsRefresh(session)) => {
                self.session = Some(session);
                // Failure is recorded in `error` and forces a sign out
                let _ = self.refresh().await;
            }
            Err(e) => {
                e.log();
                self.session = None;
            }
        }

        self.is_loading = false;
    }

    pub async fn login(&mut self, email: &str, password: String) -> AuthResult<User> {
        self.begin();
        let result = self
            .sign_in
            .execute(SignInInput {
                email: email.to_string(),
                password,
            })
            .await;
        self.finish_with_session(result)
    }

    /// Create an account and sign in with it
    pub async fn register(
        &mut self,
        email: &str,
        password: String,
        password_confirm: String,
        name: &str,
    ) -> AuthResult<User> {
        self.begin();
        let result = match self
            .sign_up
            .execute(SignUpInput {
                email: email.to_string(),
                password,
                password_confirm,
                name: name.to_string(),
            })
            .await
        {
            Ok(output) => self.sign_in.authenticate(&output.credentials).await,
            Err(e) => Err(e),
        };
        self.finish_with_session(result)
    }

    pub async fn logout(&mut self) {
        self.sign_out.execute().await;
        self.session = None;
        self.error = None;
        self.is_loading = false;
    }

    /// Exchange the current token for a fresh one
    ///
    /// Any failure signs the user out and sets the session-expired error.
    pub async fn refresh(&mut self) -> AuthResult<User> {
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            return Err(AuthError::NotAuthenticated);
        };

        match self.refresh_session.execute(&token).await {
            Ok(session) => self.finish_with_session(Ok(session)),
            Err(e) => {
                e.log();
                self.logout().await;
                let expired = AuthError::SessionExpired;
                self.error = Some(expired.user_message());
                Err(expired)
            }
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// A cached user and an unexpired token
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.user.is_some() && s.is_valid_at(now))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish_with_session(&mut self, result: AuthResult<AuthSession>) -> AuthResult<User> {
        self.is_loading = false;

        let outcome = result.and_then(|session| {
            let user = session.user.clone().ok_or(AuthError::SessionExpired)?;
            self.session = Some(session);
            Ok(user)
        });

        if let Err(e) = &outcome {
            e.log();
            self.error = Some(e.user_message());
        }
        outcome
    }
}
