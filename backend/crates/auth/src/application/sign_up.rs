//! Sign Up Use Case
//!
//! Validates the registration form and creates the account. Signing in
//! afterwards is left to the caller.

use std::sync::Arc;

use platform::rate_limit::RateLimiter;
use platform::storage::KeyValueStore;

use crate::application::config::REGISTER_NAMESPACE;
use crate::domain::entity::{credentials::Credentials, credentials::Registration, user::User};
use crate::domain::repository::AuthGateway;
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input (raw form values)
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    /// Validated credentials for the follow-up sign in
    pub credentials: Credentials,
}

/// Sign up use case
pub struct SignUpUseCase<G, L>
where
    G: AuthGateway,
    L: KeyValueStore + Sync,
{
    gateway: Arc<G>,
    limiter: Arc<RateLimiter<L>>,
}

impl<G, L> SignUpUseCase<G, L>
where
    G: AuthGateway,
    L: KeyValueStore + Sync,
{
    pub fn new(gateway: Arc<G>, limiter: Arc<RateLimiter<L>>) -> Self {
        Self { gateway, limiter }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let decision = self.limiter.try_acquire(REGISTER_NAMESPACE).await?;
        if !decision.is_allowed() {
            return Err(AuthError::RateLimited {
                action: "registration",
                retry_after_minutes: decision.retry_after_minutes(),
            });
        }

        let registration = Self::validate(input)?;

        let user = self.gateway.sign_up(&registration).await?;
        if let Err(e) = self.limiter.record_success(REGISTER_NAMESPACE).await {
            tracing::warn!(error = %e, "Failed to reset registration rate limit");
        }

        tracing::info!(user_id = %user.id, "User registered");

        Ok(SignUpOutput {
            user,
            credentials: registration.into_credentials(),
        })
    }

    fn validate(input: SignUpInput) -> AuthResult<Registration> {
        let email = Email::new(input.email).map_err(AuthError::validation)?;
        let name = DisplayName::new(&input.name).map_err(AuthError::validation)?;
        let password = UserPassword::new(input.password).map_err(AuthError::validation)?;

        if !password.matches_confirmation(&input.password_confirm) {
            return Err(AuthError::PasswordMismatch);
        }

        Ok(Registration {
            email,
            name,
            password,
        })
    }
}
