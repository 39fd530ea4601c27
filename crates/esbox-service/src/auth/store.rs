//! Signed-in user, login/logout, and account recovery flows.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use esbox_cache::ListingCache;
use esbox_client::{RemoteApi, TokenStore};
use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_entity::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
    VerifyEmailRequest, validate_form,
};

use crate::notification::NotificationCenter;

/// Minimum password length accepted by the reset form.
const MIN_PASSWORD_LEN: usize = 8;

/// Holds the current user and drives every authentication call.
#[derive(Debug, Clone)]
pub struct AuthStore {
    api: Arc<dyn RemoteApi>,
    tokens: TokenStore,
    cache: ListingCache,
    notifications: NotificationCenter,
    user: Arc<RwLock<Option<User>>>,
}

impl AuthStore {
    /// Creates a new auth store.
    pub fn new(
        api: Arc<dyn RemoteApi>,
        tokens: TokenStore,
        cache: ListingCache,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            api,
            tokens,
            cache,
            notifications,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// The signed-in user, if any.
    pub async fn user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// Whether a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    /// Load the current user from the backend.
    ///
    /// Any failure (no token, expired session, unreachable server) leaves
    /// the store anonymous rather than returning an error.
    pub async fn hydrate(&self) -> Option<User> {
        if self.tokens.get().await.is_none() {
            *self.user.write().await = None;
            return None;
        }
        let user = match self.api.current_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e.message, "Session could not be restored");
                None
            }
        };
        *self.user.write().await = user.clone();
        user
    }

    /// Sign in, persist the token, and load the user.
    #[instrument(skip_all, fields(email = %req.email))]
    pub async fn login(&self, req: &LoginRequest) -> AppResult<User> {
        validate_form(req)?;
        let resp = self.api.login(req).await?;
        self.tokens.set(resp.token).await?;

        let user = self.api.current_user().await?;
        *self.user.write().await = Some(user.clone());
        info!(user_id = %user.id, "Signed in");
        self.notifications.success(if resp.message.trim().is_empty() {
            format!("Welcome, {}", user.username)
        } else {
            resp.message
        });
        Ok(user)
    }

    /// Create an account.
    pub async fn register(&self, req: &RegisterRequest) -> AppResult<String> {
        validate_form(req)?;
        let resp = self.api.register(req).await?;
        Ok(resp.or("Account created. Check your email to verify it."))
    }

    /// Sign out.
    ///
    /// The token and every cached listing are dropped even when the backend
    /// call fails.
    pub async fn logout(&self) -> AppResult<()> {
        let remote = self.api.logout().await;
        if let Err(e) = &remote {
            warn!(error = %e.message, "Logout call failed; clearing local session anyway");
        }

        self.tokens.clear().await?;
        self.cache.clear();
        *self.user.write().await = None;
        self.notifications.info("Signed out");
        info!("Signed out");
        Ok(())
    }

    /// Request a password reset email.
    pub async fn forgot_password(&self, email: &str) -> AppResult<String> {
        let req = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        validate_form(&req)?;
        let resp = self.api.forgot_password(&req).await?;
        Ok(resp.or("If the address is registered, a reset link is on its way."))
    }

    /// Set a new password with the token from a reset link.
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirm: &str,
    ) -> AppResult<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("Reset link is missing its token"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if password != confirm {
            return Err(AppError::validation("Passwords do not match"));
        }

        let req = ResetPasswordRequest {
            token: token.to_string(),
            new_password: password.to_string(),
        };
        let resp = self.api.reset_password(&req).await?;
        Ok(resp.or("Password updated. You can now sign in."))
    }

    /// Confirm an email address.
    pub async fn verify_email(&self, token: &str) -> AppResult<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("Verification link is missing its token"));
        }
        let req = VerifyEmailRequest {
            token: token.to_string(),
        };
        let resp = self.api.verify_email(&req).await?;
        Ok(resp.or("Email verified"))
    }
}
