//! Session store: the single source of truth for who is signed in.
//!
//! The store owns the process-wide [`SessionSnapshot`], keeps it in step with
//! persisted storage, and publishes every change on a `watch` channel. Nothing
//! else reads or writes the `token` / `user` storage entries.
//!
//! # Lifecycle
//!
//! ```text
//! new() ── Unresolved, empty
//!   │
//!   ▼ initialize()            (exactly once)
//! Resolved, empty | Resolved, session
//!   │           ▲
//!   │ login()   │ logout()
//!   ▼           │
//! Resolved, session ── update_identity() ──┐
//!               ▲                          │
//!               └──────────────────────────┘
//! ```
//!
//! Every mutation replaces the whole snapshot, so subscribers never observe a
//! credential without an identity or the reverse.

use std::sync::Arc;

use streamfront_core::api::ApiError;
use streamfront_core::auth::{
    AuthFailure, AuthGateway, AuthOperation, ChangePasswordRequest, ForgotPasswordRequest,
    LoginRequest, MIN_PASSWORD_LENGTH, RegisterRequest, ResetPasswordRequest,
};
use streamfront_core::error::{Result, StreamfrontError};
use streamfront_core::session::{
    AuthSession, Credential, Identity, PersistedIdentity, Resolution, SessionSnapshot, TOKEN_KEY,
    USER_KEY,
};
use streamfront_core::storage::KeyValueStore;
use tokio::sync::{Mutex, watch};

/// Explicitly constructed, injectable owner of the session.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthGateway>,
    state: watch::Sender<SessionSnapshot>,
    /// Serializes mutations so storage writes and published snapshots stay in
    /// the same order.
    write_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, auth: Arc<dyn AuthGateway>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::unresolved());
        Self::with_sender(state, storage, auth)
    }

    /// Builds the store around an existing channel.
    ///
    /// Used when a collaborator (typically the HTTP client reading the bearer
    /// credential) must hold a receiver before the store exists. The channel
    /// is reset to the unresolved snapshot.
    pub fn with_sender(
        state: watch::Sender<SessionSnapshot>,
        storage: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        state.send_replace(SessionSnapshot::unresolved());
        Self {
            storage,
            auth,
            state,
            write_lock: Mutex::new(()),
        }
    }

    // ============================================================================
    // Read side
    // ============================================================================

    /// Receiver that yields every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn resolution(&self) -> Resolution {
        self.state.borrow().resolution
    }

    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().credential().cloned()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// False without a session; never fails.
    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Restores the persisted session, once.
    ///
    /// Missing, partial or unparseable entries are discarded and the session
    /// starts empty. Storage failures are logged, never returned. Later calls
    /// return the current snapshot untouched.
    pub async fn initialize(&self) -> SessionSnapshot {
        let _guard = self.write_lock.lock().await;
        if self.state.borrow().is_resolved() {
            tracing::debug!("[SessionStore] Already initialized");
            return self.snapshot();
        }

        let session = self.load_persisted().await;
        match &session {
            Some(s) => tracing::info!(
                "[SessionStore] Restored session for {}",
                s.identity.email_address
            ),
            None => tracing::debug!("[SessionStore] No persisted session"),
        }

        let snapshot = SessionSnapshot::resolved(session);
        self.state.send_replace(snapshot.clone());
        snapshot
    }

    async fn load_persisted(&self) -> Option<AuthSession> {
        let token = self.read_entry(TOKEN_KEY).await;
        let user = self.read_entry(USER_KEY).await;

        let session = match (token, user) {
            (None, None) => return None,
            (Some(token), Some(user)) => {
                let credential = Credential::new(token);
                if credential.is_blank() {
                    tracing::warn!("[SessionStore] Persisted credential is blank, discarding");
                    None
                } else {
                    match PersistedIdentity::decode(&user) {
                        Ok(identity) => Some(AuthSession {
                            credential,
                            identity,
                        }),
                        Err(e) => {
                            tracing::warn!(
                                "[SessionStore] Persisted identity is unreadable, discarding: {}",
                                e
                            );
                            None
                        }
                    }
                }
            }
            (token, _) => {
                tracing::warn!(
                    "[SessionStore] Partial persisted session (missing {}), discarding",
                    if token.is_some() { USER_KEY } else { TOKEN_KEY }
                );
                None
            }
        };

        if session.is_none() {
            self.clear_persisted().await;
        }
        session
    }

    async fn read_entry(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to read '{}': {}", key, e);
                None
            }
        }
    }

    async fn clear_persisted(&self) {
        if let Err(e) = self.storage.remove_many(&[TOKEN_KEY, USER_KEY]).await {
            tracing::warn!("[SessionStore] Failed to clear persisted session: {}", e);
        }
    }

    /// Signs in, persists the session, then publishes it.
    ///
    /// On failure (including a storage write that does not go through) the
    /// session is left exactly as it was and the returned failure always
    /// carries a non-empty message.
    pub async fn login(
        &self,
        email_address: &str,
        password: &str,
    ) -> std::result::Result<Identity, AuthFailure> {
        let email_address = email_address.trim();
        if email_address.is_empty() || password.is_empty() {
            return Err(AuthFailure::invalid(
                AuthOperation::Login,
                "Email and password are required",
            ));
        }

        tracing::debug!("[SessionStore] Logging in {}", email_address);
        let response = self
            .auth
            .login(&LoginRequest::new(email_address, password))
            .await
            .map_err(|e| {
                tracing::warn!("[SessionStore] Login failed: {}", e);
                AuthFailure::new(AuthOperation::Login, e)
            })?;

        let credential = Credential::new(response.credential);
        if credential.is_blank() {
            return Err(AuthFailure::new(
                AuthOperation::Login,
                ApiError::Decode("login response carried no credential".to_string()),
            ));
        }
        let identity = Identity::from_login(
            response.email_address,
            response.display_name,
            response.role,
            response.avatar_reference,
        );

        let _guard = self.write_lock.lock().await;
        self.persist_session(&credential, &identity)
            .await
            .map_err(|e| {
                tracing::error!("[SessionStore] Failed to persist session: {}", e);
                AuthFailure::new(AuthOperation::Login, ApiError::Persistence(e.to_string()))
            })?;

        let resolution = self.resolution();
        self.state.send_replace(SessionSnapshot {
            resolution,
            session: Some(AuthSession {
                credential,
                identity: identity.clone(),
            }),
        });
        tracing::info!(
            "[SessionStore] Signed in as {} ({})",
            identity.email_address,
            identity.role
        );
        Ok(identity)
    }

    /// Writes both entries in one batch.
    async fn persist_session(&self, credential: &Credential, identity: &Identity) -> Result<()> {
        let encoded = PersistedIdentity::encode(identity)?;
        self.storage
            .set_many(&[(TOKEN_KEY, credential.as_str()), (USER_KEY, encoded.as_str())])
            .await
    }

    /// Creates an account. Does not sign in.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> std::result::Result<String, AuthFailure> {
        if request.display_name.trim().is_empty()
            || request.email_address.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AuthFailure::invalid(
                AuthOperation::Register,
                "Name, email and password are required",
            ));
        }

        let response = self.auth.register(request).await.map_err(|e| {
            tracing::warn!("[SessionStore] Registration failed: {}", e);
            AuthFailure::new(AuthOperation::Register, e)
        })?;
        tracing::info!(
            "[SessionStore] Registered {}",
            request.email_address.trim()
        );
        Ok(response.message)
    }

    /// Clears storage and the session. Local only; never fails.
    pub async fn logout(&self) {
        let _guard = self.write_lock.lock().await;
        self.clear_persisted().await;

        let resolution = self.resolution();
        self.state.send_replace(SessionSnapshot {
            resolution,
            session: None,
        });
        tracing::info!("[SessionStore] Signed out");
    }

    /// Edits the cached identity, persists it and publishes the result.
    pub async fn update_identity<F>(&self, edit: F) -> Result<Identity>
    where
        F: FnOnce(&mut Identity),
    {
        let _guard = self.write_lock.lock().await;
        let current = self.snapshot();
        let Some(mut session) = current.session else {
            return Err(StreamfrontError::NoSession);
        };

        edit(&mut session.identity);
        self.storage
            .set(USER_KEY, &PersistedIdentity::encode(&session.identity)?)
            .await?;

        let identity = session.identity.clone();
        self.state.send_replace(SessionSnapshot {
            resolution: current.resolution,
            session: Some(session),
        });
        tracing::debug!("[SessionStore] Identity updated");
        Ok(identity)
    }

    /// Passes a remote outcome through, signing out when the server has
    /// rejected the credential.
    pub async fn settle<T>(&self, outcome: std::result::Result<T, ApiError>) -> Result<T> {
        match outcome {
            Ok(value) => Ok(value),
            Err(err) => {
                if err.is_unauthorized() && self.is_authenticated() {
                    tracing::warn!("[SessionStore] Credential rejected, signing out");
                    self.logout().await;
                }
                Err(err.into())
            }
        }
    }

    // ============================================================================
    // Password flows (no session change)
    // ============================================================================

    pub async fn forgot_password(
        &self,
        email_address: &str,
    ) -> std::result::Result<String, AuthFailure> {
        let email_address = email_address.trim();
        if email_address.is_empty() {
            return Err(AuthFailure::invalid(
                AuthOperation::ForgotPassword,
                "Email is required",
            ));
        }
        let request = ForgotPasswordRequest {
            email_address: email_address.to_string(),
        };
        self.auth
            .forgot_password(&request)
            .await
            .map(|r| r.message)
            .map_err(|e| AuthFailure::new(AuthOperation::ForgotPassword, e))
    }

    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> std::result::Result<String, AuthFailure> {
        check_new_password(AuthOperation::ResetPassword, new_password)?;
        let request = ResetPasswordRequest {
            token: reset_token.trim().to_string(),
            new_password: new_password.to_string(),
        };
        self.auth
            .reset_password(&request)
            .await
            .map(|r| r.message)
            .map_err(|e| AuthFailure::new(AuthOperation::ResetPassword, e))
    }

    /// Needs a session; the gateway attaches the credential.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> std::result::Result<String, AuthFailure> {
        if !self.is_authenticated() {
            return Err(AuthFailure::new(
                AuthOperation::ChangePassword,
                ApiError::Unauthorized { message: None },
            ));
        }
        check_new_password(AuthOperation::ChangePassword, new_password)?;
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.auth
            .change_password(&request)
            .await
            .map(|r| r.message)
            .map_err(|e| AuthFailure::new(AuthOperation::ChangePassword, e))
    }
}

fn check_new_password(
    operation: AuthOperation,
    new_password: &str,
) -> std::result::Result<(), AuthFailure> {
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthFailure::invalid(
            operation,
            format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}
