//! Authentication contract of the remote API.
//!
//! Request/response bodies for the `/auth/*` endpoints, the gateway trait the
//! session store calls through, and the typed failure surfaced to callers.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use crate::api::{ApiError, MessageResponse};
use crate::session::Role;

/// Shortest new password accepted by the change/reset flows.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// `POST /auth/login` body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email_address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email_address", &self.email_address)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /auth/login` success body.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub credential: String,
    #[serde(alias = "email")]
    pub email_address: String,
    #[serde(alias = "fullName", alias = "fulName", default)]
    pub display_name: String,
    pub role: Role,
    #[serde(alias = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_reference: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("credential", &"<redacted>")
            .field("email_address", &self.email_address)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("avatar_reference", &self.avatar_reference)
            .finish()
    }
}

/// `POST /auth/register` body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub email_address: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl RegisterRequest {
    pub fn new(
        display_name: impl Into<String>,
        email_address: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email_address: email_address.into(),
            password: password.into(),
            role: None,
            active: None,
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("display_name", &self.display_name)
            .field("email_address", &self.email_address)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

/// `POST /auth/forgot-password` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email_address: String,
}

/// `POST /auth/reset-password` body; `token` is the one-time reset token
/// from the email, not the session credential.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetPasswordRequest { .. }")
    }
}

/// `POST /auth/change-password` body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}

/// Remote authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError>;

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError>;

    /// Requires a signed-in session; the adapter attaches the credential.
    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError>;
}

/// Which authentication flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AuthOperation {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    ChangePassword,
}

impl AuthOperation {
    /// Shown when the server gave no message of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed. Please try again.",
            Self::Register => "Registration failed. Please try again.",
            Self::ForgotPassword => "Failed to send reset email. Please try again.",
            Self::ResetPassword => "Failed to reset password. Please try again.",
            Self::ChangePassword => "Failed to change password",
        }
    }
}

/// Typed failure of an authentication flow, carrying a displayable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthFailure {
    pub operation: AuthOperation,
    /// Never empty.
    pub message: String,
    #[source]
    pub cause: ApiError,
}

impl AuthFailure {
    pub fn new(operation: AuthOperation, cause: ApiError) -> Self {
        let message = cause.message_or(operation.fallback_message());
        Self {
            operation,
            message,
            cause,
        }
    }

    /// Failure raised before any request was sent.
    pub fn invalid(operation: AuthOperation, reason: impl Into<String>) -> Self {
        Self::new(operation, ApiError::InvalidRequest(reason.into()))
    }
}
