use async_trait::async_trait;
use reqwest::Method;
use streamfront_core::api::{ApiError, MessageResponse};
use streamfront_core::auth::{
    AuthGateway, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RegisterRequest, ResetPasswordRequest,
};

use super::HttpApiClient;

#[async_trait]
impl AuthGateway for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.request(Method::POST, "/auth/login").json(request);
        self.send_json(builder).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        let builder = self.request(Method::POST, "/auth/register").json(request);
        self.send_message(builder).await
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/forgot-password")
            .json(request);
        self.send_message(builder).await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/reset-password")
            .json(request);
        self.send_message(builder).await
    }

    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/change-password")
            .json(request);
        self.send_message(builder).await
    }
}
