use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::Form;
use streamfront_core::admin::{
    AdminGateway, ManagedUser, SuspendUserRequest, UserId, VideoEdit, VideoUpload,
};
use streamfront_core::api::{ApiError, MessageResponse};
use streamfront_core::catalog::{Video, VideoId};
use streamfront_core::session::Role;

use super::HttpApiClient;
use super::multipart::{file_part, json_part};

#[async_trait]
impl AdminGateway for HttpApiClient {
    async fn list_users(&self) -> Result<Vec<ManagedUser>, ApiError> {
        self.send_json(self.request(Method::GET, "/admin/users"))
            .await
    }

    async fn get_user(&self, user_id: UserId) -> Result<ManagedUser, ApiError> {
        let path = format!("/admin/users/{}", user_id);
        self.send_json(self.request(Method::GET, &path)).await
    }

    async fn suspend_user(
        &self,
        request: &SuspendUserRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = self
            .request(Method::PUT, "/admin/users/suspend")
            .json(request);
        self.send_message(builder).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<MessageResponse, ApiError> {
        let path = format!("/admin/users/{}", user_id);
        self.send_message(self.request(Method::DELETE, &path)).await
    }

    async fn update_user_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/admin/users/{}/role", user_id);
        let builder = self
            .request(Method::PUT, &path)
            .query(&[("role", role.to_string())]);
        self.send_message(builder).await
    }

    async fn upload_video(&self, upload: &VideoUpload) -> Result<Video, ApiError> {
        let form = Form::new()
            .part("data", json_part(&upload.request)?)
            .part("video", file_part(&upload.video)?)
            .part("poster", file_part(&upload.poster)?);
        tracing::info!(
            "[HttpApiClient] Uploading '{}' ({} + {} bytes)",
            upload.request.title,
            upload.video.len(),
            upload.poster.len()
        );
        let builder = self
            .upload_request(Method::POST, "/videos/upload")
            .multipart(form);
        self.send_json(builder).await
    }

    async fn update_video(&self, video_id: VideoId, edit: &VideoEdit) -> Result<Video, ApiError> {
        let mut form = Form::new().part("data", json_part(edit)?);
        if let Some(poster) = &edit.poster {
            form = form.part("poster", file_part(poster)?);
        }
        let path = format!("/videos/{}", video_id);
        let builder = self.upload_request(Method::PUT, &path).multipart(form);
        self.send_json(builder).await
    }

    async fn delete_video(&self, video_id: VideoId) -> Result<(), ApiError> {
        let path = format!("/videos/{}", video_id);
        self.send_unit(self.request(Method::DELETE, &path)).await
    }
}
