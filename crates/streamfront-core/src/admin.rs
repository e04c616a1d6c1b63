//! Administrative user and video management (ADMIN role only).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, MediaFile, MessageResponse};
use crate::catalog::{Video, VideoId};
use crate::error::StreamfrontError;
use crate::session::Role;

pub type UserId = i64;

/// One row of `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    pub id: UserId,
    #[serde(alias = "email")]
    pub email_address: String,
    #[serde(alias = "fullName")]
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub favorite_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `PUT /admin/users/suspend` body. `active = false` suspends, `true` restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspendUserRequest {
    pub user_id: UserId,
    pub active: bool,
    pub reason: String,
}

/// The server refuses longer descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 4000;

/// Metadata part (`data`) of a video upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    /// Minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Content rating such as `PG-13`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    pub published: bool,
}

impl VideoRequest {
    pub fn validate(&self) -> Result<(), StreamfrontError> {
        validate_text(&self.title, &self.description)?;
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(StreamfrontError::validation(
                "At least one category must be selected",
            ));
        }
        Ok(())
    }
}

fn validate_text(title: &str, description: &str) -> Result<(), StreamfrontError> {
    if title.trim().is_empty() {
        return Err(StreamfrontError::validation("Title is required"));
    }
    if description.trim().is_empty() {
        return Err(StreamfrontError::validation("Description is required"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(StreamfrontError::validation(format!(
            "Description cannot be more than {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// `POST /videos/upload`: metadata plus the video and poster files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub request: VideoRequest,
    pub video: MediaFile,
    pub poster: MediaFile,
}

impl VideoUpload {
    pub fn validate(&self) -> Result<(), StreamfrontError> {
        self.request.validate()?;
        if self.video.is_empty() {
            return Err(StreamfrontError::validation("Video file is required"));
        }
        if self.poster.is_empty() {
            return Err(StreamfrontError::validation("Poster image is required"));
        }
        Ok(())
    }
}

/// `PUT /videos/{id}`: new title and description, optionally a new poster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoEdit {
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub poster: Option<MediaFile>,
}

impl VideoEdit {
    pub fn validate(&self) -> Result<(), StreamfrontError> {
        validate_text(&self.title, &self.description)?;
        if self.poster.as_ref().is_some_and(MediaFile::is_empty) {
            return Err(StreamfrontError::validation("Poster image is empty"));
        }
        Ok(())
    }
}

#[async_trait]
pub trait AdminGateway: Send + Sync {
    async fn list_users(&self) -> Result<Vec<ManagedUser>, ApiError>;

    async fn get_user(&self, user_id: UserId) -> Result<ManagedUser, ApiError>;

    async fn suspend_user(&self, request: &SuspendUserRequest)
    -> Result<MessageResponse, ApiError>;

    async fn delete_user(&self, user_id: UserId) -> Result<MessageResponse, ApiError>;

    async fn update_user_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<MessageResponse, ApiError>;

    async fn upload_video(&self, upload: &VideoUpload) -> Result<Video, ApiError>;

    async fn update_video(&self, video_id: VideoId, edit: &VideoEdit) -> Result<Video, ApiError>;

    async fn delete_video(&self, video_id: VideoId) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> VideoRequest {
        VideoRequest {
            title: "Night Shift".to_string(),
            description: "A long night.".to_string(),
            categories: vec!["Drama".to_string()],
            duration: Some(95),
            year: Some(2024),
            rating: Some("PG".to_string()),
            published: false,
        }
    }

    #[test]
    fn test_video_request_serializes_server_names() {
        let body = serde_json::to_value(request()).unwrap();
        assert_eq!(body["title"], "Night Shift");
        assert_eq!(body["categories"][0], "Drama");
        assert_eq!(body["published"], false);

        let mut bare = request();
        bare.rating = None;
        let body = serde_json::to_value(bare).unwrap();
        assert!(body.get("rating").is_none());
    }

    #[test]
    fn test_video_request_validation() {
        assert!(request().validate().is_ok());

        let mut no_categories = request();
        no_categories.categories = vec!["  ".to_string()];
        assert_eq!(
            no_categories.validate().unwrap_err().user_message(""),
            "At least one category must be selected"
        );

        let mut long = request();
        long.description = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert!(long.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_upload_needs_both_files() {
        let upload = VideoUpload {
            request: request(),
            video: MediaFile::new("movie.mp4", Vec::new()),
            poster: MediaFile::new("poster.jpg", vec![1]),
        };
        let err = upload.validate().unwrap_err();
        assert_eq!(err.user_message(""), "Video file is required");
    }

    #[test]
    fn test_edit_sends_only_text_fields() {
        let edit = VideoEdit {
            title: "T".to_string(),
            description: "D".to_string(),
            poster: Some(MediaFile::new("p.png", vec![1, 2])),
        };
        assert!(edit.validate().is_ok());
        let body = serde_json::to_value(&edit).unwrap();
        assert_eq!(body, serde_json::json!({"title": "T", "description": "D"}));
    }
}
