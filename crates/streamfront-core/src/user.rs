//! Signed-in user's own account: profile, avatar, favorites, watchlist, view history.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, MediaFile, MessageResponse};
use crate::catalog::{Video, VideoId};
use crate::error::StreamfrontError;
use crate::session::{Identity, Role};

/// The server allows at most this many favorite categories.
pub const MAX_FAVORITE_CATEGORIES: usize = 3;

/// `GET /user/profile` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
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
    pub favorite_categories: BTreeSet<String>,
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Overwrites the cached identity with the server's view of the account.
    pub fn apply_to(&self, identity: &mut Identity) {
        identity.email_address = self.email_address.clone();
        identity.display_name = self.display_name.clone();
        identity.role = self.role;
        identity.active = self.active;
        identity.email_verified = self.email_verified;
        identity.favorite_categories = self.favorite_categories.clone();
        identity.avatar_reference = self.avatar_reference.clone();
    }
}

/// `PUT /user/profile` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: String,
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
}

impl ProfileUpdate {
    /// Mirrors the server's own constraints so obvious mistakes fail locally.
    pub fn validate(&self) -> Result<(), StreamfrontError> {
        let name_len = self.display_name.trim().chars().count();
        if !(2..=100).contains(&name_len) {
            return Err(StreamfrontError::validation(
                "Full name must be between 2 and 100 characters",
            ));
        }
        let email_len = self.email_address.trim().len();
        if !(5..=255).contains(&email_len) || !self.email_address.contains('@') {
            return Err(StreamfrontError::validation("Invalid email address"));
        }
        if let Some(age) = self.age {
            if age < 13 {
                return Err(StreamfrontError::validation(
                    "You must be at least 13 years old",
                ));
            }
            if age > 120 {
                return Err(StreamfrontError::validation("Invalid age"));
            }
        }
        Ok(())
    }
}

/// `PUT /user/favorite-categories` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCategoriesRequest {
    pub favorite_categories: BTreeSet<String>,
}

impl FavoriteCategoriesRequest {
    pub fn new<I, S>(categories: I) -> Result<Self, StreamfrontError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let favorite_categories: BTreeSet<String> = categories
            .into_iter()
            .map(Into::into)
            .map(|c: String| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if favorite_categories.len() > MAX_FAVORITE_CATEGORIES {
            return Err(StreamfrontError::validation(format!(
                "You can pick at most {} favorite categories",
                MAX_FAVORITE_CATEGORIES
            )));
        }
        Ok(Self {
            favorite_categories,
        })
    }
}

/// Remote endpoints scoped to the signed-in user.
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn get_profile(&self) -> Result<UserProfile, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ApiError>;

    async fn update_favorite_categories(
        &self,
        request: &FavoriteCategoriesRequest,
    ) -> Result<MessageResponse, ApiError>;

    /// `POST /user/avatar` with the image as the `file` part.
    async fn upload_avatar(&self, image: &MediaFile) -> Result<MessageResponse, ApiError>;

    async fn delete_account(&self) -> Result<MessageResponse, ApiError>;

    async fn add_to_watchlist(&self, video_id: VideoId) -> Result<MessageResponse, ApiError>;

    async fn remove_from_watchlist(&self, video_id: VideoId)
    -> Result<MessageResponse, ApiError>;

    async fn get_watchlist(&self) -> Result<Vec<Video>, ApiError>;

    async fn record_view(&self, video_id: VideoId) -> Result<(), ApiError>;

    async fn view_count(&self, video_id: VideoId) -> Result<u64, ApiError>;
}
