use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::Form;
use serde::Deserialize;
use streamfront_core::api::{ApiError, MediaFile, MessageResponse};
use streamfront_core::catalog::{Video, VideoId};
use streamfront_core::user::{FavoriteCategoriesRequest, ProfileUpdate, UserGateway, UserProfile};

use super::HttpApiClient;
use super::multipart::file_part;

/// The view counter has answered both as a bare number and as `{views}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ViewCount {
    Bare(u64),
    Wrapped { views: u64 },
}

impl From<ViewCount> for u64 {
    fn from(count: ViewCount) -> Self {
        match count {
            ViewCount::Bare(views) | ViewCount::Wrapped { views } => views,
        }
    }
}

#[async_trait]
impl UserGateway for HttpApiClient {
    async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.send_json(self.request(Method::GET, "/user/profile"))
            .await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ApiError> {
        let builder = self.request(Method::PUT, "/user/profile").json(update);
        self.send_message(builder).await
    }

    async fn update_favorite_categories(
        &self,
        request: &FavoriteCategoriesRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = self
            .request(Method::PUT, "/user/favorite-categories")
            .json(request);
        self.send_message(builder).await
    }

    async fn upload_avatar(&self, image: &MediaFile) -> Result<MessageResponse, ApiError> {
        let form = Form::new().part("file", file_part(image)?);
        let builder = self
            .upload_request(Method::POST, "/user/avatar")
            .multipart(form);
        self.send_message(builder).await
    }

    async fn delete_account(&self) -> Result<MessageResponse, ApiError> {
        self.send_message(self.request(Method::DELETE, "/user/account"))
            .await
    }

    async fn add_to_watchlist(&self, video_id: VideoId) -> Result<MessageResponse, ApiError> {
        let path = format!("/user/watchlist/{}", video_id);
        self.send_message(self.request(Method::POST, &path)).await
    }

    async fn remove_from_watchlist(
        &self,
        video_id: VideoId,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/user/watchlist/{}", video_id);
        self.send_message(self.request(Method::DELETE, &path)).await
    }

    async fn get_watchlist(&self) -> Result<Vec<Video>, ApiError> {
        self.send_json(self.request(Method::GET, "/user/watchlist"))
            .await
    }

    async fn record_view(&self, video_id: VideoId) -> Result<(), ApiError> {
        let path = format!("/user/videos/{}/view", video_id);
        self.send_unit(self.request(Method::POST, &path)).await
    }

    async fn view_count(&self, video_id: VideoId) -> Result<u64, ApiError> {
        let path = format!("/user/videos/{}/views", video_id);
        let count: ViewCount = self.send_json(self.request(Method::GET, &path)).await?;
        Ok(count.into())
    }
}
