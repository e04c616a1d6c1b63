use async_trait::async_trait;
use reqwest::Method;
use streamfront_core::api::ApiError;
use streamfront_core::catalog::{
    CatalogGateway, Category, CategoryId, RatingRequest, RatingStats, Video, VideoId,
};

use super::HttpApiClient;

#[async_trait]
impl CatalogGateway for HttpApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.send_json(self.request(Method::GET, "/categories"))
            .await
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/categories/{}", id)))
            .await
    }

    async fn list_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.send_json(self.request(Method::GET, "/videos")).await
    }

    async fn rate_video(&self, request: RatingRequest) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "/ratings").json(&request);
        self.send_unit(builder).await
    }

    async fn rating_stats(&self, video_id: VideoId) -> Result<RatingStats, ApiError> {
        let path = format!("/ratings/video/{}/stats", video_id);
        self.send_json(self.request(Method::GET, &path)).await
    }

    async fn user_rating(&self, video_id: VideoId) -> Result<u8, ApiError> {
        let path = format!("/ratings/video/{}/user", video_id);
        let raw: Option<i64> = self.send_json(self.request(Method::GET, &path)).await?;
        // Anything outside the star range means "not rated".
        Ok(raw
            .and_then(|r| u8::try_from(r).ok())
            .filter(|r| (1..=5).contains(r))
            .unwrap_or(0))
    }

    fn stream_url(&self, video_uuid: &str) -> String {
        media_url(self, "files/video", video_uuid)
    }

    fn poster_url(&self, image_uuid: &str) -> String {
        media_url(self, "files/image", image_uuid)
    }
}

/// Absolute references pass through untouched.
fn media_url(client: &HttpApiClient, prefix: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        reference.to_string()
    } else {
        client.url(&format!("{}/{}", prefix, reference.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_media_urls() {
        let client =
            HttpApiClient::with_base_url("http://localhost:8080/api", Duration::from_secs(1));
        assert_eq!(
            client.stream_url("abc-123"),
            "http://localhost:8080/api/files/video/abc-123"
        );
        assert_eq!(
            client.poster_url("img-9"),
            "http://localhost:8080/api/files/image/img-9"
        );
        assert_eq!(
            client.stream_url("https://cdn.example.com/v.mp4"),
            "https://cdn.example.com/v.mp4"
        );
    }
}
