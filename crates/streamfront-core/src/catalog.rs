//! Catalog domain: categories, videos and ratings.
//!
//! The video record has drifted across server versions (`id` vs `video_id`,
//! `isInWatchList` vs `isWatchList`). [`Video`] is the canonical client shape;
//! the old spellings are accepted on input only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

pub type VideoId = i64;
pub type CategoryId = i64;

/// Lowest and highest star rating accepted by the ratings endpoint.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(alias = "video_id")]
    pub id: VideoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Streaming URL or stream UUID, depending on the server build.
    #[serde(default, alias = "srcUuid", skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, alias = "posterUuid", skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Content rating such as `PG-13`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "isWatchList", skip_serializing_if = "Option::is_none")]
    pub is_in_watch_list: Option<bool>,
}

impl Video {
    /// Case-insensitive category membership.
    pub fn in_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category.trim()))
    }
}

/// Keeps the videos tagged with `category`; `None` keeps everything.
pub fn filter_by_category<'a>(videos: &'a [Video], category: Option<&str>) -> Vec<&'a Video> {
    match category {
        Some(name) if !name.trim().is_empty() => {
            videos.iter().filter(|v| v.in_category(name)).collect()
        }
        _ => videos.iter().collect(),
    }
}

/// `POST /ratings` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub video_id: VideoId,
    pub rating: u8,
}

impl RatingRequest {
    /// Validates the star count before anything is sent.
    pub fn new(video_id: VideoId, rating: u8) -> Result<Self, ApiError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ApiError::InvalidRequest(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        Ok(Self { video_id, rating })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingStats {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u64,
}

/// Remote catalog endpoints. Listing is open; rating needs a session.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError>;

    async fn list_videos(&self) -> Result<Vec<Video>, ApiError>;

    async fn rate_video(&self, request: RatingRequest) -> Result<(), ApiError>;

    async fn rating_stats(&self, video_id: VideoId) -> Result<RatingStats, ApiError>;

    /// The caller's own rating, `0` when they have not rated the video.
    async fn user_rating(&self, video_id: VideoId) -> Result<u8, ApiError>;

    /// Absolute URL the player streams from.
    fn stream_url(&self, video_uuid: &str) -> String;

    fn poster_url(&self, image_uuid: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: VideoId, categories: &[&str]) -> Video {
        Video {
            id,
            title: format!("Video {}", id),
            description: String::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            src: None,
            poster: None,
            duration: None,
            year: None,
            rating: None,
            published: true,
            created_at: None,
            is_in_watch_list: None,
        }
    }

    #[test]
    fn test_filter_by_category() {
        let videos = vec![video(1, &["Drama"]), video(2, &["Comedy", "drama"]), video(3, &[])];

        let drama: Vec<VideoId> = filter_by_category(&videos, Some("DRAMA"))
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(drama, vec![1, 2]);
        assert_eq!(filter_by_category(&videos, None).len(), 3);
        assert_eq!(filter_by_category(&videos, Some("  ")).len(), 3);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(RatingRequest::new(1, 0).is_err());
        assert!(RatingRequest::new(1, 6).is_err());
        assert_eq!(RatingRequest::new(1, 5).unwrap().rating, 5);
    }

    #[test]
    fn test_video_accepts_legacy_names() {
        let json = r#"{"video_id":9,"title":"T","srcUuid":"abc","isWatchList":true,"createdAt":"2024-01-02T03:04:05Z"}"#;
        let video: Video = serde_json::from_str(json).unwrap();
        assert_eq!(video.id, 9);
        assert_eq!(video.src.as_deref(), Some("abc"));
        assert_eq!(video.is_in_watch_list, Some(true));
        assert!(video.created_at.is_some());
    }
}
