use anyhow::{Result, anyhow};
use colored::Colorize;
use streamfront_core::catalog::{
    CatalogGateway, CategoryId, RatingRequest, Video, VideoId, filter_by_category,
};
use streamfront_core::user::UserGateway;

use super::api_failure;
use crate::bootstrap::App;

pub async fn category(app: &App, id: CategoryId) -> Result<()> {
    let category = app
        .api
        .get_category(id)
        .await
        .map_err(|e| api_failure(e, "Failed to load category"))?;
    println!("{:>4}  {}", category.id, category.name.bold());
    if !category.description.is_empty() {
        println!("      {}", category.description);
    }
    if !category.active {
        println!("      {}", "inactive".red());
    }
    Ok(())
}

/// Looks a video up in the catalog listing; there is no single-video endpoint.
pub async fn find_video(app: &App, id: VideoId) -> Result<Video> {
    let videos = app
        .api
        .list_videos()
        .await
        .map_err(|e| api_failure(e, "Failed to load videos"))?;
    videos
        .into_iter()
        .find(|v| v.id == id)
        .ok_or_else(|| anyhow!("Video {} not found", id))
}

/// Opens the player page: records a view and prints the media links, the
/// view count and the ratings.
pub async fn play(app: &App, id: VideoId) -> Result<()> {
    app.enter(&format!("/browse/video/{}", id))?;
    let video = find_video(app, id).await?;

    if let Err(e) = app.api.record_view(id).await {
        tracing::warn!("[Cli] Could not record view of {}: {}", id, e);
    }

    println!("{}", video.title.bold());
    if !video.description.is_empty() {
        println!("  {}", video.description);
    }
    if let Some(src) = &video.src {
        println!("  stream  {}", app.api.stream_url(src).bright_blue());
    }
    if let Some(poster) = &video.poster {
        println!("  poster  {}", app.api.poster_url(poster).bright_blue());
    }
    match app.api.view_count(id).await {
        Ok(views) => println!("  {} views", views),
        Err(e) => tracing::warn!("[Cli] Could not load view count: {}", e),
    }
    match app.api.rating_stats(id).await {
        Ok(stats) => println!("  average {:.1} from {} ratings", stats.average, stats.count),
        Err(e) => tracing::warn!("[Cli] Could not load rating stats: {}", e),
    }
    match app.api.user_rating(id).await {
        Ok(0) => println!("  {}", "You have not rated this video".bright_black()),
        Ok(stars) => println!("  your rating: {}", "*".repeat(stars.into()).yellow()),
        Err(e) => tracing::warn!("[Cli] Could not load your rating: {}", e),
    }
    Ok(())
}

pub async fn categories(app: &App) -> Result<()> {
    let categories = app
        .api
        .list_categories()
        .await
        .map_err(|e| api_failure(e, "Failed to load categories"))?;

    for category in categories.iter().filter(|c| c.active) {
        if category.description.is_empty() {
            println!("{:>4}  {}", category.id, category.name.bold());
        } else {
            println!(
                "{:>4}  {}  {}",
                category.id,
                category.name.bold(),
                category.description.bright_black()
            );
        }
    }
    Ok(())
}

pub async fn videos(app: &App, category: Option<&str>) -> Result<()> {
    app.enter("/browse")?;
    let videos = app
        .api
        .list_videos()
        .await
        .map_err(|e| api_failure(e, "Failed to load videos"))?;

    let shown = filter_by_category(&videos, category);
    if shown.is_empty() {
        println!("{}", "No videos found".bright_black());
        return Ok(());
    }
    for video in shown {
        let listed = if video.is_in_watch_list.unwrap_or(false) {
            " +".green().to_string()
        } else {
            String::new()
        };
        let year = video.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        println!(
            "{:>4}  {}{}{}  {}",
            video.id,
            video.title.bold(),
            year,
            listed,
            video.categories.join(", ").bright_black()
        );
        if let Some(src) = &video.src {
            println!("      {}", app.api.stream_url(src).bright_blue());
        }
    }
    Ok(())
}

pub async fn rate(app: &App, video: VideoId, stars: u8) -> Result<()> {
    app.enter(&format!("/browse/video/{}", video))?;
    let request = RatingRequest::new(video, stars).map_err(|e| api_failure(e, "Invalid rating"))?;
    app.api
        .rate_video(request)
        .await
        .map_err(|e| api_failure(e, "Failed to submit rating"))?;

    println!("{}", format!("Rated video {} with {} stars", video, stars).green());
    match app.api.rating_stats(video).await {
        Ok(stats) => println!("  average {:.1} from {} ratings", stats.average, stats.count),
        Err(e) => tracing::warn!("[Cli] Could not load rating stats: {}", e),
    }
    Ok(())
}
