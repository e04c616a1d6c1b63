use anyhow::Result;
use colored::Colorize;
use streamfront_core::catalog::VideoId;

use super::failure;
use crate::bootstrap::App;

pub async fn list(app: &App) -> Result<()> {
    app.enter("/browse/watchlist")?;
    let videos = app
        .watchlist()
        .load()
        .await
        .map_err(|e| failure(e, "Failed to load watchlist"))?;

    if videos.is_empty() {
        println!("{}", "Your watchlist is empty".bright_black());
    }
    for video in videos {
        println!("{:>4}  {}", video.id, video.title.bold());
    }
    Ok(())
}

/// Adds or removes `video`; a no-op when it is already in the wanted state.
pub async fn set(app: &App, video: VideoId, listed: bool) -> Result<()> {
    app.enter("/browse/watchlist")?;
    let watchlist = app.watchlist();
    watchlist
        .load()
        .await
        .map_err(|e| failure(e, "Failed to load watchlist"))?;

    if watchlist.contains(video) == listed {
        println!("{}", "Nothing to change".bright_black());
        return Ok(());
    }
    let now_listed = watchlist
        .toggle(video)
        .await
        .map_err(|e| failure(e, "Failed to update watchlist"))?;

    if now_listed {
        println!("{}", format!("Added video {} to your watchlist", video).green());
    } else {
        println!("{}", format!("Removed video {} from your watchlist", video).green());
    }
    Ok(())
}
