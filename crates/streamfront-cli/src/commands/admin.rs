use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use streamfront_core::admin::{
    AdminGateway, ManagedUser, SuspendUserRequest, UserId, VideoEdit, VideoRequest, VideoUpload,
};
use streamfront_core::api::MediaFile;
use streamfront_core::catalog::VideoId;
use streamfront_core::session::Role;
use streamfront_infrastructure::media::read_media_file;

use super::catalog::find_video;
use super::{api_failure, failure};
use crate::bootstrap::App;

const DASHBOARD: &str = "/browse/admin-dashboard";

fn print_user(user: &ManagedUser) {
    let status = if user.active {
        "active".green()
    } else {
        "suspended".red()
    };
    println!(
        "{:>4}  {:<30} {:<24} {:<6} {}",
        user.id,
        user.email_address,
        user.display_name,
        user.role.to_string(),
        status
    );
}

pub async fn users(app: &App) -> Result<()> {
    app.enter(DASHBOARD)?;
    let users = app
        .api
        .list_users()
        .await
        .map_err(|e| api_failure(e, "Failed to load users"))?;
    for user in &users {
        print_user(user);
    }
    println!("{}", format!("{} users", users.len()).bright_black());
    Ok(())
}

pub async fn user(app: &App, id: UserId) -> Result<()> {
    app.enter(DASHBOARD)?;
    let user = app
        .api
        .get_user(id)
        .await
        .map_err(|e| api_failure(e, "Failed to load user"))?;
    print_user(&user);
    if !user.favorite_categories.is_empty() {
        println!("      favorites: {}", user.favorite_categories.join(", "));
    }
    Ok(())
}

pub async fn suspend(app: &App, id: UserId, reason: &str, restore: bool) -> Result<()> {
    app.enter(DASHBOARD)?;
    let request = SuspendUserRequest {
        user_id: id,
        active: restore,
        reason: reason.to_string(),
    };
    let response = app
        .api
        .suspend_user(&request)
        .await
        .map_err(|e| api_failure(e, "Failed to update user status"))?;
    println!("{}", response.message.green());
    Ok(())
}

pub async fn delete(app: &App, id: UserId) -> Result<()> {
    app.enter(DASHBOARD)?;
    let response = app
        .api
        .delete_user(id)
        .await
        .map_err(|e| api_failure(e, "Failed to delete user"))?;
    println!("{}", response.message.green());
    Ok(())
}

pub async fn role(app: &App, id: UserId, role: Role) -> Result<()> {
    app.enter(DASHBOARD)?;
    let response = app
        .api
        .update_user_role(id, role)
        .await
        .map_err(|e| api_failure(e, "Failed to update user role"))?;
    println!("{}", response.message.green());
    Ok(())
}

async fn read_file(path: &Path) -> Result<MediaFile> {
    read_media_file(path)
        .await
        .map_err(|e| anyhow!("Could not read {}: {}", path.display(), e))
}

pub async fn upload_video(
    app: &App,
    request: VideoRequest,
    video: &Path,
    poster: &Path,
) -> Result<()> {
    app.enter(DASHBOARD)?;
    request
        .validate()
        .map_err(|e| failure(e, "Invalid video details"))?;
    let upload = VideoUpload {
        request,
        video: read_file(video).await?,
        poster: read_file(poster).await?,
    };
    upload
        .validate()
        .map_err(|e| failure(e, "Invalid video upload"))?;

    let created = app
        .api
        .upload_video(&upload)
        .await
        .map_err(|e| api_failure(e, "Failed to upload video. Please try again."))?;
    println!("{}", format!("Uploaded video {}: {}", created.id, created.title).green());
    Ok(())
}

/// Fields left out keep the video's current values.
pub async fn edit_video(
    app: &App,
    id: VideoId,
    title: Option<String>,
    description: Option<String>,
    poster: Option<PathBuf>,
) -> Result<()> {
    app.enter(DASHBOARD)?;
    if title.is_none() && description.is_none() && poster.is_none() {
        bail!("Nothing to change; pass --title, --description or --poster");
    }
    let current = find_video(app, id).await?;
    let poster = match poster {
        Some(path) => Some(read_file(&path).await?),
        None => None,
    };
    let edit = VideoEdit {
        title: title.unwrap_or(current.title),
        description: description.unwrap_or(current.description),
        poster,
    };
    edit.validate()
        .map_err(|e| failure(e, "Invalid video details"))?;

    let updated = app
        .api
        .update_video(id, &edit)
        .await
        .map_err(|e| api_failure(e, "Failed to update video"))?;
    println!("{}", format!("Updated video {}: {}", updated.id, updated.title).green());
    Ok(())
}

pub async fn delete_video(app: &App, id: VideoId, confirmed: bool) -> Result<()> {
    app.enter(DASHBOARD)?;
    if !confirmed {
        bail!("Deleting a video cannot be undone; pass --yes to confirm");
    }
    app.api
        .delete_video(id)
        .await
        .map_err(|e| api_failure(e, "Failed to delete video"))?;
    println!("{}", format!("Deleted video {}", id).green());
    Ok(())
}
