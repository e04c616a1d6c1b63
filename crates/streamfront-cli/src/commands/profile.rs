use std::path::Path;

use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use streamfront_infrastructure::media::read_media_file;

use super::failure;
use crate::bootstrap::App;

pub fn show(app: &App) -> Result<()> {
    app.enter("/browse/profile")?;
    super::auth::whoami(app, false)
}

pub async fn refresh(app: &App) -> Result<()> {
    app.enter("/browse/profile")?;
    let profile = app
        .profiles()
        .refresh()
        .await
        .map_err(|e| failure(e, "Failed to load profile"))?;

    println!("{} <{}>", profile.display_name.bold(), profile.email_address);
    if let Some(age) = profile.age {
        println!("  age:       {}", age);
    }
    if let Some(created_at) = profile.created_at {
        println!("  member since {}", created_at.format("%Y-%m-%d"));
    }
    println!("{}", "Stored session updated".green());
    Ok(())
}

pub async fn rename(app: &App, name: &str) -> Result<()> {
    app.enter("/browse/profile")?;
    let identity = app
        .profiles()
        .update_display_name(name)
        .await
        .map_err(|e| failure(e, "Failed to update profile"))?;
    println!("{}", format!("Display name is now {}", identity.display_name).green());
    Ok(())
}

pub async fn favorites(app: &App, categories: Vec<String>) -> Result<()> {
    app.enter("/browse/profile")?;
    let identity = app
        .profiles()
        .update_favorite_categories(categories)
        .await
        .map_err(|e| failure(e, "Failed to update favorite categories"))?;

    let favorites: Vec<&str> = identity
        .favorite_categories
        .iter()
        .map(String::as_str)
        .collect();
    println!("{}", format!("Favorites: {}", favorites.join(", ")).green());
    Ok(())
}

pub async fn avatar(app: &App, file: &Path) -> Result<()> {
    app.enter("/browse/profile")?;
    let image = read_media_file(file)
        .await
        .map_err(|e| anyhow!("Could not read {}: {}", file.display(), e))?;
    let identity = app
        .profiles()
        .upload_avatar(&image)
        .await
        .map_err(|e| failure(e, "Failed to upload avatar"))?;
    println!("{}", "Avatar updated".green());
    if let Some(avatar) = &identity.avatar_reference {
        println!("  {}", avatar.bright_black());
    }
    Ok(())
}

pub async fn delete(app: &App, confirmed: bool) -> Result<()> {
    app.enter("/browse/profile")?;
    if !confirmed {
        bail!("Deleting the account cannot be undone; pass --yes to confirm");
    }
    let message = app
        .profiles()
        .delete_account()
        .await
        .map_err(|e| failure(e, "Failed to delete account"))?;
    println!("{}", message.green());
    Ok(())
}
