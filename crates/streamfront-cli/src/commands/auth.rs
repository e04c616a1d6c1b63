use anyhow::Result;
use colored::Colorize;
use streamfront_core::auth::RegisterRequest;

use crate::bootstrap::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    app.enter("/login")?;
    let identity = app.session.login(email, password).await?;
    println!(
        "{}",
        format!("Signed in as {} <{}>", identity.display_name, identity.email_address).green()
    );
    if identity.is_admin() {
        println!("{}", "Administrator access enabled".bright_yellow());
    }
    Ok(())
}

pub async fn register(app: &App, name: &str, email: &str, password: &str) -> Result<()> {
    app.enter("/register")?;
    let message = app
        .session
        .register(&RegisterRequest::new(name, email, password))
        .await?;
    println!("{}", message.green());
    println!("Sign in with `streamfront login --email {}`", email);
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    let was_signed_in = app.session.is_authenticated();
    app.session.logout().await;
    if was_signed_in {
        println!("{}", "Signed out".green());
    } else {
        println!("{}", "Not signed in".bright_black());
    }
    Ok(())
}

pub fn whoami(app: &App, json: bool) -> Result<()> {
    let Some(identity) = app.session.identity() else {
        println!("{}", "Not signed in".bright_black());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(());
    }

    println!("{} <{}>", identity.display_name.bold(), identity.email_address);
    println!("  role:      {}", identity.role);
    println!("  verified:  {}", identity.email_verified);
    println!("  active:    {}", identity.active);
    if !identity.favorite_categories.is_empty() {
        let favorites: Vec<&str> = identity
            .favorite_categories
            .iter()
            .map(String::as_str)
            .collect();
        println!("  favorites: {}", favorites.join(", "));
    }
    Ok(())
}

pub async fn forgot_password(app: &App, email: &str) -> Result<()> {
    let message = app.session.forgot_password(email).await?;
    println!("{}", message.green());
    Ok(())
}

pub async fn reset_password(app: &App, token: &str, new_password: &str) -> Result<()> {
    let message = app.session.reset_password(token, new_password).await?;
    println!("{}", message.green());
    Ok(())
}

pub async fn change_password(app: &App, current: &str, new_password: &str) -> Result<()> {
    app.enter("/browse/profile")?;
    let message = app.session.change_password(current, new_password).await?;
    println!("{}", message.green());
    Ok(())
}
