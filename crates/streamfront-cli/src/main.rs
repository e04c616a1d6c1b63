use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use streamfront_core::admin::{UserId, VideoRequest};
use streamfront_core::catalog::{CategoryId, VideoId};
use streamfront_core::session::Role;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

use bootstrap::App;

#[derive(Parser)]
#[command(name = "streamfront")]
#[command(about = "Streamfront - sign in, browse and manage a video storefront from the terminal")]
#[command(long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes over when unset)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the API base URL for this run
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STREAMFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not sign in)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STREAMFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Print the identity as JSON
        #[arg(long)]
        json: bool,
    },
    /// Password reset and change
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
    /// Show how a client route is gated for the current session
    Route { path: String },
    /// List categories, or show one
    Categories { id: Option<CategoryId> },
    /// List videos, optionally filtered by category
    Videos {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show or edit the watchlist
    Watchlist {
        #[command(subcommand)]
        action: Option<WatchlistAction>,
    },
    /// Open a video: record a view, print its links, views and ratings
    Play { video: VideoId },
    /// Rate a video from 1 to 5 stars
    Rate { video: VideoId, stars: u8 },
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// User and video administration (ADMIN only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Email a reset link
    Forgot {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with the token from the reset email
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long, env = "STREAMFRONT_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Change the password of the signed-in user
    Change {
        #[arg(long, env = "STREAMFRONT_PASSWORD", hide_env_values = true)]
        current_password: String,
        #[arg(long, env = "STREAMFRONT_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
}

#[derive(Subcommand)]
enum WatchlistAction {
    List,
    Add { video: VideoId },
    Remove { video: VideoId },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Pull the server profile into the stored session
    Refresh,
    /// Change the display name
    Name { name: String },
    /// Replace favorite categories (at most 3)
    Favorites { categories: Vec<String> },
    /// Upload a new avatar image
    Avatar { file: PathBuf },
    /// Delete the account and sign out
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    Users,
    User { id: UserId },
    /// Suspend a user, or restore with --restore
    Suspend {
        id: UserId,
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long)]
        restore: bool,
    },
    Delete { id: UserId },
    Role { id: UserId, role: Role },
    /// Upload, edit or delete videos
    Video {
        #[command(subcommand)]
        action: VideoAction,
    },
}

#[derive(Subcommand)]
enum VideoAction {
    /// Upload a video file with its poster
    Upload {
        video: PathBuf,
        poster: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Repeat for several categories
        #[arg(long = "category", required = true)]
        categories: Vec<String>,
        /// Minutes
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        /// Content rating such as PG-13
        #[arg(long, default_value = "PG")]
        rating: String,
        #[arg(long)]
        published: bool,
    },
    /// Change title, description or poster
    Edit {
        id: VideoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        poster: Option<PathBuf>,
    },
    Delete {
        id: VideoId,
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = App::start(cli.api_url).await?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await,
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&app, &name, &email, &password).await,
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Whoami { json } => commands::auth::whoami(&app, json),
        Commands::Password { action } => match action {
            PasswordAction::Forgot { email } => commands::auth::forgot_password(&app, &email).await,
            PasswordAction::Reset {
                token,
                new_password,
            } => commands::auth::reset_password(&app, &token, &new_password).await,
            PasswordAction::Change {
                current_password,
                new_password,
            } => commands::auth::change_password(&app, &current_password, &new_password).await,
        },
        Commands::Route { path } => commands::route::check(&app, &path),
        Commands::Categories { id } => match id {
            Some(id) => commands::catalog::category(&app, id).await,
            None => commands::catalog::categories(&app).await,
        },
        Commands::Videos { category } => commands::catalog::videos(&app, category.as_deref()).await,
        Commands::Watchlist { action } => match action.unwrap_or(WatchlistAction::List) {
            WatchlistAction::List => commands::watchlist::list(&app).await,
            WatchlistAction::Add { video } => commands::watchlist::set(&app, video, true).await,
            WatchlistAction::Remove { video } => commands::watchlist::set(&app, video, false).await,
        },
        Commands::Play { video } => commands::catalog::play(&app, video).await,
        Commands::Rate { video, stars } => commands::catalog::rate(&app, video, stars).await,
        Commands::Profile { action } => match action.unwrap_or(ProfileAction::Show) {
            ProfileAction::Show => commands::profile::show(&app),
            ProfileAction::Refresh => commands::profile::refresh(&app).await,
            ProfileAction::Name { name } => commands::profile::rename(&app, &name).await,
            ProfileAction::Favorites { categories } => {
                commands::profile::favorites(&app, categories).await
            }
            ProfileAction::Avatar { file } => commands::profile::avatar(&app, &file).await,
            ProfileAction::Delete { yes } => commands::profile::delete(&app, yes).await,
        },
        Commands::Admin { action } => match action {
            AdminAction::Users => commands::admin::users(&app).await,
            AdminAction::User { id } => commands::admin::user(&app, id).await,
            AdminAction::Suspend {
                id,
                reason,
                restore,
            } => commands::admin::suspend(&app, id, &reason, restore).await,
            AdminAction::Delete { id } => commands::admin::delete(&app, id).await,
            AdminAction::Role { id, role } => commands::admin::role(&app, id, role).await,
            AdminAction::Video { action } => match action {
                VideoAction::Upload {
                    video,
                    poster,
                    title,
                    description,
                    categories,
                    duration,
                    year,
                    rating,
                    published,
                } => {
                    let request = VideoRequest {
                        title,
                        description,
                        categories,
                        duration,
                        year,
                        rating: Some(rating),
                        published,
                    };
                    commands::admin::upload_video(&app, request, &video, &poster).await
                }
                VideoAction::Edit {
                    id,
                    title,
                    description,
                    poster,
                } => commands::admin::edit_video(&app, id, title, description, poster).await,
                VideoAction::Delete { id, yes } => {
                    commands::admin::delete_video(&app, id, yes).await
                }
            },
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            ExitCode::FAILURE
        }
    }
}
