//! Profile flows for the signed-in user.
//!
//! Every change that the server accepts is written back through
//! [`SessionStore::update_identity`], so the cached identity never drifts from
//! the server's record.

use std::sync::Arc;

use streamfront_core::api::{ApiError, MediaFile};
use streamfront_core::error::{Result, StreamfrontError};
use streamfront_core::session::Identity;
use streamfront_core::user::{FavoriteCategoriesRequest, ProfileUpdate, UserGateway, UserProfile};

use crate::session_store::SessionStore;

pub struct ProfileService {
    session: Arc<SessionStore>,
    users: Arc<dyn UserGateway>,
}

impl ProfileService {
    pub fn new(session: Arc<SessionStore>, users: Arc<dyn UserGateway>) -> Self {
        Self { session, users }
    }

    /// Fetches the server profile and merges it into the cached identity.
    ///
    /// A 401 means the credential is no longer valid, so the session is
    /// dropped before the error is returned.
    pub async fn refresh(&self) -> Result<UserProfile> {
        self.require_session()?;
        let outcome = self.users.get_profile().await;
        let profile = self.settle(outcome).await?;

        self.session
            .update_identity(|identity| profile.apply_to(identity))
            .await?;
        tracing::debug!("[ProfileService] Profile refreshed");
        Ok(profile)
    }

    pub async fn update_display_name(&self, display_name: &str) -> Result<Identity> {
        let identity = self.require_session()?;
        self.update_profile(ProfileUpdate {
            display_name: display_name.trim().to_string(),
            email_address: identity.email_address,
            age: None,
        })
        .await
    }

    /// Sends a profile update, then mirrors name and email locally.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Identity> {
        self.require_session()?;
        update.validate()?;
        let outcome = self.users.update_profile(&update).await;
        self.settle(outcome).await?;

        self.session
            .update_identity(|identity| {
                identity.display_name = update.display_name.trim().to_string();
                identity.email_address = update.email_address.trim().to_string();
            })
            .await
    }

    pub async fn update_favorite_categories<I, S>(&self, categories: I) -> Result<Identity>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_session()?;
        let request = FavoriteCategoriesRequest::new(categories)?;
        let outcome = self.users.update_favorite_categories(&request).await;
        self.settle(outcome).await?;

        self.session
            .update_identity(|identity| {
                identity.favorite_categories = request.favorite_categories;
            })
            .await
    }

    /// Uploads a new avatar, then pulls the profile so the cached identity
    /// carries the server's avatar reference.
    pub async fn upload_avatar(&self, image: &MediaFile) -> Result<Identity> {
        self.require_session()?;
        if image.is_empty() {
            return Err(StreamfrontError::validation("Avatar image is empty"));
        }
        let outcome = self.users.upload_avatar(image).await;
        self.settle(outcome).await?;
        tracing::info!(
            "[ProfileService] Avatar {} uploaded ({} bytes)",
            image.file_name,
            image.len()
        );

        self.refresh().await?;
        self.require_session()
    }

    /// Deletes the account and signs out locally on success.
    pub async fn delete_account(&self) -> Result<String> {
        self.require_session()?;
        let outcome = self.users.delete_account().await;
        let response = self.settle(outcome).await?;
        self.session.logout().await;
        tracing::info!("[ProfileService] Account deleted");
        Ok(response.message)
    }

    fn require_session(&self) -> Result<Identity> {
        self.session.identity().ok_or(StreamfrontError::NoSession)
    }

    async fn settle<T>(&self, outcome: std::result::Result<T, ApiError>) -> Result<T> {
        if let Err(err) = &outcome {
            tracing::warn!("[ProfileService] Request failed: {}", err);
        }
        self.session.settle(outcome).await
    }
}
