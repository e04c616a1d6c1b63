//! Watchlist membership with optimistic toggling.
//!
//! A toggle publishes the flipped membership immediately, then confirms it
//! with the server. If the server refuses, the flip is rolled back and the
//! rollback is published too.
//!
//! Membership belongs to whoever is signed in when it was loaded. When the
//! session changes hands (logout, or a different account signing in) the set
//! is emptied before it is read again.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError};

use streamfront_core::api::ApiError;
use streamfront_core::catalog::{Video, VideoId};
use streamfront_core::error::{Result, StreamfrontError};
use streamfront_core::user::UserGateway;
use tokio::sync::{Mutex, watch};

use crate::session_store::SessionStore;

pub type Membership = BTreeSet<VideoId>;

pub struct WatchlistService {
    session: Arc<SessionStore>,
    users: Arc<dyn UserGateway>,
    membership: watch::Sender<Membership>,
    /// Email of the account the current membership was loaded for.
    owner: std::sync::Mutex<Option<String>>,
    toggle_lock: Mutex<()>,
}

impl WatchlistService {
    pub fn new(session: Arc<SessionStore>, users: Arc<dyn UserGateway>) -> Self {
        let (membership, _) = watch::channel(Membership::new());
        let owner = session.identity().map(|i| i.email_address);
        Self {
            session,
            users,
            membership,
            owner: std::sync::Mutex::new(owner),
            toggle_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Membership> {
        self.sync_owner();
        self.membership.subscribe()
    }

    pub fn contains(&self, video_id: VideoId) -> bool {
        self.sync_owner();
        self.membership.borrow().contains(&video_id)
    }

    pub fn ids(&self) -> Membership {
        self.sync_owner();
        self.membership.borrow().clone()
    }

    /// Replaces the membership with the server's watchlist.
    pub async fn load(&self) -> Result<Vec<Video>> {
        self.require_session()?;
        self.sync_owner();
        let outcome = self.users.get_watchlist().await;
        let videos = self.settle(outcome).await?;
        let ids: Membership = videos.iter().map(|v| v.id).collect();
        tracing::debug!("[WatchlistService] Loaded {} videos", ids.len());
        self.membership.send_replace(ids);
        Ok(videos)
    }

    /// Flips membership of `video_id` and returns whether it is now listed.
    pub async fn toggle(&self, video_id: VideoId) -> Result<bool> {
        self.require_session()?;
        let _guard = self.toggle_lock.lock().await;
        self.sync_owner();

        let adding = !self.membership.borrow().contains(&video_id);
        self.flip(video_id, adding);

        let outcome = if adding {
            self.users.add_to_watchlist(video_id).await
        } else {
            self.users.remove_from_watchlist(video_id).await
        };

        if let Err(err) = &outcome {
            tracing::warn!(
                "[WatchlistService] Toggle of video {} failed, rolling back: {}",
                video_id,
                err
            );
            self.flip(video_id, !adding);
        }
        self.settle(outcome).await.map(|_| adding)
    }

    fn flip(&self, video_id: VideoId, listed: bool) {
        self.membership.send_modify(|ids| {
            if listed {
                ids.insert(video_id);
            } else {
                ids.remove(&video_id);
            }
        });
    }

    /// Empties the membership if the signed-in account changed since it was
    /// loaded. Subscribers are only notified when something was dropped.
    fn sync_owner(&self) {
        let current = self.session.identity().map(|i| i.email_address);
        let mut owner = self.owner.lock().unwrap_or_else(PoisonError::into_inner);
        if *owner == current {
            return;
        }
        self.membership.send_if_modified(|ids| {
            let dropped = !ids.is_empty();
            ids.clear();
            dropped
        });
        tracing::debug!("[WatchlistService] Session changed, membership reset");
        *owner = current;
    }

    async fn settle<T>(&self, outcome: std::result::Result<T, ApiError>) -> Result<T> {
        let settled = self.session.settle(outcome).await;
        // A 401 signs the user out; their membership goes with them.
        self.sync_owner();
        settled
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(StreamfrontError::NoSession)
        }
    }
}
