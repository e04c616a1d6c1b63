//! Composition root: configuration, storage, HTTP client and session store.

use std::sync::Arc;

use anyhow::{Result, bail};
use streamfront_application::{ProfileService, SessionStore, WatchlistService};
use streamfront_core::routing::{GateState, RouteTable};
use streamfront_core::session::SessionSnapshot;
use streamfront_infrastructure::{ConfigService, HttpApiClient, JsonFileKeyValueStore};
use tokio::sync::watch;

pub struct App {
    pub api: Arc<HttpApiClient>,
    pub session: Arc<SessionStore>,
    pub routes: RouteTable,
}

impl App {
    /// Wires everything together and resolves the persisted session.
    pub async fn start(api_url: Option<String>) -> Result<Self> {
        let config_service = ConfigService::default();
        let mut config = config_service.load()?;
        if let Some(url) = api_url {
            config.api_base_url = url;
        }

        let session_file = config_service.session_file(&config)?;
        tracing::debug!(
            "[App] API {} (timeout {:?}), session file {}",
            config.normalized_base_url(),
            config.request_timeout(),
            session_file.display()
        );

        // The client reads the bearer credential straight from the store's
        // channel, so it gets the receiver before the store exists.
        let (sender, receiver) = watch::channel(SessionSnapshot::unresolved());
        let api = Arc::new(HttpApiClient::new(&config).with_session(receiver));
        let storage = Arc::new(JsonFileKeyValueStore::new(session_file));
        let session = Arc::new(SessionStore::with_sender(sender, storage, api.clone()));
        session.initialize().await;

        Ok(Self {
            api,
            session,
            routes: RouteTable::storefront(),
        })
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.session.clone(), self.api.clone())
    }

    pub fn watchlist(&self) -> WatchlistService {
        WatchlistService::new(self.session.clone(), self.api.clone())
    }

    /// Runs the route gate of `path` and refuses unless it allows rendering.
    pub fn enter(&self, path: &str) -> Result<()> {
        let Some(matched) = self.routes.resolve(path) else {
            bail!("No route registered for {}", path);
        };
        match matched.route.gate.evaluate(&self.session.snapshot()) {
            GateState::Allowed => Ok(()),
            GateState::Pending => bail!("Session is still loading"),
            GateState::Denied { reason, .. } => bail!("Cannot open {}: {}", path, reason),
        }
    }
}
