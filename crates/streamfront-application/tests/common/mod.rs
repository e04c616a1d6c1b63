//! Scripted fakes shared by the application integration tests.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use streamfront_application::SessionStore;
use streamfront_core::api::{ApiError, MediaFile, MessageResponse};
use streamfront_core::auth::{
    AuthGateway, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RegisterRequest, ResetPasswordRequest,
};
use streamfront_core::catalog::{Video, VideoId};
use streamfront_core::error::{Result, StreamfrontError};
use streamfront_core::session::Role;
use streamfront_core::storage::KeyValueStore;
use streamfront_core::user::{FavoriteCategoriesRequest, ProfileUpdate, UserGateway, UserProfile};
use streamfront_infrastructure::InMemoryKeyValueStore;

pub fn message(text: &str) -> MessageResponse {
    MessageResponse {
        message: text.to_string(),
    }
}

pub fn login_response(email: &str, name: &str, role: Role) -> LoginResponse {
    LoginResponse {
        credential: "tok1".to_string(),
        email_address: email.to_string(),
        display_name: name.to_string(),
        role,
        avatar_reference: None,
    }
}

/// Auth gateway answering every call from a fixed script.
pub struct ScriptedAuthGateway {
    pub login_result: Mutex<std::result::Result<LoginResponse, ApiError>>,
    pub register_result: Mutex<std::result::Result<MessageResponse, ApiError>>,
    pub login_calls: AtomicUsize,
    pub last_login: Mutex<Option<LoginRequest>>,
}

impl ScriptedAuthGateway {
    pub fn accepting(response: LoginResponse) -> Self {
        Self {
            login_result: Mutex::new(Ok(response)),
            register_result: Mutex::new(Ok(message("User registered successfully"))),
            login_calls: AtomicUsize::new(0),
            last_login: Mutex::new(None),
        }
    }

    pub fn rejecting(error: ApiError) -> Self {
        let gateway = Self::accepting(login_response("a@b.com", "A", Role::User));
        *gateway.login_result.lock().unwrap() = Err(error.clone());
        *gateway.register_result.lock().unwrap() = Err(error);
        gateway
    }

    pub fn set_login_result(&self, result: std::result::Result<LoginResponse, ApiError>) {
        *self.login_result.lock().unwrap() = result;
    }
}

#[async_trait]
impl AuthGateway for ScriptedAuthGateway {
    async fn login(&self, request: &LoginRequest) -> std::result::Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_login.lock().unwrap() = Some(request.clone());
        self.login_result.lock().unwrap().clone()
    }

    async fn register(
        &self,
        _request: &RegisterRequest,
    ) -> std::result::Result<MessageResponse, ApiError> {
        self.register_result.lock().unwrap().clone()
    }

    async fn forgot_password(
        &self,
        _request: &ForgotPasswordRequest,
    ) -> std::result::Result<MessageResponse, ApiError> {
        Ok(message("Reset link sent"))
    }

    async fn reset_password(
        &self,
        _request: &ResetPasswordRequest,
    ) -> std::result::Result<MessageResponse, ApiError> {
        Ok(message("Password reset"))
    }

    async fn change_password(
        &self,
        _request: &ChangePasswordRequest,
    ) -> std::result::Result<MessageResponse, ApiError> {
        Ok(message("Password changed"))
    }
}

/// In-memory key-value store that can be switched to fail every operation.
#[derive(Default)]
pub struct BrokenStore {
    inner: InMemoryKeyValueStore,
    pub broken: AtomicBool,
}

impl BrokenStore {
    pub fn broken() -> Self {
        let store = Self::default();
        store.broken.store(true, Ordering::SeqCst);
        store
    }

    fn check(&self) -> Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(StreamfrontError::storage("disk unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(key).await
    }
}

pub fn video(id: VideoId, title: &str) -> Video {
    Video {
        id,
        title: title.to_string(),
        description: String::new(),
        categories: Vec::new(),
        src: None,
        poster: None,
        duration: None,
        year: None,
        rating: None,
        published: true,
        created_at: None,
        is_in_watch_list: Some(true),
    }
}

/// User gateway backed by in-memory state, with switchable failures.
pub struct FakeUserGateway {
    pub profile: Mutex<std::result::Result<UserProfile, ApiError>>,
    pub watchlist: Mutex<Vec<Video>>,
    pub fail_writes: AtomicBool,
    /// Answer every call with 401.
    pub revoked: AtomicBool,
    pub last_update: Mutex<Option<ProfileUpdate>>,
}

impl FakeUserGateway {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile: Mutex::new(Ok(profile)),
            watchlist: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            revoked: AtomicBool::new(false),
            last_update: Mutex::new(None),
        }
    }

    fn check_credential(&self) -> std::result::Result<(), ApiError> {
        if self.revoked.load(Ordering::SeqCst) {
            Err(ApiError::Unauthorized {
                message: Some("Token expired".to_string()),
            })
        } else {
            Ok(())
        }
    }

    fn write_outcome(&self, text: &str) -> std::result::Result<MessageResponse, ApiError> {
        self.check_credential()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(ApiError::Rejected {
                status: 500,
                message: Some("Server exploded".to_string()),
            })
        } else {
            Ok(message(text))
        }
    }
}

pub fn profile(email: &str, name: &str) -> UserProfile {
    UserProfile {
        id: 1,
        email_address: email.to_string(),
        display_name: name.to_string(),
        role: Role::User,
        active: true,
        email_verified: true,
        favorite_categories: BTreeSet::from(["Drama".to_string()]),
        avatar_reference: Some("avatar-1".to_string()),
        age: Some(30),
        created_at: None,
    }
}

#[async_trait]
impl UserGateway for FakeUserGateway {
    async fn get_profile(&self) -> std::result::Result<UserProfile, ApiError> {
        self.profile.lock().unwrap().clone()
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> std::result::Result<MessageResponse, ApiError> {
        *self.last_update.lock().unwrap() = Some(update.clone());
        self.write_outcome("Profile updated")
    }

    async fn update_favorite_categories(
        &self,
        _request: &FavoriteCategoriesRequest,
    ) -> std::result::Result<MessageResponse, ApiError> {
        self.write_outcome("Favorites updated")
    }

    async fn upload_avatar(
        &self,
        image: &MediaFile,
    ) -> std::result::Result<MessageResponse, ApiError> {
        let outcome = self.write_outcome("Avatar updated");
        if outcome.is_ok() {
            if let Ok(profile) = self.profile.lock().unwrap().as_mut() {
                profile.avatar_reference = Some(image.file_name.clone());
            }
        }
        outcome
    }

    async fn delete_account(&self) -> std::result::Result<MessageResponse, ApiError> {
        self.write_outcome("Account deleted")
    }

    async fn add_to_watchlist(
        &self,
        video_id: VideoId,
    ) -> std::result::Result<MessageResponse, ApiError> {
        let outcome = self.write_outcome("Added to watchlist");
        if outcome.is_ok() {
            self.watchlist
                .lock()
                .unwrap()
                .push(video(video_id, "Added"));
        }
        outcome
    }

    async fn remove_from_watchlist(
        &self,
        video_id: VideoId,
    ) -> std::result::Result<MessageResponse, ApiError> {
        let outcome = self.write_outcome("Removed from watchlist");
        if outcome.is_ok() {
            self.watchlist.lock().unwrap().retain(|v| v.id != video_id);
        }
        outcome
    }

    async fn get_watchlist(&self) -> std::result::Result<Vec<Video>, ApiError> {
        self.check_credential()?;
        Ok(self.watchlist.lock().unwrap().clone())
    }

    async fn record_view(&self, _video_id: VideoId) -> std::result::Result<(), ApiError> {
        Ok(())
    }

    async fn view_count(&self, _video_id: VideoId) -> std::result::Result<u64, ApiError> {
        Ok(0)
    }
}

/// Store over a fresh in-memory map, plus a handle on that map.
pub fn store_with(
    auth: Arc<ScriptedAuthGateway>,
    entries: &[(&str, &str)],
) -> (SessionStore, InMemoryKeyValueStore) {
    let storage = InMemoryKeyValueStore::with_entries(entries.iter().copied());
    let store = SessionStore::new(Arc::new(storage.clone()), auth);
    (store, storage)
}

/// An initialized store already signed in as `email` with `role`.
pub async fn signed_in_store(
    email: &str,
    role: Role,
) -> (Arc<SessionStore>, InMemoryKeyValueStore) {
    let auth = Arc::new(ScriptedAuthGateway::accepting(login_response(
        email, "Ann Lee", role,
    )));
    let (store, storage) = store_with(auth, &[]);
    store.initialize().await;
    store.login(email, "secret").await.unwrap();
    (Arc::new(store), storage)
}
