//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AuthService, LinkService, ProfileService, RedirectService, TokenService,
};
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use crate::infrastructure::cache::CacheService;

/// Everything a request handler can reach.
///
/// Built once in [`crate::server::run`] (or by tests) and cloned per request;
/// every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub link_service: Arc<LinkService>,
    pub profile_service: Arc<ProfileService>,
    pub redirect_service: Arc<RedirectService>,
    pub click_recorder: Arc<ClickRecorder>,
    pub cache: Arc<dyn CacheService>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services over the given stores.
    pub fn new(
        users: Arc<dyn UserRepository>,
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        cache: Arc<dyn CacheService>,
        settings: StateSettings,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(&settings.jwt_secret));
        let click_recorder = Arc::new(ClickRecorder::new(
            clicks.clone(),
            settings.click_max_in_flight,
        ));

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), token_service.clone())),
            profile_service: Arc::new(ProfileService::new(users, links.clone())),
            link_service: Arc::new(LinkService::new(
                links.clone(),
                clicks,
                cache.clone(),
                settings.base_url,
            )),
            redirect_service: Arc::new(RedirectService::new(
                links,
                cache.clone(),
                click_recorder.clone(),
            )),
            token_service,
            click_recorder,
            cache,
            behind_proxy: settings.behind_proxy,
        }
    }
}

/// Plain settings [`AppState::new`] needs besides the stores.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub base_url: String,
    pub jwt_secret: String,
    pub click_max_in_flight: usize,
    pub behind_proxy: bool,
}
