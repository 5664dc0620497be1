use std::sync::Arc;

use crate::auth::jwt::TokenService;
use crate::config::Config;
use crate::services::{EventService, UserService, VenueService};
use crate::store::Store;

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub events: EventService,
    pub venues: VenueService,
    pub users: UserService,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.jwt_expiration_secs);
        Self {
            events: EventService::new(store.clone()),
            venues: VenueService::new(store.clone()),
            users: UserService::new(store),
            tokens,
            config: Arc::new(config),
        }
    }
}
