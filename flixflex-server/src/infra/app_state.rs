use std::{fmt, sync::Arc};

use flixflex_core::database::{CachedItemStore, FavoritesRepository, UsersRepository};
use flixflex_core::{AuthCrypto, FavoritesService, MetadataProvider, MetadataProxy};

use crate::infra::config::Config;
use crate::users::auth::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub proxy: MetadataProxy,
    pub favorites: FavoritesService,
    pub users: Arc<dyn UsersRepository>,
    pub auth_crypto: Arc<AuthCrypto>,
    pub jwt: Arc<JwtKeys>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire services over one backend that serves items, users and favorites.
    pub fn new<S>(
        config: Config,
        provider: Arc<dyn MetadataProvider>,
        store: Arc<S>,
        auth_crypto: AuthCrypto,
    ) -> Self
    where
        S: CachedItemStore + UsersRepository + FavoritesRepository + 'static,
    {
        let proxy = MetadataProxy::new(provider, store.clone());
        let favorites = FavoritesService::new(proxy.clone(), store.clone());
        let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours);

        Self {
            config: Arc::new(config),
            proxy,
            favorites,
            users: store,
            auth_crypto: Arc::new(auth_crypto),
            jwt: Arc::new(jwt),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
