use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    handlers::{self, favorites, movies},
    users::auth::{self, auth_middleware},
};

pub mod paths {
    pub const HEALTH: &str = "/";

    pub mod movies {
        pub const DETAILS: &str = "/movies/details/{id}";
        pub const TRAILER: &str = "/movies/trailer/{id}";
        pub const LIST: &str = "/movies/list";
        pub const TOP: &str = "/movies/top";
        pub const SEARCH: &str = "/movies/search";
    }

    pub mod auth {
        pub const SIGNUP: &str = "/auth/signup";
        pub const LOGIN: &str = "/auth/login";
        pub const ME: &str = "/auth/me";
    }

    pub mod favorites {
        pub const ADD: &str = "/favorites/add";
        pub const REMOVE: &str = "/favorites/remove";
        pub const LIST: &str = "/favorites/list";
    }
}

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(paths::HEALTH, get(handlers::health))
        // Public movie endpoints
        .route(paths::movies::DETAILS, get(movies::details))
        .route(paths::movies::TRAILER, get(movies::trailer))
        .route(paths::movies::LIST, get(movies::list))
        .route(paths::movies::TOP, get(movies::top))
        .route(paths::movies::SEARCH, get(movies::search))
        // Public authentication endpoints
        .route(paths::auth::SIGNUP, post(auth::handlers::signup))
        .route(paths::auth::LOGIN, post(auth::handlers::login))
        .merge(create_protected_routes(state))
}

/// Routes that require a bearer token
fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(paths::auth::ME, get(auth::handlers::me))
        .route(paths::favorites::ADD, post(favorites::add))
        .route(paths::favorites::REMOVE, post(favorites::remove))
        .route(paths::favorites::LIST, get(favorites::list))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
