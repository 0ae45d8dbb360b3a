//! # FlixFlex Core
//!
//! Business logic behind the FlixFlex API: a thin client for the TMDB
//! metadata provider, a write-through mirror of provider items in a document
//! store, and the proxy that decides when to serve from that mirror.
//!
//! ## Architecture
//!
//! - [`providers`]: upstream provider trait and the TMDB implementation
//! - [`database`]: store ports with PostgreSQL and in-memory backends
//! - [`cache_writer`]: best-effort background upserts of provider items
//! - [`metadata_proxy`]: details, trailers, paginated/top listings and search
//! - [`favorites`]: per-user favorites backed by cached items
//! - [`auth`]: password hashing

/// Password hashing
pub mod auth;

/// Background persistence of provider items
pub mod cache_writer;

/// Store ports and implementations
pub mod database;

/// Error types
pub mod error;

/// Per-user favorites
pub mod favorites;

/// Fetch-or-serve orchestration over the provider and the item store
pub mod metadata_proxy;

/// Upstream metadata providers
pub mod providers;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use auth::{AuthCrypto, AuthCryptoError};
pub use cache_writer::{CacheWriteError, CacheWriter};
pub use database::{InMemoryDatabase, PostgresDatabase};
pub use error::{ProxyError, Result};
pub use favorites::FavoritesService;
pub use metadata_proxy::{CacheMode, MetadataProxy, PAGE_SIZE, TOP_LIMIT};
pub use providers::{MetadataProvider, ProviderError, ProviderPage, TmdbProvider};
