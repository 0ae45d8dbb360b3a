//! Core data model definitions shared across FlixFlex crates.

pub mod cached_item;
pub mod content_type;
pub mod error;
pub mod payload;
pub mod responses;
pub mod user;

pub use cached_item::{CachedItem, ItemPatch};
pub use content_type::ContentType;
pub use error::{ModelError, Result as ModelResult};
pub use responses::{ByContentType, Listing, PaginatedList, TrailerLink};
pub use user::{
    Claims, FavoriteRequest, LoginRequest, LoginResponse, MessageResponse,
    ProfileResponse, RegisterRequest, RemoveFavoriteRequest, User,
};
