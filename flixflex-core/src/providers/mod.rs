pub mod tmdb;
pub mod traits;

pub use tmdb::TmdbProvider;
pub use traits::{MetadataProvider, ProviderError, ProviderPage};

#[cfg(test)]
pub use traits::MockMetadataProvider;
