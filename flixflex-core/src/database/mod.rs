pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::InMemoryDatabase;
pub use ports::{
    CachedItemStore, FavoritesRepository, ItemFilter, ItemUpsert, StoreError,
    StoreResult, UsersRepository,
};
pub use postgres::PostgresDatabase;
