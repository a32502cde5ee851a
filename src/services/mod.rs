// Service exports
pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;
pub use store::{ProfileStore, StoreError};
