//! Profile store implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;
