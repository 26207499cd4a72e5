//! Identity provider implementations.

pub mod http;
pub mod in_memory;

pub use http::HttpIdentityProvider;
pub use in_memory::InMemoryIdentityProvider;
