// Service exports
pub mod auth;
pub mod seed;
pub mod store;

pub use auth::{hash_password, AuthService, IssuedToken, UserAccount};
pub use store::{AllocationStore, InMemoryStore};
