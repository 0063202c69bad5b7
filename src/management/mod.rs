mod auth;
pub mod store;

pub use auth::TokenManager;
pub use store::{CredentialStore, FileStore, MemoryStore, Store};
