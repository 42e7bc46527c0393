mod backend;
mod document;
mod error;
mod filter;
mod memory;
mod mongo;
mod user_store;

pub use backend::Backend;
pub use error::StoreError;
pub use memory::{MemoryBackend, MemoryError};
pub use mongo::MongoBackend;
pub use user_store::UserStorage;
