pub mod data;
pub mod model;
pub mod store;

pub use data::id::UserId;
pub use data::value::MetaValue;
pub use model::user::{User, UserFindFilter};
pub use store::{Backend, MemoryBackend, MongoBackend, StoreError, UserStorage};
