use bson::{Bson, Document};
use mongodb::options::FindOptions;

/// Capability interface over the backing document store. Every method is a
/// single round trip; implementations hold no per-call state, so an in-memory
/// fake can substitute for a live store in tests.
#[async_trait::async_trait]
pub trait Backend
where
    Self: Sized + Send + Sync + 'static,
{
    type Error: std::error::Error + Send + Sync + 'static;

    /// Inserts a document and returns the identifier the store assigned.
    async fn insert_one(&self, document: Document) -> Result<Bson, Self::Error>;

    /// Runs a predicate query and drains all matching documents.
    async fn find(
        &self,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, Self::Error>;

    /// Deletes the first matching document, returning the deleted count.
    async fn delete_one(&self, filter: Document) -> Result<u64, Self::Error>;

    /// Replaces the first matching document wholesale, returning the
    /// matched count.
    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
    ) -> Result<u64, Self::Error>;

    /// Releases the backing connection. Consumes the backend: release
    /// happens at most once, by construction.
    async fn disconnect(self) -> Result<(), Self::Error>;
}
