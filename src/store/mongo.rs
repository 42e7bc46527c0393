use bson::{Bson, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};

use crate::store::backend::Backend;

const USER_COLLECTION: &str = "user";

/// Live-driver backend: one client, one `user` collection. Connection string
/// and database name are opaque inputs supplied by the caller.
pub struct MongoBackend {
    client: Client,
    collection: Collection<Document>,
}

impl MongoBackend {
    pub async fn connect(
        conn_string: &str,
        db_name: &str,
    ) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(conn_string).await?;
        let collection = client.database(db_name).collection(USER_COLLECTION);
        Ok(Self { client, collection })
    }
}

#[async_trait::async_trait]
impl Backend for MongoBackend {
    type Error = mongodb::error::Error;

    async fn insert_one(&self, document: Document) -> Result<Bson, Self::Error> {
        let result = self.collection.insert_one(document, None).await?;
        Ok(result.inserted_id)
    }

    async fn find(
        &self,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, Self::Error> {
        // the cursor closes on drop, including on a failed drain
        let cursor = self.collection.find(filter, options).await?;
        cursor.try_collect().await
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, Self::Error> {
        let result = self.collection.delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
    ) -> Result<u64, Self::Error> {
        let result = self.collection.replace_one(filter, replacement, None).await?;
        Ok(result.matched_count)
    }

    async fn disconnect(self) -> Result<(), Self::Error> {
        self.client.shutdown().await;
        Ok(())
    }
}
