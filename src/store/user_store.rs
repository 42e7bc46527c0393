use bson::doc;

use crate::data::id::UserId;
use crate::model::user::{User, UserFindFilter};
use crate::store::backend::Backend;
use crate::store::document::UserDocument;
use crate::store::error::StoreError;
use crate::store::filter::build_user_find_filter;
use crate::store::mongo::MongoBackend;

/// Storage adapter for user entities. Holds nothing beyond the backend
/// handle; every operation is a single store round trip, so the adapter is
/// safe for concurrent use behind `&self`. Retry policy, if any, belongs to
/// the caller.
pub struct UserStorage<B: Backend> {
    backend: B,
}

impl UserStorage<MongoBackend> {
    /// Connects to a live store, using the `user` collection of the given
    /// database.
    pub async fn connect(conn_string: &str, db_name: &str) -> Result<Self, StoreError> {
        let backend = MongoBackend::connect(conn_string, db_name)
            .await
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        Ok(Self::new(backend))
    }
}

impl<B: Backend> UserStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Adds a new user. The store assigns the identifier on insert; the
    /// returned entity carries it in hex form.
    pub async fn add(&self, user: User) -> Result<User, StoreError> {
        let mut stored = UserDocument::new(&user)?;
        let document = stored.to_document()?;

        let inserted_id = self
            .backend
            .insert_one(document)
            .await
            .map_err(|err| StoreError::Insert(err.to_string()))?;
        if let Some(id) = inserted_id.as_object_id() {
            stored.id = Some(id);
        }

        Ok(stored.into_user())
    }

    /// Deletes a user by identifier. Matching no document reports "not
    /// found" on the delete kind, distinct from a malformed identifier.
    pub async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let id = UserId::from_hex(user_id)
            .map_err(|err| StoreError::Convert(format!("user id {user_id:?}: {err}")))?;

        let deleted = self
            .backend
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|err| StoreError::Delete(err.to_string()))?;
        if deleted == 0 {
            return Err(StoreError::Delete("user not found".to_string()));
        }

        Ok(())
    }

    /// Replaces the full document at the user's identifier. This is a
    /// wholesale replace, not a field merge: the caller supplies the
    /// complete metadata map to retain.
    pub async fn update(&self, user: User) -> Result<User, StoreError> {
        let stored = UserDocument::new(&user)?;
        let id = match stored.id {
            Some(id) => id,
            None => return Err(StoreError::Update("user has no identifier".to_string())),
        };
        let replacement = stored.to_document()?;

        let matched = self
            .backend
            .replace_one(doc! { "_id": id }, replacement)
            .await
            .map_err(|err| StoreError::Update(err.to_string()))?;
        if matched == 0 {
            return Err(StoreError::Update("user not found".to_string()));
        }

        Ok(stored.into_user())
    }

    /// Finds users by filter. When pagination is requested the result is
    /// ordered ascending by identifier; otherwise the order is
    /// storage-defined.
    pub async fn find(&self, filter: UserFindFilter) -> Result<Vec<User>, StoreError> {
        // construction validates every id, even when the page is empty
        let (query, options) = build_user_find_filter(&filter)?;

        // the driver reads a zero limit as "no limit"; the contract here is
        // an empty page
        if filter.limit == Some(0) {
            return Ok(Vec::new());
        }

        let documents = self
            .backend
            .find(query, options)
            .await
            .map_err(|err| StoreError::Find(err.to_string()))?;

        documents
            .into_iter()
            .map(|document| {
                let stored: UserDocument = bson::from_document(document)
                    .map_err(|err| StoreError::Convert(err.to_string()))?;
                Ok(stored.into_user())
            })
            .collect()
    }

    /// Releases the backing connection. Consumes the adapter, so release
    /// happens at most once.
    pub async fn disconnect(self) -> Result<(), StoreError> {
        self.backend
            .disconnect()
            .await
            .map_err(|err| StoreError::Connection(err.to_string()))
    }
}
