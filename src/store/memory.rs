use std::sync::Mutex;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use mongodb::options::FindOptions;
use regex::RegexBuilder;

use crate::store::backend::Backend;

/// In-memory stand-in for the document store. Evaluates the predicate
/// subset the adapter emits: literal equality, `$in` on a field,
/// case-insensitive `$regex` on a dotted path, `_id` ascending sort, skip
/// and limit. Insert enforces `_id` uniqueness the way the store's primary
/// index would.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: Mutex<Vec<Document>>,
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("duplicate key error collection: user dup key: {0}")]
    DuplicateKey(Bson),

    #[error("unsupported filter condition on {0:?}")]
    UnsupportedFilter(String),

    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(document: &Document, filter: &Document) -> Result<bool, MemoryError> {
        for (key, condition) in filter {
            let value = lookup(document, key);
            let condition = match condition.as_document() {
                Some(condition) if condition.keys().any(|key| key.starts_with('$')) => condition,
                // anything else is a literal equality match
                _ => {
                    if value != Some(condition) {
                        return Ok(false);
                    }
                    continue;
                }
            };

            if let Some(candidates) = condition.get("$in") {
                let candidates = candidates
                    .as_array()
                    .ok_or_else(|| MemoryError::UnsupportedFilter(key.clone()))?;
                match value {
                    Some(value) if candidates.contains(value) => {}
                    _ => return Ok(false),
                }
            } else if let Some(Bson::RegularExpression(regex)) = condition.get("$regex") {
                let regex = RegexBuilder::new(&regex.pattern)
                    .case_insensitive(regex.options.contains('i'))
                    .build()
                    .map_err(|err| MemoryError::InvalidRegex(err.to_string()))?;
                // regex conditions match string fields only
                match value.and_then(Bson::as_str) {
                    Some(value) if regex.is_match(value) => {}
                    _ => return Ok(false),
                }
            } else {
                return Err(MemoryError::UnsupportedFilter(key.clone()));
            }
        }
        Ok(true)
    }
}

fn first_match(documents: &[Document], filter: &Document) -> Result<Option<usize>, MemoryError> {
    for (index, document) in documents.iter().enumerate() {
        if MemoryBackend::matches(document, filter)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Resolves a dotted path (`meta.email`) against nested documents.
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut current = document;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        current = value.as_document()?;
    }
    None
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    type Error = MemoryError;

    async fn insert_one(&self, mut document: Document) -> Result<Bson, Self::Error> {
        let mut documents = self.documents.lock().unwrap();
        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert("_id", id.clone());
                id
            }
        };
        if documents.iter().any(|existing| existing.get("_id") == Some(&id)) {
            return Err(MemoryError::DuplicateKey(id));
        }
        documents.push(document);
        Ok(id)
    }

    async fn find(
        &self,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, Self::Error> {
        let documents = self.documents.lock().unwrap();
        let mut matched = Vec::new();
        for document in documents.iter() {
            if Self::matches(document, &filter)? {
                matched.push(document.clone());
            }
        }

        if options.sort == Some(bson::doc! { "_id": 1 }) {
            matched.sort_by_key(|document| {
                document
                    .get_object_id("_id")
                    .map(|id| id.bytes())
                    .unwrap_or_default()
            });
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let mut page: Vec<Document> = matched.into_iter().skip(skip).collect();
        // the driver reads limit <= 0 as "no limit"
        if let Some(limit) = options.limit.filter(|limit| *limit > 0) {
            page.truncate(limit as usize);
        }
        Ok(page)
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, Self::Error> {
        let mut documents = self.documents.lock().unwrap();
        match first_match(&documents, &filter)? {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn replace_one(
        &self,
        filter: Document,
        mut replacement: Document,
    ) -> Result<u64, Self::Error> {
        let mut documents = self.documents.lock().unwrap();
        let index = match first_match(&documents, &filter)? {
            Some(index) => index,
            None => return Ok(0),
        };
        if !replacement.contains_key("_id") {
            if let Some(id) = documents[index].get("_id").cloned() {
                replacement.insert("_id", id);
            }
        }
        documents[index] = replacement;
        Ok(1)
    }

    async fn disconnect(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let backend = MemoryBackend::new();
        let id = backend
            .insert_one(doc! { "status": "active" })
            .await
            .unwrap();
        assert!(id.as_object_id().is_some());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let backend = MemoryBackend::new();
        let id = ObjectId::new();
        backend.insert_one(doc! { "_id": id }).await.unwrap();
        let err = backend.insert_one(doc! { "_id": id }).await.unwrap_err();
        assert!(err.to_string().contains("duplicate key"));
    }

    #[tokio::test]
    async fn test_find_in_condition() {
        let backend = MemoryBackend::new();
        backend.insert_one(doc! { "status": "active" }).await.unwrap();
        backend.insert_one(doc! { "status": "blocked" }).await.unwrap();

        let found = backend
            .find(
                doc! { "status": { "$in": ["active"] } },
                FindOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("status").unwrap(), "active");
    }

    #[tokio::test]
    async fn test_find_regex_on_dotted_path() {
        let backend = MemoryBackend::new();
        backend
            .insert_one(doc! { "meta": { "email": "Test@Example.com" } })
            .await
            .unwrap();
        backend
            .insert_one(doc! { "meta": { "email": 42 } })
            .await
            .unwrap();
        backend.insert_one(doc! { "meta": {} }).await.unwrap();

        let filter = doc! {
            "meta.email": {
                "$regex": Bson::RegularExpression(bson::Regex {
                    pattern: "^test@".to_string(),
                    options: "i".to_string(),
                }),
            },
        };
        let found = backend.find(filter, FindOptions::default()).await.unwrap();
        // case-insensitive, and only string fields can match
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_find_sorts_and_paginates() {
        let backend = MemoryBackend::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let id = backend.insert_one(doc! {}).await.unwrap();
            ids.push(id.as_object_id().unwrap());
        }
        ids.sort_by_key(|id| id.bytes());

        let mut options = FindOptions::default();
        options.sort = Some(doc! { "_id": 1 });
        options.skip = Some(1);
        options.limit = Some(2);
        let found = backend.find(doc! {}, options).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].get_object_id("_id").unwrap(), ids[1]);
        assert_eq!(found[1].get_object_id("_id").unwrap(), ids[2]);
    }

    #[tokio::test]
    async fn test_delete_one() {
        let backend = MemoryBackend::new();
        let id = backend.insert_one(doc! {}).await.unwrap();
        backend.insert_one(doc! {}).await.unwrap();

        let deleted = backend
            .delete_one(doc! { "_id": { "$in": [id.clone()] } })
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        let deleted = backend
            .delete_one(doc! { "_id": { "$in": [id] } })
            .await
            .unwrap();
        assert_eq!(deleted, 0);
        let remaining = backend.find(doc! {}, FindOptions::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_one_keeps_id() {
        let backend = MemoryBackend::new();
        let id = backend
            .insert_one(doc! { "status": "active" })
            .await
            .unwrap();

        let matched = backend
            .replace_one(
                doc! { "_id": { "$in": [id.clone()] } },
                doc! { "status": "blocked" },
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let found = backend.find(doc! {}, FindOptions::default()).await.unwrap();
        assert_eq!(found[0].get("_id").unwrap(), &id);
        assert_eq!(found[0].get_str("status").unwrap(), "blocked");
    }

    #[tokio::test]
    async fn test_equality_condition() {
        let backend = MemoryBackend::new();
        backend.insert_one(doc! { "status": "active" }).await.unwrap();
        backend.insert_one(doc! { "status": "blocked" }).await.unwrap();
        let found = backend
            .find(doc! { "status": "active" }, FindOptions::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_condition() {
        let backend = MemoryBackend::new();
        backend.insert_one(doc! { "count": 1 }).await.unwrap();
        let err = backend
            .find(doc! { "count": { "$gt": 0 } }, FindOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::UnsupportedFilter(_)), "{err:?}");
    }
}
