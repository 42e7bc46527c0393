use std::collections::HashMap;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::data::id::UserId;
use crate::data::value::MetaValue;
use crate::model::user::User;
use crate::store::error::StoreError;

/// User entity as stored: driver-native identifier, same fields otherwise.
/// An absent `_id` is omitted so the store assigns one on insert; an empty
/// meta map is omitted and read back as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Document::is_empty")]
    pub meta: Document,
}

impl UserDocument {
    /// Builds the stored form of a user. A present identifier is decoded
    /// from its hex string form; decoding failure names the malformed input.
    pub fn new(user: &User) -> Result<Self, StoreError> {
        let id = match user.id.as_deref() {
            Some(hex) => {
                let id = UserId::from_hex(hex)
                    .map_err(|err| StoreError::Convert(format!("user id {hex:?}: {err}")))?;
                Some(id.into())
            }
            None => None,
        };

        let mut meta = Document::new();
        for (key, value) in &user.meta {
            meta.insert(key.as_str(), Bson::from(value.clone()));
        }

        Ok(Self {
            id,
            status: user.status.clone(),
            meta,
        })
    }

    /// Maps the stored form back to the domain entity, normalizing every
    /// meta value recovered from the driver.
    pub fn into_user(self) -> User {
        let meta: HashMap<String, MetaValue> = self
            .meta
            .into_iter()
            .map(|(key, value)| (key, MetaValue::from(value)))
            .collect();

        User {
            id: self.id.map(|id| UserId::from(id).as_hex()),
            status: self.status,
            meta,
        }
    }

    pub fn to_document(&self) -> Result<Document, StoreError> {
        bson::to_document(self).map_err(|err| StoreError::Convert(err.to_string()))
    }
}
