use std::fmt::Display;

use bson::oid::ObjectId;
use bson::Bson;

/// Native store identifier: a fixed-width 12-byte ObjectId, rendered
/// externally as its 24-character hexadecimal string form.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct UserId(ObjectId);

impl UserId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn from_hex(hex: &str) -> Result<Self, bson::oid::Error> {
        ObjectId::parse_str(hex).map(Self)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl From<ObjectId> for UserId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<UserId> for ObjectId {
    fn from(id: UserId) -> ObjectId {
        id.0
    }
}

impl From<UserId> for Bson {
    fn from(id: UserId) -> Bson {
        Bson::ObjectId(id.0)
    }
}
