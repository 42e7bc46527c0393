use std::collections::HashMap;

use crate::data::value::MetaValue;

/// User storage entity. The identifier is set if and only if the entity has
/// been persisted at least once, and is immutable thereafter. Metadata is a
/// schema-less bag; this layer enforces no status enumeration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<String>,
    pub status: String,
    pub meta: HashMap<String, MetaValue>,
}

/// Transient query object for finding users. Criteria categories combine
/// with AND semantics; the values within one category with OR. When `limit`
/// or `offset` is set, results are ordered ascending by identifier so that
/// repeated queries page consistently.
#[derive(Debug, Clone, Default)]
pub struct UserFindFilter {
    pub ids: Vec<String>,
    pub statuses: Vec<String>,
    /// Per-metadata-key case-insensitive regular expressions.
    pub meta_patterns: HashMap<String, String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
