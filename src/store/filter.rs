use bson::{doc, Bson, Document};
use mongodb::options::FindOptions;

use crate::data::id::UserId;
use crate::model::user::UserFindFilter;
use crate::store::error::StoreError;

/// Translates the optional-criteria filter into a store predicate plus
/// sort/pagination options. Categories are ANDed together, the values within
/// one category are ORed via `$in`. The first malformed identifier aborts
/// the whole construction; no partial filter is returned.
pub(crate) fn build_user_find_filter(
    filter: &UserFindFilter,
) -> Result<(Document, FindOptions), StoreError> {
    let mut query = Document::new();

    if !filter.ids.is_empty() {
        let ids = filter
            .ids
            .iter()
            .map(|hex| {
                UserId::from_hex(hex)
                    .map(Bson::from)
                    .map_err(|err| StoreError::Convert(format!("user id {hex:?}: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        query.insert("_id", doc! { "$in": ids });
    }

    if !filter.statuses.is_empty() {
        query.insert("status", doc! { "$in": filter.statuses.clone() });
    }

    for (key, pattern) in &filter.meta_patterns {
        query.insert(
            format!("meta.{key}"),
            doc! {
                "$regex": Bson::RegularExpression(bson::Regex {
                    pattern: pattern.clone(),
                    options: "i".to_string(),
                }),
            },
        );
    }

    let mut options = FindOptions::default();
    if filter.limit.is_some() || filter.offset.is_some() {
        // pagination is only deterministic under a stable order
        options.sort = Some(doc! { "_id": 1 });
    }
    options.skip = filter.offset;
    options.limit = filter
        .limit
        .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));

    Ok((query, options))
}
