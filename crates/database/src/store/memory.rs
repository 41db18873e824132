//! A process-local `DocumentStore`.
//!
//! Keeps each collection as a `Vec<Document>` behind a mutex and evaluates the same
//! filter shapes the MongoDB store receives: plain equality, plus the comparison
//! operators `$gt`, `$gte`, `$lt` and `$lte`. Insertion order is the iteration order.
//! Used by the test suites and by `serve --in-memory`.

use super::{Collection, DocumentStore, UpsertOutcome};
use crate::error::DbError;
use bson::{Bson, Document, doc, oid::ObjectId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Clones share the same underlying collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<Mutex<HashMap<Collection, Vec<Document>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        self.lock().get(&collection).map_or(0, Vec::len)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Collection, Vec<Document>>> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for InMemoryStore {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, DbError> {
        let collections = self.lock();
        let documents: Vec<Document> = collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn find_one(&self, collection: Collection, filter: Document) -> Result<Option<Document>, DbError> {
        let collections = self.lock();
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|document| matches_filter(document, &filter)))
            .cloned())
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<ObjectId, DbError> {
        let id = ObjectId::new();
        let mut stored = doc! { "_id": id };
        for (key, value) in document {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        self.lock().entry(collection).or_default().push(stored);
        Ok(id)
    }

    async fn upsert_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
    ) -> Result<UpsertOutcome, DbError> {
        let mut collections = self.lock();
        let documents = collections.entry(collection).or_default();

        if let Some(existing) = documents.iter_mut().find(|document| matches_filter(document, &filter)) {
            for (key, value) in set {
                existing.insert(key, value);
            }
            return Ok(UpsertOutcome::Updated);
        }

        let mut created = doc! { "_id": ObjectId::new() };
        for (key, value) in filter {
            if operator_document(&value).is_none() {
                created.insert(key, value);
            }
        }
        for (key, value) in set {
            created.insert(key, value);
        }
        documents.push(created);
        Ok(UpsertOutcome::Inserted)
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let value = document.get(key);
        match operator_document(condition) {
            Some(operators) => operators
                .iter()
                .all(|(operator, bound)| satisfies(value, operator, bound)),
            None => value.is_some_and(|value| {
                value == condition || compare(value, condition) == Some(Ordering::Equal)
            }),
        }
    })
}

/// Returns the document if every key in it is a `$` operator.
fn operator_document(condition: &Bson) -> Option<&Document> {
    match condition {
        Bson::Document(operators)
            if !operators.is_empty() && operators.keys().all(|key| key.starts_with('$')) =>
        {
            Some(operators)
        }
        _ => None,
    }
}

fn satisfies(value: Option<&Bson>, operator: &str, bound: &Bson) -> bool {
    let Some(ordering) = value.and_then(|value| compare(value, bound)) else {
        return false;
    };
    match operator {
        "$gt" => ordering.is_gt(),
        "$gte" => ordering.is_ge(),
        "$lt" => ordering.is_lt(),
        "$lte" => ordering.is_le(),
        _ => false,
    }
}

/// Orders two values of the same kind. Values of different kinds are incomparable,
/// except numbers, which compare across integer and floating-point representations.
fn compare(left: &Bson, right: &Bson) -> Option<Ordering> {
    match (left, right) {
        (Bson::DateTime(left), Bson::DateTime(right)) => {
            Some(left.timestamp_millis().cmp(&right.timestamp_millis()))
        }
        (Bson::String(left), Bson::String(right)) => Some(left.cmp(right)),
        (Bson::ObjectId(left), Bson::ObjectId(right)) => Some(left.bytes().cmp(&right.bytes())),
        _ => as_number(left)?.partial_cmp(&as_number(right)?),
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(value) => Some(f64::from(*value)),
        Bson::Int64(value) => Some(*value as f64),
        Bson::Double(value) => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::DateTime;

    fn millis(value: i64) -> Bson {
        Bson::DateTime(DateTime::from_millis(value))
    }

    #[test]
    fn test_equality_filter() {
        let document = doc! { "code": "CS101", "credits": 3_i32 };
        assert!(matches_filter(&document, &doc! {}));
        assert!(matches_filter(&document, &doc! { "code": "CS101" }));
        assert!(matches_filter(&document, &doc! { "credits": 3_i64 }));
        assert!(!matches_filter(&document, &doc! { "code": "CS102" }));
        assert!(!matches_filter(&document, &doc! { "missing": "x" }));
    }

    #[test]
    fn test_range_filter_is_half_open() {
        let filter = doc! { "date": { "$gte": millis(1_000), "$lt": millis(2_000) } };
        assert!(matches_filter(&doc! { "date": millis(1_000) }, &filter));
        assert!(matches_filter(&doc! { "date": millis(1_999) }, &filter));
        assert!(!matches_filter(&doc! { "date": millis(2_000) }, &filter));
        assert!(!matches_filter(&doc! { "date": millis(999) }, &filter));
        assert!(!matches_filter(&doc! { "date": "1500" }, &filter));
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_ids() {
        let store = InMemoryStore::new();
        let first = store.insert_one(Collection::Courses, doc! { "code": "A" }).await.unwrap();
        let second = store
            .insert_one(Collection::Courses, doc! { "_id": "ignored", "code": "B" })
            .await
            .unwrap();
        assert_ne!(first, second);

        let found = store
            .find_one(Collection::Courses, doc! { "_id": second })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("code").unwrap(), "B");
        assert_eq!(store.count(Collection::Courses), 2);
        assert_eq!(store.count(Collection::Students), 0);
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = InMemoryStore::new();
        let key = doc! { "student": "s1", "day": millis(0) };

        let outcome = store
            .upsert_one(Collection::Attendance, key.clone(), doc! { "status": "present" })
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let outcome = store
            .upsert_one(Collection::Attendance, key.clone(), doc! { "status": "absent" })
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let documents = store.find(Collection::Attendance, doc! {}).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].get_str("student").unwrap(), "s1");
        assert_eq!(documents[0].get_str("status").unwrap(), "absent");
        assert!(documents[0].get_object_id("_id").is_ok());
    }
}
