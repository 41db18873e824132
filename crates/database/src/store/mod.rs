//! The seam between the repository adapters and the document store.
//!
//! The adapters only ever issue four shapes of operation: `find`, `find_one`,
//! `insert_one` and an upsert with `$set` semantics. Filters are equality documents
//! whose values may also be range operators (`{"$gte": .., "$lt": ..}`).

pub mod memory;
pub mod mongo;

use crate::error::DbError;
use bson::{Document, oid::ObjectId};
use std::future::Future;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// The collections this system reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Courses,
    Attendance,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Courses => "courses",
            Collection::Attendance => "attendance",
        }
    }
}

/// Whether an upsert modified an existing document or created a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated,
    Inserted,
}

pub trait DocumentStore: Send + Sync + 'static {
    /// All documents matching `filter`, in store-default order.
    fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> impl Future<Output = Result<Vec<Document>, DbError>> + Send;

    fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> impl Future<Output = Result<Option<Document>, DbError>> + Send;

    /// Inserts `document` and returns the `_id` the store assigned to it.
    fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<ObjectId, DbError>> + Send;

    /// Sets the fields of `set` on the first document matching `filter`. When nothing
    /// matches, inserts a document made of the filter's equality fields plus `set`.
    fn upsert_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;
}
