use super::{Collection, DocumentStore, UpsertOutcome};
use crate::error::DbError;
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Database;

/// `DocumentStore` backed by a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection(collection.as_str())
    }
}

impl DocumentStore for MongoStore {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, DbError> {
        let cursor = self.collection(collection).find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_one(&self, collection: Collection, filter: Document) -> Result<Option<Document>, DbError> {
        let document = self.collection(collection).find_one(filter).await?;
        Ok(document)
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<ObjectId, DbError> {
        let result = self.collection(collection).insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(DbError::UnexpectedIdentifier(collection.as_str()))
    }

    async fn upsert_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
    ) -> Result<UpsertOutcome, DbError> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": set })
            .upsert(true)
            .await?;

        Ok(match result.upserted_id {
            Some(_) => UpsertOutcome::Inserted,
            None => UpsertOutcome::Updated,
        })
    }
}
