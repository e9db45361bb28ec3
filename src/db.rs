// src/db.rs

use anyhow::Context;
use mongodb::{
    bson::{doc, Document},
    error::Result,
    options::InsertManyOptions,
    Client, Collection,
};

pub struct Config {
    pub uri: String,
    pub bind: String,
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI").context("MONGODB_URI not set")?;
        let bind = std::env::var("WEBHOOK_BIND").unwrap_or_else(|_| "127.0.0.1:5000".into());

        Ok(Self { uri, bind })
    }
}

#[derive(Clone, Debug)]
pub struct DB {
    pub client: Client,
}

impl DB {
    pub async fn new(config: &Config) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).await?;

        Ok(Self { client })
    }

    // No existence check; an unknown database or collection surfaces as a
    // driver error on the first operation against it.
    fn collection(&self, database: &str, name: &str) -> Collection<Document> {
        self.client.database(database).collection(name)
    }

    pub async fn delete_all(&self, database: &str, name: &str) -> Result<u64> {
        let result = self
            .collection(database, name)
            .delete_many(doc! {}, None)
            .await?;

        Ok(result.deleted_count)
    }

    pub async fn insert_unordered(
        &self,
        database: &str,
        name: &str,
        documents: Vec<Document>,
    ) -> Result<()> {
        let options = InsertManyOptions::builder().ordered(false).build();

        self.collection(database, name)
            .insert_many(documents, options)
            .await?;

        Ok(())
    }

    pub async fn count(&self, database: &str, name: &str) -> Result<u64> {
        self.collection(database, name)
            .count_documents(doc! {}, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::TryStreamExt;

    const TEST_DB: &str = "mongo_updater_test";

    async fn test_handle() -> DB {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".into());

        DB::new(&Config {
            uri,
            bind: String::new(),
        })
        .await
        .expect("client init")
    }

    async fn fetch_all(db: &DB, name: &str) -> Vec<Document> {
        db.collection(TEST_DB, name)
            .find(doc! {}, None)
            .await
            .expect("find")
            .try_collect()
            .await
            .expect("cursor")
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB"]
    async fn delete_all_empties_the_collection() {
        let db = test_handle().await;
        let coll = "delete_all_empties";

        db.insert_unordered(
            TEST_DB,
            coll,
            vec![doc! { "id": 99 }, doc! { "id": 100 }],
        )
        .await
        .expect("seed");

        let deleted = db.delete_all(TEST_DB, coll).await.expect("delete");

        assert!(deleted >= 2);
        assert_eq!(db.count(TEST_DB, coll).await.expect("count"), 0);
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB"]
    async fn delete_all_on_missing_collection_deletes_nothing() {
        let db = test_handle().await;

        let deleted = db
            .delete_all(TEST_DB, "never_created")
            .await
            .expect("delete");

        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB"]
    async fn insert_unordered_persists_every_document() {
        let db = test_handle().await;
        let coll = "insert_persists";

        db.delete_all(TEST_DB, coll).await.expect("clear");
        db.insert_unordered(
            TEST_DB,
            coll,
            vec![doc! { "id": 1, "val": 10 }, doc! { "id": 2, "val": 20 }],
        )
        .await
        .expect("insert");

        let documents = fetch_all(&db, coll).await;

        assert_eq!(documents.len(), 2);
        assert!(documents.iter().any(|d| matches!(d.get_i32("id"), Ok(1))));
        assert!(documents.iter().any(|d| matches!(d.get_i32("id"), Ok(2))));
    }
}
