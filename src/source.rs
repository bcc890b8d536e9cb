use crate::config::Config;
use crate::error::Result;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::future::Future;

/// Something that can run an aggregation pipeline against a named collection.
pub trait AggregateSource {
    fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send;
}

/// Aggregation source backed by a live MongoDB deployment.
pub struct MongoSource {
    client: Client,
    db: Database,
}

impl MongoSource {
    pub async fn connect(cfg: &Config) -> Result<Self> {
        let mut options = ClientOptions::parse(&cfg.mongodb_uri).await?;
        options.app_name = Some(cfg.app_name.clone());
        let client = Client::with_options(options)?;

        // Server selection is lazy; ping so a bad URI fails before any report runs.
        client.database("admin").run_command(doc! {"ping": 1}).await?;
        tracing::info!(database = %cfg.database, "connected to mongodb");

        let db = client.database(&cfg.database);
        Ok(Self { client, db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::debug!("mongodb client shut down");
    }
}

impl AggregateSource for MongoSource {
    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        tracing::debug!(collection, stages = pipeline.len(), "running aggregate");
        let cursor = self
            .db
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        tracing::debug!(collection, rows = docs.len(), "aggregate finished");
        Ok(docs)
    }
}
