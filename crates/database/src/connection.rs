use crate::error::DbError;
use crate::store::MongoStore;
use bson::doc;
use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::info;

/// Connects to MongoDB and returns a store bound to `db_name`.
///
/// The driver maintains its own connection pool, so the returned store is cheap to
/// clone and is shared across every request for the lifetime of the process. A `ping`
/// is issued up front so a misconfigured URI fails at startup rather than on the
/// first request.
pub async fn connect(mongo_uri: &str, db_name: &str) -> Result<MongoStore, DbError> {
    if db_name.is_empty() {
        return Err(DbError::ConnectionConfigError("DB_NAME must not be empty.".to_string()));
    }

    let mut options = ClientOptions::parse(mongo_uri).await?;
    options.app_name = Some("rollcall".to_string());
    options.max_pool_size = Some(10);
    options.server_selection_timeout = Some(Duration::from_secs(5));

    let client = Client::with_options(options)?;
    let database = client.database(db_name);
    database.run_command(doc! { "ping": 1 }).await?;

    info!(db_name, "Connected to MongoDB");
    Ok(MongoStore::new(database))
}
