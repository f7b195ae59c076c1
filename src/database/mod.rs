pub mod users;

#[cfg(test)]
pub mod memory;

pub use users::{MongoUserStore, StoreError, UserStore};

use crate::config::Settings;
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{bson::doc, Client, Collection, Database, IndexModel};
use std::time::Duration;

const DEFAULT_DATABASE: &str = "test";

// IndexOptionsConflict, IndexKeySpecsConflict
const INDEX_CONFLICT_CODES: [i32; 2] = [85, 86];

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Connects and pings the server. Called once from `main`; the handle is
    /// shared for the life of the process.
    pub async fn connect(settings: &Settings) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&settings.mongo_uri).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = settings
            .database_name
            .clone()
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        db.run_command(doc! { "ping": 1 }).await?;
        log::info!("📊 Using database '{}'", db_name);

        let mongodb = Self { client, db };
        mongodb.ensure_indexes(settings.unique_names).await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self, unique_names: bool) -> Result<(), mongodb::error::Error> {
        let Some(index) = name_index(unique_names) else {
            log::info!("   ℹ️  Name uniqueness checked by lookup only");
            return Ok(());
        };

        let users = self.collection::<mongodb::bson::Document>(users::COLLECTION);

        // Fails if duplicate names are already stored.
        match users.create_index(index).await {
            Ok(_) => {
                log::info!("   ✅ Index ready: users(name) unique");
                Ok(())
            }
            Err(e) if is_index_conflict(&e) => {
                log::error!("❌ Drop the users(name) index before enabling UNIQUE_NAME_INDEX");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn shutdown(self) {
        log::info!("🔌 Closing MongoDB connection");
        self.client.shutdown().await;
    }
}

/// Unique index on `users.name`, under the driver's default name (`name_1`).
/// Without `unique_names` no index is created.
fn name_index(unique_names: bool) -> Option<IndexModel> {
    unique_names.then(|| {
        IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build()
    })
}

fn is_index_conflict(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(command_error) if INDEX_CONFLICT_CODES.contains(&command_error.code)
    )
}
