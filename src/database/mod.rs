use crate::utils::AppError;
use mongodb::{options::ClientOptions, Client, Collection, Database};

pub const USERS_COLLECTION: &str = "users";

const DEFAULT_DB_NAME: &str = "food-del";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));
        client_options.app_name = Some("food-cart-service".to_string());

        let db_name = database_name(&client_options);
        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        Ok(Self { db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Check if the connection is healthy
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db.list_collection_names().await?;
        Ok(())
    }
}

/// Database name from the URI path (`mongodb://host/<name>`), default `food-del`
fn database_name(options: &ClientOptions) -> String {
    options
        .default_database
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DB_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn name_for(uri: &str) -> String {
        database_name(&ClientOptions::parse(uri).await.unwrap())
    }

    #[actix_rt::test]
    async fn test_database_name_from_path() {
        assert_eq!(name_for("mongodb://localhost:27017/shop").await, "shop");
        assert_eq!(
            name_for("mongodb://u:p@localhost:27017/food?retryWrites=true").await,
            "food"
        );
    }

    #[actix_rt::test]
    async fn test_database_name_defaults() {
        assert_eq!(name_for("mongodb://localhost:27017").await, "food-del");
        assert_eq!(name_for("mongodb://localhost:27017/").await, "food-del");
        assert_eq!(name_for("mongodb://localhost:27017/?w=majority").await, "food-del");
    }

    #[actix_rt::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/food-del".to_string());

        let db = MongoDB::new(&uri).await.unwrap();
        db.health_check().await.unwrap();
    }
}
