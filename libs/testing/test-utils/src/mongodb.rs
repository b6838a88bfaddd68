//! MongoDB test infrastructure

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper; the container is removed when this is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database("products_test");
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub connection_string: String,
}

impl TestMongo {
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port = host_port, "Test MongoDB ready");

        Self {
            container,
            client,
            connection_string,
        }
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }
}
