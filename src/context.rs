//! Application context providing the dependency injection root.

use std::sync::Arc;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use mongodb::bson::doc;
use neo4rs::{query, Graph};
use tokio_postgres::NoTls;

use crate::cache::{FsViewStore, ViewStore};
use crate::config::Config;
use crate::di::Context as ContextDerive;
use crate::docstore::{FacultyDocuments, MongoFacultyStore};
use crate::error::{AppError, Store};
use crate::geocode::Geocoder;

const POSTGRES_POOL_SIZE: usize = 16;

/// Root application context for dependency injection.
///
/// Holds the shared handle for each backing store plus the durable view
/// store and the optional geocoder. `#[derive(Context)]` generates `FromRef`
/// implementations per field, so repositories and the cache resolve their
/// dependencies at compile time.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Neo4j connection pool.
    pub graph: Arc<Graph>,
    /// PostgreSQL connection pool.
    pub relational: Pool,
    /// MongoDB client, kept for shutdown.
    pub mongo: mongodb::Client,
    /// Faculty document collection access.
    pub documents: Arc<dyn FacultyDocuments>,
    /// Durable materialized-view store.
    pub views: Arc<dyn ViewStore>,
    /// Optional institution geocoder.
    pub geocoder: Option<Arc<dyn Geocoder>>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Connects to all three stores sequentially, verifying each with a
    /// round-trip before moving on. Fails fast on the first unreachable
    /// store and releases whatever was already acquired.
    pub async fn connect(
        config: Config,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Result<Self, AppError> {
        tracing::info!("Connecting to Neo4j at {}", config.neo4j.uri);
        let graph = Graph::new(
            &config.neo4j.uri,
            &config.neo4j.user,
            &config.neo4j.password,
        )
        .await
        .map_err(AppError::graph)?;
        graph
            .run(query("RETURN 1"))
            .await
            .map_err(AppError::graph)?;

        tracing::info!("Connecting to PostgreSQL at {}", config.postgres.uri);
        let relational = match Self::connect_postgres(&config).await {
            Ok(pool) => pool,
            Err(err) => return Err(err), // graph handle dropped, nothing else held
        };

        tracing::info!("Connecting to MongoDB at {}", config.mongodb.uri);
        let (mongo, documents) = match Self::connect_mongo(&config).await {
            Ok(connected) => connected,
            Err(err) => {
                relational.close();
                return Err(err);
            }
        };

        let views: Arc<dyn ViewStore> = Arc::new(FsViewStore::new(config.cache.dir.clone()));

        Ok(Self {
            graph: Arc::new(graph),
            relational,
            mongo,
            documents,
            views,
            geocoder,
            config: Arc::new(config),
        })
    }

    /// Releases every store resource. The pool close is synchronous and the
    /// graph handle releases on drop; only MongoDB needs an async farewell.
    pub async fn shutdown(self) {
        self.relational.close();
        self.mongo.shutdown().await;
        tracing::info!("Store connections released");
    }

    async fn connect_postgres(config: &Config) -> Result<Pool, AppError> {
        let pg_config: tokio_postgres::Config =
            config.postgres.uri.parse().map_err(|err| AppError::Connectivity {
                store: Store::Relational,
                message: format!("invalid connection string: {err}"),
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(POSTGRES_POOL_SIZE)
            .build()
            .map_err(|err| AppError::Connectivity {
                store: Store::Relational,
                message: err.to_string(),
            })?;

        // The pool connects lazily; one checkout proves the store reachable.
        let conn = pool.get().await.map_err(AppError::pool)?;
        conn.batch_execute("SELECT 1")
            .await
            .map_err(AppError::relational)?;

        Ok(pool)
    }

    async fn connect_mongo(
        config: &Config,
    ) -> Result<(mongodb::Client, Arc<dyn FacultyDocuments>), AppError> {
        let mongo = mongodb::Client::with_uri_str(&config.mongodb.uri)
            .await
            .map_err(AppError::documents)?;

        let database = mongo.database(&config.mongodb.database);
        // The client connects lazily; a ping proves the store reachable.
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(AppError::documents)?;

        let documents: Arc<dyn FacultyDocuments> = Arc::new(MongoFacultyStore::new(&database));
        Ok((mongo, documents))
    }
}
