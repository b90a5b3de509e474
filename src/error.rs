//! Application error types with per-store classification.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Which backing store an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    Graph,
    Relational,
    Documents,
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Store::Graph => "graph",
            Store::Relational => "relational",
            Store::Documents => "document",
        };
        f.write_str(name)
    }
}

/// Coarse error category, stable across driver error churn.
///
/// Callers route on this rather than on driver error types, so swapping a
/// backend never changes caller-visible error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    NotFound,
    Validation,
    Timeout,
    CacheBuild,
    Query,
    Config,
}

/// Application-level errors for academe.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{store} store unreachable: {message}")]
    Connectivity { store: Store, message: String },

    #[error("Faculty not found: {0}")]
    FacultyNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{store} store deadline exceeded: {message}")]
    Timeout { store: Store, message: String },

    #[error("materialized view '{view}' unavailable: {message}")]
    CacheBuild { view: String, message: String },

    #[error("{store} store query error: {message}")]
    Query { store: Store, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Connectivity { .. } => ErrorKind::Connectivity,
            AppError::FacultyNotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::CacheBuild { .. } => ErrorKind::CacheBuild,
            AppError::Query { .. } => ErrorKind::Query,
            AppError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether retrying the same call can reasonably succeed without any
    /// input change. Connectivity and deadline failures qualify, everything
    /// else reflects the request or the stored data.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Connectivity | ErrorKind::Timeout
        )
    }

    pub(crate) fn timeout(store: Store, after: Duration) -> Self {
        AppError::Timeout {
            store,
            message: format!("operation exceeded {}s deadline", after.as_secs()),
        }
    }

    /// Classify a Neo4j driver error.
    pub(crate) fn graph(err: neo4rs::Error) -> Self {
        match err {
            neo4rs::Error::ConnectionError => AppError::Connectivity {
                store: Store::Graph,
                message: "connection refused or dropped".into(),
            },
            neo4rs::Error::AuthenticationError(message) => AppError::Connectivity {
                store: Store::Graph,
                message: format!("authentication failed: {message}"),
            },
            other => AppError::Query {
                store: Store::Graph,
                message: other.to_string(),
            },
        }
    }

    /// Classify a graph row decoding failure. Always a query error: by the
    /// time a row decodes, transport has already succeeded.
    pub(crate) fn graph_row(err: neo4rs::DeError) -> Self {
        AppError::Query {
            store: Store::Graph,
            message: err.to_string(),
        }
    }

    /// Classify a Postgres driver error.
    pub(crate) fn relational(err: tokio_postgres::Error) -> Self {
        if let Some(db) = err.as_db_error() {
            AppError::Query {
                store: Store::Relational,
                message: db.message().to_string(),
            }
        } else if err.is_closed() {
            AppError::Connectivity {
                store: Store::Relational,
                message: err.to_string(),
            }
        } else {
            AppError::Query {
                store: Store::Relational,
                message: err.to_string(),
            }
        }
    }

    /// Classify a connection pool error.
    pub(crate) fn pool(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Backend(db) => AppError::relational(db),
            deadpool_postgres::PoolError::Timeout(_) => AppError::Timeout {
                store: Store::Relational,
                message: "connection pool checkout timed out".into(),
            },
            other => AppError::Connectivity {
                store: Store::Relational,
                message: other.to_string(),
            },
        }
    }

    /// Classify a MongoDB driver error.
    pub(crate) fn documents(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind as MongoKind;

        match *err.kind {
            MongoKind::ServerSelection { .. }
            | MongoKind::Io(_)
            | MongoKind::DnsResolve { .. }
            | MongoKind::Authentication { .. } => AppError::Connectivity {
                store: Store::Documents,
                message: err.to_string(),
            },
            _ => AppError::Query {
                store: Store::Documents,
                message: err.to_string(),
            },
        }
    }
}
