//! Document-store access for the faculty collection.
//!
//! The aggregate cache composes these read primitives into materialized
//! views; nothing else talks to the document store. The trait keeps the
//! cache testable against an in-memory backend.

mod memory;
mod mongo;

pub use memory::{FacultyRecord, InMemoryFacultyStore};
pub use mongo::MongoFacultyStore;

use async_trait::async_trait;

use crate::error::AppError;

/// Read-side primitives over the faculty document collection.
#[async_trait]
pub trait FacultyDocuments: Send + Sync {
    /// Distinct institution names referenced by any faculty document.
    async fn distinct_affiliations(&self) -> Result<Vec<String>, AppError>;

    /// Number of faculty documents affiliated with the given institution.
    async fn count_by_affiliation(&self, institute: &str) -> Result<u64, AppError>;

    /// Distinct faculty names across the collection.
    async fn distinct_faculty_names(&self) -> Result<Vec<String>, AppError>;

    /// Keyword names recorded for one faculty member. Empty when the name is
    /// unknown or the document carries no keywords; never an error.
    async fn keywords_of(&self, faculty_name: &str) -> Result<Vec<String>, AppError>;
}
