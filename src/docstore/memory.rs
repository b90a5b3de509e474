//! In-memory faculty document backend.
//!
//! Stands in for MongoDB in offline tests and demos. Tracks how many
//! primitive reads it has served so cache tests can assert that a present
//! materialized view short-circuits the source entirely.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AppError;

use super::FacultyDocuments;

/// One faculty document, reduced to the fields the aggregates read.
#[derive(Debug, Clone)]
pub struct FacultyRecord {
    pub name: String,
    pub affiliation: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryFacultyStore {
    records: Vec<FacultyRecord>,
    reads: AtomicUsize,
}

impl InMemoryFacultyStore {
    pub fn new(records: Vec<FacultyRecord>) -> Self {
        Self {
            records,
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of primitive reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl FacultyDocuments for InMemoryFacultyStore {
    async fn distinct_affiliations(&self) -> Result<Vec<String>, AppError> {
        self.record_read();
        let names: BTreeSet<&str> = self
            .records
            .iter()
            .map(|record| record.affiliation.as_str())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    async fn count_by_affiliation(&self, institute: &str) -> Result<u64, AppError> {
        self.record_read();
        Ok(self
            .records
            .iter()
            .filter(|record| record.affiliation == institute)
            .count() as u64)
    }

    async fn distinct_faculty_names(&self) -> Result<Vec<String>, AppError> {
        self.record_read();
        let names: BTreeSet<&str> = self
            .records
            .iter()
            .map(|record| record.name.as_str())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    async fn keywords_of(&self, faculty_name: &str) -> Result<Vec<String>, AppError> {
        self.record_read();
        Ok(self
            .records
            .iter()
            .find(|record| record.name == faculty_name)
            .map(|record| record.keywords.clone())
            .unwrap_or_default())
    }
}
