//! MongoDB-backed faculty document access.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::Deserialize;

use crate::error::AppError;

use super::FacultyDocuments;

const FACULTY_COLLECTION: &str = "faculty";
const AFFILIATION_NAME: &str = "affiliation.name";

/// Faculty collection client over a shared MongoDB connection.
pub struct MongoFacultyStore {
    faculty: Collection<FacultyDoc>,
}

impl MongoFacultyStore {
    pub fn new(database: &Database) -> Self {
        Self {
            faculty: database.collection(FACULTY_COLLECTION),
        }
    }
}

/// The subset of a faculty document the aggregates read.
#[derive(Debug, Deserialize)]
struct FacultyDoc {
    #[serde(default)]
    keywords: Vec<KeywordEntry>,
}

/// Keywords appear in two shapes across dataset vintages, bare strings and
/// `{ name, score }` sub-documents. Both normalize to the keyword name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordEntry {
    Bare(String),
    Tagged { name: String },
}

impl KeywordEntry {
    fn into_name(self) -> String {
        match self {
            KeywordEntry::Bare(name) => name,
            KeywordEntry::Tagged { name } => name,
        }
    }
}

#[async_trait]
impl FacultyDocuments for MongoFacultyStore {
    async fn distinct_affiliations(&self) -> Result<Vec<String>, AppError> {
        let values = self
            .faculty
            .distinct(AFFILIATION_NAME, doc! {})
            .await
            .map_err(AppError::documents)?;

        // Non-string entries are dataset dirt, skipped rather than fatal.
        Ok(values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }

    async fn count_by_affiliation(&self, institute: &str) -> Result<u64, AppError> {
        self.faculty
            .count_documents(doc! { AFFILIATION_NAME: institute })
            .await
            .map_err(AppError::documents)
    }

    async fn distinct_faculty_names(&self) -> Result<Vec<String>, AppError> {
        let values = self
            .faculty
            .distinct("name", doc! {})
            .await
            .map_err(AppError::documents)?;

        Ok(values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }

    async fn keywords_of(&self, faculty_name: &str) -> Result<Vec<String>, AppError> {
        let document = self
            .faculty
            .find_one(doc! { "name": faculty_name })
            .await
            .map_err(AppError::documents)?;

        Ok(document
            .map(|doc| doc.keywords.into_iter().map(KeywordEntry::into_name).collect())
            .unwrap_or_default())
    }
}
