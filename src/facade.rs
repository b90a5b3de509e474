//! Domain-shaped operations behind one facade.

use std::sync::Arc;

use crate::cache::AggregateCache;
use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::error::AppError;
use crate::geocode::Geocoder;
use crate::models::{
    CitationPoint, FacultyDetail, FacultyKeywords, Institute, InstituteFacultyCount,
    KeywordInstituteFaculty, NewFaculty, Publication,
};
use crate::repositories::{GraphRepository, RelationalRepository};

/// Composes the repositories and the aggregate cache behind one interface.
///
/// Constructed once per process. Construction connects to every store and
/// fails fast if any is unreachable, so a facade in hand means all stores
/// were up at startup. Each operation delegates to exactly one component;
/// there is no cross-store logic here.
pub struct PersistenceFacade {
    context: Context,
    graph: GraphRepository,
    relational: RelationalRepository,
    cache: AggregateCache,
}

impl PersistenceFacade {
    /// Connects to all stores with no geocoder; aggregate coordinates stay
    /// at the (0, 0) sentinel.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        Self::connect_with(config, None).await
    }

    /// Connects to all stores with an optional geocoder for institution
    /// coordinates.
    pub async fn connect_with(
        config: Config,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Result<Self, AppError> {
        let context = Context::connect(config, geocoder).await?;
        Ok(Self::from_context(context))
    }

    /// Assembles the facade over an already-connected context.
    pub fn from_context(context: Context) -> Self {
        Self {
            graph: GraphRepository::from_ref(&context),
            relational: RelationalRepository::from_ref(&context),
            cache: AggregateCache::from_ref(&context),
            context,
        }
    }

    /// Releases all store resources. Safe to call exactly once; resources
    /// that failed to connect never produce a facade in the first place.
    pub async fn shutdown(self) {
        self.context.shutdown().await;
    }

    // Graph store.

    pub async fn list_institutes(&self) -> Result<Vec<Institute>, AppError> {
        self.graph.list_institutes().await
    }

    pub async fn list_faculty(&self, institute_name: &str) -> Result<Vec<String>, AppError> {
        self.graph.list_faculty(institute_name).await
    }

    pub async fn faculty_detail(&self, faculty_name: &str) -> Result<FacultyDetail, AppError> {
        self.graph.faculty_detail(faculty_name).await
    }

    pub async fn upsert_faculty(&self, faculty: &NewFaculty) -> Result<(), AppError> {
        self.graph.upsert_faculty(faculty).await
    }

    pub async fn delete_faculty(
        &self,
        faculty_name: &str,
        institute_name: &str,
    ) -> Result<(), AppError> {
        self.graph.delete_faculty(faculty_name, institute_name).await
    }

    pub async fn keyword_institute_faculty_triples(
        &self,
    ) -> Result<Vec<KeywordInstituteFaculty>, AppError> {
        self.graph.keyword_institute_faculty_triples().await
    }

    // Relational store.

    pub async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Publication>, AppError> {
        self.relational.search_by_keyword(keyword).await
    }

    pub async fn search_by_faculty(
        &self,
        faculty_name: &str,
    ) -> Result<Vec<Publication>, AppError> {
        self.relational.search_by_faculty(faculty_name).await
    }

    pub async fn citation_trend(
        &self,
        keyword: &str,
        faculty_name: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<CitationPoint>, AppError> {
        self.relational
            .citation_trend(keyword, faculty_name, start_year, end_year)
            .await
    }

    // Aggregate cache.

    pub async fn institute_faculty_counts(&self) -> Result<Vec<InstituteFacultyCount>, AppError> {
        self.cache.institute_faculty_counts().await
    }

    pub async fn faculty_keyword_listing(&self) -> Result<Vec<FacultyKeywords>, AppError> {
        self.cache.faculty_keyword_listing().await
    }
}
