//! Lazily-built, file-backed materialized views over the document store.
//!
//! Each view is a two-state affair: absent or present. A read serves the
//! durable copy when one exists; otherwise it computes the view from the
//! document store, persists it, then returns it. A present view is never
//! re-derived, even if the source collection changes afterwards. The policy
//! lives behind [`ViewStore`] so a freshness rule can be added there without
//! touching the repositories.

mod codec;
mod store;

pub use codec::{FACULTY_KEYWORDS_VIEW, INSTITUTE_FACULTY_VIEW};
pub use store::{FsViewStore, ViewStore};

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::config::Config;
use crate::di::FromContext;
use crate::docstore::FacultyDocuments;
use crate::error::{AppError, Store};
use crate::geocode::Geocoder;
use crate::models::{FacultyKeywords, InstituteFacultyCount};

/// Upper bound on in-flight per-institution count queries during a build.
const BUILD_CONCURRENCY: usize = 8;

/// Serves the two aggregate views, building them on first read.
#[derive(FromContext, Clone)]
pub struct AggregateCache {
    documents: Arc<dyn FacultyDocuments>,
    views: Arc<dyn ViewStore>,
    geocoder: Option<Arc<dyn Geocoder>>,
    config: Arc<Config>,
}

impl AggregateCache {
    pub fn new(
        documents: Arc<dyn FacultyDocuments>,
        views: Arc<dyn ViewStore>,
        geocoder: Option<Arc<dyn Geocoder>>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            documents,
            views,
            geocoder,
            config,
        }
    }

    /// Faculty head-count per institution, sorted by institution name.
    pub async fn institute_faculty_counts(&self) -> Result<Vec<InstituteFacultyCount>, AppError> {
        if let Some(bytes) = self.views.load(INSTITUTE_FACULTY_VIEW).await? {
            return codec::decode_institute_counts(&bytes);
        }

        let rows = self
            .build(INSTITUTE_FACULTY_VIEW, self.compute_institute_counts())
            .await?;
        self.views
            .save(INSTITUTE_FACULTY_VIEW, &codec::encode_institute_counts(&rows))
            .await?;
        tracing::info!(
            view = INSTITUTE_FACULTY_VIEW,
            rows = rows.len(),
            "materialized view built"
        );
        Ok(rows)
    }

    /// Keyword fan-out per faculty member, sorted by faculty name.
    pub async fn faculty_keyword_listing(&self) -> Result<Vec<FacultyKeywords>, AppError> {
        if let Some(bytes) = self.views.load(FACULTY_KEYWORDS_VIEW).await? {
            return codec::decode_faculty_keywords(&bytes);
        }

        let rows = self
            .build(FACULTY_KEYWORDS_VIEW, self.compute_faculty_keywords())
            .await?;
        self.views
            .save(FACULTY_KEYWORDS_VIEW, &codec::encode_faculty_keywords(&rows))
            .await?;
        tracing::info!(
            view = FACULTY_KEYWORDS_VIEW,
            rows = rows.len(),
            "materialized view built"
        );
        Ok(rows)
    }

    /// Runs one view computation under the document-store deadline and folds
    /// any non-timeout failure into a build error for that view. A failed
    /// build persists nothing, so the next read retries from scratch.
    async fn build<T>(
        &self,
        view: &str,
        compute: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        let deadline = self.config.mongodb.deadline();
        let result = tokio::time::timeout(deadline, compute)
            .await
            .map_err(|_| AppError::timeout(Store::Documents, deadline))?;

        result.map_err(|err| match err {
            AppError::Timeout { .. } | AppError::CacheBuild { .. } => err,
            other => AppError::CacheBuild {
                view: view.to_string(),
                message: other.to_string(),
            },
        })
    }

    async fn compute_institute_counts(&self) -> Result<Vec<InstituteFacultyCount>, AppError> {
        let mut institutes = self.documents.distinct_affiliations().await?;
        institutes.sort();

        // Per-institution counts are independent and idempotent, so they run
        // with bounded concurrency. `buffered` keeps the sorted order.
        stream::iter(institutes.into_iter().map(|institute| self.count_one(institute)))
            .buffered(BUILD_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn count_one(&self, institute: String) -> Result<InstituteFacultyCount, AppError> {
        let faculty_count = self.documents.count_by_affiliation(&institute).await?;
        let (latitude, longitude) = match &self.geocoder {
            Some(geocoder) => geocoder.locate(&institute).await.unwrap_or((0.0, 0.0)),
            None => (0.0, 0.0),
        };
        Ok(InstituteFacultyCount {
            institute,
            faculty_count,
            latitude,
            longitude,
        })
    }

    async fn compute_faculty_keywords(&self) -> Result<Vec<FacultyKeywords>, AppError> {
        let mut names = self.documents.distinct_faculty_names().await?;
        names.sort();

        let mut rows = Vec::with_capacity(names.len());
        for name in names {
            let keywords = self.documents.keywords_of(&name).await?;
            let keywords_json = serde_json::to_string(&keywords).map_err(|err| {
                AppError::CacheBuild {
                    view: FACULTY_KEYWORDS_VIEW.to_string(),
                    message: err.to_string(),
                }
            })?;
            rows.push(FacultyKeywords {
                faculty_name: name,
                keywords_json,
            });
        }
        Ok(rows)
    }
}
