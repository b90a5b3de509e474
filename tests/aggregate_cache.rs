//! Materialized-view cache tests over the in-memory document backend.
//!
//! These run offline: the document store is in-memory and the durable view
//! store lives in a per-test temp directory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use academe::cache::{
    AggregateCache, FsViewStore, ViewStore, FACULTY_KEYWORDS_VIEW, INSTITUTE_FACULTY_VIEW,
};
use academe::config::Config;
use academe::docstore::{FacultyDocuments, FacultyRecord, InMemoryFacultyStore};
use academe::error::{AppError, ErrorKind, Store};
use academe::geocode::{Geocoder, StaticGeocoder};
use academe::models::{FacultyKeywords, InstituteFacultyCount};

fn record(name: &str, affiliation: &str, keywords: &[&str]) -> FacultyRecord {
    FacultyRecord {
        name: name.to_string(),
        affiliation: affiliation.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn fixture_store() -> Arc<InMemoryFacultyStore> {
    Arc::new(InMemoryFacultyStore::new(vec![
        record("Alice", "X", &["ml", "nlp"]),
        record("Bob", "X", &["databases"]),
        record("Carol", "Y", &[]),
    ]))
}

fn cache_over(
    views: Arc<FsViewStore>,
    documents: Arc<InMemoryFacultyStore>,
    geocoder: Option<Arc<dyn Geocoder>>,
) -> AggregateCache {
    AggregateCache::new(documents, views, geocoder, Arc::new(Config::default()))
}

fn count_row(institute: &str, faculty_count: u64) -> InstituteFacultyCount {
    InstituteFacultyCount {
        institute: institute.to_string(),
        faculty_count,
        latitude: 0.0,
        longitude: 0.0,
    }
}

#[tokio::test]
async fn first_read_builds_and_persists_the_view() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));
    let cache = cache_over(views.clone(), fixture_store(), None);

    assert!(!views.exists(INSTITUTE_FACULTY_VIEW).await.unwrap());

    let counts = cache.institute_faculty_counts().await.unwrap();
    assert_eq!(counts, vec![count_row("X", 2), count_row("Y", 1)]);

    assert!(views.exists(INSTITUTE_FACULTY_VIEW).await.unwrap());
}

#[tokio::test]
async fn second_read_serves_durable_copy_without_source_reads() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));
    let documents = fixture_store();
    let cache = cache_over(views.clone(), documents.clone(), None);

    let first = cache.institute_faculty_counts().await.unwrap();
    let reads_after_build = documents.reads();
    let bytes_after_build = views.load(INSTITUTE_FACULTY_VIEW).await.unwrap();

    let second = cache.institute_faculty_counts().await.unwrap();

    assert_eq!(second, first);
    assert_eq!(documents.reads(), reads_after_build, "source was re-read");
    assert_eq!(
        views.load(INSTITUTE_FACULTY_VIEW).await.unwrap(),
        bytes_after_build,
        "durable copy changed between reads"
    );
}

#[tokio::test]
async fn restart_serves_the_persisted_view_not_the_source() {
    let dir = tempfile::tempdir().unwrap();

    let before_restart = {
        let views = Arc::new(FsViewStore::new(dir.path()));
        let cache = cache_over(views, fixture_store(), None);
        cache.institute_faculty_counts().await.unwrap()
    };

    // Fresh instance over the same directory, pointed at a source that now
    // disagrees with the persisted view.
    let changed_source = Arc::new(InMemoryFacultyStore::new(vec![record("Zed", "Z", &[])]));
    let views = Arc::new(FsViewStore::new(dir.path()));
    let cache = cache_over(views, changed_source.clone(), None);

    let after_restart = cache.institute_faculty_counts().await.unwrap();

    assert_eq!(after_restart, before_restart);
    assert_eq!(changed_source.reads(), 0, "present view must not hit the source");
}

#[tokio::test]
async fn empty_source_produces_valid_empty_views() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));
    let documents = Arc::new(InMemoryFacultyStore::new(vec![]));
    let cache = cache_over(views.clone(), documents, None);

    assert!(cache.institute_faculty_counts().await.unwrap().is_empty());
    assert!(cache.faculty_keyword_listing().await.unwrap().is_empty());

    // Both views exist durably and still decode to empty on the next read.
    assert!(views.exists(INSTITUTE_FACULTY_VIEW).await.unwrap());
    assert!(views.exists(FACULTY_KEYWORDS_VIEW).await.unwrap());
    assert!(cache.institute_faculty_counts().await.unwrap().is_empty());
}

#[tokio::test]
async fn geocoder_supplies_coordinates_with_unresolved_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));
    let geocoder: Arc<dyn Geocoder> = Arc::new(StaticGeocoder::new(HashMap::from([(
        "X".to_string(),
        (40.1106, -88.2073),
    )])));
    let cache = cache_over(views, fixture_store(), Some(geocoder));

    let counts = cache.institute_faculty_counts().await.unwrap();

    assert_eq!(
        counts,
        vec![
            InstituteFacultyCount {
                institute: "X".into(),
                faculty_count: 2,
                latitude: 40.1106,
                longitude: -88.2073,
            },
            count_row("Y", 1),
        ]
    );
}

#[tokio::test]
async fn keyword_listing_serializes_keywords_as_json_text() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));
    let cache = cache_over(views, fixture_store(), None);

    let listing = cache.faculty_keyword_listing().await.unwrap();

    assert_eq!(
        listing,
        vec![
            FacultyKeywords {
                faculty_name: "Alice".into(),
                keywords_json: r#"["ml","nlp"]"#.into(),
            },
            FacultyKeywords {
                faculty_name: "Bob".into(),
                keywords_json: r#"["databases"]"#.into(),
            },
            FacultyKeywords {
                faculty_name: "Carol".into(),
                keywords_json: "[]".into(),
            },
        ]
    );
}

/// Document backend whose reads always fail, for build-failure paths.
struct FailingDocuments;

#[async_trait]
impl FacultyDocuments for FailingDocuments {
    async fn distinct_affiliations(&self) -> Result<Vec<String>, AppError> {
        Err(AppError::Query {
            store: Store::Documents,
            message: "simulated outage".into(),
        })
    }

    async fn count_by_affiliation(&self, _institute: &str) -> Result<u64, AppError> {
        Err(AppError::Query {
            store: Store::Documents,
            message: "simulated outage".into(),
        })
    }

    async fn distinct_faculty_names(&self) -> Result<Vec<String>, AppError> {
        Err(AppError::Query {
            store: Store::Documents,
            message: "simulated outage".into(),
        })
    }

    async fn keywords_of(&self, _faculty_name: &str) -> Result<Vec<String>, AppError> {
        Err(AppError::Query {
            store: Store::Documents,
            message: "simulated outage".into(),
        })
    }
}

#[tokio::test]
async fn failed_build_persists_nothing_and_next_read_retries() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));

    let failing = AggregateCache::new(
        Arc::new(FailingDocuments),
        views.clone(),
        None,
        Arc::new(Config::default()),
    );
    let err = failing.institute_faculty_counts().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheBuild);
    assert!(!views.exists(INSTITUTE_FACULTY_VIEW).await.unwrap());

    // Once the source recovers, the same durable store serves a full build.
    let recovered = cache_over(views.clone(), fixture_store(), None);
    let counts = recovered.institute_faculty_counts().await.unwrap();
    assert_eq!(counts.len(), 2);
    assert!(views.exists(INSTITUTE_FACULTY_VIEW).await.unwrap());
}

#[tokio::test]
async fn corrupt_durable_copy_surfaces_as_cache_error() {
    let dir = tempfile::tempdir().unwrap();
    let views = Arc::new(FsViewStore::new(dir.path()));
    views
        .save(INSTITUTE_FACULTY_VIEW, b"not,a,view")
        .await
        .unwrap();

    let cache = cache_over(views, fixture_store(), None);
    let err = cache.institute_faculty_counts().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CacheBuild);
    assert!(err.to_string().contains("corrupt"));
}
