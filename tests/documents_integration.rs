//! Integration tests for the faculty document store against a live MongoDB.
//!
//! These tests require a running MongoDB instance with the default local
//! connection string (see the config defaults). They seed the faculty
//! collection with `itest-` prefixed documents and remove them afterwards.
//! Run with: `cargo test --features integration --test documents_integration`

#![cfg(feature = "integration")]

use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use serial_test::serial;

use academe::config::Config;
use academe::docstore::{FacultyDocuments, MongoFacultyStore};

async fn connect() -> (MongoFacultyStore, Collection<Document>) {
    let config = Config::default();
    let client = Client::with_uri_str(&config.mongodb.uri)
        .await
        .expect("Failed to connect to test MongoDB");
    let database = client.database(&config.mongodb.database);
    let raw = database.collection::<Document>("faculty");
    (MongoFacultyStore::new(&database), raw)
}

async fn cleanup(raw: &Collection<Document>) {
    raw.delete_many(doc! { "name": { "$regex": "^itest-" } })
        .await
        .expect("cleanup failed");
}

/// Three faculty documents across two institutes. Keywords cover both
/// dataset shapes plus the absent-field case.
async fn seed(raw: &Collection<Document>) {
    cleanup(raw).await;
    raw.insert_many(vec![
        doc! {
            "name": "itest-alice",
            "affiliation": { "name": "itest-X" },
            "keywords": [
                "itest-ml",
                { "name": "itest-nlp", "score": 0.9 },
            ],
        },
        doc! {
            "name": "itest-bob",
            "affiliation": { "name": "itest-X" },
            "keywords": [],
        },
        doc! {
            "name": "itest-carol",
            "affiliation": { "name": "itest-Y" },
        },
    ])
    .await
    .expect("seed insert failed");
}

// All tests share one live collection and one cleanup prefix.
#[serial]
mod documents_tests {
    use super::*;

    #[tokio::test]
    async fn distinct_affiliations_cover_every_seeded_institute() {
        let (store, raw) = connect().await;
        seed(&raw).await;

        let mut affiliations: Vec<String> = store
            .distinct_affiliations()
            .await
            .expect("distinct affiliations failed")
            .into_iter()
            .filter(|name| name.starts_with("itest-"))
            .collect();
        affiliations.sort();
        assert_eq!(affiliations, vec!["itest-X", "itest-Y"]);

        cleanup(&raw).await;
    }

    #[tokio::test]
    async fn affiliation_counts_match_exactly() {
        let (store, raw) = connect().await;
        seed(&raw).await;

        assert_eq!(
            store
                .count_by_affiliation("itest-X")
                .await
                .expect("count failed"),
            2
        );
        assert_eq!(
            store
                .count_by_affiliation("itest-Y")
                .await
                .expect("count failed"),
            1
        );
        assert_eq!(
            store
                .count_by_affiliation("itest-unknown")
                .await
                .expect("count failed"),
            0
        );

        cleanup(&raw).await;
    }

    #[tokio::test]
    async fn faculty_names_are_listed_once_each() {
        let (store, raw) = connect().await;
        seed(&raw).await;

        let mut names: Vec<String> = store
            .distinct_faculty_names()
            .await
            .expect("distinct names failed")
            .into_iter()
            .filter(|name| name.starts_with("itest-"))
            .collect();
        names.sort();
        assert_eq!(names, vec!["itest-alice", "itest-bob", "itest-carol"]);

        cleanup(&raw).await;
    }

    #[tokio::test]
    async fn keywords_normalize_both_stored_shapes() {
        let (store, raw) = connect().await;
        seed(&raw).await;

        let keywords = store
            .keywords_of("itest-alice")
            .await
            .expect("keywords failed");
        assert_eq!(
            keywords,
            vec!["itest-ml", "itest-nlp"],
            "bare strings and name sub-documents both resolve to the name"
        );

        cleanup(&raw).await;
    }

    #[tokio::test]
    async fn absent_keywords_read_as_empty_not_error() {
        let (store, raw) = connect().await;
        seed(&raw).await;

        assert!(store
            .keywords_of("itest-bob")
            .await
            .expect("keywords failed")
            .is_empty());
        assert!(store
            .keywords_of("itest-carol")
            .await
            .expect("keywords failed")
            .is_empty());
        assert!(store
            .keywords_of("itest-nobody")
            .await
            .expect("keywords failed")
            .is_empty());

        cleanup(&raw).await;
    }
}
