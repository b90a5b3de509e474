//! Relational-store repository: publication search and citation trends.

use std::future::Future;
use std::sync::Arc;

use deadpool_postgres::Pool;

use crate::config::Config;
use crate::di::FromContext;
use crate::error::{AppError, Store};
use crate::models::{CitationPoint, Publication};

/// Matching is by publication, so the predicate sits in an EXISTS subquery
/// while the outer LEFT JOIN resolves the full author list. Aggregating over
/// DISTINCT author names keeps multi-keyword matches from duplicating rows.
const SEARCH_BY_KEYWORD_SQL: &str = "
    SELECT p.id, p.title, p.venue, p.year, p.citations,
           COALESCE(
               array_agg(DISTINCT a.name ORDER BY a.name)
                   FILTER (WHERE a.name IS NOT NULL),
               ARRAY[]::TEXT[]
           ) AS authors
    FROM publications p
    LEFT JOIN publication_authors pa ON pa.publication_id = p.id
    LEFT JOIN authors a ON a.id = pa.author_id
    WHERE EXISTS (
        SELECT 1
        FROM publication_keywords pk
        JOIN keywords k ON k.id = pk.keyword_id
        WHERE pk.publication_id = p.id AND k.name ILIKE $1
    )
    GROUP BY p.id
    ORDER BY p.citations DESC, p.year DESC";

const SEARCH_BY_FACULTY_SQL: &str = "
    SELECT p.id, p.title, p.venue, p.year, p.citations,
           COALESCE(
               array_agg(DISTINCT a.name ORDER BY a.name)
                   FILTER (WHERE a.name IS NOT NULL),
               ARRAY[]::TEXT[]
           ) AS authors
    FROM publications p
    LEFT JOIN publication_authors pa ON pa.publication_id = p.id
    LEFT JOIN authors a ON a.id = pa.author_id
    WHERE EXISTS (
        SELECT 1
        FROM publication_authors pq
        JOIN authors q ON q.id = pq.author_id
        WHERE pq.publication_id = p.id AND q.name ILIKE $1
    )
    GROUP BY p.id
    ORDER BY p.citations DESC, p.year DESC";

/// Summing over DISTINCT publication rows keeps a publication tagged with
/// several matching keywords from being counted twice.
const CITATION_TREND_SQL: &str = "
    SELECT year, SUM(citations)::BIGINT AS total_citations
    FROM (
        SELECT DISTINCT p.id, p.year, p.citations
        FROM publications p
        JOIN publication_keywords pk ON pk.publication_id = p.id
        JOIN keywords k ON k.id = pk.keyword_id
        JOIN publication_authors pa ON pa.publication_id = p.id
        JOIN authors a ON a.id = pa.author_id
        WHERE k.name ILIKE $1
          AND a.name ILIKE $2
          AND p.year BETWEEN $3 AND $4
    ) matched
    GROUP BY year
    ORDER BY year";

/// Repository for all relational-store traffic. Read-only.
///
/// Connections come from the shared pool, checked out per operation. The
/// per-operation deadline comes from the postgres section of the config.
#[derive(FromContext, Clone)]
pub struct RelationalRepository {
    relational: Pool,
    config: Arc<Config>,
}

impl RelationalRepository {
    pub fn new(relational: Pool, config: Arc<Config>) -> Self {
        Self { relational, config }
    }

    /// Publications tagged with a keyword matching the term by
    /// case-insensitive substring, most cited first, newest first within a
    /// citation count.
    pub async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Publication>, AppError> {
        self.search(SEARCH_BY_KEYWORD_SQL, keyword).await
    }

    /// Publications with an author name matching the term, same matching and
    /// ordering rules as the keyword search.
    pub async fn search_by_faculty(&self, faculty_name: &str) -> Result<Vec<Publication>, AppError> {
        self.search(SEARCH_BY_FACULTY_SQL, faculty_name).await
    }

    /// Total citations per year for publications matching both the keyword
    /// and the author, within `[start_year, end_year]` inclusive. Years with
    /// no matching publication are absent, not zero-filled.
    pub async fn citation_trend(
        &self,
        keyword: &str,
        faculty_name: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<CitationPoint>, AppError> {
        if start_year > end_year {
            return Err(AppError::Validation(format!(
                "start_year {start_year} is after end_year {end_year}"
            )));
        }

        let keyword_pattern = substring_pattern(keyword);
        let faculty_pattern = substring_pattern(faculty_name);

        self.bounded(async {
            let conn = self.relational.get().await.map_err(AppError::pool)?;
            let rows = conn
                .query(
                    CITATION_TREND_SQL,
                    &[&keyword_pattern, &faculty_pattern, &start_year, &end_year],
                )
                .await
                .map_err(AppError::relational)?;

            rows.iter()
                .map(|row| {
                    Ok(CitationPoint {
                        year: row.try_get("year").map_err(AppError::relational)?,
                        total_citations: row
                            .try_get("total_citations")
                            .map_err(AppError::relational)?,
                    })
                })
                .collect()
        })
        .await
    }

    async fn search(&self, sql: &str, term: &str) -> Result<Vec<Publication>, AppError> {
        let pattern = substring_pattern(term);

        self.bounded(async {
            let conn = self.relational.get().await.map_err(AppError::pool)?;
            let rows = conn
                .query(sql, &[&pattern])
                .await
                .map_err(AppError::relational)?;

            rows.iter().map(publication_from_row).collect()
        })
        .await
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        let deadline = self.config.postgres.deadline();
        match tokio::time::timeout(deadline, op).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(Store::Relational, deadline)),
        }
    }
}

fn substring_pattern(term: &str) -> String {
    format!("%{term}%")
}

fn publication_from_row(row: &tokio_postgres::Row) -> Result<Publication, AppError> {
    let venue: Option<String> = row.try_get("venue").map_err(AppError::relational)?;

    Ok(Publication {
        id: row.try_get("id").map_err(AppError::relational)?,
        title: row.try_get("title").map_err(AppError::relational)?,
        venue: venue.unwrap_or_default(),
        year: row.try_get("year").map_err(AppError::relational)?,
        citations: row.try_get("citations").map_err(AppError::relational)?,
        authors: row.try_get("authors").map_err(AppError::relational)?,
    })
}
