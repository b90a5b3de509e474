//! Graph-store repository: faculty, institutes, keywords and their edges.

use std::future::Future;
use std::sync::Arc;

use neo4rs::{query, Graph};

use crate::config::Config;
use crate::di::FromContext;
use crate::error::{AppError, Store};
use crate::models::{FacultyDetail, Institute, KeywordInstituteFaculty, NewFaculty};

/// Repository for all graph-store traffic.
///
/// Every operation runs as one scoped unit of work against the driver:
/// reads in an auto-commit transaction on a pooled connection, mutations in
/// an explicit transaction committed or rolled back before returning. The
/// per-operation deadline comes from the graph section of the config.
#[derive(FromContext, Clone)]
pub struct GraphRepository {
    graph: Arc<Graph>,
    config: Arc<Config>,
}

impl GraphRepository {
    pub fn new(graph: Arc<Graph>, config: Arc<Config>) -> Self {
        Self { graph, config }
    }

    /// All institutes, sorted by name.
    pub async fn list_institutes(&self) -> Result<Vec<Institute>, AppError> {
        self.bounded(async {
            let mut rows = self
                .graph
                .execute(query("MATCH (i:Institute) RETURN i.name AS name ORDER BY i.name"))
                .await
                .map_err(AppError::graph)?;

            let mut institutes = Vec::new();
            while let Some(row) = rows.next().await.map_err(AppError::graph)? {
                let name: String = row.get("name").map_err(AppError::graph_row)?;
                institutes.push(Institute { name });
            }
            Ok(institutes)
        })
        .await
    }

    /// Names of faculty working at the given institute, sorted. Empty when
    /// the institute is unknown or has no faculty.
    pub async fn list_faculty(&self, institute_name: &str) -> Result<Vec<String>, AppError> {
        self.bounded(async {
            let mut rows = self
                .graph
                .execute(
                    query(
                        "MATCH (f:Faculty)-[:WORKS_AT]->(i:Institute)
                         WHERE i.name = $institute_name
                         RETURN f.name AS name
                         ORDER BY f.name",
                    )
                    .param("institute_name", institute_name),
                )
                .await
                .map_err(AppError::graph)?;

            let mut names = Vec::new();
            while let Some(row) = rows.next().await.map_err(AppError::graph)? {
                names.push(row.get::<String>("name").map_err(AppError::graph_row)?);
            }
            Ok(names)
        })
        .await
    }

    /// Full profile for one faculty member, keywords included.
    ///
    /// Fails with NotFound when no node matches the name exactly; absent
    /// optional properties are normalized to their documented defaults.
    pub async fn faculty_detail(&self, faculty_name: &str) -> Result<FacultyDetail, AppError> {
        self.bounded(async {
            let mut rows = self
                .graph
                .execute(
                    query(
                        "MATCH (f:Faculty)-[:WORKS_AT]->(i:Institute)
                         WHERE f.name = $faculty_name
                         OPTIONAL MATCH (f)-[:INTERESTED_IN]->(k:Keyword)
                         RETURN f.name AS name,
                                f.position AS position,
                                f.email AS email,
                                f.phone AS phone,
                                f.photoUrl AS photo_url,
                                i.name AS institute_name,
                                collect(k.name) AS keywords",
                    )
                    .param("faculty_name", faculty_name),
                )
                .await
                .map_err(AppError::graph)?;

            let Some(row) = rows.next().await.map_err(AppError::graph)? else {
                return Err(AppError::FacultyNotFound(faculty_name.to_string()));
            };

            let name: String = row.get("name").map_err(AppError::graph_row)?;
            let position: Option<String> = row.get("position").map_err(AppError::graph_row)?;
            let email: Option<String> = row.get("email").map_err(AppError::graph_row)?;
            let phone: Option<String> = row.get("phone").map_err(AppError::graph_row)?;
            let photo_url: Option<String> = row.get("photo_url").map_err(AppError::graph_row)?;
            let institute_name: String = row.get("institute_name").map_err(AppError::graph_row)?;
            let keywords: Vec<String> = row.get("keywords").map_err(AppError::graph_row)?;

            Ok(FacultyDetail::from_graph(
                name,
                position,
                email,
                phone,
                photo_url,
                institute_name,
                keywords,
            ))
        })
        .await
    }

    /// Idempotent faculty upsert.
    ///
    /// Merges the node by name and overwrites its scalar attributes, moves
    /// the WORKS_AT edge when the institute changed (never adds a second),
    /// and merges one INTERESTED_IN edge per supplied keyword. Keywords are
    /// additive: edges outside the supplied list stay untouched. Node and
    /// edge changes apply in one transaction.
    pub async fn upsert_faculty(&self, faculty: &NewFaculty) -> Result<(), AppError> {
        faculty.validate()?;

        self.bounded(async {
            let merge = query(
                "MERGE (f:Faculty {name: $name})
                 SET f.position = $position, f.email = $email, f.phone = $phone
                 MERGE (i:Institute {name: $institute_name})
                 WITH f, i
                 OPTIONAL MATCH (f)-[stale:WORKS_AT]->(other:Institute)
                 WHERE other.name <> $institute_name
                 DELETE stale
                 MERGE (f)-[:WORKS_AT]->(i)",
            )
            .param("name", faculty.name.as_str())
            .param("position", faculty.position.as_str())
            .param("email", faculty.email.as_str())
            .param("phone", faculty.phone.as_str())
            .param("institute_name", faculty.institute_name.as_str());

            // UNWIND over an empty list yields no rows, so a keyword-free
            // upsert leaves the interest edges alone.
            let interests = query(
                "MATCH (f:Faculty {name: $name})
                 UNWIND $keywords AS keyword
                 MERGE (k:Keyword {name: keyword})
                 MERGE (f)-[:INTERESTED_IN]->(k)",
            )
            .param("name", faculty.name.as_str())
            .param("keywords", faculty.keywords.clone());

            let mut txn = self.graph.start_txn().await.map_err(AppError::graph)?;
            if let Err(err) = txn.run_queries([merge, interests]).await {
                let _ = txn.rollback().await;
                return Err(AppError::graph(err));
            }
            txn.commit().await.map_err(AppError::graph)
        })
        .await
    }

    /// Deletes the faculty node and all its edges, but only when it
    /// currently works at the given institute. A non-matching pair is a
    /// no-op, so a same-named faculty elsewhere is never deleted.
    pub async fn delete_faculty(
        &self,
        faculty_name: &str,
        institute_name: &str,
    ) -> Result<(), AppError> {
        self.bounded(async {
            let delete = query(
                "MATCH (f:Faculty)-[:WORKS_AT]->(i:Institute)
                 WHERE f.name = $faculty_name AND i.name = $institute_name
                 DETACH DELETE f",
            )
            .param("faculty_name", faculty_name)
            .param("institute_name", institute_name);

            let mut txn = self.graph.start_txn().await.map_err(AppError::graph)?;
            if let Err(err) = txn.run(delete).await {
                let _ = txn.rollback().await;
                return Err(AppError::graph(err));
            }
            txn.commit().await.map_err(AppError::graph)
        })
        .await
    }

    /// Every (keyword, institute, faculty) combination, one row per faculty
    /// interest, joined through the faculty's current institute. Sorted by
    /// keyword, then institute, then faculty.
    pub async fn keyword_institute_faculty_triples(
        &self,
    ) -> Result<Vec<KeywordInstituteFaculty>, AppError> {
        self.bounded(async {
            let mut rows = self
                .graph
                .execute(query(
                    "MATCH (f:Faculty)-[:INTERESTED_IN]->(k:Keyword)
                     MATCH (f)-[:WORKS_AT]->(i:Institute)
                     RETURN k.name AS keyword, i.name AS institute, f.name AS faculty
                     ORDER BY keyword, institute, faculty",
                ))
                .await
                .map_err(AppError::graph)?;

            let mut triples = Vec::new();
            while let Some(row) = rows.next().await.map_err(AppError::graph)? {
                triples.push(KeywordInstituteFaculty {
                    keyword: row.get("keyword").map_err(AppError::graph_row)?,
                    institute: row.get("institute").map_err(AppError::graph_row)?,
                    faculty: row.get("faculty").map_err(AppError::graph_row)?,
                });
            }
            Ok(triples)
        })
        .await
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        let deadline = self.config.neo4j.deadline();
        match tokio::time::timeout(deadline, op).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(Store::Graph, deadline)),
        }
    }
}
