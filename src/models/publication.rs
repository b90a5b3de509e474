//! Publication models backed by the relational store.

use serde::{Deserialize, Serialize};

/// A publication row with its author list resolved.
///
/// Read-only from this system's perspective; there is no mutation path for
/// the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub venue: String,
    pub year: i32,
    pub citations: i64,
    /// Ordered author names; empty when no author resolves, never absent.
    pub authors: Vec<String>,
}

/// One year of a citation trend. Years with no matching publication are
/// absent from a trend, not zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationPoint {
    pub year: i32,
    pub total_citations: i64,
}
