//! Faculty, institute and keyword models backed by the graph store.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Substituted when a faculty node has no position property.
pub const DEFAULT_POSITION: &str = "Unknown";
/// Substituted when a faculty node has no email or phone property.
pub const DEFAULT_CONTACT: &str = "N/A";
/// Substituted when a faculty node has no photo property.
pub const DEFAULT_PHOTO_URL: &str = "https://via.placeholder.com/150";

/// An institution a faculty member can work at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institute {
    pub name: String,
}

/// Full faculty profile as read from the graph store.
///
/// Optional node properties are normalized at the read boundary: absent
/// position, email, phone and photo values come back as the documented
/// defaults, never as nulls. The keyword set is sorted ascending and empty
/// when the faculty has no interests recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyDetail {
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub photo_url: String,
    pub institute_name: String,
    pub keywords: Vec<String>,
}

impl FacultyDetail {
    /// Assembles a profile from raw graph output, substituting defaults for
    /// unset optional properties.
    pub fn from_graph(
        name: String,
        position: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        photo_url: Option<String>,
        institute_name: String,
        mut keywords: Vec<String>,
    ) -> Self {
        keywords.sort();
        Self {
            name,
            position: position.unwrap_or_else(|| DEFAULT_POSITION.to_string()),
            email: email.unwrap_or_else(|| DEFAULT_CONTACT.to_string()),
            phone: phone.unwrap_or_else(|| DEFAULT_CONTACT.to_string()),
            photo_url: photo_url.unwrap_or_else(|| DEFAULT_PHOTO_URL.to_string()),
            institute_name,
            keywords,
        }
    }
}

/// Payload for a faculty upsert.
///
/// Scalar attributes overwrite whatever the node holds; keywords are
/// additive (set union with the existing interest edges, nothing is removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFaculty {
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub institute_name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl NewFaculty {
    /// Rejects payloads that would create unaddressable nodes, before any
    /// store round-trip.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("faculty name must not be blank".into()));
        }
        if self.institute_name.trim().is_empty() {
            return Err(AppError::Validation(
                "institute name must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// One (keyword, institute, faculty) row of the cross-cutting interest join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordInstituteFaculty {
    pub keyword: String,
    pub institute: String,
    pub faculty: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_graph_substitutes_documented_defaults() {
        let detail = FacultyDetail::from_graph(
            "Alice".into(),
            None,
            None,
            None,
            None,
            "X".into(),
            vec![],
        );

        assert_eq!(detail.position, "Unknown");
        assert_eq!(detail.email, "N/A");
        assert_eq!(detail.phone, "N/A");
        assert_eq!(detail.photo_url, "https://via.placeholder.com/150");
        assert!(detail.keywords.is_empty());
    }

    #[test]
    fn from_graph_keeps_present_values_and_sorts_keywords() {
        let detail = FacultyDetail::from_graph(
            "Alice".into(),
            Some("Professor".into()),
            Some("alice@x.edu".into()),
            Some("555-0100".into()),
            Some("https://x.edu/alice.jpg".into()),
            "X".into(),
            vec!["nlp".into(), "ml".into(), "databases".into()],
        );

        assert_eq!(detail.position, "Professor");
        assert_eq!(detail.email, "alice@x.edu");
        assert_eq!(detail.keywords, vec!["databases", "ml", "nlp"]);
    }

    #[test]
    fn upsert_payload_rejects_blank_identity_keys() {
        let mut payload = NewFaculty {
            name: "Alice".into(),
            position: "Professor".into(),
            email: "alice@x.edu".into(),
            phone: "555-0100".into(),
            institute_name: "X".into(),
            keywords: vec![],
        };
        assert!(payload.validate().is_ok());

        payload.name = "   ".into();
        assert!(payload.validate().is_err());

        payload.name = "Alice".into();
        payload.institute_name = String::new();
        assert!(payload.validate().is_err());
    }
}
