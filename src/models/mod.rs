//! Domain models for the academic-world facade.

mod aggregate;
mod faculty;
mod publication;

pub use aggregate::{FacultyKeywords, InstituteFacultyCount};
pub use faculty::{
    FacultyDetail, Institute, KeywordInstituteFaculty, NewFaculty, DEFAULT_CONTACT,
    DEFAULT_PHOTO_URL, DEFAULT_POSITION,
};
pub use publication::{CitationPoint, Publication};
