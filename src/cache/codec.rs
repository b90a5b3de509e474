//! CSV codecs for the two materialized views.
//!
//! Format per view: one header row, then one record per line, comma
//! separated, no quoting or escaping. Institution and faculty names are
//! assumed not to contain the separator; a name that does will fail the
//! strict column check on decode. The keyword cell of the second view is
//! opaque JSON and may contain commas, so its decoder splits on the first
//! comma only.

use crate::error::AppError;
use crate::models::{FacultyKeywords, InstituteFacultyCount};

/// View key: per-institution faculty counts with coordinates.
pub const INSTITUTE_FACULTY_VIEW: &str = "institute_faculty.csv";
/// View key: faculty keyword fan-out.
pub const FACULTY_KEYWORDS_VIEW: &str = "faculty_keywords.csv";

const INSTITUTE_FACULTY_HEADER: &str = "institute,facultyCount,latitude,longitude";
const FACULTY_KEYWORDS_HEADER: &str = "facultyName,keywordsJsonArray";

pub fn encode_institute_counts(rows: &[InstituteFacultyCount]) -> Vec<u8> {
    let mut text = String::from(INSTITUTE_FACULTY_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(&format!(
            "{},{},{},{}",
            row.institute, row.faculty_count, row.latitude, row.longitude
        ));
    }
    text.into_bytes()
}

pub fn decode_institute_counts(bytes: &[u8]) -> Result<Vec<InstituteFacultyCount>, AppError> {
    let mut lines = text_of(INSTITUTE_FACULTY_VIEW, bytes)?;
    expect_header(INSTITUTE_FACULTY_VIEW, INSTITUTE_FACULTY_HEADER, lines.next())?;

    lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            let cells: Vec<&str> = line.split(',').collect();
            let [institute, count, latitude, longitude] = cells[..] else {
                return Err(corrupt(
                    INSTITUTE_FACULTY_VIEW,
                    format!("expected 4 columns, got {}", cells.len()),
                ));
            };
            Ok(InstituteFacultyCount {
                institute: institute.to_string(),
                faculty_count: parse_cell(INSTITUTE_FACULTY_VIEW, count, "facultyCount")?,
                latitude: parse_cell(INSTITUTE_FACULTY_VIEW, latitude, "latitude")?,
                longitude: parse_cell(INSTITUTE_FACULTY_VIEW, longitude, "longitude")?,
            })
        })
        .collect()
}

pub fn encode_faculty_keywords(rows: &[FacultyKeywords]) -> Vec<u8> {
    let mut text = String::from(FACULTY_KEYWORDS_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(&row.faculty_name);
        text.push(',');
        text.push_str(&row.keywords_json);
    }
    text.into_bytes()
}

pub fn decode_faculty_keywords(bytes: &[u8]) -> Result<Vec<FacultyKeywords>, AppError> {
    let mut lines = text_of(FACULTY_KEYWORDS_VIEW, bytes)?;
    expect_header(FACULTY_KEYWORDS_VIEW, FACULTY_KEYWORDS_HEADER, lines.next())?;

    lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            // Split on the first comma only; the JSON cell may contain more.
            let (faculty_name, keywords_json) = line
                .split_once(',')
                .ok_or_else(|| corrupt(FACULTY_KEYWORDS_VIEW, "row without separator"))?;
            Ok(FacultyKeywords {
                faculty_name: faculty_name.to_string(),
                keywords_json: keywords_json.to_string(),
            })
        })
        .collect()
}

fn text_of<'a>(view: &str, bytes: &'a [u8]) -> Result<std::str::Lines<'a>, AppError> {
    std::str::from_utf8(bytes)
        .map(str::lines)
        .map_err(|_| corrupt(view, "not valid UTF-8"))
}

fn expect_header(view: &str, expected: &str, found: Option<&str>) -> Result<(), AppError> {
    match found {
        Some(header) if header == expected => Ok(()),
        _ => Err(corrupt(view, format!("missing '{expected}' header"))),
    }
}

fn parse_cell<T: std::str::FromStr>(view: &str, cell: &str, column: &str) -> Result<T, AppError> {
    cell.parse()
        .map_err(|_| corrupt(view, format!("unparseable {column} cell '{cell}'")))
}

fn corrupt(view: &str, message: impl Into<String>) -> AppError {
    AppError::CacheBuild {
        view: view.to_string(),
        message: format!("corrupt stored view: {}", message.into()),
    }
}
