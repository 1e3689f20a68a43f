use chrono::NaiveDate;

use crate::error::AppError;

pub const MAX_TITLE_LEN: usize = 300;
pub const MIN_FILTER_YEAR: i32 = 1;
pub const MAX_FILTER_YEAR: i32 = 9999;

/// Accepts bare DOIs, `doi:` prefixes and `https://doi.org/` links; returns the
/// lower-cased bare form `10.<registrant>/<suffix>`.
pub fn normalize_doi(raw: &str) -> Result<String, AppError> {
    let mut doi = raw.trim().to_lowercase();
    for prefix in ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "doi:"] {
        if let Some(rest) = doi.strip_prefix(prefix) {
            doi = rest.trim().to_string();
            break;
        }
    }

    let invalid = || AppError::validation_field("doi", "DOI must look like 10.1234/suffix");
    let rest = doi.strip_prefix("10.").ok_or_else(invalid)?;
    let (registrant, suffix) = rest.split_once('/').ok_or_else(invalid)?;
    if !(4..=9).contains(&registrant.len()) || !registrant.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if suffix.is_empty() || suffix.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(doi)
}

/// Trims author names and drops blanks; at least one must remain.
pub fn normalize_authors(authors: &[String]) -> Result<Vec<String>, AppError> {
    let cleaned: Vec<String> = authors
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(AppError::validation_field("authors", "At least one author is required"));
    }
    Ok(cleaned)
}

pub fn validate_publication_title(title: &str) -> Result<String, AppError> {
    super::require_text("title", title, MAX_TITLE_LEN)
}

/// Half-open date range `[Jan 1 year, Jan 1 year+1)` for the `year` list filter.
pub fn publication_year_range(year: i32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let out_of_range = || {
        AppError::validation_field(
            "year",
            format!("year must be between {} and {}", MIN_FILTER_YEAR, MAX_FILTER_YEAR),
        )
    };
    if !(MIN_FILTER_YEAR..=MAX_FILTER_YEAR).contains(&year) {
        return Err(out_of_range());
    }
    let from = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let to = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(out_of_range)?;
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_forms() {
        assert_eq!(normalize_doi("10.1038/nphys1170").unwrap(), "10.1038/nphys1170");
        assert_eq!(
            normalize_doi("https://doi.org/10.1145/3297858.3304013").unwrap(),
            "10.1145/3297858.3304013"
        );
        assert_eq!(normalize_doi("doi:10.1000/ABC").unwrap(), "10.1000/abc");
        assert!(normalize_doi("11.1038/x").is_err());
        assert!(normalize_doi("10.12/x").is_err());
        assert!(normalize_doi("10.1038/").is_err());
        assert!(normalize_doi("10.1038").is_err());
        assert!(normalize_doi("10.1038/a b").is_err());
    }

    #[test]
    fn authors_cleanup() {
        let authors = vec![" Ada Lovelace ".to_string(), "".to_string(), "Alan Turing".to_string()];
        assert_eq!(
            normalize_authors(&authors).unwrap(),
            vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()]
        );
        assert!(normalize_authors(&["  ".to_string()]).is_err());
        assert!(normalize_authors(&[]).is_err());
    }

    #[test]
    fn year_filter_range() {
        let (from, to) = publication_year_range(2024).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(publication_year_range(MAX_FILTER_YEAR).is_ok());

        for year in [0, -5, 10_000, 999_999, i32::MAX, i32::MIN] {
            match publication_year_range(year) {
                Err(AppError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("year")),
                other => panic!("year {} should be rejected, got {:?}", year, other),
            }
        }
    }
}
