//! Category/subcategory resolution shared by the document and category APIs.

use std::collections::BTreeSet;

use crate::db::models::Category;
use crate::error::AppError;

/// Normalize a category key: trimmed and lowercased.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Flatten stored categories into the sorted, deduplicated set of known
/// document categories (every subcategory, lowercased).
pub fn known_categories(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .flat_map(|c| c.subcategories.iter())
        .map(|s| normalize_key(s))
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve a comma-separated category filter against the known set.
///
/// An absent or blank filter selects every known category. Otherwise the
/// result is the intersection in request order; an empty intersection is an
/// error that carries the known set back to the caller.
pub fn resolve_filter(filter: Option<&str>, known: &[String]) -> Result<Vec<String>, AppError> {
    let mut requested: Vec<String> = Vec::new();
    for key in filter.unwrap_or_default().split(',').map(normalize_key) {
        if !key.is_empty() && !requested.contains(&key) {
            requested.push(key);
        }
    }

    if requested.is_empty() {
        return Ok(known.to_vec());
    }

    let resolved: Vec<String> = requested
        .into_iter()
        .filter(|key| known.contains(key))
        .collect();

    if resolved.is_empty() {
        return Err(AppError::InvalidCategories {
            valid: known.to_vec(),
        });
    }

    Ok(resolved)
}

/// Trim incoming subcategory names, dropping blanks and request duplicates.
/// Case is preserved.
pub fn clean_subcategories<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if !value.is_empty() && !cleaned.iter().any(|c| c == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

/// Subcategories from `incoming` that are not already in `existing`.
/// Comparison is case-sensitive, as stored.
pub fn missing_subcategories(existing: &[String], incoming: &[String]) -> Vec<String> {
    incoming
        .iter()
        .filter(|s| !existing.contains(s))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, subs: &[&str]) -> Category {
        Category {
            name: name.to_string(),
            subcategories: subs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_categories_flattens_and_lowercases() {
        let stored = vec![
            category("databases", &["MongoDB", "mysql"]),
            category("languages", &["Rust", "mongodb", " "]),
        ];
        assert_eq!(
            known_categories(&stored),
            strings(&["mongodb", "mysql", "rust"])
        );
    }

    #[test]
    fn test_known_categories_empty_store() {
        assert!(known_categories(&[]).is_empty());
    }

    #[test]
    fn test_no_filter_defaults_to_known_set() {
        let known = strings(&["mongodb", "rust"]);
        assert_eq!(resolve_filter(None, &known).unwrap(), known);
        assert_eq!(resolve_filter(Some(" , "), &known).unwrap(), known);
    }

    #[test]
    fn test_filter_intersects_in_request_order() {
        let known = strings(&["mongodb", "mysql", "rust"]);
        let resolved = resolve_filter(Some("Rust, unknown,mongodb,rust"), &known).unwrap();
        assert_eq!(resolved, strings(&["rust", "mongodb"]));
    }

    #[test]
    fn test_unknown_filter_reports_valid_set() {
        let known = strings(&["mongodb", "rust"]);
        let err = resolve_filter(Some("cobol,fortran"), &known).unwrap_err();
        match err {
            AppError::InvalidCategories { valid } => assert_eq!(valid, known),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_clean_subcategories_preserves_case() {
        let cleaned = clean_subcategories(["MySQL", " mysql ", "", "MySQL"]);
        assert_eq!(cleaned, strings(&["MySQL", "mysql"]));
    }

    #[test]
    fn test_missing_subcategories_is_set_difference() {
        let existing = strings(&["A", "B"]);
        let incoming = strings(&["B", "C"]);
        assert_eq!(missing_subcategories(&existing, &incoming), strings(&["C"]));
        assert!(missing_subcategories(&existing, &existing).is_empty());
    }
}
