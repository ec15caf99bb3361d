use std::collections::HashSet;

use glob::Pattern;

use crate::engine::errors::ClientError;

/// Validates the series selection of one request and returns it owned.
/// The selection must be non-empty, free of blank entries and duplicate-free.
pub fn check_selection<P: AsRef<str>>(paths: &[P]) -> Result<Vec<String>, ClientError> {
    if paths.is_empty() {
        return Err(ClientError::EmptySelection);
    }

    let mut seen = HashSet::with_capacity(paths.len());
    let mut owned = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        if path.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "path must not be blank".to_string(),
            ));
        }
        if !seen.insert(path) {
            return Err(ClientError::InvalidArgument(format!(
                "duplicate path '{}' in request",
                path
            )));
        }
        owned.push(path.to_string());
    }
    Ok(owned)
}

pub fn is_pattern(path: &str) -> bool {
    path.contains('*')
}

/// True if `path` is selected by `pattern`. Non-wildcard patterns must match
/// exactly; `*` matches any run of characters, dots included.
pub fn matches_pattern(pattern: &str, path: &str) -> bool {
    if !is_pattern(pattern) {
        return pattern == path;
    }
    Pattern::new(pattern)
        .map(|p| p.matches(path))
        .unwrap_or(false)
}

pub fn is_selected<P: AsRef<str>>(selection: &[P], path: &str) -> bool {
    selection
        .iter()
        .any(|pattern| matches_pattern(pattern.as_ref(), path))
}
