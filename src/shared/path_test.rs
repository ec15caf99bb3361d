use crate::engine::errors::ClientError;
use crate::shared::path::{check_selection, is_selected, matches_pattern};

#[test]
fn selection_keeps_order() {
    let owned = check_selection(&["test.go.b", "test.go.a"]).unwrap();
    assert_eq!(owned, vec!["test.go.b".to_string(), "test.go.a".to_string()]);
}

#[test]
fn empty_selection_is_rejected() {
    let empty: [&str; 0] = [];
    assert_eq!(check_selection(&empty), Err(ClientError::EmptySelection));
}

#[test]
fn duplicates_and_blanks_are_rejected() {
    assert!(matches!(
        check_selection(&["a", "b", "a"]),
        Err(ClientError::InvalidArgument(_))
    ));
    assert!(matches!(
        check_selection(&["a", "  "]),
        Err(ClientError::InvalidArgument(_))
    ));
}

#[test]
fn wildcard_matching() {
    assert!(matches_pattern("test.go.a", "test.go.a"));
    assert!(!matches_pattern("test.go.a", "test.go.ab"));
    assert!(matches_pattern("test.*", "test.go.a"));
    assert!(matches_pattern("*.a", "test.go.a"));
    assert!(!matches_pattern("test.*.b", "test.go.a"));
    assert!(is_selected(&["x.y", "test.*"], "test.go.c"));
    assert!(!is_selected(&["x.y"], "test.go.c"));
}
