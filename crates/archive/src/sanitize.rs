//! Entry-path normalization

/// Normalize a raw archive entry path into a safe relative storage key.
///
/// Backslash separators are replaced with forward slashes, then the path is
/// split on `/` and empty segments and parent references (`..`) are dropped.
/// `.` segments are kept as-is, and no length or depth cap is applied; those
/// are the object store's concern.
///
/// Returns `None` when nothing remains (directory markers and entries made
/// entirely of traversal segments are discarded, not rejected).
#[must_use]
pub fn sanitize_entry_path(raw: &str) -> Option<String> {
    let normalized = raw.replace('\\', "/");

    let segments: Vec<&str> = normalized
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "..")
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_passes_through() {
        assert_eq!(sanitize_entry_path("a.txt"), Some("a.txt".to_string()));
        assert_eq!(
            sanitize_entry_path("dir/b.txt"),
            Some("dir/b.txt".to_string())
        );
    }

    #[test]
    fn test_traversal_segments_are_stripped() {
        assert_eq!(
            sanitize_entry_path("../../evil.txt"),
            Some("evil.txt".to_string())
        );
        assert_eq!(
            sanitize_entry_path("a/../b.txt"),
            Some("a/b.txt".to_string())
        );
    }

    #[test]
    fn test_leading_slash_is_dropped() {
        assert_eq!(
            sanitize_entry_path("/etc/passwd"),
            Some("etc/passwd".to_string())
        );
    }

    #[test]
    fn test_backslashes_become_separators() {
        assert_eq!(
            sanitize_entry_path("dir\\sub\\c.txt"),
            Some("dir/sub/c.txt".to_string())
        );
        assert_eq!(
            sanitize_entry_path("..\\..\\evil.txt"),
            Some("evil.txt".to_string())
        );
    }

    #[test]
    fn test_fully_traversal_paths_are_skipped() {
        assert_eq!(sanitize_entry_path(".."), None);
        assert_eq!(sanitize_entry_path("../.."), None);
        assert_eq!(sanitize_entry_path(""), None);
        assert_eq!(sanitize_entry_path("dir/"), Some("dir".to_string()));
        assert_eq!(sanitize_entry_path("/"), None);
    }

    #[test]
    fn test_current_dir_segments_are_kept() {
        // `.` is not resolved; only `..` and empty segments are dropped.
        assert_eq!(
            sanitize_entry_path("./a.txt"),
            Some("./a.txt".to_string())
        );
    }

    #[test]
    fn test_sanitized_key_never_escapes_root() {
        let hostile = [
            "../../../../etc/shadow",
            "..\\..\\windows\\system32",
            "/abs/path",
            "a/b/../../../c",
            "....//x",
        ];
        for raw in hostile {
            if let Some(key) = sanitize_entry_path(raw) {
                assert!(!key.starts_with('/'), "leading slash in {key}");
                assert!(
                    key.split('/').all(|s| s != ".." && !s.is_empty()),
                    "unsafe segment in {key}"
                );
            }
        }
    }
}
