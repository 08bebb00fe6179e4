//! Case folding for case-insensitive file systems.
//!
//! On a case-insensitive file system `Foo.md` and `foo.md` collide. Every
//! output segment starting with an uppercase character gets [`CASE_MARKER`]
//! appended so both can coexist.

use std::io;
use std::path::Path;

/// Marker appended to capitalized segments on case-insensitive systems.
pub const CASE_MARKER: char = '-';

/// Apply the case-folding rule to one output path segment.
pub fn fold_segment(name: &str, case_sensitive: bool) -> String {
    let capitalized = name.chars().next().is_some_and(char::is_uppercase);
    if case_sensitive || !capitalized {
        name.to_owned()
    } else {
        format!("{name}{CASE_MARKER}")
    }
}

/// Determine whether `dir` lives on a case-sensitive file system.
///
/// Creates `dir` if needed, then a temporary file with a lowercase prefix,
/// and checks whether the uppercased name resolves to the same file.
pub fn probe_case_sensitivity(dir: &Path) -> io::Result<bool> {
    std::fs::create_dir_all(dir)?;
    let probe = tempfile::Builder::new()
        .prefix("apiref-case-probe-")
        .tempfile_in(dir)?;
    let Some(name) = probe.path().file_name().and_then(|n| n.to_str()) else {
        return Ok(true);
    };
    let upper = dir.join(name.to_uppercase());
    Ok(!upper.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_capitalized_insensitive() {
        assert_eq!(fold_segment("Foo", false), "Foo-");
    }

    #[test]
    fn test_fold_lowercase_untouched() {
        assert_eq!(fold_segment("foo", false), "foo");
        assert_eq!(fold_segment("_private", false), "_private");
    }

    #[test]
    fn test_fold_case_sensitive_untouched() {
        assert_eq!(fold_segment("Foo", true), "Foo");
    }

    #[test]
    fn test_probe_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("site");
        let result = probe_case_sensitivity(&out);
        assert!(result.is_ok());
        assert!(out.is_dir());
        // Probe file is removed on drop.
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
