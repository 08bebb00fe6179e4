//! JSON tree source.

use std::path::{Path, PathBuf};

use crate::model::Docs;

/// Error returned when the declaration tree cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input is not a valid declaration tree.
    #[error("Invalid declaration tree in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a declaration tree from a JSON file.
pub fn load(path: &Path) -> Result<Docs, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a declaration tree from a JSON string.
pub fn parse(json: &str) -> Result<Docs, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"{
        "version": "0.3.0",
        "decl": {
            "kind": "package",
            "name": "geo",
            "summary": "Geometry.",
            "description": "Exports:\n - shapes.Circle",
            "modules": [
                {
                    "kind": "module",
                    "name": "shapes",
                    "structs": [
                        {
                            "kind": "struct",
                            "name": "Circle",
                            "summary": "A circle.",
                            "parentTraits": ["Shape"],
                            "fields": [{"name": "radius", "type": "Float64"}],
                            "parameters": [{"name": "T", "type": "DType", "passingKind": "inferred"}],
                            "functions": [
                                {
                                    "kind": "function",
                                    "name": "area",
                                    "overloads": [
                                        {
                                            "name": "area",
                                            "signature": "area(self) -> Float64",
                                            "returnsDoc": "The area.",
                                            "args": [{"name": "self", "convention": "read"}]
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let docs = parse(SAMPLE).unwrap();
        assert_eq!(docs.version, "0.3.0");
        assert_eq!(docs.decl.name, "geo");

        let circle = &docs.decl.modules[0].structs[0];
        assert_eq!(circle.name, "Circle");
        assert_eq!(circle.parent_traits, vec!["Shape".to_owned()]);
        assert_eq!(circle.fields[0].type_name, "Float64");
        assert_eq!(circle.parameters[0].passing_kind, "inferred");

        let area = &circle.functions[0].overloads[0];
        assert_eq!(area.returns_doc.to_string(), "The area.");
        assert_eq!(area.args[0].convention, "read");
    }

    #[test]
    fn test_missing_fields_default() {
        let docs = parse(r#"{"decl": {"name": "empty"}}"#).unwrap();
        assert!(docs.version.is_empty());
        assert!(docs.decl.packages.is_empty());
        assert!(docs.decl.summary.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let docs = load(&path).unwrap();
        assert_eq!(docs.decl.modules[0].name, "shapes");
    }
}
