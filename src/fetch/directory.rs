//! Directory-backed config store
//!
//! Each config is a document `<root>/<name>.json` or `<root>/<name>.toml`:
//!
//! ```toml
//! [metadata.annotations]
//! "environmentconfig.crossplane.io/weight" = "10"
//!
//! [data]
//! region = "eu-west-1"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use env_compose_types::ConfigObject;
use sha2::{Digest, Sha256};

use super::{ConfigFetcher, FetchContext, FetchError};
use crate::config::toml_to_json;

const EXTENSIONS: &[&str] = &["json", "toml"];

/// Reads config documents from a directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all documents in the directory, sorted
    pub fn list(&self) -> Result<Vec<String>, FetchError> {
        let entries = fs::read_dir(&self.root).map_err(|e| FetchError::Io {
            name: self.root.display().to_string(),
            message: e.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !EXTENSIONS.contains(&ext) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains('\0')
    }

    fn decode(name: &str, ext: &str, bytes: &[u8]) -> Result<ConfigObject, FetchError> {
        let parse_err = |message: String| FetchError::Parse {
            name: name.to_string(),
            message,
        };

        match ext {
            "json" => serde_json::from_slice(bytes).map_err(|e| parse_err(e.to_string())),
            _ => {
                let contents = std::str::from_utf8(bytes)
                    .map_err(|e| parse_err(format!("Invalid UTF-8: {}", e)))?;
                let toml_value: toml::Value = toml::from_str(contents)
                    .map_err(|e| parse_err(format!("TOML parse error: {}", e)))?;
                serde_json::from_value(toml_to_json(toml_value))
                    .map_err(|e| parse_err(e.to_string()))
            }
        }
    }
}

impl ConfigFetcher for DirectoryStore {
    fn get(&self, ctx: &FetchContext, name: &str) -> Result<ConfigObject, FetchError> {
        ctx.check()?;

        if !Self::is_valid_name(name) {
            return Err(FetchError::not_found(name));
        }

        for ext in EXTENSIONS {
            let path = self.root.join(format!("{}.{}", name, ext));
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(FetchError::Io {
                        name: name.to_string(),
                        message: e.to_string(),
                    })
                }
            };

            let digest = hex::encode(Sha256::digest(&bytes));
            let mut object = Self::decode(name, ext, &bytes)?;
            if object.metadata.name.is_empty() {
                object.metadata.name = name.to_string();
            }
            return Ok(object.with_digest(digest));
        }

        Err(FetchError::not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_json_document() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base.json"),
            r#"{
                "metadata": {"annotations": {"environmentconfig.crossplane.io/weight": "3"}},
                "data": {"a": 1}
            }"#,
        )
        .unwrap();

        let store = DirectoryStore::new(dir.path());
        let obj = store.get(&FetchContext::new(), "base").unwrap();

        assert_eq!(obj.name(), "base");
        assert_eq!(obj.annotation(env_compose_types::WEIGHT_ANNOTATION), Some("3"));
        assert_eq!(obj.data.as_ref().unwrap()["a"], 1);
        assert_eq!(obj.digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_reads_toml_document() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("prod.toml"),
            "[data]\nregion = \"eu\"\n[data.limits]\ncpu = 2\n",
        )
        .unwrap();

        let store = DirectoryStore::new(dir.path());
        let obj = store.get(&FetchContext::new(), "prod").unwrap();

        let data = obj.data.unwrap();
        assert_eq!(data["region"], "eu");
        assert_eq!(data["limits"]["cpu"], 2);
    }

    #[test]
    fn test_digest_tracks_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        let store = DirectoryStore::new(dir.path());

        fs::write(&path, r#"{"data": {"v": 1}}"#).unwrap();
        let first = store.get(&FetchContext::new(), "a").unwrap().digest;
        fs::write(&path, r#"{"data": {"v": 2}}"#).unwrap();
        let second = store.get(&FetchContext::new(), "a").unwrap().digest;

        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = DirectoryStore::new(dir.path())
            .get(&FetchContext::new(), "ghost")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rejects_path_escape() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("store");
        fs::create_dir(&inner).unwrap();
        fs::write(dir.path().join("secret.json"), r#"{"data": {}}"#).unwrap();

        let store = DirectoryStore::new(&inner);
        for name in ["../secret", "..", "", "a/b"] {
            assert!(store.get(&FetchContext::new(), name).unwrap_err().is_not_found());
        }
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let err = DirectoryStore::new(dir.path())
            .get(&FetchContext::new(), "broken")
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub.json")).unwrap();

        let names = DirectoryStore::new(dir.path()).list().unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_cancelled_context() {
        let dir = TempDir::new().unwrap();
        let ctx = FetchContext::new();
        ctx.cancel();

        let err = DirectoryStore::new(dir.path()).get(&ctx, "a").unwrap_err();
        assert_eq!(err, FetchError::Cancelled);
    }
}
