//! Directory-backed document storage.
//!
//! One directory per collection, one TOML document per entity, keyed by
//! id. This is the storage surface every repository in this crate builds
//! on; the repository traits in `schola-core` keep the seam so a real
//! backing service could replace it without touching callers.

use schola_core::error::{Result, ScholaError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tokio::fs;

/// Async file-per-entity storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

/// True when the error is the storage's not-found marker.
pub fn is_not_found(err: &ScholaError) -> bool {
    err.is_not_found()
}

impl DirStorage {
    /// Opens the storage, creating the directory if it does not exist.
    pub async fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        // Ids are UUIDs or fixed slugs; anything path-shaped is a bug.
        if id.is_empty() || id.contains(['/', '\\', '.']) {
            return Err(ScholaError::internal(format!(
                "Invalid storage id: '{id}'"
            )));
        }
        Ok(self.dir.join(format!("{id}.toml")))
    }

    /// Saves a document, overwriting any previous version.
    pub async fn save<T: Serialize>(&self, entity: &'static str, id: &str, value: &T) -> Result<()> {
        let path = self.path_for(id)?;
        let body = toml::to_string_pretty(value)?;
        fs::write(&path, body).await.map_err(|e| {
            ScholaError::io(format!("Failed to write {entity} '{id}' at {path:?}: {e}"))
        })
    }

    /// Loads one document.
    ///
    /// # Errors
    ///
    /// - [`ScholaError::NotFound`] when no document exists under the id
    /// - [`ScholaError::Serialization`] on a corrupt document
    pub async fn load<T: DeserializeOwned>(&self, entity: &'static str, id: &str) -> Result<T> {
        let path = self.path_for(id)?;
        let body = match fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScholaError::not_found(entity, id));
            }
            Err(e) => {
                return Err(ScholaError::io(format!(
                    "Failed to read {entity} '{id}' at {path:?}: {e}"
                )));
            }
        };
        Ok(toml::from_str(&body)?)
    }

    /// Loads every document in the collection as `(id, value)` pairs.
    pub async fn load_all<T: DeserializeOwned>(&self, entity: &'static str) -> Result<Vec<(String, T)>> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut values = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let body = fs::read_to_string(&path).await?;
            match toml::from_str(&body) {
                Ok(value) => values.push((id.to_string(), value)),
                Err(e) => {
                    // A single corrupt document must not take down the
                    // whole listing.
                    tracing::warn!("[DirStorage] Skipping corrupt {entity} document {path:?}: {e}");
                }
            }
        }
        Ok(values)
    }

    /// Deletes a document. Deleting a missing document is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScholaError::io(format!(
                "Failed to delete document at {path:?}: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    async fn open_temp() -> (DirStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = DirStorage::open(temp_dir.path().join("docs")).await.unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let (storage, _temp_dir) = open_temp().await;
        let doc = Doc {
            name: "first".to_string(),
            count: 3,
        };
        storage.save("doc", "doc-1", &doc).await.unwrap();
        let loaded: Doc = storage.load("doc", "doc-1").await.unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (storage, _temp_dir) = open_temp().await;
        let err = storage.load::<Doc>("doc", "missing").await.unwrap_err();
        assert!(is_not_found(&err));
    }

    #[tokio::test]
    async fn test_load_all_skips_corrupt_documents() {
        let (storage, _temp_dir) = open_temp().await;
        storage
            .save(
                "doc",
                "ok",
                &Doc {
                    name: "ok".to_string(),
                    count: 1,
                },
            )
            .await
            .unwrap();
        tokio::fs::write(storage.dir.join("broken.toml"), "not = [valid")
            .await
            .unwrap();

        let all: Vec<(String, Doc)> = storage.load_all("doc").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "ok");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (storage, _temp_dir) = open_temp().await;
        storage
            .save(
                "doc",
                "doc-1",
                &Doc {
                    name: "x".to_string(),
                    count: 0,
                },
            )
            .await
            .unwrap();
        storage.delete("doc-1").await.unwrap();
        storage.delete("doc-1").await.unwrap();
        assert!(is_not_found(
            &storage.load::<Doc>("doc", "doc-1").await.unwrap_err()
        ));
    }

    #[tokio::test]
    async fn test_path_shaped_id_rejected() {
        let (storage, _temp_dir) = open_temp().await;
        let err = storage
            .save("doc", "../escape", &Doc {
                name: "x".to_string(),
                count: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScholaError::Internal(_)));
    }
}
