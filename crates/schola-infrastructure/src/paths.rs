//! Unified path management for the Nova Schola data directory.
//!
//! All stored collections live under one base directory:
//!
//! ```text
//! ~/.local/share/schola/       # Data directory (platform default)
//! ├── profiles/                # One TOML document per profile
//! ├── plans/
//! ├── economy/
//! ├── store/
//! ├── messages/
//! ├── infractions/
//! ├── academic_results/
//! ├── remedial/
//! ├── homework/
//! └── lesson_progress/
//! ```
//!
//! Tests pass an explicit base directory; production resolves the
//! platform default via `dirs`.

use crate::dir_storage::DirStorage;
use schola_core::error::{Result, ScholaError};
use std::path::{Path, PathBuf};

/// A stored collection, one directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Profiles,
    Plans,
    Economy,
    StoreCatalog,
    Messages,
    Infractions,
    AcademicResults,
    Remedial,
    Homework,
    LessonProgress,
}

impl Collection {
    fn dir_name(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Plans => "plans",
            Collection::Economy => "economy",
            Collection::StoreCatalog => "store",
            Collection::Messages => "messages",
            Collection::Infractions => "infractions",
            Collection::AcademicResults => "academic_results",
            Collection::Remedial => "remedial",
            Collection::Homework => "homework",
            Collection::LessonProgress => "lesson_progress",
        }
    }
}

/// Unified path management for Nova Schola storage.
#[derive(Debug, Clone)]
pub struct ScholaPaths {
    base_dir: Option<PathBuf>,
}

impl ScholaPaths {
    /// Creates a path resolver, optionally rooted at a custom base
    /// directory (used by tests and the `--data-dir` flag).
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the base data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("schola"))
            .ok_or_else(|| ScholaError::config("Could not determine platform data directory"))
    }

    /// Returns the directory for one collection.
    pub fn collection_dir(&self, collection: Collection) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(collection.dir_name()))
    }

    /// Opens (creating if necessary) the storage for one collection.
    pub async fn open_storage(&self, collection: Collection) -> Result<DirStorage> {
        DirStorage::open(self.collection_dir(collection)?).await
    }
}
