//! JSON content files → taxonomy + entities.
//!
//! This is the loading collaborator in front of `Catalog::load`; the
//! catalog itself never touches the filesystem. A content file looks like:
//!
//! ```json
//! {
//!   "categories": [
//!     { "slug": "child-adolescent/behavioral-health", "name": "Behavioral Health" }
//!   ],
//!   "entities": [ { "id": "anxiety-children", "name": "Anxiety in Children", ... } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::{Category, Entity, Taxonomy};

/// One content file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentFile {
    /// Categories beyond the clinical defaults.
    pub categories: Vec<Category>,
    pub entities: Vec<Entity>,
}

/// Everything read from a set of content paths, not yet validated.
#[derive(Debug, Clone)]
pub struct ContentSource {
    pub taxonomy: Taxonomy,
    pub entities: Vec<Entity>,
    /// Files read, in load order.
    pub files: Vec<PathBuf>,
}

impl ContentSource {
    /// Reads every `.json` file named by `paths`.
    ///
    /// A path may be a file or a directory; directories are read one level
    /// deep in file-name order. Entities keep file order, then in-file order.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, AppError> {
        let mut source = Self {
            taxonomy: Taxonomy::clinical(),
            entities: Vec::new(),
            files: Vec::new(),
        };

        for path in paths {
            for file in json_files(path.as_ref())? {
                let content = read_file(&file)?;
                source.merge(&file, content)?;
                source.files.push(file);
            }
        }

        tracing::info!(
            files = source.files.len(),
            entities = source.entities.len(),
            categories = source.taxonomy.len(),
            "Read content"
        );
        Ok(source)
    }

    /// Validates and builds the catalog.
    pub fn into_catalog(self) -> Result<Catalog, AppError> {
        Catalog::load(self.taxonomy, self.entities)
    }

    /// Adds a file's categories and entities. Re-declaring an identical
    /// category is a no-op; a conflicting one is an error.
    fn merge(&mut self, path: &Path, content: ContentFile) -> Result<(), AppError> {
        for category in content.categories {
            match self.taxonomy.get(&category.slug) {
                Some(existing) if existing.name == category.name => {}
                Some(existing) => {
                    return Err(AppError::Content {
                        path: path.to_path_buf(),
                        message: format!(
                            "category '{}' declared as '{}' but already named '{}'",
                            category.slug, category.name, existing.name
                        ),
                    });
                }
                None => self.taxonomy.push(category),
            }
        }
        self.entities.extend(content.entities);
        Ok(())
    }
}

fn json_files(path: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let file = entry?.path();
        if file.is_file() && file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();
    tracing::debug!(dir = %path.display(), files = files.len(), "Scanned content directory");
    Ok(files)
}

fn read_file(path: &Path) -> Result<ContentFile, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::Content {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| AppError::Content {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
