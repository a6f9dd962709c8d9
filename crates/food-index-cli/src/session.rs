//! Per-invocation context handed to every command handler.

use std::path::{Path, PathBuf};

use food_index_core::config::Config;
use food_index_core::{CatalogError, Category, CategoryCatalog, Result};

pub struct Session {
    pub base_dir: PathBuf,
    pub config: Config,
    pub data_path: PathBuf,
}

impl Session {
    /// Read config from `base_dir`; `data` overrides the configured file.
    pub fn open(base_dir: &Path, data: Option<&Path>) -> Result<Self> {
        let config = Config::load(base_dir)?;
        let data_path = match data {
            Some(path) => path.to_path_buf(),
            None => config.data_path(base_dir),
        };
        tracing::debug!(
            base_dir = %base_dir.display(),
            data = %data_path.display(),
            "session opened"
        );
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            config,
            data_path,
        })
    }

    pub fn load(&self) -> Result<CategoryCatalog> {
        food_index_core::load_catalog(&self.data_path, self.config.index.removal)
    }

    pub fn save(&self, catalog: &CategoryCatalog) -> Result<()> {
        food_index_core::save_catalog(catalog, &self.data_path)
    }
}

/// Look up a category, turning absence into a reportable error.
pub fn require_category<'a>(catalog: &'a CategoryCatalog, name: &str) -> Result<&'a Category> {
    catalog
        .find_category(name)
        .ok_or_else(|| CatalogError::CategoryNotFound {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_index_core::{FoodRecord, RemovalStrategy};
    use tempfile::TempDir;

    #[test]
    fn test_open_uses_configured_data_path() {
        let dir = TempDir::new().unwrap();
        let session = Session::open(dir.path(), None).unwrap();
        assert_eq!(session.data_path, dir.path().join("dados.bin"));
        assert_eq!(session.base_dir, dir.path());
    }

    #[test]
    fn test_open_data_override() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other.bin");
        let session = Session::open(dir.path(), Some(&other)).unwrap();
        assert_eq!(session.data_path, other);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let session = Session::open(dir.path(), None).unwrap();
        let catalog = CategoryCatalog::bulk_load(
            vec![FoodRecord::new(1, "Banana", 74.0, 89, 1.1, 22.8, "Frutas")],
            RemovalStrategy::Rebuild,
        )
        .unwrap();
        session.save(&catalog).unwrap();

        let loaded = session.load().unwrap();
        assert!(require_category(&loaded, "Frutas").is_ok());
        assert!(matches!(
            require_category(&loaded, "Doces"),
            Err(CatalogError::CategoryNotFound { .. })
        ));
    }
}
