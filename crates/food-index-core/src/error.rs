use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Food {id} not found in category: {category}")]
    FoodNotFound { category: String, id: i32 },

    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Data file not found: {path}")]
    DataNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}' - expected {expected}")]
    InvalidConfigValue {
        key: String,
        value: String,
        expected: String,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CategoryNotFound { .. } => 2,
            Self::FoodNotFound { .. } => 3,
            Self::DataNotFound { .. } => 4,
            Self::ConfigKeyNotFound { .. } | Self::InvalidConfigValue { .. } => 5,
            Self::Json { .. } => 6,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinguish_not_found() {
        let category = CatalogError::CategoryNotFound {
            name: "Frutas".to_string(),
        };
        let food = CatalogError::FoodNotFound {
            category: "Frutas".to_string(),
            id: 7,
        };
        assert_eq!(category.exit_code(), 2);
        assert_eq!(food.exit_code(), 3);
        assert_eq!(
            CatalogError::ConfigKeyNotFound {
                key: "x".to_string()
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn test_allocation_failure_converts() {
        let failure = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = CatalogError::from(failure);
        assert!(matches!(err, CatalogError::Allocation(_)));
        assert!(err.to_string().starts_with("Allocation failed"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_error_messages() {
        let err = CatalogError::FoodNotFound {
            category: "Frutas".to_string(),
            id: 7,
        };
        assert_eq!(err.to_string(), "Food 7 not found in category: Frutas");
    }
}
