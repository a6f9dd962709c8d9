pub mod catalog;
pub mod config;
pub mod error;
pub mod food;
pub mod import;
pub mod storage;

pub use catalog::{
    Category, CategoryCatalog, KeyIndexTree, OrderedFoodList, RecordHandle, RemovalStrategy,
};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use food::FoodRecord;
pub use import::read_json_records;
pub use storage::{load_catalog, save_catalog, save_records};
