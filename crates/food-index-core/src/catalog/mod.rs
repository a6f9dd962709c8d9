//! # Catalog Module
//!
//! In-memory indexed store for food records, grouped by category.
//!
//! ## Structure
//!
//! - `list`: per-category record arena kept in description order
//! - `tree`: unbalanced BST index from a numeric key to a record handle
//! - `category`: one list plus its energy and protein indexes
//! - `store`: the sorted collection of categories
//!
//! The list owns every record. Index trees store [`RecordHandle`]s only, and
//! every removal purges the matching tree nodes before returning, so an
//! index never points at a record that is gone.
//!
//! ## Example
//!
//! ```rust
//! use food_index_core::catalog::{CategoryCatalog, RemovalStrategy};
//! use food_index_core::FoodRecord;
//!
//! let records = vec![
//!     FoodRecord::new(1, "Banana", 74.0, 89, 1.1, 22.8, "Frutas"),
//!     FoodRecord::new(2, "Arroz", 70.1, 130, 2.7, 28.1, "Cereais"),
//!     FoodRecord::new(3, "Abacate", 73.2, 160, 2.0, 8.5, "Frutas"),
//! ];
//! let catalog = CategoryCatalog::bulk_load(records, RemovalStrategy::Rebuild).unwrap();
//!
//! let frutas = catalog.find_category("Frutas").unwrap();
//! let top: Vec<i32> = frutas.list_by_energy_desc().map(|f| f.id).collect();
//! assert_eq!(top, [3, 1]);
//! ```

mod category;
mod list;
mod store;
mod tree;

pub use category::{Category, RemovalStrategy};
pub use list::{OrderedFoodList, RecordHandle};
pub use store::CategoryCatalog;
pub use tree::{Ascending, Descending, KeyIndexTree, Range};
