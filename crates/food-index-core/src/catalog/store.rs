//! Category Catalog
//!
//! Top-level store: categories in byte-wise name order.

use super::category::{Category, RemovalStrategy};
use crate::error::Result;
use crate::food::{truncate_bounded, FoodRecord, MAX_CATEGORY_BYTES};

/// Every category of the catalog, sorted by name, names unique.
#[derive(Debug, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    removal: RemovalStrategy,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty catalog whose categories use `removal` after deleting a food.
    pub fn with_removal_strategy(removal: RemovalStrategy) -> Self {
        Self {
            categories: Vec::new(),
            removal,
        }
    }

    /// Build a catalog from records in any order.
    ///
    /// Records are first placed in their category lists; each category then
    /// builds its indexes exactly once. Category and list storage grow
    /// fallibly, so exhausting memory there yields
    /// [`CatalogError::Allocation`](crate::CatalogError::Allocation).
    pub fn bulk_load<I>(records: I, removal: RemovalStrategy) -> Result<Self>
    where
        I: IntoIterator<Item = FoodRecord>,
    {
        let mut catalog = Self::with_removal_strategy(removal);

        let mut loaded = 0usize;
        for record in records {
            let name = record.category.clone();
            catalog
                .try_get_or_create_category(&name)?
                .try_push_unindexed(record)?;
            loaded += 1;
        }

        for category in &mut catalog.categories {
            category.rebuild_indexes();
        }

        tracing::debug!(
            records = loaded,
            categories = catalog.categories.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Exact, case-sensitive lookup.
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name() == name)
    }

    pub fn find_category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name() == name)
    }

    /// Return the category called `name`, creating it in sorted position if
    /// it does not exist yet.
    pub fn get_or_create_category(&mut self, name: &str) -> &mut Category {
        let name = truncate_bounded(name, MAX_CATEGORY_BYTES);
        let position = match self.position_of(name) {
            Ok(found) => found,
            Err(insert_at) => {
                let category = Category::new(name).with_removal_strategy(self.removal);
                self.categories.insert(insert_at, category);
                insert_at
            }
        };
        &mut self.categories[position]
    }

    /// Like [`get_or_create_category`](Self::get_or_create_category), but
    /// reports allocation failure when a new category does not fit.
    pub fn try_get_or_create_category(&mut self, name: &str) -> Result<&mut Category> {
        let name = truncate_bounded(name, MAX_CATEGORY_BYTES);
        let position = match self.position_of(name) {
            Ok(found) => found,
            Err(insert_at) => {
                self.categories.try_reserve(1)?;
                let category = Category::new(name).with_removal_strategy(self.removal);
                self.categories.insert(insert_at, category);
                insert_at
            }
        };
        Ok(&mut self.categories[position])
    }

    /// Remove and return the category called `name`, with all its foods.
    pub fn remove_category(&mut self, name: &str) -> Option<Category> {
        let position = self.categories.iter().position(|c| c.name() == name)?;
        let category = self.categories.remove(position);
        tracing::info!(category = %category.name(), foods = category.len(), "category removed");
        Some(category)
    }

    /// Remove food `id` from the category called `category`.
    pub fn remove_food(&mut self, category: &str, id: i32) -> Option<FoodRecord> {
        self.find_category_mut(category)?.remove_food_by_id(id)
    }

    /// Every record in category order, then list order.
    pub fn serialize(&self) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.categories
            .iter()
            .flat_map(|category| category.list_alphabetical())
    }

    /// Owned copy of [`serialize`](Self::serialize), with each record's
    /// category field set to the category that holds it.
    pub fn to_records(&self) -> Result<Vec<FoodRecord>> {
        let mut records = Vec::new();
        records.try_reserve_exact(self.food_count())?;
        for category in &self.categories {
            records.extend(category.list_alphabetical().map(|food| FoodRecord {
                category: category.name().to_string(),
                ..food.clone()
            }));
        }
        tracing::debug!(records = records.len(), "catalog serialized");
        Ok(records)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.iter()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.iter().map(Category::name)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of foods across all categories.
    pub fn food_count(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }

    pub fn removal_strategy(&self) -> RemovalStrategy {
        self.removal
    }

    /// Sorted position of `name`, or where it would be inserted.
    ///
    /// Names compare byte-wise; a new name goes after every smaller one,
    /// the same first-fit rule the food lists use.
    fn position_of(&self, name: &str) -> std::result::Result<usize, usize> {
        let insert_at = self.categories.partition_point(|c| c.name() < name);
        match self.categories.get(insert_at) {
            Some(existing) if existing.name() == name => Ok(insert_at),
            _ => Err(insert_at),
        }
    }
}
