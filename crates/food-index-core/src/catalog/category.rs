//! Category
//!
//! One named group of foods: the alphabetical list plus the energy and
//! protein indexes built over it.

use std::collections::TryReserveError;

use serde::{Deserialize, Serialize};

use super::list::OrderedFoodList;
use super::tree::KeyIndexTree;
use crate::food::{truncate_bounded, FoodRecord, MAX_CATEGORY_BYTES};

/// How a category brings its indexes back in line after a removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalStrategy {
    /// Clear both trees and re-insert every remaining record.
    #[default]
    Rebuild,
    /// Unlink only the removed record's node from each tree.
    Surgical,
}

impl RemovalStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rebuild => "rebuild",
            Self::Surgical => "surgical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rebuild" => Some(Self::Rebuild),
            "surgical" => Some(Self::Surgical),
            _ => None,
        }
    }
}

/// A named group of foods with its two secondary indexes.
///
/// Both indexes hold exactly one entry per record in `foods` whenever no
/// `&mut` method is running.
#[derive(Debug)]
pub struct Category {
    name: String,
    foods: OrderedFoodList,
    energy_index: KeyIndexTree<f64>,
    protein_index: KeyIndexTree<f64>,
    removal: RemovalStrategy,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: truncate_bounded(name, MAX_CATEGORY_BYTES).to_string(),
            foods: OrderedFoodList::new(),
            energy_index: KeyIndexTree::new(),
            protein_index: KeyIndexTree::new(),
            removal: RemovalStrategy::default(),
        }
    }

    pub fn with_removal_strategy(mut self, removal: RemovalStrategy) -> Self {
        self.removal = removal;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a record to the list and to both indexes.
    pub fn add_food(&mut self, record: FoodRecord) {
        let energy = record.energy_key();
        let protein = record.protein_key();
        let handle = self.foods.insert(record);
        self.energy_index.insert(energy, handle);
        self.protein_index.insert(protein, handle);
    }

    /// Add a record to the list only; the caller must rebuild the indexes
    /// before the category is queried.
    ///
    /// List storage grows fallibly, so running out of memory is reported
    /// instead of aborting.
    pub(crate) fn try_push_unindexed(
        &mut self,
        record: FoodRecord,
    ) -> Result<(), TryReserveError> {
        self.foods.try_reserve(1)?;
        self.foods.insert(record);
        Ok(())
    }

    /// Throw away both indexes and rebuild them from the list.
    pub fn rebuild_indexes(&mut self) {
        self.energy_index.clear();
        self.protein_index.clear();
        for (handle, record) in self.foods.entries() {
            self.energy_index.insert(record.energy_key(), handle);
            self.protein_index.insert(record.protein_key(), handle);
        }
        tracing::trace!(category = %self.name, foods = self.foods.len(), "indexes rebuilt");
    }

    /// Remove the food with `id`, keeping both indexes consistent.
    ///
    /// Returns the removed record, or `None` (and changes nothing) when no
    /// food in this category has that id.
    pub fn remove_food_by_id(&mut self, id: i32) -> Option<FoodRecord> {
        let (handle, record) = self.foods.remove_by_id(id)?;
        match self.removal {
            RemovalStrategy::Rebuild => self.rebuild_indexes(),
            RemovalStrategy::Surgical => {
                self.energy_index.remove(handle);
                self.protein_index.remove(handle);
            }
        }
        tracing::info!(
            category = %self.name,
            id,
            description = %record.description,
            "food removed"
        );
        Some(record)
    }

    pub fn find_food(&self, id: i32) -> Option<&FoodRecord> {
        self.foods.find_by_id(id)
    }

    pub fn list_alphabetical(&self) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.foods.iter()
    }

    pub fn list_by_energy_desc(&self) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.energy_index
            .iter_descending()
            .filter_map(move |(_, handle)| self.foods.get(handle))
    }

    pub fn list_by_protein_desc(&self) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.protein_index
            .iter_descending()
            .filter_map(move |(_, handle)| self.foods.get(handle))
    }

    /// Foods with `min <= energy_kcal <= max`, lowest energy first.
    pub fn range_by_energy(&self, min: f64, max: f64) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.energy_index
            .range(min, max)
            .filter_map(move |(_, handle)| self.foods.get(handle))
    }

    /// Foods with `min <= protein <= max`, lowest protein first.
    pub fn range_by_protein(&self, min: f64, max: f64) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.protein_index
            .range(min, max)
            .filter_map(move |(_, handle)| self.foods.get(handle))
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn energy_index(&self) -> &KeyIndexTree<f64> {
        &self.energy_index
    }

    pub fn protein_index(&self) -> &KeyIndexTree<f64> {
        &self.protein_index
    }
}
