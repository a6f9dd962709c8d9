//! Food record value type.

use serde::{Deserialize, Serialize};

/// Maximum description length in bytes (100-byte on-disk field minus NUL).
pub const MAX_DESCRIPTION_BYTES: usize = 99;

/// Maximum category name length in bytes (50-byte on-disk field minus NUL).
pub const MAX_CATEGORY_BYTES: usize = 49;

/// One food item of the catalog.
///
/// Strings are bounded to the on-disk field widths. Longer input is cut
/// silently at the last UTF-8 boundary that fits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: i32,
    pub description: String,
    /// Moisture, in grams per 100 g
    pub moisture: f64,
    pub energy_kcal: i32,
    /// Protein, in grams per 100 g
    pub protein: f64,
    /// Carbohydrate, in grams per 100 g
    pub carbohydrate: f64,
    pub category: String,
}

impl FoodRecord {
    pub fn new(
        id: i32,
        description: &str,
        moisture: f64,
        energy_kcal: i32,
        protein: f64,
        carbohydrate: f64,
        category: &str,
    ) -> Self {
        Self {
            id,
            description: truncate_bounded(description, MAX_DESCRIPTION_BYTES).to_string(),
            moisture,
            energy_kcal,
            protein,
            carbohydrate,
            category: truncate_bounded(category, MAX_CATEGORY_BYTES).to_string(),
        }
    }

    /// Key used by the energy index.
    pub fn energy_key(&self) -> f64 {
        f64::from(self.energy_kcal)
    }

    /// Key used by the protein index.
    pub fn protein_key(&self) -> f64 {
        self.protein
    }
}

impl PartialEq for FoodRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FoodRecord {}

/// Cut `value` to at most `max_bytes`, never splitting a character.
pub fn truncate_bounded(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
