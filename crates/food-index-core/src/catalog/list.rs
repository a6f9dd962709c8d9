//! Ordered Food List
//!
//! Per-category record storage, sorted by description.
//! Records live in a slot arena; indexes refer to them by [`RecordHandle`].

use std::collections::TryReserveError;

use crate::food::FoodRecord;

/// Stable, non-owning reference to a record stored in an [`OrderedFoodList`].
///
/// A handle stays valid until the record it names is removed. Slots of
/// removed records are recycled, so a stale handle may later name another
/// record; index trees are purged on every removal so they never hold one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordHandle(usize);

/// Food records kept in non-decreasing description order (byte-wise).
#[derive(Debug, Clone, Default)]
pub struct OrderedFoodList {
    slots: Vec<Option<FoodRecord>>,
    free: Vec<usize>,
    order: Vec<RecordHandle>,
}

impl OrderedFoodList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record in description order.
    ///
    /// Equal descriptions keep insertion order: the new record lands after
    /// every existing record with the same description.
    pub fn insert(&mut self, record: FoodRecord) -> RecordHandle {
        let position = self
            .order
            .partition_point(|h| self.describe(*h) <= record.description.as_str());

        let handle = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(record);
                RecordHandle(slot)
            }
            None => {
                self.slots.push(Some(record));
                RecordHandle(self.slots.len() - 1)
            }
        };

        self.order.insert(position, handle);
        handle
    }

    /// Make room for `additional` more records without aborting on
    /// allocation failure. Recycled slots count towards the room.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.order.try_reserve(additional)?;
        let fresh = additional.saturating_sub(self.free.len());
        self.slots.try_reserve(fresh)
    }

    /// Resolve a handle to its record.
    pub fn get(&self, handle: RecordHandle) -> Option<&FoodRecord> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    /// Linear lookup by record id.
    pub fn find_by_id(&self, id: i32) -> Option<&FoodRecord> {
        self.iter().find(|record| record.id == id)
    }

    /// Unlink the first record with `id`.
    ///
    /// Returns the handle it occupied together with the record, so the
    /// caller can purge index entries pointing at that handle.
    pub fn remove_by_id(&mut self, id: i32) -> Option<(RecordHandle, FoodRecord)> {
        let position = self
            .order
            .iter()
            .position(|h| self.get(*h).is_some_and(|r| r.id == id))?;

        let handle = self.order.remove(position);
        let record = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        Some((handle, record))
    }

    /// Records in list order. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = &FoodRecord> + '_ {
        self.order.iter().filter_map(|h| self.get(*h))
    }

    /// Handles paired with their records, in list order.
    pub fn entries(&self) -> impl Iterator<Item = (RecordHandle, &FoodRecord)> + '_ {
        self.order
            .iter()
            .filter_map(|h| self.get(*h).map(|record| (*h, record)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn describe(&self, handle: RecordHandle) -> &str {
        self.get(handle).map_or("", |r| r.description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: i32, description: &str) -> FoodRecord {
        FoodRecord::new(id, description, 0.0, 100, 1.0, 1.0, "Frutas")
    }

    fn descriptions(list: &OrderedFoodList) -> Vec<&str> {
        list.iter().map(|r| r.description.as_str()).collect()
    }

    #[test]
    fn test_insert_keeps_description_order() {
        let mut list = OrderedFoodList::new();
        for (id, name) in [(1, "Banana"), (2, "Abacate"), (3, "Caju"), (4, "Acerola")] {
            list.insert(food(id, name));
        }
        assert_eq!(descriptions(&list), ["Abacate", "Acerola", "Banana", "Caju"]);
    }

    #[test]
    fn test_insert_is_bytewise() {
        let mut list = OrderedFoodList::new();
        list.insert(food(1, "abacaxi"));
        list.insert(food(2, "Uva"));
        list.insert(food(3, "Água de coco"));
        // uppercase < lowercase < multi-byte
        assert_eq!(descriptions(&list), ["Uva", "abacaxi", "Água de coco"]);
    }

    #[test]
    fn test_equal_descriptions_keep_insertion_order() {
        let mut list = OrderedFoodList::new();
        list.insert(food(1, "Pera"));
        list.insert(food(2, "Maçã"));
        list.insert(food(3, "Maçã"));
        list.insert(food(4, "Maçã"));
        let ids: Vec<i32> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 3, 4, 1]);
    }

    #[test]
    fn test_find_by_id() {
        let mut list = OrderedFoodList::new();
        list.insert(food(10, "Banana"));
        list.insert(food(20, "Abacate"));
        assert_eq!(list.find_by_id(20).map(|r| r.description.as_str()), Some("Abacate"));
        assert!(list.find_by_id(30).is_none());
    }

    #[test]
    fn test_remove_by_id_returns_record_and_handle() {
        let mut list = OrderedFoodList::new();
        let banana = list.insert(food(1, "Banana"));
        list.insert(food(2, "Abacate"));

        let (handle, record) = list.remove_by_id(1).unwrap();
        assert_eq!(handle, banana);
        assert_eq!(record.description, "Banana");
        assert!(list.get(banana).is_none());
        assert_eq!(descriptions(&list), ["Abacate"]);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut list = OrderedFoodList::new();
        list.insert(food(1, "Banana"));
        assert!(list.remove_by_id(99).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_removed_slot_is_recycled() {
        let mut list = OrderedFoodList::new();
        let first = list.insert(food(1, "Banana"));
        list.insert(food(2, "Abacate"));
        list.remove_by_id(1);
        let reused = list.insert(food(3, "Caju"));
        assert_eq!(reused, first);
        assert_eq!(list.get(reused).map(|r| r.id), Some(3));
        assert_eq!(descriptions(&list), ["Abacate", "Caju"]);
    }

    #[test]
    fn test_try_reserve_reports_overflow() {
        let mut list = OrderedFoodList::new();
        list.insert(food(1, "Banana"));
        assert!(list.try_reserve(usize::MAX).is_err());
        assert!(list.try_reserve(16).is_ok());
        assert_eq!(descriptions(&list), ["Banana"]);
    }

    #[test]
    fn test_iter_is_restartable() {
        let mut list = OrderedFoodList::new();
        list.insert(food(1, "Banana"));
        list.insert(food(2, "Abacate"));
        let first: Vec<i32> = list.iter().map(|r| r.id).collect();
        let second: Vec<i32> = list.iter().map(|r| r.id).collect();
        assert_eq!(first, second);
    }
}
