//! Key Index Tree
//!
//! Unbalanced binary search tree mapping a numeric key to a [`RecordHandle`].
//!
//! Keys smaller than a node go left; equal or greater keys go right, so
//! records sharing a key sit on a single right-leaning path in insertion
//! order. The tree is never rebalanced. Every walk uses an explicit stack
//! so a list-shaped tree cannot exhaust the call stack.

use std::fmt;

use super::list::RecordHandle;

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    handle: RecordHandle,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn leaf(key: K, handle: RecordHandle) -> Box<Self> {
        Box::new(Self {
            key,
            handle,
            left: None,
            right: None,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Secondary index over the records of one category.
pub struct KeyIndexTree<K> {
    root: Link<K>,
    len: usize,
}

impl<K: PartialOrd + Copy> KeyIndexTree<K> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Insert `handle` under `key`.
    pub fn insert(&mut self, key: K, handle: RecordHandle) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::leaf(key, handle));
        self.len += 1;
    }

    /// Entries from the largest key to the smallest (right, node, left).
    pub fn iter_descending(&self) -> Descending<'_, K> {
        let mut iter = Descending { stack: Vec::new() };
        iter.push_right_spine(self.root.as_deref());
        iter
    }

    /// Entries from the smallest key to the largest (left, node, right).
    pub fn iter_ascending(&self) -> Ascending<'_, K> {
        let mut iter = Ascending { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Entries with `min <= key <= max`, in ascending key order.
    ///
    /// Subtrees that cannot hold a matching key are skipped. An inverted
    /// or unordered interval yields nothing.
    pub fn range(&self, min: K, max: K) -> Range<'_, K> {
        let mut iter = Range {
            stack: Vec::new(),
            min,
            max,
        };
        if min <= max {
            iter.push_left_spine(self.root.as_deref());
        }
        iter
    }

    /// Remove the node that holds `handle`.
    ///
    /// The node is located by identity, not by key, because several records
    /// can share a key. Returns `false` when no node holds `handle`.
    pub fn remove(&mut self, handle: RecordHandle) -> bool {
        let Some(path) = self.path_to(handle) else {
            return false;
        };

        let mut slot = &mut self.root;
        for side in path {
            if let Some(node) = slot {
                slot = match side {
                    Side::Left => &mut node.left,
                    Side::Right => &mut node.right,
                };
            }
        }

        let Some(mut node) = slot.take() else {
            return false;
        };
        *slot = match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                // Two children: the in-order successor takes this node's place.
                let mut right = Some(right);
                if let Some(successor) = detach_min(&mut right) {
                    node.key = successor.key;
                    node.handle = successor.handle;
                }
                node.left = Some(left);
                node.right = right;
                Some(node)
            }
        };
        self.len -= 1;
        true
    }

    pub fn contains(&self, handle: RecordHandle) -> bool {
        self.path_to(handle).is_some()
    }

    /// Release every node.
    pub fn clear(&mut self) {
        release(self.root.take());
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node<K>, usize)> =
            self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.left.as_deref().map(|n| (n, depth + 1)));
            stack.extend(node.right.as_deref().map(|n| (n, depth + 1)));
        }
        deepest
    }

    /// Directions from the root to the node holding `handle`.
    ///
    /// Pre-order walk; `path` always holds the directions to the parent of
    /// the node being visited.
    fn path_to(&self, handle: RecordHandle) -> Option<Vec<Side>> {
        let mut path = Vec::new();
        let mut stack: Vec<(&Node<K>, usize, Option<Side>)> =
            self.root.as_deref().map(|n| (n, 0, None)).into_iter().collect();

        while let Some((node, depth, side)) = stack.pop() {
            path.truncate(depth.saturating_sub(1));
            if let Some(side) = side {
                path.push(side);
            }
            if node.handle == handle {
                return Some(path);
            }
            stack.extend(node.right.as_deref().map(|n| (n, depth + 1, Some(Side::Right))));
            stack.extend(node.left.as_deref().map(|n| (n, depth + 1, Some(Side::Left))));
        }
        None
    }
}

/// Free a subtree without recursing into it.
fn release<K>(root: Link<K>) {
    let mut stack: Vec<Box<Node<K>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// Unlink the leftmost node of the subtree in `slot`, splicing its right
/// child into its place.
fn detach_min<K>(mut slot: &mut Link<K>) -> Option<Box<Node<K>>> {
    while slot.as_ref().is_some_and(|node| node.left.is_some()) {
        if let Some(node) = slot {
            slot = &mut node.left;
        }
    }
    let mut min = slot.take()?;
    *slot = min.right.take();
    Some(min)
}

impl<K: PartialOrd + Copy> Default for KeyIndexTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for KeyIndexTree<K> {
    fn drop(&mut self) {
        release(self.root.take());
    }
}

impl<K> fmt::Debug for KeyIndexTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIndexTree").field("len", &self.len).finish()
    }
}

/// Iterator returned by [`KeyIndexTree::iter_descending`].
pub struct Descending<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Descending<'a, K> {
    fn push_right_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.right.as_deref();
        }
    }
}

impl<'a, K: Copy> Iterator for Descending<'a, K> {
    type Item = (K, RecordHandle);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_right_spine(node.left.as_deref());
        Some((node.key, node.handle))
    }
}

/// Iterator returned by [`KeyIndexTree::iter_ascending`].
pub struct Ascending<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Ascending<'a, K> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K: Copy> Iterator for Ascending<'a, K> {
    type Item = (K, RecordHandle);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.key, node.handle))
    }
}

/// Iterator returned by [`KeyIndexTree::range`].
pub struct Range<'a, K> {
    stack: Vec<&'a Node<K>>,
    min: K,
    max: K,
}

impl<'a, K: PartialOrd + Copy> Range<'a, K> {
    /// Push `node` and its left descendants, stopping once a key is no
    /// longer above `min` (everything further left is below the interval).
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = if current.key > self.min {
                current.left.as_deref()
            } else {
                None
            };
        }
    }
}

impl<'a, K: PartialOrd + Copy> Iterator for Range<'a, K> {
    type Item = (K, RecordHandle);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Equal keys live on the right, so `key == max` still descends.
            if node.key <= self.max {
                self.push_left_spine(node.right.as_deref());
            }
            if node.key >= self.min && node.key <= self.max {
                return Some((node.key, node.handle));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::list::OrderedFoodList;
    use crate::food::FoodRecord;

    /// Real handles come from a list; mint `n` of them.
    fn handles(n: usize) -> Vec<RecordHandle> {
        let mut list = OrderedFoodList::new();
        (0..n)
            .map(|i| list.insert(FoodRecord::new(i as i32, "x", 0.0, 0, 0.0, 0.0, "c")))
            .collect()
    }

    fn build(keys: &[f64]) -> (KeyIndexTree<f64>, Vec<RecordHandle>) {
        let hs = handles(keys.len());
        let mut tree = KeyIndexTree::new();
        for (key, handle) in keys.iter().zip(&hs) {
            tree.insert(*key, *handle);
        }
        (tree, hs)
    }

    fn keys_of(iter: impl Iterator<Item = (f64, RecordHandle)>) -> Vec<f64> {
        iter.map(|(k, _)| k).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree: KeyIndexTree<f64> = KeyIndexTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter_descending().count(), 0);
        assert_eq!(tree.range(0.0, 100.0).count(), 0);
    }

    #[test]
    fn test_descending_traversal() {
        let (tree, _) = build(&[50.0, 30.0, 70.0, 20.0, 40.0, 60.0, 80.0]);
        assert_eq!(
            keys_of(tree.iter_descending()),
            [80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0]
        );
    }

    #[test]
    fn test_ascending_traversal() {
        let (tree, _) = build(&[50.0, 30.0, 70.0, 20.0, 40.0]);
        assert_eq!(keys_of(tree.iter_ascending()), [20.0, 30.0, 40.0, 50.0, 70.0]);
    }

    #[test]
    fn test_equal_keys_go_right_in_insertion_order() {
        let (tree, hs) = build(&[10.0, 10.0, 10.0]);
        // Single right-leaning path.
        assert_eq!(tree.depth(), 3);
        let ascending: Vec<RecordHandle> = tree.iter_ascending().map(|(_, h)| h).collect();
        assert_eq!(ascending, hs);
        let descending: Vec<RecordHandle> = tree.iter_descending().map(|(_, h)| h).collect();
        assert_eq!(descending, [hs[2], hs[1], hs[0]]);
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let (tree, _) = build(&[50.0, 30.0, 70.0, 20.0, 40.0, 60.0, 80.0]);
        assert_eq!(keys_of(tree.range(30.0, 60.0)), [30.0, 40.0, 50.0, 60.0]);
        assert_eq!(keys_of(tree.range(55.0, 55.0)), Vec::<f64>::new());
        assert_eq!(keys_of(tree.range(80.0, 80.0)), [80.0]);
    }

    #[test]
    fn test_range_with_duplicates() {
        let (tree, _) = build(&[5.0, 5.0, 3.0, 5.0, 7.0]);
        assert_eq!(keys_of(tree.range(5.0, 5.0)), [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_range_upper_bound_duplicates() {
        let (tree, _) = build(&[5.0, 7.0, 3.0, 7.0, 9.0, 7.0]);
        assert_eq!(keys_of(tree.range(6.0, 7.0)), [7.0, 7.0, 7.0]);
        assert_eq!(keys_of(tree.range(3.0, 7.0)), [3.0, 5.0, 7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_range_inverted_interval_is_empty() {
        let (tree, _) = build(&[1.0, 2.0, 3.0]);
        assert_eq!(tree.range(3.0, 1.0).count(), 0);
        assert_eq!(tree.range(f64::NAN, 3.0).count(), 0);
    }

    #[test]
    fn test_remove_leaf() {
        let (mut tree, hs) = build(&[50.0, 30.0, 70.0]);
        assert!(tree.remove(hs[1]));
        assert_eq!(keys_of(tree.iter_ascending()), [50.0, 70.0]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_single_child() {
        let (mut tree, hs) = build(&[50.0, 30.0, 20.0]);
        assert!(tree.remove(hs[1]));
        assert_eq!(keys_of(tree.iter_ascending()), [20.0, 50.0]);
    }

    #[test]
    fn test_remove_two_children_uses_successor() {
        let (mut tree, hs) = build(&[50.0, 30.0, 70.0, 60.0, 80.0, 65.0]);
        assert!(tree.remove(hs[0]));
        assert_eq!(keys_of(tree.iter_ascending()), [30.0, 60.0, 65.0, 70.0, 80.0]);
        assert!(!tree.contains(hs[0]));
        for h in &hs[1..] {
            assert!(tree.contains(*h));
        }
    }

    #[test]
    fn test_remove_picks_record_not_key() {
        let (mut tree, hs) = build(&[10.0, 10.0, 10.0]);
        assert!(tree.remove(hs[1]));
        let left: Vec<RecordHandle> = tree.iter_ascending().map(|(_, h)| h).collect();
        assert_eq!(left, [hs[0], hs[2]]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut tree, hs) = build(&[10.0, 20.0]);
        let stranger = handles(3)[2];
        assert!(!tree.remove(stranger));
        assert_eq!(tree.len(), 2);

        let mut empty: KeyIndexTree<f64> = KeyIndexTree::new();
        assert!(!empty.remove(hs[0]));
    }

    #[test]
    fn test_remove_every_node_in_any_order() {
        let keys = [41.0, 20.0, 65.0, 11.0, 29.0, 50.0, 91.0, 32.0, 72.0, 99.0];
        let (mut tree, hs) = build(&keys);
        let order = [hs[0], hs[5], hs[9], hs[1], hs[3], hs[8], hs[2], hs[4], hs[6], hs[7]];
        for (removed, handle) in order.into_iter().enumerate() {
            assert!(tree.remove(handle));
            assert_eq!(tree.len(), keys.len() - removed - 1);
            let ordered = keys_of(tree.iter_ascending());
            assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_clear() {
        let (mut tree, _) = build(&[3.0, 1.0, 2.0]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.iter_descending().count(), 0);
    }

    #[test]
    fn test_degenerate_tree_does_not_overflow() {
        let n = 20_000;
        let hs = handles(n);
        let mut tree = KeyIndexTree::new();
        for (i, handle) in hs.iter().enumerate() {
            tree.insert(i as i32, *handle);
        }
        assert_eq!(tree.depth(), n);
        assert_eq!(tree.iter_descending().next().map(|(k, _)| k), Some(n as i32 - 1));
        assert_eq!(tree.range(10, 12).count(), 3);
        assert!(tree.remove(hs[n - 1]));
        drop(tree);
    }
}
