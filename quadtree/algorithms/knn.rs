//! Nearest neighbour and K-Nearest Neighbours (KNN) search for the PR quadtree
//!
//! Both searches are depth-first branch-and-bound traversals:
//!
//! 1. Descend greedily into the quadrant that contains the anchor point
//! 2. Visit the remaining children in Z-order, skipping every child whose square
//!    cannot hold a point closer than the current bound
//!
//! The bound is the best distance so far for NN and the farthest retained
//! distance of a [`BoundedPriorityQueue`] for KNN. The anchor itself is never
//! reported as its own neighbour.

use super::super::node::{InternalNode, LeafNode, Node};
use super::super::point::Point;
use super::super::prquadtree::PRQuadTree;
use serde::{Deserialize, Serialize};

/// Result of a KNN search: a point and its distance to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnnResult {
    pub point: Point,
    pub distance: f64,
}

/// Best-so-far holder for single nearest neighbour search
///
/// `None` is the "unset" state; it never collides with a real distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NnData<T> {
    best: Option<(T, f64)>,
}

impl<T> NnData<T> {
    pub fn new() -> Self {
        NnData { best: None }
    }

    /// Distance of the current best candidate, `None` while unset
    pub fn current_distance(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, distance)| *distance)
    }

    /// Replace the held candidate
    pub fn update(&mut self, item: T, distance: f64) {
        self.best = Some((item, distance));
    }

    pub fn best(&self) -> Option<&T> {
        self.best.as_ref().map(|(item, _)| item)
    }

    pub fn into_best(self) -> Option<(T, f64)> {
        self.best
    }
}

impl<T> Default for NnData<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A priority queue that keeps at most `capacity` items in ascending distance order
///
/// Entries with equal distance keep their insertion order. When an insertion
/// pushes the queue past its capacity, the farthest entry is evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPriorityQueue<T> {
    capacity: usize,
    entries: Vec<(T, f64)>,
}

impl<T> BoundedPriorityQueue<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedPriorityQueue {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an item, evicting the farthest entry if capacity is exceeded
    pub fn enqueue(&mut self, item: T, distance: f64) {
        // Position after every entry with distance <= the new one keeps ties FIFO
        let position = self.entries.partition_point(|(_, d)| *d <= distance);
        if position >= self.capacity {
            return;
        }
        self.entries.insert(position, (item, distance));
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Distance of the worst (farthest) retained entry
    pub fn peek_farthest(&self) -> Option<f64> {
        self.entries.last().map(|(_, distance)| *distance)
    }

    /// The best (nearest) retained entry
    pub fn peek_nearest(&self) -> Option<(&T, f64)> {
        self.entries.first().map(|(item, distance)| (item, *distance))
    }

    /// Iterate entries from nearest to farthest
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.entries.iter().map(|(item, distance)| (item, *distance))
    }

    /// Consume the queue, returning items from nearest to farthest
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.entries.into_iter().map(|(item, _)| item).collect()
    }

    pub fn into_entries(self) -> Vec<(T, f64)> {
        self.entries
    }
}

impl LeafNode {
    pub(crate) fn nearest_neighbor(&self, anchor: &Point, best: &mut NnData<Point>) {
        for point in self.bucket.iter().filter(|p| *p != anchor) {
            let distance = point.distance(anchor);
            if best.current_distance().map_or(true, |d| distance < d) {
                best.update(*point, distance);
            }
        }
    }

    pub(crate) fn k_nearest_neighbors(&self, anchor: &Point, queue: &mut BoundedPriorityQueue<Point>) {
        for point in self.bucket.iter().filter(|p| *p != anchor) {
            queue.enqueue(*point, point.distance(anchor));
        }
    }
}

impl InternalNode {
    pub(crate) fn nearest_neighbor(&self, anchor: &Point, best: &mut NnData<Point>) {
        let greedy = self.region().quadrant_of(anchor);
        if let Some(child) = self.child(greedy) {
            child.nearest_neighbor(anchor, best);
        }

        for (quadrant, child) in self.occupied() {
            if quadrant == greedy {
                continue;
            }
            // Without a best candidate there is nothing to prune against
            let reachable = best
                .current_distance()
                .map_or(true, |d| child.region().intersects_circle(anchor, d));
            if reachable {
                child.nearest_neighbor(anchor, best);
            }
        }
    }

    pub(crate) fn k_nearest_neighbors(
        &self,
        k: usize,
        anchor: &Point,
        queue: &mut BoundedPriorityQueue<Point>,
    ) {
        let greedy = self.region().quadrant_of(anchor);
        if let Some(child) = self.child(greedy) {
            child.k_nearest_neighbors(k, anchor, queue);
        }

        for (quadrant, child) in self.occupied() {
            if quadrant == greedy {
                continue;
            }
            let reachable = queue.len() < k
                || queue
                    .peek_farthest()
                    .map_or(true, |d| child.region().intersects_circle(anchor, d));
            if reachable {
                child.k_nearest_neighbors(k, anchor, queue);
            }
        }
    }
}

impl Node {
    /// Update `best` with the closest point in this subtree, excluding `anchor`
    pub fn nearest_neighbor(&self, anchor: &Point, best: &mut NnData<Point>) {
        match self {
            Node::Leaf(leaf) => leaf.nearest_neighbor(anchor, best),
            Node::Internal(internal) => internal.nearest_neighbor(anchor, best),
        }
    }

    /// Offer the candidates of this subtree to a queue bounded at `k` entries
    pub fn k_nearest_neighbors(&self, k: usize, anchor: &Point, queue: &mut BoundedPriorityQueue<Point>) {
        match self {
            Node::Leaf(leaf) => leaf.k_nearest_neighbors(anchor, queue),
            Node::Internal(internal) => internal.k_nearest_neighbors(k, anchor, queue),
        }
    }
}

impl PRQuadTree {
    /// Find the point closest to `anchor`, not counting `anchor` itself
    ///
    /// Returns `None` when the tree holds no other point.
    pub fn nearest_neighbor(&self, anchor: &Point) -> Option<Point> {
        let mut best = NnData::new();
        if let Some(root) = self.root() {
            root.nearest_neighbor(anchor, &mut best);
        }
        best.into_best().map(|(point, _)| point)
    }

    /// Find the `k` points closest to `anchor`, sorted by ascending distance
    ///
    /// Returns fewer than `k` points when the tree is smaller.
    pub fn k_nearest_neighbors(&self, k: usize, anchor: &Point) -> Vec<Point> {
        self.knn_search(k, anchor)
            .into_iter()
            .map(|result| result.point)
            .collect()
    }

    /// Same as [`PRQuadTree::k_nearest_neighbors`] but keeps the distances
    pub fn knn_search(&self, k: usize, anchor: &Point) -> Vec<KnnResult> {
        if k == 0 {
            return Vec::new();
        }
        let mut queue = BoundedPriorityQueue::new(k);
        if let Some(root) = self.root() {
            root.k_nearest_neighbors(k, anchor, &mut queue);
        }
        queue
            .into_entries()
            .into_iter()
            .map(|(point, distance)| KnnResult { point, distance })
            .collect()
    }
}
