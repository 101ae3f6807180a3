use super::super::error::{QuadTreeError, Result};
use super::super::node::{InternalNode, LeafNode, Node};
use super::super::point::Point;
use super::super::prquadtree::PRQuadTree;
use super::super::quadrant::{Quadrant, Region};
use tracing::{debug, trace};

/// 在区域内为一组互不相同的点构建子树
///
/// 点数不超过分桶参数时得到一个叶子节点；否则按象限划分。
/// 所有点落在同一象限时跳过当前层，直接在子区域构建，保证不会出现只有一个子节点的内部节点。
/// 需要在 `k == 0` 的区域继续划分时返回 `CentroidAccuracy`。
pub(crate) fn build_subtree(points: Vec<Point>, region: Region, bucket_size: usize) -> Result<Node> {
    if points.len() <= bucket_size {
        return Ok(Node::Leaf(LeafNode::from_points(region, bucket_size, points)));
    }
    if region.k == 0 {
        return Err(QuadTreeError::CentroidAccuracy { k: region.k });
    }

    let total = points.len();
    let mut parts: [Vec<Point>; 4] = Default::default();
    for point in points {
        parts[region.quadrant_of(&point).index()].push(point);
    }

    let mut internal = InternalNode::new(region, bucket_size);
    let occupied = parts.iter().filter(|part| !part.is_empty()).count();
    for (quadrant, part) in Quadrant::ALL.into_iter().zip(parts) {
        if part.is_empty() {
            continue;
        }
        let child_region = region
            .child(quadrant)
            .ok_or(QuadTreeError::CentroidAccuracy { k: region.k })?;
        if occupied == 1 {
            return build_subtree(part, child_region, bucket_size);
        }
        internal.children[quadrant.index()] =
            Some(Box::new(build_subtree(part, child_region, bucket_size)?));
    }
    internal.count = total;
    Ok(Node::Internal(internal))
}

impl LeafNode {
    /// 叶子节点溢出时分裂：用已有的点加上新点在当前区域构建子树
    ///
    /// 失败时叶子节点保持不变。
    pub(crate) fn split(&self, point: Point) -> Result<Node> {
        if self.k == 0 {
            return Err(QuadTreeError::CentroidAccuracy { k: self.k });
        }
        let mut points = Vec::with_capacity(self.bucket.len() + 1);
        points.extend_from_slice(&self.bucket);
        points.push(point);
        build_subtree(points, self.region(), self.bucket_size)
    }
}

impl InternalNode {
    /// 把点路由到对应象限插入
    ///
    /// 空槽位直接创建叶子节点；非空槽位递归插入并原地替换。
    /// 只有真正新增了点时才增加计数。
    pub(crate) fn insert(&mut self, point: Point) -> Result<bool> {
        let region = self.region();
        let quadrant = region.quadrant_of(&point);
        let child_region = region
            .child(quadrant)
            .ok_or(QuadTreeError::CentroidAccuracy { k: region.k })?;

        let index = quadrant.index();
        let inserted = if let Some(child) = self.children[index].as_mut() {
            child.insert(point, child_region)?
        } else {
            self.children[index] = Some(Box::new(Node::Leaf(LeafNode::new(
                child_region.centroid,
                child_region.k,
                self.bucket_size,
                point,
            ))));
            true
        };

        if inserted {
            self.count += 1;
        }
        Ok(inserted)
    }
}

impl Node {
    /// 向以当前节点为根的子树插入点
    ///
    /// `slot` 是当前节点所在槽位对应的区域，节点自身的区域可能比它小。
    /// 节点可能被原地替换（叶子分裂为内部节点，或者被包进更大的内部节点）。
    ///
    /// # 返回值
    /// - `Ok(true)` - 插入成功
    /// - `Ok(false)` - 点已存在，树不变
    /// - `Err(_)` - 区域精度不足或点不在槽位区域内，树不变
    pub fn insert(&mut self, point: Point, slot: Region) -> Result<bool> {
        if !slot.contains(&point) {
            return Err(QuadTreeError::OutOfRegion { point });
        }
        if !self.region().contains(&point) {
            return self.expand(point, slot);
        }

        match self {
            Node::Leaf(leaf) => {
                if leaf.contains(&point) {
                    return Ok(false);
                }
                if !leaf.is_full() {
                    leaf.bucket.push(point);
                    return Ok(true);
                }
                let split = leaf.split(point)?;
                debug!(
                    "split leaf at {} (k={}) into {} node of height {}",
                    leaf.centroid,
                    leaf.k,
                    if split.is_leaf() { "leaf" } else { "internal" },
                    split.height()
                );
                *self = split;
                Ok(true)
            }
            Node::Internal(internal) => internal.insert(point),
        }
    }

    /// 点落在节点区域外（节点被压缩过）时扩展
    ///
    /// 叶子节点直接扩大到槽位区域；内部节点则在槽位内找到能把它和新点分开的最小区域，
    /// 在那里新建内部节点，原节点和新点的叶子节点作为它的两个子节点。
    fn expand(&mut self, point: Point, slot: Region) -> Result<bool> {
        if let Node::Leaf(leaf) = self {
            leaf.rehome(slot);
            return self.insert(point, slot);
        }

        let own = self.region();
        let region = slot.separating(&own, &point);
        let existing_quadrant = region.quadrant_of(&own.centroid);
        let new_quadrant = region.quadrant_of(&point);
        let leaf_region = region
            .child(new_quadrant)
            .ok_or(QuadTreeError::CentroidAccuracy { k: region.k })?;
        if existing_quadrant == new_quadrant {
            return Err(QuadTreeError::CentroidAccuracy { k: region.k });
        }

        debug!(
            "expand compressed node at {} (k={}) to {} (k={}) for {}",
            own.centroid, own.k, region.centroid, region.k, point
        );

        let bucket_size = self.bucket_size();
        let existing = std::mem::replace(
            self,
            Node::Internal(InternalNode::new(region, bucket_size)),
        );
        if let Node::Internal(wrapper) = self {
            wrapper.count = existing.count() + 1;
            wrapper.children[existing_quadrant.index()] = Some(Box::new(existing));
            wrapper.children[new_quadrant.index()] = Some(Box::new(Node::Leaf(LeafNode::new(
                leaf_region.centroid,
                leaf_region.k,
                bucket_size,
                point,
            ))));
        }
        Ok(true)
    }
}

/// 插入操作相关算法
impl PRQuadTree {
    /// 插入新的点
    ///
    /// # 返回值
    /// - `Ok(true)` - 插入成功
    /// - `Ok(false)` - 点已存在
    /// - `Err(QuadTreeError::OutOfBounds)` - 点不在索引空间内
    pub fn insert(&mut self, point: Point) -> Result<bool> {
        self.check_bounds(&point)?;

        let space = self.space();
        let bucket_size = self.bucket_size();
        let root = self.root_mut();
        let inserted = match root.as_mut() {
            Some(node) => node.insert(point, space)?,
            None => {
                *root = Some(Box::new(Node::Leaf(LeafNode::new(
                    space.centroid,
                    space.k,
                    bucket_size,
                    point,
                ))));
                true
            }
        };

        trace!("insert {} -> {}", point, inserted);
        Ok(inserted)
    }

    /// 批量插入，返回新增的点数
    ///
    /// 遇到第一个错误即停止，之前插入的点保留。
    pub fn extend<I>(&mut self, points: I) -> Result<usize>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut inserted = 0;
        for point in points {
            if self.insert(point)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_insert_into_empty_tree() {
        let mut tree = PRQuadTree::new(3, 1).unwrap();
        assert_eq!(tree.insert(p(1, 2)), Ok(true));
        assert_eq!(tree.count(), 1);
        assert_eq!(tree.height(), 0);
        assert!(tree.root().unwrap().is_leaf());
    }

    #[test]
    fn test_insert_duplicate_is_noop() {
        let mut tree = PRQuadTree::new(3, 2).unwrap();
        assert_eq!(tree.insert(p(1, 2)), Ok(true));
        assert_eq!(tree.insert(p(1, 2)), Ok(false));
        assert_eq!(tree.count(), 1);

        // 分裂后的重复插入同样不改变计数
        tree.insert(p(6, 6)).unwrap();
        tree.insert(p(6, 1)).unwrap();
        let before = tree.clone();
        assert_eq!(tree.insert(p(6, 6)), Ok(false));
        assert_eq!(tree, before);
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut tree = PRQuadTree::new(3, 1).unwrap();
        assert_eq!(
            tree.insert(p(8, 1)),
            Err(QuadTreeError::OutOfBounds {
                point: p(8, 1),
                side: 8
            })
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_splits_into_quadrants() {
        let mut tree = PRQuadTree::new(3, 1).unwrap();
        for point in [p(0, 0), p(4, 0), p(0, 4), p(4, 4)] {
            tree.insert(point).unwrap();
        }

        let root = tree.root().unwrap().as_internal().unwrap();
        assert_eq!(root.count(), 4);
        assert_eq!(root.centroid(), p(4, 4));
        let expected = [
            (Quadrant::NW, p(0, 4), p(2, 6)),
            (Quadrant::NE, p(4, 4), p(6, 6)),
            (Quadrant::SW, p(0, 0), p(2, 2)),
            (Quadrant::SE, p(4, 0), p(6, 2)),
        ];
        for (quadrant, point, centroid) in expected {
            let leaf = root.child(quadrant).unwrap().as_leaf().unwrap();
            assert_eq!(leaf.points(), vec![point]);
            assert_eq!(leaf.centroid(), centroid);
            assert_eq!(leaf.k(), 2);
        }
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_split_compresses_single_quadrant_levels() {
        let mut tree = PRQuadTree::new(4, 1).unwrap();
        tree.insert(p(0, 0)).unwrap();
        tree.insert(p(1, 1)).unwrap();

        // 两个点直到 k=1 的区域才分开，中间层被跳过
        let root = tree.root().unwrap().as_internal().unwrap();
        assert_eq!(root.region(), Region::new(p(1, 1), 1));
        assert_eq!(root.occupied_count(), 2);
        assert_eq!(tree.height(), 1);
        assert!(tree.search(&p(0, 0)));
        assert!(tree.search(&p(1, 1)));
    }

    #[test]
    fn test_insert_expands_compressed_root() {
        let mut tree = PRQuadTree::new(4, 1).unwrap();
        tree.insert(p(0, 0)).unwrap();
        tree.insert(p(1, 1)).unwrap();
        tree.insert(p(15, 15)).unwrap();

        let root = tree.root().unwrap().as_internal().unwrap();
        assert_eq!(root.region(), tree.space());
        assert_eq!(root.count(), 3);
        assert_eq!(root.occupied_count(), 2);
        assert_eq!(root.child(Quadrant::SW).unwrap().count(), 2);
        assert_eq!(tree.height(), 2);
        assert!(tree.search(&p(15, 15)));
    }

    #[test]
    fn test_insert_expands_partially() {
        let mut tree = PRQuadTree::new(4, 1).unwrap();
        tree.insert(p(0, 0)).unwrap();
        tree.insert(p(1, 1)).unwrap();
        // (3,3) 与已有节点在 k=2 的区域分开
        tree.insert(p(3, 3)).unwrap();

        let root = tree.root().unwrap().as_internal().unwrap();
        assert_eq!(root.region(), Region::new(p(2, 2), 2));
        assert_eq!(root.count(), 3);
        assert_eq!(tree.points().len(), 3);
    }

    #[test]
    fn test_node_insert_rejects_point_outside_slot() {
        let mut node = Node::Leaf(LeafNode::new(p(4, 4), 3, 1, p(1, 1)));
        let slot = Region::new(p(4, 4), 3);
        assert_eq!(
            node.insert(p(9, 9), slot),
            Err(QuadTreeError::OutOfRegion { point: p(9, 9) })
        );
        assert_eq!(node.count(), 1);
    }

    #[test]
    fn test_build_subtree_reports_centroid_accuracy() {
        // 重复坐标无法在单格区域内分开
        let region = Region::new(p(3, 3), 0);
        let result = build_subtree(vec![p(3, 3), p(3, 3)], region, 1);
        assert_eq!(result, Err(QuadTreeError::CentroidAccuracy { k: 0 }));
    }

    #[test]
    fn test_leaf_split_at_unit_cell_fails_without_change() {
        let leaf = LeafNode::new(p(3, 3), 0, 1, p(3, 3));
        assert_eq!(
            leaf.split(p(3, 3)),
            Err(QuadTreeError::CentroidAccuracy { k: 0 })
        );
        assert_eq!(leaf.points(), vec![p(3, 3)]);
    }

    #[test]
    fn test_extend_counts_new_points() {
        let mut tree = PRQuadTree::new(5, 2).unwrap();
        let inserted = tree
            .extend([p(1, 1), p(2, 2), p(1, 1), p(30, 30)])
            .unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(tree.count(), 3);
    }
}
