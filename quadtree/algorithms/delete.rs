use super::super::node::{InternalNode, LeafNode, Node};
use super::super::point::Point;
use super::super::prquadtree::PRQuadTree;
use tracing::{debug, trace};

/// 删除操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// 没有找到该点，子树保持不变
    NotFound,
    /// 删除成功，节点仍然有效（可能已被原地替换）
    Removed,
    /// 删除成功且子树已空，调用方必须清空对应槽位
    Emptied,
}

impl Removal {
    /// 是否真的删除了点
    pub fn is_removed(self) -> bool {
        !matches!(self, Removal::NotFound)
    }
}

impl LeafNode {
    /// 从桶中删除点
    pub(crate) fn delete(&mut self, point: &Point) -> Removal {
        let Some(index) = self.bucket.iter().position(|p| p == point) else {
            return Removal::NotFound;
        };
        self.bucket.remove(index);

        if self.bucket.is_empty() {
            Removal::Emptied
        } else {
            Removal::Removed
        }
    }
}

impl InternalNode {
    /// 路由到对应象限删除，并维护计数
    ///
    /// 子节点被删空时清空槽位；整棵子树被删空时返回 `Emptied`。
    pub(crate) fn delete(&mut self, point: &Point) -> Removal {
        let index = self.region().quadrant_of(point).index();
        let Some(child) = self.children[index].as_mut() else {
            return Removal::NotFound;
        };

        match child.delete(point) {
            Removal::NotFound => return Removal::NotFound,
            Removal::Emptied => self.children[index] = None,
            Removal::Removed => {}
        }

        self.count -= 1;
        if self.count == 0 {
            Removal::Emptied
        } else {
            Removal::Removed
        }
    }

    /// 删除后检查是否需要合并，返回替换当前节点的新节点
    ///
    /// 1. 只剩一个非空子节点：由它直接替换当前节点（叶子节点扩大到当前区域）
    /// 2. 没有内部节点子节点且子节点点数之和不超过分桶参数：合并为一个叶子节点
    /// 3. 否则保持不变
    pub(crate) fn collapse(&mut self) -> Option<Node> {
        if self.occupied_count() == 1 {
            let child = self.children.iter_mut().find_map(|slot| slot.take())?;
            return Some(match *child {
                Node::Leaf(mut leaf) => {
                    leaf.rehome(self.region());
                    Node::Leaf(leaf)
                }
                internal => internal,
            });
        }

        let total = self.children_count();
        if !self.has_internal_children() && total > 0 && total <= self.bucket_size {
            let mut points = Vec::with_capacity(total);
            for slot in self.children.iter_mut() {
                if let Some(child) = slot.take() {
                    child.collect_points(&mut points);
                }
            }
            return Some(Node::Leaf(LeafNode::from_points(
                self.region(),
                self.bucket_size,
                points,
            )));
        }

        None
    }
}

impl Node {
    /// 从以当前节点为根的子树删除点
    ///
    /// 节点可能被原地替换为叶子节点或唯一的子节点。
    /// 返回 `Removal::Emptied` 时节点内容已无意义，调用方必须丢弃它。
    pub fn delete(&mut self, point: &Point) -> Removal {
        match self {
            Node::Leaf(leaf) => leaf.delete(point),
            Node::Internal(internal) => {
                let removal = internal.delete(point);
                if removal != Removal::Removed {
                    return removal;
                }
                if let Some(replacement) = internal.collapse() {
                    debug!(
                        "collapse internal node at {} (k={}) into {} at {} (k={})",
                        internal.centroid,
                        internal.k,
                        if replacement.is_leaf() { "leaf" } else { "internal" },
                        replacement.centroid(),
                        replacement.k()
                    );
                    *self = replacement;
                }
                Removal::Removed
            }
        }
    }
}

/// 删除操作相关算法
impl PRQuadTree {
    /// 删除指定的点
    ///
    /// # 返回值
    /// - `true` - 删除成功
    /// - `false` - 点不存在，树保持不变
    pub fn delete(&mut self, point: &Point) -> bool {
        let root = self.root_mut();
        let Some(node) = root.as_mut() else {
            return false;
        };

        let removal = node.delete(point);
        if removal == Removal::Emptied {
            *root = None;
        }

        trace!("delete {} -> {:?}", point, removal);
        removal.is_removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadtree::quadrant::{Quadrant, Region};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn tree_with(k: u32, bucket_size: usize, points: &[(i32, i32)]) -> PRQuadTree {
        let mut tree = PRQuadTree::new(k, bucket_size).unwrap();
        for point in points {
            tree.insert(Point::from(*point)).unwrap();
        }
        tree
    }

    #[test]
    fn test_delete_from_leaf() {
        let mut tree = tree_with(3, 2, &[(1, 1), (2, 2)]);
        assert!(tree.delete(&p(1, 1)));
        assert_eq!(tree.count(), 1);
        assert!(!tree.search(&p(1, 1)));
        assert!(tree.delete(&p(2, 2)));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_missing_leaves_tree_unchanged() {
        let mut tree = tree_with(3, 1, &[(0, 0), (4, 0), (0, 4)]);
        let before = tree.clone();
        assert!(!tree.delete(&p(4, 4)));
        assert!(!tree.delete(&p(1, 1)));
        assert_eq!(tree, before);

        let mut empty = PRQuadTree::new(3, 1).unwrap();
        assert!(!empty.delete(&p(0, 0)));
    }

    #[test]
    fn test_collapse_scenario() {
        let mut tree = tree_with(3, 1, &[(0, 0), (4, 0), (0, 4), (4, 4)]);
        assert_eq!(tree.root().unwrap().as_internal().unwrap().occupied_count(), 4);

        assert!(tree.delete(&p(4, 0)));
        assert!(tree.delete(&p(0, 4)));
        assert!(!tree.root().unwrap().is_leaf());
        assert!(tree.delete(&p(0, 0)));

        let leaf = tree.root().unwrap().as_leaf().unwrap();
        assert_eq!(leaf.points(), vec![p(4, 4)]);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.count(), 1);
    }

    #[test]
    fn test_collapse_merges_leaves_within_bucket() {
        let mut tree = tree_with(3, 2, &[(0, 0), (4, 0), (0, 4)]);
        assert!(!tree.root().unwrap().is_leaf());

        // 剩余两个点不超过分桶参数，合并为一个叶子
        assert!(tree.delete(&p(4, 0)));
        let leaf = tree.root().unwrap().as_leaf().unwrap();
        assert_eq!(leaf.points(), vec![p(0, 4), p(0, 0)]);
        assert_eq!(leaf.region(), tree.space());
    }

    #[test]
    fn test_sole_internal_child_replaces_parent() {
        // (0,0) 和 (1,1) 位于 SW 深处，(6,6) 在 NE
        let mut tree = tree_with(3, 1, &[(0, 0), (1, 1), (6, 6)]);
        let root = tree.root().unwrap().as_internal().unwrap();
        assert_eq!(root.region(), tree.space());
        assert!(!root.child(Quadrant::SW).unwrap().is_leaf());

        assert!(tree.delete(&p(6, 6)));
        let root = tree.root().unwrap().as_internal().unwrap();
        assert_eq!(root.region(), Region::new(p(1, 1), 1));
        assert_eq!(root.count(), 2);

        // 被压缩的根节点之外仍然可以插入
        assert!(tree.insert(p(7, 0)).unwrap());
        assert!(tree.search(&p(7, 0)));
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_leaf_delete_reports_emptied() {
        let mut leaf = LeafNode::new(p(4, 4), 3, 2, p(1, 1));
        assert_eq!(leaf.delete(&p(2, 2)), Removal::NotFound);
        assert_eq!(leaf.delete(&p(1, 1)), Removal::Emptied);
        assert!(!Removal::NotFound.is_removed());
        assert!(Removal::Emptied.is_removed());
    }

    #[test]
    fn test_delete_all_in_any_order() {
        let points = [(0, 0), (7, 7), (3, 5), (5, 3), (1, 6), (6, 1), (2, 2), (4, 4)];
        let mut tree = tree_with(3, 2, &points);
        for (i, point) in points.iter().rev().enumerate() {
            assert!(tree.delete(&Point::from(*point)));
            assert_eq!(tree.count(), points.len() - i - 1);
            assert!(tree.validate().is_ok());
        }
        assert!(tree.is_empty());
    }
}
