use super::super::node::{InternalNode, LeafNode, Node};
use super::super::point::Point;
use super::super::prquadtree::PRQuadTree;

impl LeafNode {
    /// 把距离 `anchor` 不超过 `radius` 的点加入结果，`anchor` 本身除外
    pub(crate) fn range(&self, anchor: &Point, results: &mut Vec<Point>, radius: f64) {
        results.extend(
            self.bucket
                .iter()
                .filter(|p| *p != anchor && p.distance(anchor) <= radius),
        );
    }
}

impl InternalNode {
    pub(crate) fn search(&self, point: &Point) -> bool {
        if !self.region().contains(point) {
            return false;
        }
        self.child(self.region().quadrant_of(point))
            .is_some_and(|child| child.search(point))
    }

    /// 先贪心进入 `anchor` 所在象限，再按 Z 序检查其余与查询圆相交的子节点
    pub(crate) fn range(&self, anchor: &Point, results: &mut Vec<Point>, radius: f64) {
        let greedy = self.region().quadrant_of(anchor);
        if let Some(child) = self.child(greedy) {
            child.range(anchor, results, radius);
        }

        for (quadrant, child) in self.occupied() {
            if quadrant != greedy && child.region().intersects_circle(anchor, radius) {
                child.range(anchor, results, radius);
            }
        }
    }
}

/// 搜索操作相关算法
impl Node {
    /// 判断子树中是否包含该点
    pub fn search(&self, point: &Point) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.contains(point),
            Node::Internal(internal) => internal.search(point),
        }
    }

    /// 范围查询：收集距离 `anchor` 不超过 `radius` 的所有点（不含 `anchor` 本身）
    pub fn range(&self, anchor: &Point, results: &mut Vec<Point>, radius: f64) {
        match self {
            Node::Leaf(leaf) => leaf.range(anchor, results, radius),
            Node::Internal(internal) => internal.range(anchor, results, radius),
        }
    }
}

impl PRQuadTree {
    /// 判断树中是否包含该点
    pub fn search(&self, point: &Point) -> bool {
        self.root().is_some_and(|root| root.search(point))
    }

    /// 范围查询
    ///
    /// 返回距离 `anchor` 不超过 `radius` 的所有点，`anchor` 本身不在结果中。
    /// `anchor` 可以位于索引空间之外。
    pub fn range(&self, anchor: &Point, radius: f64) -> Vec<Point> {
        let mut results = Vec::new();
        if let Some(root) = self.root() {
            root.range(anchor, &mut results, radius);
        }
        results
    }
}
