use super::super::error::{QuadTreeError, Result};
use super::super::node::Node;
use super::super::prquadtree::PRQuadTree;
use super::super::quadrant::Region;
use std::collections::HashSet;

/// 树结构校验
impl PRQuadTree {
    /// 遍历整棵树，检查所有结构不变量
    ///
    /// - 叶子节点包含 `1..=b` 个互不相同的点，且都在其区域内
    /// - 内部节点至少有两个非空子节点
    /// - 有叶子子节点的内部节点，点数大于 `b`
    /// - 内部节点的计数等于子树中的点数
    /// - 每个节点的区域都在其槽位区域内，子节点位于正确的象限
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root() else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        let total = validate_node(root, self.space(), self.bucket_size(), &mut seen)?;
        if total != self.count() {
            return Err(violation(format!(
                "tree count {} differs from {} reachable points",
                self.count(),
                total
            )));
        }
        Ok(())
    }
}

fn violation(message: String) -> QuadTreeError {
    QuadTreeError::InvariantViolation(message)
}

/// 递归校验节点，返回子树中实际可达的点数
fn validate_node(
    node: &Node,
    slot: Region,
    bucket_size: usize,
    seen: &mut HashSet<crate::quadtree::point::Point>,
) -> Result<usize> {
    let region = node.region();
    if !slot.contains_region(&region) {
        return Err(violation(format!(
            "node at {} (k={}) lies outside its slot at {} (k={})",
            region.centroid, region.k, slot.centroid, slot.k
        )));
    }
    if node.bucket_size() != bucket_size {
        return Err(violation(format!(
            "node at {} carries bucket size {} instead of {}",
            region.centroid,
            node.bucket_size(),
            bucket_size
        )));
    }

    match node {
        Node::Leaf(leaf) => {
            let count = leaf.count();
            if count == 0 || count > bucket_size {
                return Err(violation(format!(
                    "leaf at {} holds {} points, expected 1..={}",
                    region.centroid, count, bucket_size
                )));
            }
            for point in leaf.points() {
                if !region.contains(&point) {
                    return Err(violation(format!(
                        "point {} lies outside its leaf at {} (k={})",
                        point, region.centroid, region.k
                    )));
                }
                if !seen.insert(point) {
                    return Err(violation(format!("point {} is stored twice", point)));
                }
            }
            Ok(count)
        }
        Node::Internal(internal) => {
            let occupied = internal.occupied_count();
            if occupied < 2 {
                return Err(violation(format!(
                    "internal node at {} has {} non-empty children",
                    region.centroid, occupied
                )));
            }

            let mut total = 0;
            let mut has_leaf = false;
            for (quadrant, child) in internal.occupied() {
                let child_slot = region.child(quadrant).ok_or_else(|| {
                    violation(format!(
                        "internal node at {} cannot be subdivided (k={})",
                        region.centroid, region.k
                    ))
                })?;
                has_leaf |= child.is_leaf();
                total += validate_node(child, child_slot, bucket_size, seen)?;
            }

            if total != internal.count() {
                return Err(violation(format!(
                    "internal node at {} counts {} but holds {} points",
                    region.centroid,
                    internal.count(),
                    total
                )));
            }
            if has_leaf && total <= bucket_size {
                return Err(violation(format!(
                    "internal node at {} holds only {} points with leaf children (b={})",
                    region.centroid, total, bucket_size
                )));
            }
            Ok(total)
        }
    }
}
