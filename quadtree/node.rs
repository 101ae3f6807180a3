use super::point::Point;
use super::quadrant::{Quadrant, Region};

/// 子节点槽位：`None` 表示空节点（白节点），不分配任何对象
pub type Slot = Option<Box<Node>>;

/// PR四叉树节点
///
/// 节点种类是封闭的：叶子节点保存一桶点，内部节点保存四个按 Z 序排列的子槽位。
/// 空节点不是变体，而是槽位中的 `None`。
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// 叶子节点：保存 `1..=b` 个点
    Leaf(LeafNode),
    /// 内部节点：四个子槽位，至少两个非空
    Internal(InternalNode),
}

/// 叶子节点
///
/// 桶容量为分桶参数 `b`。通过插入创建后至少包含一个点，
/// 删除到零个点时由父节点丢弃，调用方不会观察到空桶。
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub(crate) centroid: Point,
    pub(crate) k: u32,
    pub(crate) bucket_size: usize,
    pub(crate) bucket: Vec<Point>,
}

/// 内部节点
///
/// 子槽位下标为 NW=0, NE=1, SW=2, SE=3，`count` 为整棵子树的点数，增量维护。
#[derive(Debug, Clone, PartialEq)]
pub struct InternalNode {
    pub(crate) centroid: Point,
    pub(crate) k: u32,
    pub(crate) bucket_size: usize,
    pub(crate) children: [Slot; 4],
    pub(crate) count: usize,
}

impl LeafNode {
    /// 创建只包含一个点的叶子节点
    ///
    /// `centroid` 和 `k` 描述节点覆盖的正方形，`bucket_size` 为分桶参数。
    pub fn new(centroid: Point, k: u32, bucket_size: usize, point: Point) -> Self {
        let mut bucket = Vec::with_capacity(bucket_size.max(1));
        bucket.push(point);
        LeafNode {
            centroid,
            k,
            bucket_size,
            bucket,
        }
    }

    /// 用一组互不相同的点创建叶子节点，调用方保证点数不超过分桶参数
    pub(crate) fn from_points(region: Region, bucket_size: usize, points: Vec<Point>) -> Self {
        debug_assert!(points.len() <= bucket_size);
        let mut bucket = Vec::with_capacity(bucket_size);
        bucket.extend(points);
        LeafNode {
            centroid: region.centroid,
            k: region.k,
            bucket_size,
            bucket,
        }
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn region(&self) -> Region {
        Region::new(self.centroid, self.k)
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// 返回桶中所有点的拷贝
    pub fn points(&self) -> Vec<Point> {
        self.bucket.clone()
    }

    /// 桶中的点数
    pub fn count(&self) -> usize {
        self.bucket.len()
    }

    /// 叶子节点高度恒为 0
    pub fn height(&self) -> usize {
        0
    }

    /// 检查桶中是否已有该点
    pub fn contains(&self, point: &Point) -> bool {
        self.bucket.iter().any(|p| p == point)
    }

    /// 检查桶是否已满
    pub fn is_full(&self) -> bool {
        self.bucket.len() >= self.bucket_size
    }

    /// 把叶子节点搬到一个更大的区域（区域必须包含原区域）
    pub(crate) fn rehome(&mut self, region: Region) {
        debug_assert!(region.contains_region(&self.region()));
        self.centroid = region.centroid;
        self.k = region.k;
    }
}

impl InternalNode {
    /// 创建没有子节点的内部节点，仅供构建子树时使用
    pub(crate) fn new(region: Region, bucket_size: usize) -> Self {
        InternalNode {
            centroid: region.centroid,
            k: region.k,
            bucket_size,
            children: [None, None, None, None],
            count: 0,
        }
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn region(&self) -> Region {
        Region::new(self.centroid, self.k)
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// 按 Z 序返回四个子槽位
    pub fn children(&self) -> &[Slot; 4] {
        &self.children
    }

    /// 获取某个象限的子节点
    pub fn child(&self, quadrant: Quadrant) -> Option<&Node> {
        self.children[quadrant.index()].as_deref()
    }

    /// 子树中的点数（增量维护，不重新统计）
    pub fn count(&self) -> usize {
        self.count
    }

    /// 没有子节点时为 0，否则为 1 + 子节点最大高度
    pub fn height(&self) -> usize {
        self.occupied()
            .map(|(_, child)| child.height())
            .max()
            .map_or(0, |h| h + 1)
    }

    /// 非空子节点及其象限，按 Z 序
    pub fn occupied(&self) -> impl Iterator<Item = (Quadrant, &Node)> + '_ {
        Quadrant::ALL
            .into_iter()
            .filter_map(move |q| self.child(q).map(|child| (q, child)))
    }

    /// 非空子节点数量
    pub fn occupied_count(&self) -> usize {
        self.children.iter().filter(|slot| slot.is_some()).count()
    }

    /// 是否存在内部节点子节点
    pub fn has_internal_children(&self) -> bool {
        self.occupied().any(|(_, child)| !child.is_leaf())
    }

    /// 所有子节点点数之和
    pub(crate) fn children_count(&self) -> usize {
        self.occupied().map(|(_, child)| child.count()).sum()
    }
}

impl Node {
    /// 节点实际覆盖的区域
    pub fn region(&self) -> Region {
        match self {
            Node::Leaf(leaf) => leaf.region(),
            Node::Internal(internal) => internal.region(),
        }
    }

    pub fn centroid(&self) -> Point {
        self.region().centroid
    }

    pub fn k(&self) -> u32 {
        self.region().k
    }

    pub fn bucket_size(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.bucket_size,
            Node::Internal(internal) => internal.bucket_size,
        }
    }

    /// 子树中的点数
    pub fn count(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.count(),
            Node::Internal(internal) => internal.count(),
        }
    }

    /// 子树高度
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.height(),
            Node::Internal(internal) => internal.height(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal(internal) => Some(internal),
        }
    }

    /// 按 Z 序收集子树中所有点的拷贝
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.count());
        self.collect_points(&mut points);
        points
    }

    pub(crate) fn collect_points(&self, out: &mut Vec<Point>) {
        match self {
            Node::Leaf(leaf) => out.extend_from_slice(&leaf.bucket),
            Node::Internal(internal) => {
                for (_, child) in internal.occupied() {
                    child.collect_points(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_at(x: i32, y: i32, k: u32, points: &[(i32, i32)]) -> Node {
        let region = Region::new(Point::new(x, y), k);
        let points = points.iter().map(|p| Point::from(*p)).collect();
        Node::Leaf(LeafNode::from_points(region, 2, points))
    }

    #[test]
    fn test_leaf_creation() {
        let leaf = LeafNode::new(Point::new(4, 4), 3, 2, Point::new(1, 1));
        assert_eq!(leaf.count(), 1);
        assert_eq!(leaf.height(), 0);
        assert!(leaf.contains(&Point::new(1, 1)));
        assert!(!leaf.is_full());
        assert_eq!(leaf.points(), vec![Point::new(1, 1)]);
        assert_eq!(leaf.region(), Region::new(Point::new(4, 4), 3));
    }

    #[test]
    fn test_leaf_points_are_copies() {
        let leaf = LeafNode::new(Point::new(4, 4), 3, 2, Point::new(1, 1));
        let mut points = leaf.points();
        points[0].x = 99;
        assert_eq!(leaf.points(), vec![Point::new(1, 1)]);
    }

    #[test]
    fn test_internal_node_accessors() {
        let mut internal = InternalNode::new(Region::new(Point::new(4, 4), 3), 2);
        assert_eq!(internal.height(), 0);
        assert_eq!(internal.occupied_count(), 0);

        internal.children[Quadrant::SW.index()] =
            Some(Box::new(leaf_at(2, 2, 2, &[(0, 0), (1, 1)])));
        internal.children[Quadrant::NE.index()] = Some(Box::new(leaf_at(6, 6, 2, &[(5, 5)])));
        internal.count = 3;

        assert_eq!(internal.occupied_count(), 2);
        assert_eq!(internal.children_count(), 3);
        assert_eq!(internal.height(), 1);
        assert!(!internal.has_internal_children());
        assert!(internal.child(Quadrant::NW).is_none());

        let quadrants: Vec<Quadrant> = internal.occupied().map(|(q, _)| q).collect();
        assert_eq!(quadrants, vec![Quadrant::NE, Quadrant::SW]);

        // Z 序：NE 先于 SW
        let node = Node::Internal(internal);
        assert_eq!(
            node.points(),
            vec![Point::new(5, 5), Point::new(0, 0), Point::new(1, 1)]
        );
        assert!(node.as_internal().is_some());
        assert!(node.as_leaf().is_none());
    }
}
