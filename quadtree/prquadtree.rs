use super::error::{QuadTreeError, Result};
use super::node::{Node, Slot};
use super::point::Point;
use super::quadrant::Region;

/// PR四叉树主结构
///
/// 索引空间为 `[0, 2^k)` x `[0, 2^k)`，质心位于 `(2^(k-1), 2^(k-1))`。
/// 树本身只负责边界校验，具体的插入、删除和查询都委托给根节点。
#[derive(Debug, Clone, PartialEq)]
pub struct PRQuadTree {
    /// 根槽位
    root: Slot,
    /// 整个索引空间
    space: Region,
    /// 分桶参数b
    bucket_size: usize,
}

impl PRQuadTree {
    /// 默认分桶参数
    pub const DEFAULT_BUCKET_SIZE: usize = 1;

    /// 创建新的PR四叉树
    ///
    /// * `k` - 索引空间边长为 `2^k`，最大为 31
    /// * `bucket_size` - 叶子节点最多容纳的点数，至少为 1
    pub fn new(k: u32, bucket_size: usize) -> Result<Self> {
        if bucket_size == 0 {
            return Err(QuadTreeError::InvalidBucketSize);
        }
        if k > Region::MAX_K {
            return Err(QuadTreeError::InvalidResolution {
                k,
                max: Region::MAX_K,
            });
        }

        let center = if k == 0 { 0 } else { 1i32 << (k - 1) };
        Ok(PRQuadTree {
            root: None,
            space: Region::new(Point::new(center, center), k),
            bucket_size,
        })
    }

    /// 检查树是否为空
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// 获取边长指数k
    pub fn resolution(&self) -> u32 {
        self.space.k
    }

    /// 获取分桶参数
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// 获取整个索引空间
    pub fn space(&self) -> Region {
        self.space
    }

    /// 获取根节点
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// 树的高度，空树和只有一个叶子节点的树都为 0
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    /// 树中的点数
    pub fn count(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.count())
    }

    /// 按 Z 序返回所有点
    pub fn points(&self) -> Vec<Point> {
        self.root.as_ref().map_or_else(Vec::new, |root| root.points())
    }

    /// 清空所有点
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// 校验点是否落在索引空间内
    pub(crate) fn check_bounds(&self, point: &Point) -> Result<()> {
        if self.space.contains(point) {
            Ok(())
        } else {
            Err(QuadTreeError::OutOfBounds {
                point: *point,
                side: self.space.side(),
            })
        }
    }

    /// 内部方法：获取根槽位的可变引用
    pub(crate) fn root_mut(&mut self) -> &mut Slot {
        &mut self.root
    }
}
