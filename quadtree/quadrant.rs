use super::point::Point;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 象限 - 子节点槽位按 Z 序（Morton 序）编号
///
/// 下标固定为 NW=0, NE=1, SW=2, SE=3，遍历、调试输出和测试都依赖这个顺序。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    NW = 0,
    NE = 1,
    SW = 2,
    SE = 3,
}

impl Quadrant {
    /// Z 序排列的全部象限
    pub const ALL: [Quadrant; 4] = [Quadrant::NW, Quadrant::NE, Quadrant::SW, Quadrant::SE];

    /// 象限在子节点数组中的下标
    pub fn index(self) -> usize {
        self as usize
    }

    /// 由下标取象限
    pub fn from_index(index: usize) -> Option<Quadrant> {
        Quadrant::ALL.get(index).copied()
    }

    /// 计算点相对于质心所在的象限
    ///
    /// 落在质心 x 或 y 线上的点归入 "大于等于" 一侧。
    pub fn of(point: &Point, centroid: &Point) -> Quadrant {
        let west = point.x < centroid.x;
        let north = point.y >= centroid.y;
        match (west, north) {
            (true, true) => Quadrant::NW,
            (false, true) => Quadrant::NE,
            (true, false) => Quadrant::SW,
            (false, false) => Quadrant::SE,
        }
    }

    /// 子区域质心相对父质心的偏移方向 (x, y)
    fn signs(self) -> (i64, i64) {
        match self {
            Quadrant::NW => (-1, 1),
            Quadrant::NE => (1, 1),
            Quadrant::SW => (-1, -1),
            Quadrant::SE => (1, -1),
        }
    }
}

/// 节点所覆盖的正方形区域
///
/// 由质心和边长指数 `k` 描述，边长为 `2^k`。`k >= 1` 时每个轴覆盖整数坐标
/// `[c - 2^(k-1), c + 2^(k-1))`；`k == 0` 时区域就是质心所在的单个格点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub centroid: Point,
    pub k: u32,
}

impl Region {
    /// 允许的最大边长指数，保证区域运算在 i64 中不溢出
    pub const MAX_K: u32 = 31;

    pub fn new(centroid: Point, k: u32) -> Self {
        Region { centroid, k }
    }

    /// 边长 `2^k`
    pub fn side(&self) -> i64 {
        1i64 << self.k
    }

    /// 区域左下角（包含）
    pub fn min(&self) -> [i64; 2] {
        let half = if self.k == 0 { 0 } else { 1i64 << (self.k - 1) };
        [
            i64::from(self.centroid.x) - half,
            i64::from(self.centroid.y) - half,
        ]
    }

    /// 区域右上角（包含）
    pub fn max(&self) -> [i64; 2] {
        let min = self.min();
        let side = self.side();
        [min[0] + side - 1, min[1] + side - 1]
    }

    /// 判断点是否落在区域内
    pub fn contains(&self, point: &Point) -> bool {
        let min = self.min();
        let max = self.max();
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        min[0] <= x && x <= max[0] && min[1] <= y && y <= max[1]
    }

    /// 判断另一个区域是否完全落在当前区域内
    pub fn contains_region(&self, other: &Region) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());
        min[0] <= other_min[0]
            && min[1] <= other_min[1]
            && other_max[0] <= max[0]
            && other_max[1] <= max[1]
    }

    /// 点相对于本区域质心所在的象限
    pub fn quadrant_of(&self, point: &Point) -> Quadrant {
        Quadrant::of(point, &self.centroid)
    }

    /// 计算某个象限对应的子区域
    ///
    /// 子区域边长为 `2^(k-1)`，质心偏移 `2^(k-2)`；`k == 1` 时子区域是单个格点。
    /// 单格点区域无法再细分，返回 `None`。
    pub fn child(&self, quadrant: Quadrant) -> Option<Region> {
        if self.k == 0 {
            return None;
        }
        let (sx, sy) = quadrant.signs();
        let (cx, cy) = (i64::from(self.centroid.x), i64::from(self.centroid.y));
        let (x, y) = if self.k == 1 {
            // 西侧/南侧格点在质心线的前一格
            (
                if sx < 0 { cx - 1 } else { cx },
                if sy < 0 { cy - 1 } else { cy },
            )
        } else {
            let offset = 1i64 << (self.k - 2);
            (cx + sx * offset, cy + sy * offset)
        };
        let centroid = Point::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?);
        Some(Region::new(centroid, self.k - 1))
    }

    /// 从当前区域向下找到最小的对齐子区域，使 `inner` 和 `point` 落在不同象限
    ///
    /// 要求 `inner` 是本区域内的对齐子区域且 `point` 在本区域内、不在 `inner` 内。
    pub fn separating(&self, inner: &Region, point: &Point) -> Region {
        let mut current = *self;
        while current.k > inner.k {
            let inner_quadrant = current.quadrant_of(&inner.centroid);
            if inner_quadrant != current.quadrant_of(point) {
                break;
            }
            match current.child(inner_quadrant) {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    /// 区域内离 `anchor` 最近的位置到 `anchor` 的距离，点在区域内时为 0
    pub fn distance_to(&self, anchor: &Point) -> f64 {
        let min = self.min();
        let max = self.max();
        let (x, y) = (i64::from(anchor.x), i64::from(anchor.y));
        let dx = (x.clamp(min[0], max[0]) - x) as f64;
        let dy = (y.clamp(min[1], max[1]) - y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// 判断以 `anchor` 为圆心、`radius` 为半径的圆是否与区域相交
    ///
    /// 只用于剪枝；叶子层会重新检查每个点的距离。
    pub fn intersects_circle(&self, anchor: &Point, radius: f64) -> bool {
        radius >= 0.0 && self.distance_to(anchor) <= radius
    }
}
