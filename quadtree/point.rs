use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 二维整数坐标点 - PR四叉树中存储的基本元素
///
/// `Point` 是 `Copy` 的，节点对外暴露的点都是值拷贝，调用方无法借此修改树的内部状态。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// 创建新的点
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// 按维度下标取坐标（0 为 x，1 为 y）
    pub fn coord(&self, axis: usize) -> Option<i32> {
        match axis {
            0 => Some(self.x),
            1 => Some(self.y),
            _ => None,
        }
    }

    /// 以数组形式返回坐标 `[x, y]`
    pub fn coords(&self) -> [i32; 2] {
        [self.x, self.y]
    }

    /// 计算到另一个点的欧氏距离
    pub fn distance(&self, other: &Point) -> f64 {
        // 在 i64 中做差，避免 i32 溢出
        let dx = (i64::from(self.x) - i64::from(other.x)) as f64;
        let dy = (i64::from(self.y) - i64::from(other.y)) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl From<[i32; 2]> for Point {
    fn from(coords: [i32; 2]) -> Self {
        Point::new(coords[0], coords[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point::new(3, -4);
        assert_eq!(p.coords(), [3, -4]);
        assert_eq!(p.coord(0), Some(3));
        assert_eq!(p.coord(1), Some(-4));
        assert_eq!(p.coord(2), None);
    }

    #[test]
    fn test_point_distance() {
        let origin = Point::new(0, 0);
        assert_eq!(origin.distance(&Point::new(3, 4)), 5.0);
        assert_eq!(Point::new(3, 4).distance(&origin), 5.0);
        assert_eq!(origin.distance(&origin), 0.0);
    }

    #[test]
    fn test_point_distance_extremes() {
        // 极端坐标下不应溢出
        let a = Point::new(i32::MIN, 0);
        let b = Point::new(i32::MAX, 0);
        assert_eq!(a.distance(&b), u32::MAX as f64);
    }

    #[test]
    fn test_point_display_and_conversion() {
        let p: Point = (7, 9).into();
        assert_eq!(p, Point::from([7, 9]));
        assert_eq!(p.to_string(), "(7, 9)");
    }
}
