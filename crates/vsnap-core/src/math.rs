//! 基础数学类型
//!
//! 文档坐标系下的点、向量和轴对齐包围盒。

use serde::{Deserialize, Serialize};

/// 二维点（文档坐标）
pub type Point2 = nalgebra::Point2<f64>;

/// 二维向量
pub type Vector2 = nalgebra::Vector2<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-10;

/// 两点间距离的平方
pub fn square_distance(p1: &Point2, p2: &Point2) -> f64 {
    (p1 - p2).norm_squared()
}

/// 两个向量的点积
pub fn scalar_product(v1: &Vector2, v2: &Vector2) -> f64 {
    v1.dot(v2)
}

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 由两个角点创建（自动规范化）
    pub fn new(p1: Point2, p2: Point2) -> Self {
        Self {
            min: Point2::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point2::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// 以中心点和半边长创建
    ///
    /// 捕捉策略用它构造以鼠标为中心、边长为 `2 * half_extent` 的查询窗口。
    pub fn from_center(center: Point2, half_extent: f64) -> Self {
        Self {
            min: Point2::new(center.x - half_extent, center.y - half_extent),
            max: Point2::new(center.x + half_extent, center.y + half_extent),
        }
    }

    /// 空包围盒（不包含任何点）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// 包含所有给定点的最小包围盒
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// 四个角点，按 左上、右上、右下、左下 的顺序
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min.x, self.min.y),
            Point2::new(self.max.x, self.min.y),
            Point2::new(self.max.x, self.max.y),
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// 扩展以包含指定点
    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并另一个包围盒
    pub fn union(&self, other: &BoundingBox2) -> BoundingBox2 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BoundingBox2 {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// 向四周扩展 `margin`
    pub fn expanded(&self, margin: f64) -> BoundingBox2 {
        if self.is_empty() {
            return *self;
        }
        BoundingBox2 {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// 点是否在包围盒内（含边界）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// 是否完整包含另一个包围盒
    pub fn contains_box(&self, other: &BoundingBox2) -> bool {
        !other.is_empty() && self.contains(&other.min) && self.contains(&other.max)
    }

    /// 两个包围盒是否相交（含边界接触）
    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

impl Default for BoundingBox2 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_distance() {
        assert_eq!(square_distance(&Point2::origin(), &Point2::origin()), 0.0);
        assert_eq!(square_distance(&Point2::new(2.0, 2.0), &Point2::new(1.0, 1.0)), 2.0);
        assert_eq!(square_distance(&Point2::new(2.0, 2.0), &Point2::new(-2.0, -2.0)), 32.0);
    }

    #[test]
    fn test_from_center() {
        let window = BoundingBox2::from_center(Point2::new(3.0, 3.0), 4.0);
        assert_eq!(window.min, Point2::new(-1.0, -1.0));
        assert_eq!(window.max, Point2::new(7.0, 7.0));
        assert!(window.contains(&Point2::new(7.0, -1.0)));
    }

    #[test]
    fn test_intersects_degenerate_box() {
        // 零高度的包围盒（水平线段）也要能命中
        let flat = BoundingBox2::from_points([Point2::new(1.0, 2.0), Point2::new(4.0, 2.0)]);
        let window = BoundingBox2::from_center(Point2::origin(), 4.0);
        assert!(flat.intersects(&window));
        assert!(!BoundingBox2::empty().intersects(&window));
    }

    #[test]
    fn test_union_with_empty() {
        let a = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        assert_eq!(BoundingBox2::empty().union(&a), a);
        assert!(BoundingBox2::empty().expanded(2.0).is_empty());
    }
}
