//! 外部协作者接口
//!
//! 捕捉引擎本身不拥有任何几何数据，只通过这里的 trait 读取：
//! - `SnapShape`: 一个可绘制的图形
//! - `ShapeManager`: 图形集合的查询入口
//! - `ViewConverter`: 屏幕像素与文档单位之间的换算
//! - `SnapCanvas`: 把上述三者以及网格设置组织在一起

use crate::math::{BoundingBox2, Point2, Vector2};
use crate::path::{PathData, PathSegment};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图形标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 图形主动提供的额外捕捉数据（图形坐标）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapData {
    pub snap_points: Vec<Point2>,
    pub snap_segments: Vec<PathSegment>,
}

impl SnapData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(points: impl IntoIterator<Item = Point2>) -> Self {
        Self {
            snap_points: points.into_iter().collect(),
            snap_segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snap_points.is_empty() && self.snap_segments.is_empty()
    }
}

/// 可参与捕捉的图形
pub trait SnapShape: fmt::Debug {
    fn id(&self) -> ShapeId;

    fn is_visible(&self) -> bool;

    /// 图层只是结构容器，永远不作为捕捉目标
    fn is_layer(&self) -> bool {
        false
    }

    /// 文档坐标下的包围盒
    fn bounding_rect(&self) -> BoundingBox2;

    /// 图形坐标到文档坐标的变换
    fn absolute_transform(&self) -> Transform2D {
        Transform2D::identity()
    }

    /// 额外捕捉点/线段
    fn snap_data(&self) -> &SnapData;

    /// 路径轮廓（图形坐标）；非路径图形返回 `None`
    fn path(&self) -> Option<&PathData> {
        None
    }
}

/// 图形集合
pub trait ShapeManager {
    /// 全部图形（包括隐藏图形和图层）
    fn shapes(&self) -> Vec<&dyn SnapShape>;

    /// 与矩形相交的可见图形
    fn shapes_at(&self, rect: &BoundingBox2) -> Vec<&dyn SnapShape> {
        self.shapes()
            .into_iter()
            .filter(|s| s.is_visible() && !s.is_layer())
            .filter(|s| {
                let bound = s.bounding_rect();
                rect.intersects(&bound) || rect.contains_box(&bound)
            })
            .collect()
    }
}

/// 视图坐标换算
pub trait ViewConverter {
    /// 屏幕像素尺寸换算为文档尺寸
    fn view_to_document(&self, size: Vector2) -> Vector2;
}

/// 网格设置（文档单位）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub offset: Point2,
    pub spacing: Vector2,
}

impl GridSettings {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            offset: Point2::origin(),
            spacing: Vector2::new(horizontal, vertical),
        }
    }
}

/// 画布
pub trait SnapCanvas {
    fn shape_manager(&self) -> &dyn ShapeManager;

    fn view_converter(&self) -> &dyn ViewConverter;

    /// 网格设置；`None` 表示画布关闭了网格捕捉
    fn grid(&self) -> Option<GridSettings> {
        None
    }
}

/// 缩放系数固定的视图换算
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConverter {
    pub zoom: f64,
}

impl ZoomConverter {
    pub fn new(zoom: f64) -> Self {
        Self { zoom }
    }
}

impl Default for ZoomConverter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ViewConverter for ZoomConverter {
    fn view_to_document(&self, size: Vector2) -> Vector2 {
        size / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockShape, MockShapeManager};

    #[test]
    fn test_zoom_converter() {
        let converter = ZoomConverter::new(2.0);
        assert_eq!(converter.view_to_document(Vector2::new(10.0, 4.0)), Vector2::new(5.0, 2.0));
    }

    #[test]
    fn test_shapes_at_skips_hidden_and_layers() {
        let mut manager = MockShapeManager::new();
        manager.add(MockShape::with_points(1, [Point2::new(1.0, 1.0)]));
        let mut hidden = MockShape::with_points(2, [Point2::new(1.0, 1.0)]);
        hidden.visible = false;
        manager.add(hidden);
        let mut layer = MockShape::with_points(3, [Point2::new(1.0, 1.0)]);
        layer.layer = true;
        manager.add(layer);
        manager.add(MockShape::with_points(4, [Point2::new(50.0, 50.0)]));

        let found = manager.shapes_at(&BoundingBox2::from_center(Point2::origin(), 2.0));
        let ids: Vec<_> = found.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![ShapeId(1)]);
    }
}
