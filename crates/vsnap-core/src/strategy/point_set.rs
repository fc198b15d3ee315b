//! 点集捕捉
//!
//! 捕捉到宿主显式提供的一组点，不从图形中取数据。
//! 典型用法：拖动控制柄时，把拖动前的位置作为临时参考点。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::{marker_half_size, Decoration};
use crate::math::Point2;
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

#[derive(Debug, Clone)]
pub struct PointSnapStrategy {
    kind: SnapStrategyKind,
    points: Vec<Point2>,
    snapped: SnappedPosition,
}

impl PointSnapStrategy {
    /// 指定类型的点集策略（通常是 `Custom` 或 `PointSnap`）
    pub fn new(kind: SnapStrategyKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            snapped: SnappedPosition::default(),
        }
    }

    pub fn with_points(kind: SnapStrategyKind, points: impl IntoIterator<Item = Point2>) -> Self {
        Self {
            points: points.into_iter().collect(),
            ..Self::new(kind)
        }
    }

    pub fn add_point(&mut self, point: Point2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for PointSnapStrategy {
    fn default() -> Self {
        Self::new(SnapStrategyKind::Custom)
    }
}

impl SnapStrategy for PointSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        self.kind
    }

    fn snap(&mut self, mouse_position: Point2, _proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());

        let mut best: Option<(f64, Point2)> = None;
        for point in &self.points {
            let distance = (point - mouse_position).norm();
            if distance < max_snap_distance && best.is_none_or(|(min, _)| distance < min) {
                best = Some((distance, *point));
            }
        }

        match best {
            Some((_, point)) => {
                self.snapped = SnappedPosition::new(point, SnapTarget::ToPoint);
                true
            }
            None => false,
        }
    }

    fn snapped(&self) -> SnappedPosition {
        self.snapped
    }

    fn decoration(&self, converter: &dyn ViewConverter) -> Decoration {
        let mut decoration = Decoration::new();
        decoration.add_cross(self.snapped.position, marker_half_size(converter));
        decoration
    }
}
