//! 交点捕捉
//!
//! 取鼠标附近窗口内的所有路径段，两两求交。窗口边长受捕捉距离限制，
//! 所以平方复杂度在实际中可以接受。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::{marker_box, Decoration};
use crate::math::{square_distance, BoundingBox2, Point2};
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

#[derive(Debug, Clone, Default)]
pub struct IntersectionSnapStrategy {
    snapped: SnappedPosition,
}

impl IntersectionSnapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapStrategy for IntersectionSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        SnapStrategyKind::Intersection
    }

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());
        let max_distance = max_snap_distance * max_snap_distance;

        let rect = BoundingBox2::from_center(mouse_position, max_snap_distance);
        let segments = proxy.segments_in_rect(&rect, false);

        let mut best: Option<(f64, Point2)> = None;
        for (i, s1) in segments.iter().enumerate() {
            for s2 in &segments[i + 1..] {
                for point in s1.intersections(s2) {
                    if !rect.contains(&point) {
                        continue;
                    }
                    let distance = square_distance(&mouse_position, &point);
                    if distance < max_distance && best.is_none_or(|(min, _)| distance < min) {
                        best = Some((distance, point));
                    }
                }
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
        decoration.add_rect(marker_box(self.snapped.position, converter));
        decoration
    }
}
