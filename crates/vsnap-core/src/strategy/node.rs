//! 节点捕捉：鼠标附近最近的图形点

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::{marker_box, Decoration};
use crate::math::{square_distance, BoundingBox2, Point2};
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

#[derive(Debug, Clone, Default)]
pub struct NodeSnapStrategy {
    snapped: SnappedPosition,
}

impl NodeSnapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapStrategy for NodeSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        SnapStrategyKind::Node
    }

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());
        let max_distance = max_snap_distance * max_snap_distance;

        let rect = BoundingBox2::from_center(mouse_position, max_snap_distance);
        let mut best: Option<(f64, Point2)> = None;
        for point in proxy.points_in_rect(&rect, false) {
            let distance = square_distance(&mouse_position, &point);
            if distance < max_distance && best.is_none_or(|(min, _)| distance < min) {
                best = Some((distance, point));
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
        decoration.add_ellipse(marker_box(self.snapped.position, converter));
        decoration
    }
}
