//! 正交捕捉：与其它图形点水平或垂直对齐
//!
//! 两个轴独立选择，x 和 y 可以来自不同的点。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::Decoration;
use crate::math::Point2;
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

#[derive(Debug, Clone, Default)]
pub struct OrthogonalSnapStrategy {
    snapped: SnappedPosition,
    /// 提供 x 坐标的点 -> 捕捉位置
    h_line: Option<(Point2, Point2)>,
    /// 提供 y 坐标的点 -> 捕捉位置
    v_line: Option<(Point2, Point2)>,
}

impl OrthogonalSnapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapStrategy for OrthogonalSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        SnapStrategyKind::Orthogonal
    }

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());

        let mut horz_snap: Option<(f64, Point2)> = None;
        let mut vert_snap: Option<(f64, Point2)> = None;

        for shape in proxy.shapes(true) {
            for point in proxy.points_from_shape(shape) {
                let dx = (point.x - mouse_position.x).abs();
                if dx < max_snap_distance && horz_snap.is_none_or(|(min, _)| dx < min) {
                    horz_snap = Some((dx, point));
                }
                let dy = (point.y - mouse_position.y).abs();
                if dy < max_snap_distance && vert_snap.is_none_or(|(min, _)| dy < min) {
                    vert_snap = Some((dy, point));
                }
            }
        }

        if horz_snap.is_none() && vert_snap.is_none() {
            return false;
        }

        let mut snapped_point = mouse_position;
        if let Some((_, p)) = horz_snap {
            snapped_point.x = p.x;
        }
        if let Some((_, p)) = vert_snap {
            snapped_point.y = p.y;
        }

        self.h_line = horz_snap.map(|(_, p)| (p, snapped_point));
        self.v_line = vert_snap.map(|(_, p)| (p, snapped_point));
        self.snapped = SnappedPosition::new(snapped_point, SnapTarget::ToLine);
        true
    }

    fn snapped(&self) -> SnappedPosition {
        self.snapped
    }

    fn decoration(&self, _converter: &dyn ViewConverter) -> Decoration {
        let mut decoration = Decoration::new();
        for (from, to) in self.h_line.iter().chain(self.v_line.iter()) {
            decoration.add_line(*from, *to);
        }
        decoration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::SnapFilter;
    use crate::shape::ZoomConverter;
    use crate::testing::{MockCanvas, MockShape};

    fn sample_canvas() -> MockCanvas {
        MockCanvas::with_shapes([MockShape::with_points(
            1,
            [
                Point2::new(1.0, 2.0),
                Point2::new(2.0, 2.0),
                Point2::new(3.0, 2.0),
                Point2::new(4.0, 2.0),
            ],
        )])
    }

    #[test]
    fn test_no_shapes_no_snap() {
        let canvas = MockCanvas::new();
        let filter = SnapFilter::default();
        let mut strategy = OrthogonalSnapStrategy::new();
        assert!(!strategy.snap(Point2::origin(), &SnapProxy::new(&canvas, &filter), 4.0));
    }

    #[test]
    fn test_zero_distance_no_snap() {
        let canvas = sample_canvas();
        let filter = SnapFilter::default();
        let mut strategy = OrthogonalSnapStrategy::new();
        // 即使鼠标正好在点上
        assert!(!strategy.snap(Point2::new(3.0, 2.0), &SnapProxy::new(&canvas, &filter), 0.0));
    }

    #[test]
    fn test_independent_axes() {
        let canvas = sample_canvas();
        let filter = SnapFilter::default();
        let mut strategy = OrthogonalSnapStrategy::new();

        assert!(strategy.snap(Point2::new(3.0, 3.0), &SnapProxy::new(&canvas, &filter), 4.0));
        assert_eq!(strategy.snapped_position(), Point2::new(3.0, 2.0));
        assert_eq!(strategy.snapped().target, SnapTarget::ToLine);

        let decoration = strategy.decoration(&ZoomConverter::default());
        assert!(!decoration.is_empty());
        assert_eq!(decoration.current_position(), Point2::new(3.0, 2.0));
    }

    #[test]
    fn test_single_axis() {
        let canvas = sample_canvas();
        let filter = SnapFilter::default();
        let mut strategy = OrthogonalSnapStrategy::new();

        // 只有 y 在范围内
        assert!(strategy.snap(Point2::new(20.0, 3.0), &SnapProxy::new(&canvas, &filter), 4.0));
        assert_eq!(strategy.snapped_position(), Point2::new(20.0, 2.0));
        assert_eq!(strategy.decoration(&ZoomConverter::default()).elements().len(), 2);
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let canvas = sample_canvas();
        let filter = SnapFilter::default();
        let mut strategy = OrthogonalSnapStrategy::new();
        let proxy = SnapProxy::new(&canvas, &filter);

        assert!(strategy.snap(Point2::new(3.0, 3.0), &proxy, 4.0));
        assert!(!strategy.snap(Point2::new(50.0, 50.0), &proxy, 4.0));
        assert_eq!(strategy.snapped_position(), Point2::new(3.0, 2.0));
    }
}
