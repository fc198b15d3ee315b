//! 包围盒捕捉
//!
//! 先检查每个图形包围盒的四个角点和中心，命中时跳过该图形的边；
//! 否则把鼠标投影到包围盒的四条边（有界线段）上。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::{marker_half_size, Decoration};
use crate::math::{scalar_product, square_distance, BoundingBox2, Point2, Vector2};
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

#[derive(Debug, Clone, Default)]
pub struct BoundingBoxSnapStrategy {
    snapped: SnappedPosition,
}

impl BoundingBoxSnapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 点到线段 `line_a -> line_b` 的距离平方及线段上的最近点
///
/// 投影落在线段之外或线段退化为点时返回 `None`。
pub fn square_distance_to_line(line_a: Point2, line_b: Point2, point: Point2) -> Option<(f64, Point2)> {
    if line_a == line_b {
        return None;
    }
    let diff = line_b - line_a;
    let diff_length = diff.norm();

    let scalar = scalar_product(&(point - line_a), &(diff / diff_length));
    if scalar < 0.0 || scalar > diff_length {
        return None;
    }

    let point_on_line = line_a + diff * (scalar / diff_length);
    Some((square_distance(&point_on_line, &point), point_on_line))
}

impl SnapStrategy for BoundingBoxSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        SnapStrategyKind::BoundingBox
    }

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());
        let max_distance = max_snap_distance * max_snap_distance;

        let rect = BoundingBox2::from_center(mouse_position, max_snap_distance);
        let mut best: Option<(f64, Point2, SnapTarget)> = None;

        for shape in proxy.shapes_in_rect(&rect, true) {
            let bbox = shape.bounding_rect();
            if bbox.is_empty() {
                continue;
            }
            let corners = bbox.corners();

            let mut point_in_range = false;
            for point in corners.iter().copied().chain([bbox.center()]) {
                let distance = square_distance(&mouse_position, &point);
                if distance >= max_distance {
                    continue;
                }
                point_in_range = true;
                if best.is_none_or(|(min, _, _)| distance < min) {
                    best = Some((distance, point, SnapTarget::ToPoint));
                }
            }
            // 任一角点或中心在范围内时不再检查该图形的边
            if point_in_range {
                continue;
            }

            for i in 0..corners.len() {
                let Some((distance, point_on_line)) =
                    square_distance_to_line(corners[i], corners[(i + 1) % corners.len()], mouse_position)
                else {
                    continue;
                };
                if distance < max_distance && best.is_none_or(|(min, _, _)| distance < min) {
                    best = Some((distance, point_on_line, SnapTarget::ToLine));
                }
            }
        }

        match best {
            Some((_, point, target)) => {
                self.snapped = SnappedPosition::new(point, target);
                true
            }
            None => false,
        }
    }

    fn snapped(&self) -> SnappedPosition {
        self.snapped
    }

    fn decoration(&self, converter: &dyn ViewConverter) -> Decoration {
        let half = marker_half_size(converter);
        let p = self.snapped.position;
        let mut decoration = Decoration::new();
        decoration.add_line(p - half, p + half);
        let flipped = Vector2::new(half.x, -half.y);
        decoration.add_line(p - flipped, p + flipped);
        decoration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use crate::proxy::SnapFilter;
    use crate::shape::ZoomConverter;
    use crate::testing::{MockCanvas, MockShape};

    #[test]
    fn test_square_distance_to_line() {
        // 投影超出线段末端
        assert!(square_distance_to_line(Point2::new(4.0, 1.0), Point2::new(6.0, 3.0), Point2::new(5.0, 8.0)).is_none());
        // 退化线段
        assert!(square_distance_to_line(Point2::new(4.0, 4.0), Point2::new(4.0, 4.0), Point2::new(5.0, 8.0)).is_none());
        // 投影在起点之前
        assert!(square_distance_to_line(Point2::new(6.0, 4.0), Point2::new(8.0, 6.0), Point2::new(2.0, 2.0)).is_none());

        let a = Point2::new(2.0, 2.0);
        let diff = Vector2::new(6.0, 4.0);
        let len = 52f64.sqrt();
        let expected_point = a + diff * ((1.0 * (6.0 / len) + 2.0 * (4.0 / len)) / len);
        let expected = square_distance(&expected_point, &Point2::new(3.0, 4.0));

        let (distance, point) = square_distance_to_line(a, Point2::new(8.0, 6.0), Point2::new(3.0, 4.0)).unwrap();
        assert!((distance - expected).abs() < EPSILON);
        assert!((point - expected_point).norm() < EPSILON);
    }

    #[test]
    fn test_no_shapes_no_snap() {
        let canvas = MockCanvas::new();
        let filter = SnapFilter::default();
        let mut strategy = BoundingBoxSnapStrategy::new();
        assert!(!strategy.snap(Point2::origin(), &SnapProxy::new(&canvas, &filter), 8.0));
    }

    #[test]
    fn test_snap_to_corner() {
        let canvas = MockCanvas::with_shapes([
            MockShape::polyline(1, &[(1.0, 2.0), (2.0, 2.0), (3.0, 2.0), (4.0, 2.0)], false),
            MockShape::polyline(2, &[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)], false),
            MockShape::polyline(3, &[(5.0, 5.0), (6.0, 6.0), (7.0, 7.0), (8.0, 8.0)], false),
        ]);
        let filter = SnapFilter::default();
        let mut strategy = BoundingBoxSnapStrategy::new();

        assert!(strategy.snap(Point2::origin(), &SnapProxy::new(&canvas, &filter), 8.0));
        assert_eq!(strategy.snapped_position(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_snap_to_edge() {
        let canvas = MockCanvas::with_shapes([MockShape::rect(1, (0.0, 0.0), (10.0, 10.0))]);
        let filter = SnapFilter::default();
        let mut strategy = BoundingBoxSnapStrategy::new();

        assert!(strategy.snap(Point2::new(3.0, -1.0), &SnapProxy::new(&canvas, &filter), 2.0));
        let p = strategy.snapped_position();
        assert!((p.x - 3.0).abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert_eq!(strategy.snapped().target, SnapTarget::ToLine);
    }

    #[test]
    fn test_corner_in_range_skips_edges() {
        // 第二个图形的角点 (1.5, 2) 在范围内但不是最近的，它的边也不应参与
        let canvas = MockCanvas::with_shapes([
            MockShape::rect(1, (-10.0, -10.0), (3.0, 0.0)),
            MockShape::rect(2, (1.5, 2.0), (10.0, 10.0)),
        ]);
        let filter = SnapFilter::default();
        let mut strategy = BoundingBoxSnapStrategy::new();

        assert!(strategy.snap(Point2::new(3.0, 1.5), &SnapProxy::new(&canvas, &filter), 2.0));
        assert_eq!(strategy.snapped_position(), Point2::new(3.0, 0.0));
        assert_eq!(strategy.snapped().target, SnapTarget::ToPoint);
    }

    #[test]
    fn test_center_point() {
        let canvas = MockCanvas::with_shapes([MockShape::rect(1, (0.0, 0.0), (10.0, 10.0))]);
        let filter = SnapFilter::default();
        let mut strategy = BoundingBoxSnapStrategy::new();

        assert!(strategy.snap(Point2::new(5.5, 4.0), &SnapProxy::new(&canvas, &filter), 2.0));
        assert_eq!(strategy.snapped_position(), Point2::new(5.0, 5.0));
    }

    #[test]
    fn test_zero_distance_no_snap() {
        let canvas = MockCanvas::with_shapes([MockShape::rect(1, (0.0, 0.0), (10.0, 10.0))]);
        let filter = SnapFilter::default();
        let mut strategy = BoundingBoxSnapStrategy::new();
        assert!(!strategy.snap(Point2::new(0.0, 0.0), &SnapProxy::new(&canvas, &filter), 0.0));
    }

    #[test]
    fn test_decoration_end_point() {
        let strategy = BoundingBoxSnapStrategy::new();
        let decoration = strategy.decoration(&ZoomConverter::default());
        assert_eq!(decoration.current_position(), Point2::new(5.0, -5.0));
    }
}
