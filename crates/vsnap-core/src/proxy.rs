//! 捕捉查询代理
//!
//! 策略不直接访问图形集合，而是通过 `SnapProxy` 查询鼠标附近的图形、点和线段。
//! 代理负责过滤：
//! - 隐藏图形和图层
//! - 被显式忽略的图形
//! - 正在编辑的路径点（按需）
//!
//! 代理是只读的，每次 `SnapGuide::snap` 调用都会重新构造。

use crate::math::{BoundingBox2, Point2};
use crate::path::{PathPointId, PathSegment};
use crate::shape::{GridSettings, ShapeId, SnapCanvas, SnapShape};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// 捕捉过滤条件，由 `SnapGuide` 持有
#[derive(Default)]
pub struct SnapFilter {
    pub ignored_shapes: HashSet<ShapeId>,
    pub ignored_points: HashSet<PathPointId>,
    /// 尚未加入文档、但仍需参与捕捉的图形（例如正在绘制的图形）
    pub additional_edited_shape: Option<Rc<dyn SnapShape>>,
}

impl SnapFilter {
    pub fn clear(&mut self) {
        self.ignored_shapes.clear();
        self.ignored_points.clear();
        self.additional_edited_shape = None;
    }

    fn owns_ignored_point(&self, shape: ShapeId) -> bool {
        self.ignored_points.iter().any(|p| p.shape == shape)
    }
}

impl fmt::Debug for SnapFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapFilter")
            .field("ignored_shapes", &self.ignored_shapes)
            .field("ignored_points", &self.ignored_points)
            .field(
                "additional_edited_shape",
                &self.additional_edited_shape.as_ref().map(|s| s.id()),
            )
            .finish()
    }
}

/// 图形查询代理
#[derive(Clone, Copy)]
pub struct SnapProxy<'a> {
    canvas: &'a dyn SnapCanvas,
    filter: &'a SnapFilter,
}

impl<'a> SnapProxy<'a> {
    pub fn new(canvas: &'a dyn SnapCanvas, filter: &'a SnapFilter) -> Self {
        Self { canvas, filter }
    }

    pub fn canvas(&self) -> &'a dyn SnapCanvas {
        self.canvas
    }

    /// 画布的网格设置
    pub fn grid(&self) -> Option<GridSettings> {
        self.canvas.grid()
    }

    fn edited_shape(&self) -> Option<&'a dyn SnapShape> {
        self.filter.additional_edited_shape.as_deref()
    }

    /// 与矩形相交的图形
    ///
    /// `omit_edited_shape` 为真时，不包含额外编辑图形，并去掉拥有被忽略路径点的图形。
    pub fn shapes_in_rect(&self, rect: &BoundingBox2, omit_edited_shape: bool) -> Vec<&'a dyn SnapShape> {
        let mut shapes: Vec<&'a dyn SnapShape> = self
            .canvas
            .shape_manager()
            .shapes_at(rect)
            .into_iter()
            .filter(|s| !s.is_layer() && !self.filter.ignored_shapes.contains(&s.id()))
            .collect();

        if omit_edited_shape {
            shapes.retain(|s| !self.filter.owns_ignored_point(s.id()));
        } else if let Some(edited) = self.edited_shape().filter(|s| s.is_visible()) {
            let bound = edited.bounding_rect();
            if rect.intersects(&bound) || rect.contains_box(&bound) {
                shapes.push(edited);
            }
        }
        shapes
    }

    /// 矩形内的所有捕捉点
    pub fn points_in_rect(&self, rect: &BoundingBox2, omit_edited_shape: bool) -> Vec<Point2> {
        self.shapes_in_rect(rect, omit_edited_shape)
            .into_iter()
            .flat_map(|shape| self.points_from_shape(shape))
            .filter(|p| rect.contains(p))
            .collect()
    }

    /// 图形提供的捕捉点（文档坐标）
    ///
    /// 路径图形给出所有未被忽略的路径点；其它图形以包围盒四角作为默认捕捉点。
    /// 图形声明的额外捕捉点总会加入。
    pub fn points_from_shape(&self, shape: &dyn SnapShape) -> Vec<Point2> {
        if !shape.is_visible() {
            return Vec::new();
        }

        let transform = shape.absolute_transform();
        let mut points: Vec<Point2> = shape
            .snap_data()
            .snap_points
            .iter()
            .map(|p| transform.map_point(p))
            .collect();

        match shape.path() {
            Some(path) => {
                let id = shape.id();
                for (subpath, index, point) in path.points() {
                    if self.filter.ignored_points.contains(&PathPointId::new(id, subpath, index)) {
                        continue;
                    }
                    points.push(transform.map_point(&point.point));
                }
            }
            None => {
                let bbox = shape.bounding_rect();
                if !bbox.is_empty() {
                    points.extend(bbox.corners());
                }
            }
        }
        points
    }

    /// 与矩形相交的路径段（文档坐标）
    ///
    /// 隐藏图形和任一端点被忽略的路径段不会返回。
    pub fn segments_in_rect(&self, rect: &BoundingBox2, omit_edited_shape: bool) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        for shape in self.shapes_in_rect(rect, omit_edited_shape) {
            if !shape.is_visible() {
                continue;
            }
            let transform = shape.absolute_transform();
            let Some(inverse) = transform.inverse() else {
                continue;
            };
            let rect_on_shape = inverse.map_rect(rect);

            let shape_segments: Vec<PathSegment> = match shape.path() {
                Some(path) => path.segments_at(shape.id(), &rect_on_shape),
                None => shape
                    .snap_data()
                    .snap_segments
                    .iter()
                    .filter(|s| s.touches_rect(&rect_on_shape))
                    .copied()
                    .collect(),
            };

            segments.extend(
                shape_segments
                    .into_iter()
                    .filter(|s| !self.touches_ignored_point(s))
                    .map(|s| s.mapped(&transform)),
            );
        }
        segments
    }

    fn touches_ignored_point(&self, segment: &PathSegment) -> bool {
        [segment.first_id, segment.second_id]
            .iter()
            .flatten()
            .any(|id| self.filter.ignored_points.contains(id))
    }

    /// 所有可见、未被忽略的非图层图形
    pub fn shapes(&self, omit_edited_shape: bool) -> Vec<&'a dyn SnapShape> {
        let mut shapes: Vec<&'a dyn SnapShape> = self
            .canvas
            .shape_manager()
            .shapes()
            .into_iter()
            .filter(|s| s.is_visible() && !s.is_layer())
            .filter(|s| !self.filter.ignored_shapes.contains(&s.id()))
            .collect();

        if omit_edited_shape {
            shapes.retain(|s| !self.filter.owns_ignored_point(s.id()));
        } else if let Some(edited) = self.edited_shape() {
            if edited.is_visible() {
                shapes.push(edited);
            }
        }
        shapes
    }
}

impl fmt::Debug for SnapProxy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapProxy").field("filter", self.filter).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCanvas, MockShape};
    use crate::transform::Transform2D;

    fn ids(shapes: &[&dyn SnapShape]) -> Vec<ShapeId> {
        shapes.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_shapes_filters_ignored_and_hidden() {
        let mut hidden = MockShape::with_points(2, [Point2::new(1.0, 1.0)]);
        hidden.visible = false;
        let canvas = MockCanvas::with_shapes([
            MockShape::with_points(1, [Point2::new(1.0, 1.0)]),
            hidden,
            MockShape::with_points(3, [Point2::new(2.0, 2.0)]),
        ]);
        let mut filter = SnapFilter::default();
        filter.ignored_shapes.insert(ShapeId(3));

        let proxy = SnapProxy::new(&canvas, &filter);
        assert_eq!(ids(&proxy.shapes(false)), vec![ShapeId(1)]);
    }

    #[test]
    fn test_edited_shape_inclusion() {
        let canvas = MockCanvas::with_shapes([MockShape::with_points(1, [Point2::new(1.0, 1.0)])]);
        let mut filter = SnapFilter::default();
        filter.additional_edited_shape = Some(Rc::new(MockShape::with_points(9, [Point2::new(2.0, 2.0)])));

        let proxy = SnapProxy::new(&canvas, &filter);
        assert_eq!(ids(&proxy.shapes(false)), vec![ShapeId(1), ShapeId(9)]);
        assert_eq!(ids(&proxy.shapes(true)), vec![ShapeId(1)]);

        let window = BoundingBox2::from_center(Point2::new(2.0, 2.0), 0.5);
        assert_eq!(ids(&proxy.shapes_in_rect(&window, false)), vec![ShapeId(9)]);
        assert!(proxy.shapes_in_rect(&window, true).is_empty());
    }

    #[test]
    fn test_hidden_shapes_give_no_segments() {
        let mut hidden = MockShape::polyline(1, &[(-5.0, 1.0), (5.0, 1.0)], false);
        hidden.visible = false;
        let canvas = MockCanvas::with_shapes([hidden.clone()]);
        let mut edited = MockShape::polyline(9, &[(0.0, -5.0), (0.0, 5.0)], false);
        edited.visible = false;
        let mut filter = SnapFilter::default();
        filter.additional_edited_shape = Some(Rc::new(edited));

        let window = BoundingBox2::from_center(Point2::origin(), 2.0);
        let proxy = SnapProxy::new(&canvas, &filter);
        assert!(proxy.segments_in_rect(&window, false).is_empty());
        assert!(!ids(&proxy.shapes_in_rect(&window, false)).contains(&ShapeId(9)));

        hidden.visible = true;
        let canvas = MockCanvas::with_shapes([hidden]);
        let proxy = SnapProxy::new(&canvas, &filter);
        assert_eq!(proxy.segments_in_rect(&window, false).len(), 1);
    }

    #[test]
    fn test_omit_removes_shapes_with_ignored_points() {
        let canvas = MockCanvas::with_shapes([
            MockShape::polyline(1, &[(0.0, 0.0), (1.0, 0.0)], false),
            MockShape::polyline(2, &[(0.0, 1.0), (1.0, 1.0)], false),
        ]);
        let mut filter = SnapFilter::default();
        filter.ignored_points.insert(PathPointId::new(ShapeId(1), 0, 1));

        let proxy = SnapProxy::new(&canvas, &filter);
        assert_eq!(ids(&proxy.shapes(true)), vec![ShapeId(2)]);
        assert_eq!(ids(&proxy.shapes(false)), vec![ShapeId(1), ShapeId(2)]);
    }

    #[test]
    fn test_points_from_path_skip_ignored() {
        let mut shape = MockShape::polyline(1, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], false);
        shape.transform = Transform2D::translation(10.0, 0.0);
        let canvas = MockCanvas::with_shapes([shape.clone()]);
        let mut filter = SnapFilter::default();
        filter.ignored_points.insert(PathPointId::new(ShapeId(1), 0, 1));

        let proxy = SnapProxy::new(&canvas, &filter);
        let points = proxy.points_from_shape(&shape);
        assert_eq!(points, vec![Point2::new(10.0, 0.0), Point2::new(12.0, 0.0)]);
    }

    #[test]
    fn test_points_from_plain_shape() {
        let mut shape = MockShape::rect(1, (0.0, 0.0), (2.0, 1.0));
        shape.snap_data.snap_points.push(Point2::new(1.0, 0.5));
        let canvas = MockCanvas::with_shapes([shape.clone()]);
        let filter = SnapFilter::default();
        let proxy = SnapProxy::new(&canvas, &filter);

        let points = proxy.points_from_shape(&shape);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], Point2::new(1.0, 0.5));
        assert!(points.contains(&Point2::new(2.0, 1.0)));

        shape.visible = false;
        assert!(proxy.points_from_shape(&shape).is_empty());
    }

    #[test]
    fn test_points_in_rect() {
        let canvas = MockCanvas::with_shapes([MockShape::polyline(1, &[(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)], false)]);
        let filter = SnapFilter::default();
        let proxy = SnapProxy::new(&canvas, &filter);

        let points = proxy.points_in_rect(&BoundingBox2::from_center(Point2::origin(), 2.0), false);
        assert_eq!(points, vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_segments_in_rect_transformed_and_filtered() {
        let mut shape = MockShape::polyline(1, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], false);
        shape.transform = Transform2D::translation(5.0, 5.0);
        let canvas = MockCanvas::with_shapes([shape]);
        let mut filter = SnapFilter::default();
        let window = BoundingBox2::from_center(Point2::new(6.0, 5.5), 1.0);

        let segments = SnapProxy::new(&canvas, &filter).segments_in_rect(&window, false);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].first, Point2::new(5.0, 5.0));

        filter.ignored_points.insert(PathPointId::new(ShapeId(1), 0, 2));
        let segments = SnapProxy::new(&canvas, &filter).segments_in_rect(&window, false);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].second, Point2::new(6.0, 5.0));
    }
}
