//! 测试用的图形、图形集合与画布

use crate::math::{BoundingBox2, Point2};
use crate::path::PathData;
use crate::shape::{GridSettings, ShapeId, ShapeManager, SnapCanvas, SnapData, SnapShape, ViewConverter, ZoomConverter};
use crate::transform::Transform2D;

#[derive(Debug, Clone)]
pub struct MockShape {
    pub id: ShapeId,
    pub visible: bool,
    pub layer: bool,
    pub transform: Transform2D,
    pub snap_data: SnapData,
    pub path: Option<PathData>,
    /// 显式指定的包围盒，未指定时由几何推算
    pub bounds: Option<BoundingBox2>,
}

impl MockShape {
    pub fn new(id: u64) -> Self {
        Self {
            id: ShapeId(id),
            visible: true,
            layer: false,
            transform: Transform2D::identity(),
            snap_data: SnapData::new(),
            path: None,
            bounds: None,
        }
    }

    /// 只带额外捕捉点的非路径图形
    pub fn with_points(id: u64, points: impl IntoIterator<Item = Point2>) -> Self {
        Self {
            snap_data: SnapData::with_points(points),
            ..Self::new(id)
        }
    }

    /// 折线路径图形
    pub fn polyline(id: u64, points: &[(f64, f64)], closed: bool) -> Self {
        let mut path = PathData::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(Point2::new(x, y));
            } else {
                path.line_to(Point2::new(x, y));
            }
        }
        if closed {
            path.close();
        }
        Self::with_path(id, path)
    }

    pub fn with_path(id: u64, path: PathData) -> Self {
        Self {
            path: Some(path),
            ..Self::new(id)
        }
    }

    /// 只有包围盒的非路径图形
    pub fn rect(id: u64, min: (f64, f64), max: (f64, f64)) -> Self {
        Self {
            bounds: Some(BoundingBox2::new(Point2::new(min.0, min.1), Point2::new(max.0, max.1))),
            ..Self::new(id)
        }
    }
}

impl SnapShape for MockShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_layer(&self) -> bool {
        self.layer
    }

    fn bounding_rect(&self) -> BoundingBox2 {
        if let Some(bounds) = self.bounds {
            return bounds;
        }
        let local = match &self.path {
            Some(path) => path.bounding_box(),
            None => BoundingBox2::from_points(self.snap_data.snap_points.iter().copied()),
        };
        self.transform.map_rect(&local)
    }

    fn absolute_transform(&self) -> Transform2D {
        self.transform
    }

    fn snap_data(&self) -> &SnapData {
        &self.snap_data
    }

    fn path(&self) -> Option<&PathData> {
        self.path.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct MockShapeManager {
    pub shapes: Vec<MockShape>,
}

impl MockShapeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: MockShape) {
        self.shapes.push(shape);
    }
}

impl ShapeManager for MockShapeManager {
    fn shapes(&self) -> Vec<&dyn SnapShape> {
        self.shapes.iter().map(|s| s as &dyn SnapShape).collect()
    }
}

#[derive(Debug, Default)]
pub struct MockCanvas {
    pub manager: MockShapeManager,
    pub converter: ZoomConverter,
    pub grid: Option<GridSettings>,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shapes(shapes: impl IntoIterator<Item = MockShape>) -> Self {
        let mut canvas = Self::new();
        for shape in shapes {
            canvas.manager.add(shape);
        }
        canvas
    }
}

impl SnapCanvas for MockCanvas {
    fn shape_manager(&self) -> &dyn ShapeManager {
        &self.manager
    }

    fn view_converter(&self) -> &dyn ViewConverter {
        &self.converter
    }

    fn grid(&self) -> Option<GridSettings> {
        self.grid
    }
}
