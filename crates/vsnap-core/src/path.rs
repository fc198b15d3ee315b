//! 路径几何
//!
//! 路径由若干子路径组成，每个子路径是一串路径点，可开放或闭合。
//! 相邻路径点之间构成路径段：
//! - 无控制点：直线段
//! - 一个控制点：二次贝塞尔
//! - 两个控制点：三次贝塞尔

use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
use crate::shape::ShapeId;
use crate::transform::Transform2D;
use kurbo::{CubicBez, Line, ParamCurve, ParamCurveDeriv, ParamCurveExtrema, PathSeg, QuadBez};
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

/// 曲线与曲线求交时的初始展平分段数
const FLATTEN_STEPS: usize = 16;

const NEWTON_ITERATIONS: usize = 16;
const NEWTON_TOLERANCE: f64 = 1e-12;

/// 交点去重距离
const DEDUP_TOLERANCE: f64 = 1e-9;

/// 路径点的唯一标识（图形 + 子路径索引 + 点索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathPointId {
    pub shape: ShapeId,
    pub subpath: usize,
    pub index: usize,
}

impl PathPointId {
    pub fn new(shape: ShapeId, subpath: usize, index: usize) -> Self {
        Self {
            shape,
            subpath,
            index,
        }
    }
}

/// 路径点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub point: Point2,
    /// 入方向控制点（与前一个点之间的曲线）
    pub control_point1: Option<Point2>,
    /// 出方向控制点（与后一个点之间的曲线）
    pub control_point2: Option<Point2>,
}

impl PathPoint {
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            control_point1: None,
            control_point2: None,
        }
    }
}

/// 子路径
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subpath {
    pub points: Vec<PathPoint>,
    pub closed: bool,
}

impl Subpath {
    /// 子路径包含的路径段数量
    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }
}

/// 路径数据（图形坐标）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub subpaths: Vec<Subpath>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新的子路径
    pub fn move_to(&mut self, point: Point2) -> &mut Self {
        self.subpaths.push(Subpath {
            points: vec![PathPoint::new(point)],
            closed: false,
        });
        self
    }

    /// 直线连接到指定点
    pub fn line_to(&mut self, point: Point2) -> &mut Self {
        self.current_subpath().points.push(PathPoint::new(point));
        self
    }

    /// 三次贝塞尔连接到指定点
    pub fn curve_to(&mut self, c1: Point2, c2: Point2, point: Point2) -> &mut Self {
        let subpath = self.current_subpath();
        if let Some(last) = subpath.points.last_mut() {
            last.control_point2 = Some(c1);
        }
        subpath.points.push(PathPoint {
            point,
            control_point1: Some(c2),
            control_point2: None,
        });
        self
    }

    /// 闭合当前子路径
    pub fn close(&mut self) -> &mut Self {
        self.current_subpath().closed = true;
        self
    }

    fn current_subpath(&mut self) -> &mut Subpath {
        if self.subpaths.is_empty() {
            // 没有 move_to 时从原点开始
            self.subpaths.push(Subpath {
                points: vec![PathPoint::new(Point2::origin())],
                closed: false,
            });
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    pub fn subpath_count(&self) -> usize {
        self.subpaths.len()
    }

    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_closed_subpath(&self, subpath: usize) -> bool {
        self.subpaths.get(subpath).is_some_and(|s| s.closed)
    }

    pub fn point_by_index(&self, subpath: usize, index: usize) -> Option<&PathPoint> {
        self.subpaths.get(subpath)?.points.get(index)
    }

    /// 遍历所有路径点及其索引
    pub fn points(&self) -> impl Iterator<Item = (usize, usize, &PathPoint)> + '_ {
        self.subpaths.iter().enumerate().flat_map(|(si, subpath)| {
            subpath
                .points
                .iter()
                .enumerate()
                .map(move |(pi, point)| (si, pi, point))
        })
    }

    /// 所有路径段（图形坐标），带有端点的路径点标识
    pub fn segments(&self, shape: ShapeId) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        for (si, subpath) in self.subpaths.iter().enumerate() {
            let n = subpath.points.len();
            for i in 0..subpath.segment_count() {
                let j = (i + 1) % n;
                let a = &subpath.points[i];
                let b = &subpath.points[j];
                let mut segment = PathSegment::from_points(a, b);
                segment.first_id = Some(PathPointId::new(shape, si, i));
                segment.second_id = Some(PathPointId::new(shape, si, j));
                segments.push(segment);
            }
        }
        segments
    }

    /// 与矩形相交的路径段（先比较控制点包围盒，再比较曲线包围盒）
    pub fn segments_at(&self, shape: ShapeId, rect: &BoundingBox2) -> Vec<PathSegment> {
        self.segments(shape)
            .into_iter()
            .filter(|s| s.touches_rect(rect))
            .collect()
    }

    /// 所有路径点的包围盒（含控制点）
    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::empty();
        for (_, _, p) in self.points() {
            bbox.expand_to_include(&p.point);
            for c in p.control_point1.iter().chain(p.control_point2.iter()) {
                bbox.expand_to_include(c);
            }
        }
        bbox
    }
}

/// 路径段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub first: Point2,
    pub second: Point2,
    pub control1: Option<Point2>,
    pub control2: Option<Point2>,
    /// 起点对应的路径点（吸附数据中的独立线段没有）
    pub first_id: Option<PathPointId>,
    pub second_id: Option<PathPointId>,
}

impl PathSegment {
    /// 直线段
    pub fn line(first: Point2, second: Point2) -> Self {
        Self {
            first,
            second,
            control1: None,
            control2: None,
            first_id: None,
            second_id: None,
        }
    }

    /// 三次贝塞尔段
    pub fn cubic(first: Point2, control1: Point2, control2: Point2, second: Point2) -> Self {
        Self {
            control1: Some(control1),
            control2: Some(control2),
            ..Self::line(first, second)
        }
    }

    fn from_points(a: &PathPoint, b: &PathPoint) -> Self {
        Self {
            control1: a.control_point2,
            control2: b.control_point1,
            ..Self::line(a.point, b.point)
        }
    }

    /// 曲线阶数：1 直线，2 二次，3 三次
    pub fn degree(&self) -> usize {
        match (self.control1, self.control2) {
            (Some(_), Some(_)) => 3,
            (Some(_), None) | (None, Some(_)) => 2,
            (None, None) => 1,
        }
    }

    /// 是否引用了指定路径点
    pub fn touches_point(&self, id: &PathPointId) -> bool {
        self.first_id.as_ref() == Some(id) || self.second_id.as_ref() == Some(id)
    }

    /// 对应的 kurbo 曲线段
    pub fn to_path_seg(&self) -> PathSeg {
        let p0 = to_kurbo(self.first);
        let p3 = to_kurbo(self.second);
        match (self.control1, self.control2) {
            (Some(c1), Some(c2)) => PathSeg::Cubic(CubicBez::new(p0, to_kurbo(c1), to_kurbo(c2), p3)),
            (Some(c), None) | (None, Some(c)) => PathSeg::Quad(QuadBez::new(p0, to_kurbo(c), p3)),
            (None, None) => PathSeg::Line(Line::new(p0, p3)),
        }
    }

    /// 参数 t ∈ [0, 1] 处的点
    pub fn point_at(&self, t: f64) -> Point2 {
        from_kurbo(self.to_path_seg().eval(t))
    }

    /// 控制点多边形的包围盒
    pub fn control_point_rect(&self) -> BoundingBox2 {
        BoundingBox2::from_points(
            [Some(self.first), self.control1, self.control2, Some(self.second)]
                .into_iter()
                .flatten(),
        )
    }

    /// 曲线的精确包围盒
    pub fn bounding_rect(&self) -> BoundingBox2 {
        let rect = self.to_path_seg().bounding_box();
        BoundingBox2::new(Point2::new(rect.x0, rect.y0), Point2::new(rect.x1, rect.y1))
    }

    /// 与矩形相交或包含矩形
    pub fn touches_rect(&self, rect: &BoundingBox2) -> bool {
        let control = self.control_point_rect();
        if !rect.intersects(&control) && !control.contains_box(rect) {
            return false;
        }
        let bound = self.bounding_rect();
        rect.intersects(&bound) || bound.contains_box(rect)
    }

    /// 应用变换（路径点标识保持不变）
    pub fn mapped(&self, transform: &Transform2D) -> PathSegment {
        PathSegment {
            first: transform.map_point(&self.first),
            second: transform.map_point(&self.second),
            control1: self.control1.map(|c| transform.map_point(&c)),
            control2: self.control2.map(|c| transform.map_point(&c)),
            ..*self
        }
    }

    /// 与另一路径段的交点
    ///
    /// 直线与直线、直线与曲线精确求交；曲线与曲线先展平定位，再用牛顿迭代收敛到曲线上。
    /// 平行（含共线）不产生交点。
    pub fn intersections(&self, other: &PathSegment) -> Vec<Point2> {
        let hits = match (self.degree(), other.degree()) {
            (1, 1) => line_line_intersection(self.first, self.second, other.first, other.second)
                .into_iter()
                .collect(),
            (1, _) => curve_line_intersections(other, self.first, self.second),
            (_, 1) => curve_line_intersections(self, other.first, other.second),
            _ => curve_curve_intersections(self, other),
        };

        let mut result: Vec<Point2> = Vec::new();
        for p in hits {
            // 相邻小段共享端点，同一交点可能被找到两次
            if !result.iter().any(|q| (q - p).norm() < DEDUP_TOLERANCE) {
                result.push(p);
            }
        }
        result
    }
}

fn to_kurbo(p: Point2) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

fn from_kurbo(p: kurbo::Point) -> Point2 {
    Point2::new(p.x, p.y)
}

/// 参数 t 处的一阶导数
fn derivative_at(seg: &PathSeg, t: f64) -> Vector2 {
    let d = match seg {
        PathSeg::Line(line) => line.p1 - line.p0,
        PathSeg::Quad(quad) => quad.deriv().eval(t).to_vec2(),
        PathSeg::Cubic(cubic) => cubic.deriv().eval(t).to_vec2(),
    };
    Vector2::new(d.x, d.y)
}

fn curve_line_intersections(curve: &PathSegment, line_start: Point2, line_end: Point2) -> Vec<Point2> {
    let seg = curve.to_path_seg();
    seg.intersect_line(Line::new(to_kurbo(line_start), to_kurbo(line_end)))
        .iter()
        .map(|hit| from_kurbo(seg.eval(hit.segment_t)))
        .collect()
}

/// 展平后的折线（参数，点）
fn flatten(seg: &PathSeg) -> Vec<(f64, Point2)> {
    (0..=FLATTEN_STEPS)
        .map(|i| {
            let t = i as f64 / FLATTEN_STEPS as f64;
            (t, from_kurbo(seg.eval(t)))
        })
        .collect()
}

fn curve_curve_intersections(a: &PathSegment, b: &PathSegment) -> Vec<Point2> {
    let seg_a = a.to_path_seg();
    let seg_b = b.to_path_seg();
    let flat_a = flatten(&seg_a);
    let flat_b = flatten(&seg_b);

    let mut result = Vec::new();
    for pa in flat_a.windows(2) {
        for pb in flat_b.windows(2) {
            let Some((s, u)) = line_line_params(pa[0].1, pa[1].1, pb[0].1, pb[1].1) else {
                continue;
            };
            let ta = pa[0].0 + (pa[1].0 - pa[0].0) * s;
            let tb = pb[0].0 + (pb[1].0 - pb[0].0) * u;
            let approx = pa[0].1 + (pa[1].1 - pa[0].1) * s;
            result.push(refine_intersection(&seg_a, &seg_b, ta, tb).unwrap_or(approx));
        }
    }
    result
}

/// 牛顿迭代求解 A(ta) = B(tb)；不收敛时返回 `None`
fn refine_intersection(a: &PathSeg, b: &PathSeg, mut ta: f64, mut tb: f64) -> Option<Point2> {
    for _ in 0..NEWTON_ITERATIONS {
        let pa = from_kurbo(a.eval(ta));
        let residual = pa - from_kurbo(b.eval(tb));
        if residual.norm() < NEWTON_TOLERANCE {
            return Some(pa);
        }
        let da = derivative_at(a, ta);
        let db = derivative_at(b, tb);
        let jacobian = Matrix2::new(da.x, -db.x, da.y, -db.y);
        let step = jacobian.try_inverse()? * -residual;
        ta = (ta + step.x).clamp(0.0, 1.0);
        tb = (tb + step.y).clamp(0.0, 1.0);
    }
    let pa = from_kurbo(a.eval(ta));
    ((pa - from_kurbo(b.eval(tb))).norm() < NEWTON_TOLERANCE).then_some(pa)
}

/// 两条有界线段交点在各自线段上的参数
fn line_line_params(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> Option<(f64, f64)> {
    let d1: Vector2 = a2 - a1;
    let d2: Vector2 = b2 - b1;

    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < EPSILON {
        return None;
    }

    let d = b1 - a1;
    let t1 = (d.x * d2.y - d.y * d2.x) / cross;
    let t2 = (d.x * d1.y - d.y * d1.x) / cross;

    ((0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2)).then_some((t1, t2))
}

/// 两条有界线段的交点
pub fn line_line_intersection(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> Option<Point2> {
    line_line_params(a1, a2, b1, b2).map(|(t1, _)| a1 + (a2 - a1) * t1)
}
