//! 延长线捕捉
//!
//! 开放子路径的首尾两个端点沿切线方向向外延伸。鼠标投影到延长线上，
//! 只接受向前的投影（不会退回路径内部）。
//!
//! 记录最近的两条延长线；若两者在捕捉范围内恰好有一个交点，则优先捕捉到该交点。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::Decoration;
use crate::math::{scalar_product, square_distance, Point2, Vector2, EPSILON};
use crate::path::{PathSegment, Subpath};
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;
use crate::transform::Transform2D;

/// 某个端点的延长线候选
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    snapped: Point2,
    start: Point2,
}

#[derive(Debug, Clone, Default)]
pub struct ExtensionSnapStrategy {
    snapped: SnappedPosition,
    lines: Vec<(Point2, Point2)>,
}

impl ExtensionSnapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 将 `point` 投影到直线 `line_start -> line_end` 上
///
/// 返回参数 t，投影点为 `line_start + t * (line_end - line_start)`。
/// 直线退化为点时返回 0。
pub fn project(line_start: Point2, line_end: Point2, point: Point2) -> f64 {
    let diff = line_end - line_start;
    let diff_length = diff.norm();
    if diff_length == 0.0 {
        return 0.0;
    }
    let rel_point = point - line_start;
    scalar_product(&rel_point, &(diff / diff_length)) / diff_length
}

/// 端点的延长方向（文档坐标，指向路径外侧）
///
/// 有控制点时使用控制点切线，否则使用与相邻点的连线。方向为零时返回 `None`。
fn extension_direction(subpath: &Subpath, index: usize, transform: &Transform2D) -> Option<Vector2> {
    let point = subpath.points.get(index)?;
    let origin = transform.map_point(&point.point);

    let toward = if index == 0 {
        match point.control_point2 {
            Some(c) => c,
            None => {
                let next = subpath.points.get(1)?;
                next.control_point1.unwrap_or(next.point)
            }
        }
    } else {
        match point.control_point1 {
            Some(c) => c,
            None => {
                let prev = subpath.points.get(index - 1)?;
                prev.control_point2.unwrap_or(prev.point)
            }
        }
    };

    let direction = origin - transform.map_point(&toward);
    (direction.norm() > EPSILON).then_some(direction)
}

/// 鼠标在端点延长线上的投影
fn snap_to_extension(
    position: Point2,
    subpath: &Subpath,
    index: usize,
    transform: &Transform2D,
) -> Option<(Point2, Point2)> {
    let direction = extension_direction(subpath, index, transform)?;
    let start = transform.map_point(&subpath.points[index].point);
    let t = project(start, start + direction, position);
    if t < 0.0 {
        return None;
    }
    Some((start, start + direction * t))
}

impl SnapStrategy for ExtensionSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        SnapStrategyKind::Extension
    }

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());
        let max_distance = max_snap_distance * max_snap_distance;

        // best[0] 最近，best[1] 次近
        let mut best: [Option<Candidate>; 2] = [None, None];

        for shape in proxy.shapes(true) {
            let Some(path) = shape.path() else {
                continue;
            };
            let transform = shape.absolute_transform();

            for subpath in &path.subpaths {
                if subpath.closed || subpath.points.is_empty() {
                    continue;
                }
                let last = subpath.points.len() - 1;
                for index in [0, last] {
                    let Some((start, snapped)) = snap_to_extension(mouse_position, subpath, index, &transform)
                    else {
                        continue;
                    };
                    let distance = square_distance(&snapped, &mouse_position);
                    if distance >= max_distance {
                        continue;
                    }
                    let candidate = Candidate {
                        distance,
                        snapped,
                        start,
                    };
                    if best[0].is_none_or(|b| distance < b.distance) {
                        best[1] = best[0];
                        best[0] = Some(candidate);
                    } else if best[1].is_none_or(|b| distance < b.distance) {
                        best[1] = Some(candidate);
                    }
                }
            }
        }

        let (position, lines) = match best {
            [Some(first), Some(second)] => {
                // 两条延长线（各自延伸到捕捉位置的两倍远）的交点
                let s1 = PathSegment::line(first.start, first.snapped + (first.snapped - first.start));
                let s2 = PathSegment::line(second.start, second.snapped + (second.snapped - second.start));
                let isects = s1.intersections(&s2);
                if isects.len() == 1 && square_distance(&isects[0], &mouse_position) < max_distance {
                    let crossing = isects[0];
                    (crossing, vec![(first.start, crossing), (second.start, crossing)])
                } else {
                    (first.snapped, vec![(first.start, first.snapped)])
                }
            }
            [Some(only), None] | [None, Some(only)] => (only.snapped, vec![(only.start, only.snapped)]),
            [None, None] => return false,
        };

        self.lines = lines;
        self.snapped = SnappedPosition::new(position, SnapTarget::ToLine);
        true
    }

    fn snapped(&self) -> SnappedPosition {
        self.snapped
    }

    fn decoration(&self, _converter: &dyn ViewConverter) -> Decoration {
        let mut decoration = Decoration::new();
        for (from, to) in &self.lines {
            decoration.add_line(*from, *to);
        }
        decoration
    }
}
