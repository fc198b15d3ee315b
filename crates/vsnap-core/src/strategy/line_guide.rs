//! 参考线捕捉
//!
//! 捕捉到宿主提供的水平线（y 值）和竖直线（x 值），两个轴独立。
//! 同一实现用于辅助线、文档边界和文档中心，由类型区分。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::{marker_half_size, Decoration};
use crate::math::{BoundingBox2, Point2};
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

/// 参考线方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrientation {
    /// 水平线，位置为 y
    Horizontal,
    /// 竖直线，位置为 x
    Vertical,
}

#[derive(Debug, Clone)]
pub struct LineSnapStrategy {
    kind: SnapStrategyKind,
    horizontal_lines: Vec<f64>,
    vertical_lines: Vec<f64>,
    snapped: SnappedPosition,
    snapped_horizontal: bool,
    snapped_vertical: bool,
}

impl LineSnapStrategy {
    pub fn new(kind: SnapStrategyKind) -> Self {
        Self {
            kind,
            horizontal_lines: Vec::new(),
            vertical_lines: Vec::new(),
            snapped: SnappedPosition::default(),
            snapped_horizontal: false,
            snapped_vertical: false,
        }
    }

    /// 文档四条边
    pub fn document_bounds(bounds: &BoundingBox2) -> Self {
        let mut strategy = Self::new(SnapStrategyKind::DocumentBounds);
        strategy.add_line(LineOrientation::Horizontal, bounds.min.y);
        strategy.add_line(LineOrientation::Horizontal, bounds.max.y);
        strategy.add_line(LineOrientation::Vertical, bounds.min.x);
        strategy.add_line(LineOrientation::Vertical, bounds.max.x);
        strategy
    }

    /// 文档中心的十字线
    pub fn document_center(bounds: &BoundingBox2) -> Self {
        let center = bounds.center();
        let mut strategy = Self::new(SnapStrategyKind::DocumentCenter);
        strategy.add_line(LineOrientation::Horizontal, center.y);
        strategy.add_line(LineOrientation::Vertical, center.x);
        strategy
    }

    pub fn add_line(&mut self, orientation: LineOrientation, position: f64) {
        match orientation {
            LineOrientation::Horizontal => self.horizontal_lines.push(position),
            LineOrientation::Vertical => self.vertical_lines.push(position),
        }
    }

    pub fn set_horizontal_lines(&mut self, lines: Vec<f64>) {
        self.horizontal_lines = lines;
    }

    pub fn set_vertical_lines(&mut self, lines: Vec<f64>) {
        self.vertical_lines = lines;
    }

    pub fn horizontal_lines(&self) -> &[f64] {
        &self.horizontal_lines
    }

    pub fn vertical_lines(&self) -> &[f64] {
        &self.vertical_lines
    }
}

/// 与 `value` 最接近且距离小于 `max` 的线
fn nearest_line(lines: &[f64], value: f64, max: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &line in lines {
        let dist = (value - line).abs();
        if dist < max && best.is_none_or(|(min, _)| dist < min) {
            best = Some((dist, line));
        }
    }
    best.map(|(_, line)| line)
}

impl SnapStrategy for LineSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        self.kind
    }

    fn snap(&mut self, mouse_position: Point2, _proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());

        let y = nearest_line(&self.horizontal_lines, mouse_position.y, max_snap_distance);
        let x = nearest_line(&self.vertical_lines, mouse_position.x, max_snap_distance);
        if x.is_none() && y.is_none() {
            return false;
        }

        let snapped_point = Point2::new(x.unwrap_or(mouse_position.x), y.unwrap_or(mouse_position.y));
        self.snapped_horizontal = y.is_some();
        self.snapped_vertical = x.is_some();
        // 两条线都命中即交点
        let target = if x.is_some() && y.is_some() {
            SnapTarget::ToPoint
        } else {
            SnapTarget::ToLine
        };
        self.snapped = SnappedPosition::new(snapped_point, target);
        true
    }

    fn snapped(&self) -> SnappedPosition {
        self.snapped
    }

    fn decoration(&self, converter: &dyn ViewConverter) -> Decoration {
        let half = marker_half_size(converter);
        let mut decoration = Decoration::new();
        if self.snapped_horizontal {
            decoration.add_horizontal_tick(self.snapped.position, half.x);
        }
        if self.snapped_vertical {
            decoration.add_vertical_tick(self.snapped.position, half.y);
        }
        decoration
    }
}
