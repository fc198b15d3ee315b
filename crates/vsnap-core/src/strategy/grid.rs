//! 网格捕捉
//!
//! 两个轴各自捕捉到最近的网格线：`offset + k * spacing`。

use super::{SnapStrategy, SnapStrategyKind, SnapTarget, SnappedPosition};
use crate::decoration::{marker_half_size, Decoration};
use crate::math::Point2;
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;

/// 浮点除法误差补偿，避免 127 - 5e-15 被截断成 126
const DIVISION_FUDGE: f64 = 1e-10;

#[derive(Debug, Clone, Default)]
pub struct GridSnapStrategy {
    snapped: SnappedPosition,
}

impl GridSnapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 最近网格线的位置及其距离；间距非正时返回 `None`
fn nearest_grid_line(value: f64, offset: f64, spacing: f64) -> Option<(f64, f64)> {
    if spacing <= 0.0 || !spacing.is_finite() {
        return None;
    }
    let index = ((value - offset) / spacing + DIVISION_FUDGE).floor();
    let line = offset + index * spacing;
    let next_line = offset + (index + 1.0) * spacing;

    let dist = (line - value).abs();
    let next_dist = (next_line - value).abs();
    // 距离相等时取较小的那条
    if dist > next_dist {
        Some((next_line, next_dist))
    } else {
        Some((line, dist))
    }
}

impl SnapStrategy for GridSnapStrategy {
    fn kind(&self) -> SnapStrategyKind {
        SnapStrategyKind::Grid
    }

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool {
        debug_assert!(max_snap_distance.is_finite());
        let Some(grid) = proxy.grid() else {
            return false;
        };
        let max_distance = max_snap_distance * max_snap_distance;

        let within = |line: Option<(f64, f64)>| line.filter(|(_, dist)| dist * dist < max_distance);
        let x = within(nearest_grid_line(mouse_position.x, grid.offset.x, grid.spacing.x));
        let y = within(nearest_grid_line(mouse_position.y, grid.offset.y, grid.spacing.y));

        let target = match (x, y) {
            (None, None) => return false,
            // 两个轴都命中即网格交点
            (Some(_), Some(_)) => SnapTarget::ToPoint,
            _ => SnapTarget::ToLine,
        };
        let snapped_point = Point2::new(
            x.map_or(mouse_position.x, |(line, _)| line),
            y.map_or(mouse_position.y, |(line, _)| line),
        );
        self.snapped = SnappedPosition::new(snapped_point, target);
        true
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
