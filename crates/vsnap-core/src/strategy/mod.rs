//! 捕捉策略
//!
//! 每种策略是一个独立的算法：给定鼠标位置和查询代理，最多给出一个捕捉点，
//! 并附带一条提示路径说明它捕捉到了什么。
//!
//! 内置策略：
//! - 正交 (Orthogonal)：与其它点水平/垂直对齐
//! - 节点 (Node)：最近的图形点
//! - 延长线 (Extension)：开放路径端点的延长线
//! - 交点 (Intersection)：鼠标附近路径段的交点
//! - 网格 (Grid)
//! - 包围盒 (BoundingBox)：包围盒的角点、中心和边
//!
//! 另有两种由宿主填充数据的策略：点集 (`PointSnapStrategy`) 和
//! 参考线 (`LineSnapStrategy`)。

mod bounding_box;
mod extension;
mod grid;
mod intersection;
mod line_guide;
mod node;
mod orthogonal;
mod point_set;

pub use bounding_box::{square_distance_to_line, BoundingBoxSnapStrategy};
pub use extension::{project, ExtensionSnapStrategy};
pub use grid::GridSnapStrategy;
pub use intersection::IntersectionSnapStrategy;
pub use line_guide::{LineOrientation, LineSnapStrategy};
pub use node::NodeSnapStrategy;
pub use orthogonal::OrthogonalSnapStrategy;
pub use point_set::PointSnapStrategy;

use crate::decoration::Decoration;
use crate::math::Point2;
use crate::proxy::SnapProxy;
use crate::shape::ViewConverter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapStrategyKind {
    Orthogonal,
    Node,
    Extension,
    Intersection,
    Grid,
    BoundingBox,
    GuideLine,
    DocumentBounds,
    DocumentCenter,
    /// 宿主添加的自定义策略，允许同时存在多个
    Custom,
    PointSnap,
}

impl SnapStrategyKind {
    pub const ALL: [SnapStrategyKind; 11] = [
        SnapStrategyKind::Orthogonal,
        SnapStrategyKind::Node,
        SnapStrategyKind::Extension,
        SnapStrategyKind::Intersection,
        SnapStrategyKind::Grid,
        SnapStrategyKind::BoundingBox,
        SnapStrategyKind::GuideLine,
        SnapStrategyKind::DocumentBounds,
        SnapStrategyKind::DocumentCenter,
        SnapStrategyKind::Custom,
        SnapStrategyKind::PointSnap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SnapStrategyKind::Orthogonal => "Orthogonal",
            SnapStrategyKind::Node => "Node",
            SnapStrategyKind::Extension => "Extension",
            SnapStrategyKind::Intersection => "Intersection",
            SnapStrategyKind::Grid => "Grid",
            SnapStrategyKind::BoundingBox => "Bounding Box",
            SnapStrategyKind::GuideLine => "Guide Line",
            SnapStrategyKind::DocumentBounds => "Document Bounds",
            SnapStrategyKind::DocumentCenter => "Document Center",
            SnapStrategyKind::Custom => "Custom",
            SnapStrategyKind::PointSnap => "Point",
        }
    }

    /// 对应的掩码位
    pub fn bit(&self) -> u16 {
        match self {
            SnapStrategyKind::Orthogonal => StrategyMask::ORTHOGONAL,
            SnapStrategyKind::Node => StrategyMask::NODE,
            SnapStrategyKind::Extension => StrategyMask::EXTENSION,
            SnapStrategyKind::Intersection => StrategyMask::INTERSECTION,
            SnapStrategyKind::Grid => StrategyMask::GRID,
            SnapStrategyKind::BoundingBox => StrategyMask::BOUNDING_BOX,
            SnapStrategyKind::GuideLine => StrategyMask::GUIDE_LINE,
            SnapStrategyKind::DocumentBounds => StrategyMask::DOCUMENT_BOUNDS,
            SnapStrategyKind::DocumentCenter => StrategyMask::DOCUMENT_CENTER,
            SnapStrategyKind::Custom => StrategyMask::CUSTOM,
            SnapStrategyKind::PointSnap => StrategyMask::POINT_SNAP,
        }
    }

    /// 不受启用掩码控制、总是参与计算的策略
    pub fn is_always_on(&self) -> bool {
        matches!(self, SnapStrategyKind::Grid | SnapStrategyKind::Custom)
    }
}

impl fmt::Display for SnapStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 策略掩码（位域，用于成组启用/禁用策略）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyMask {
    bits: u16,
}

impl StrategyMask {
    pub const ORTHOGONAL: u16 = 1 << 0;
    pub const NODE: u16 = 1 << 1;
    pub const EXTENSION: u16 = 1 << 2;
    pub const INTERSECTION: u16 = 1 << 3;
    pub const GRID: u16 = 1 << 4;
    pub const BOUNDING_BOX: u16 = 1 << 5;
    pub const GUIDE_LINE: u16 = 1 << 6;
    pub const DOCUMENT_BOUNDS: u16 = 1 << 7;
    pub const DOCUMENT_CENTER: u16 = 1 << 8;
    pub const CUSTOM: u16 = 1 << 9;
    pub const POINT_SNAP: u16 = 1 << 10;

    pub const NONE: StrategyMask = StrategyMask { bits: 0 };
    pub const ALL: StrategyMask = StrategyMask { bits: (1 << 11) - 1 };

    pub fn new(bits: u16) -> Self {
        Self { bits }
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = SnapStrategyKind>) -> Self {
        let mut mask = Self::NONE;
        for kind in kinds {
            mask.set(kind, true);
        }
        mask
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn is_enabled(&self, kind: SnapStrategyKind) -> bool {
        self.bits & kind.bit() != 0
    }

    pub fn set(&mut self, kind: SnapStrategyKind, enabled: bool) {
        if enabled {
            self.bits |= kind.bit();
        } else {
            self.bits &= !kind.bit();
        }
    }

    pub fn toggle(&mut self, kind: SnapStrategyKind) {
        let enabled = self.is_enabled(kind);
        self.set(kind, !enabled);
    }

    /// 已启用的策略类型
    pub fn kinds(&self) -> Vec<SnapStrategyKind> {
        SnapStrategyKind::ALL
            .into_iter()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}

impl Default for StrategyMask {
    fn default() -> Self {
        Self {
            bits: Self::ORTHOGONAL | Self::NODE | Self::EXTENSION | Self::INTERSECTION | Self::BOUNDING_BOX,
        }
    }
}

/// 捕捉到的是点还是线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapTarget {
    #[default]
    ToPoint,
    ToLine,
}

/// 策略最近一次成功捕捉的结果
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnappedPosition {
    pub position: Point2,
    pub target: SnapTarget,
}

impl SnappedPosition {
    pub fn new(position: Point2, target: SnapTarget) -> Self {
        Self { position, target }
    }
}

/// 捕捉策略
///
/// `snap` 返回是否找到候选点。失败时不得修改之前记录的捕捉位置和提示图形，
/// 调用方只能根据返回值判断结果是否有效。
///
/// `max_snap_distance` 为文档单位且非负；所有比较都使用严格小于，
/// 因此距离为 0 时任何策略都不会捕捉。
pub trait SnapStrategy: fmt::Debug {
    fn kind(&self) -> SnapStrategyKind;

    fn snap(&mut self, mouse_position: Point2, proxy: &SnapProxy<'_>, max_snap_distance: f64) -> bool;

    /// 最近一次成功捕捉的位置与类型
    fn snapped(&self) -> SnappedPosition;

    fn snapped_position(&self) -> Point2 {
        self.snapped().position
    }

    /// 最近一次成功捕捉的提示图形
    fn decoration(&self, converter: &dyn ViewConverter) -> Decoration;
}

/// 按默认顺序创建全部内置策略
pub fn create_builtin_strategies() -> Vec<Box<dyn SnapStrategy>> {
    vec![
        Box::new(GridSnapStrategy::new()),
        Box::new(OrthogonalSnapStrategy::new()),
        Box::new(NodeSnapStrategy::new()),
        Box::new(ExtensionSnapStrategy::new()),
        Box::new(IntersectionSnapStrategy::new()),
        Box::new(BoundingBoxSnapStrategy::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_mask() {
        let mut mask = StrategyMask::default();
        assert!(mask.is_enabled(SnapStrategyKind::Node));
        assert!(mask.is_enabled(SnapStrategyKind::BoundingBox));
        assert!(!mask.is_enabled(SnapStrategyKind::Grid));

        mask.set(SnapStrategyKind::GuideLine, true);
        assert!(mask.is_enabled(SnapStrategyKind::GuideLine));

        mask.toggle(SnapStrategyKind::Node);
        assert!(!mask.is_enabled(SnapStrategyKind::Node));
    }

    #[test]
    fn test_mask_bits_are_distinct() {
        let all = StrategyMask::from_kinds(SnapStrategyKind::ALL);
        assert_eq!(all, StrategyMask::ALL);
        assert_eq!(all.kinds().len(), SnapStrategyKind::ALL.len());
        assert!(StrategyMask::NONE.kinds().is_empty());
    }

    #[test]
    fn test_builtin_order() {
        let kinds: Vec<_> = create_builtin_strategies().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SnapStrategyKind::Grid,
                SnapStrategyKind::Orthogonal,
                SnapStrategyKind::Node,
                SnapStrategyKind::Extension,
                SnapStrategyKind::Intersection,
                SnapStrategyKind::BoundingBox,
            ]
        );
    }
}
