//! 矢量编辑器的几何捕捉引擎
//!
//! 在交互编辑（绘制、移动、调整图形）时，把指针位置吸附到附近有意义的几何特征上：
//! 节点、延长线、交点、包围盒、网格、参考线等。
//!
//! # 架构设计
//!
//! - `SnapGuide`: 引擎，持有有序的策略列表并选出胜出结果
//! - `SnapStrategy`: 单个捕捉算法，每种类型一个实现
//! - `SnapProxy`: 策略使用的只读查询代理，负责过滤
//! - `SnapCanvas` / `ShapeManager` / `SnapShape`: 由宿主实现的外部接口
//!
//! # 示例
//!
//! ```rust,ignore
//! use vsnap_core::prelude::*;
//!
//! let mut guide = SnapGuide::new();
//! guide.set_snap_distance(8);
//!
//! // canvas 由宿主实现 SnapCanvas
//! let snapped = guide.snap(&canvas, Point2::new(10.2, 4.9), Modifiers::NONE);
//! ```

pub mod config;
pub mod decoration;
pub mod error;
pub mod guide;
pub mod math;
pub mod path;
pub mod proxy;
pub mod shape;
pub mod strategy;
pub mod transform;

#[cfg(test)]
mod testing;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::config::SnapConfig;
    pub use crate::decoration::{Decoration, DecorationPainter, PathElement, StrokeStyle};
    pub use crate::error::{SnapError, SnapResult};
    pub use crate::guide::{Modifiers, SnapGuide};
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::path::{PathData, PathPointId, PathSegment};
    pub use crate::proxy::SnapProxy;
    pub use crate::shape::{GridSettings, ShapeId, ShapeManager, SnapCanvas, SnapData, SnapShape, ViewConverter};
    pub use crate::strategy::{
        LineOrientation, LineSnapStrategy, PointSnapStrategy, SnapStrategy, SnapStrategyKind, SnapTarget,
        SnappedPosition, StrategyMask,
    };
    pub use crate::transform::Transform2D;
}
