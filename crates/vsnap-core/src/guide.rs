//! 捕捉引擎
//!
//! `SnapGuide` 持有一组有序的捕捉策略，每次指针事件调用 `snap`：
//! 1. 清除上一次的胜出策略
//! 2. 未启用或按下了旁路修饰键时原样返回
//! 3. 把捕捉距离（像素）换算为文档单位
//! 4. 依次调用已启用的策略（Grid 与 Custom 总是参与）
//! 5. 距离鼠标最近的结果胜出，距离相等时先求值的策略胜出
//!
//! 引擎是单线程同步的；`&mut self` 保证不会重入。

use crate::config::SnapConfig;
use crate::decoration::{Color, Decoration, DecorationPainter, LineStyle, StrokeStyle};
use crate::error::{SnapError, SnapResult};
use crate::math::{square_distance, BoundingBox2, Point2, Vector2};
use crate::path::PathPointId;
use crate::proxy::{SnapFilter, SnapProxy};
use crate::shape::{ShapeId, SnapCanvas, SnapShape, ViewConverter};
use crate::strategy::{create_builtin_strategies, SnapStrategy, SnapStrategyKind, SnapTarget, StrategyMask};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// 提示图形重绘区域的外扩量（文档单位）
const DECORATION_MARGIN: f64 = 2.0;

/// 键盘修饰键（位域）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers { bits: 1 << 0 };
    pub const CONTROL: Modifiers = Modifiers { bits: 1 << 1 };
    pub const ALT: Modifiers = Modifiers { bits: 1 << 2 };
    pub const META: Modifiers = Modifiers { bits: 1 << 3 };

    pub const NONE: Modifiers = Modifiers { bits: 0 };

    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers {
            bits: self.bits | other.bits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// 是否至少包含 `other` 中的一个键
    pub fn intersects(&self, other: Modifiers) -> bool {
        self.bits & other.bits != 0
    }

    pub fn contains(&self, other: Modifiers) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.union(rhs)
    }
}

/// 捕捉引擎
#[derive(Debug)]
pub struct SnapGuide {
    active: bool,
    snap_distance: u32,
    enabled: StrategyMask,
    /// 按下其中任一键时跳过捕捉
    bypass_modifiers: Modifiers,
    filter: SnapFilter,
    strategies: Vec<Box<dyn SnapStrategy>>,
    /// 最近一次 `snap` 的胜出策略在 `strategies` 中的下标
    current_winner: Option<usize>,
}

impl SnapGuide {
    pub fn new() -> Self {
        Self::with_config(SnapConfig::default())
    }

    pub fn with_config(config: SnapConfig) -> Self {
        Self {
            active: config.active,
            snap_distance: config.snap_distance,
            enabled: config.enabled_strategies,
            bypass_modifiers: Modifiers::SHIFT,
            filter: SnapFilter::default(),
            strategies: create_builtin_strategies(),
            current_winner: None,
        }
    }

    /// 应用配置（不影响策略列表和过滤条件）
    pub fn apply_config(&mut self, config: &SnapConfig) {
        self.active = config.active;
        self.snap_distance = config.snap_distance;
        self.enabled = config.enabled_strategies;
    }

    pub fn config(&self) -> SnapConfig {
        SnapConfig {
            active: self.active,
            snap_distance: self.snap_distance,
            enabled_strategies: self.enabled,
        }
    }

    pub fn enable_snapping(&mut self, on: bool) {
        self.active = on;
    }

    pub fn is_snapping(&self) -> bool {
        self.active
    }

    /// 设置捕捉距离（屏幕像素）
    pub fn set_snap_distance(&mut self, pixels: u32) {
        self.snap_distance = pixels;
    }

    pub fn snap_distance(&self) -> u32 {
        self.snap_distance
    }

    pub fn enable_snap_strategies(&mut self, mask: StrategyMask) {
        self.enabled = mask;
    }

    pub fn enabled_snap_strategies(&self) -> StrategyMask {
        self.enabled
    }

    pub fn enable_snap_strategy(&mut self, kind: SnapStrategyKind, on: bool) {
        self.enabled.set(kind, on);
    }

    pub fn is_strategy_enabled(&self, kind: SnapStrategyKind) -> bool {
        self.enabled.is_enabled(kind)
    }

    pub fn set_bypass_modifiers(&mut self, modifiers: Modifiers) {
        self.bypass_modifiers = modifiers;
    }

    pub fn bypass_modifiers(&self) -> Modifiers {
        self.bypass_modifiers
    }

    /// 设置不参与捕捉的图形；传入空集合即清除
    pub fn set_ignored_shapes(&mut self, shapes: impl IntoIterator<Item = ShapeId>) {
        self.filter.ignored_shapes = shapes.into_iter().collect();
    }

    pub fn ignored_shapes(&self) -> &HashSet<ShapeId> {
        &self.filter.ignored_shapes
    }

    /// 设置不参与捕捉的路径点（通常是正在拖动的点）；传入空集合即清除
    pub fn set_ignored_path_points(&mut self, points: impl IntoIterator<Item = PathPointId>) {
        self.filter.ignored_points = points.into_iter().collect();
    }

    pub fn ignored_path_points(&self) -> &HashSet<PathPointId> {
        &self.filter.ignored_points
    }

    /// 设置尚未加入文档但仍参与捕捉的图形
    pub fn set_additional_edited_shape(&mut self, shape: Option<Rc<dyn SnapShape>>) {
        self.filter.additional_edited_shape = shape;
    }

    pub fn additional_edited_shape(&self) -> Option<&dyn SnapShape> {
        self.filter.additional_edited_shape.as_deref()
    }

    /// 捕捉鼠标位置，未捕捉时原样返回
    pub fn snap(&mut self, canvas: &dyn SnapCanvas, mouse_position: Point2, modifiers: Modifiers) -> Point2 {
        self.current_winner = None;

        if !self.active || modifiers.intersects(self.bypass_modifiers) {
            return mouse_position;
        }

        let pixels = f64::from(self.snap_distance);
        let max_snap_distance = canvas
            .view_converter()
            .view_to_document(Vector2::new(pixels, pixels))
            .x;

        let proxy = SnapProxy::new(canvas, &self.filter);
        let mut best: Option<(usize, f64)> = None;

        for (index, strategy) in self.strategies.iter_mut().enumerate() {
            let kind = strategy.kind();
            if !(self.enabled.is_enabled(kind) || kind.is_always_on()) {
                continue;
            }
            if !strategy.snap(mouse_position, &proxy, max_snap_distance) {
                trace!("{} found no candidate", kind);
                continue;
            }

            let candidate = strategy.snapped_position();
            let distance = square_distance(&mouse_position, &candidate);
            trace!("{} candidate ({}, {}), distance² {}", kind, candidate.x, candidate.y, distance);
            if best.is_none_or(|(_, min)| distance < min) {
                best = Some((index, distance));
            }
        }

        let Some((index, _)) = best else {
            return mouse_position;
        };
        self.current_winner = Some(index);

        let winner = &self.strategies[index];
        let snapped = winner.snapped_position();
        debug!("Snapped to ({}, {}) by {}", snapped.x, snapped.y, winner.kind());
        snapped
    }

    /// 带拖动偏移的捕捉
    ///
    /// 在 `mouse_position + drag_offset` 处求值，再减去偏移返回，
    /// 这样捕捉的是被拖动的手柄位置，而调用方继续使用自己的锚点。
    pub fn snap_with_offset(
        &mut self,
        canvas: &dyn SnapCanvas,
        mouse_position: Point2,
        drag_offset: Vector2,
        modifiers: Modifiers,
    ) -> Point2 {
        self.snap(canvas, mouse_position + drag_offset, modifiers) - drag_offset
    }

    /// 胜出策略的下标和类型
    pub fn current_winner(&self) -> Option<(usize, SnapStrategyKind)> {
        self.current_winner
            .map(|index| (index, self.strategies[index].kind()))
    }

    pub fn current_strategy(&self) -> Option<&dyn SnapStrategy> {
        self.current_winner.map(|index| &*self.strategies[index])
    }

    /// 胜出策略捕捉到的是点还是线
    pub fn snapped_target(&self) -> Option<SnapTarget> {
        self.current_strategy().map(|s| s.snapped().target)
    }

    /// 胜出策略的提示图形；没有胜出策略时为空
    pub fn decoration(&self, converter: &dyn ViewConverter) -> Decoration {
        self.current_strategy()
            .map(|s| s.decoration(converter))
            .unwrap_or_default()
    }

    /// 提示图形的重绘区域；没有胜出策略时为空
    pub fn bounding_rect(&self, converter: &dyn ViewConverter) -> BoundingBox2 {
        let Some(strategy) = self.current_strategy() else {
            return BoundingBox2::empty();
        };
        let bounds = strategy.decoration(converter).bounding_rect();
        if bounds.is_empty() {
            return bounds;
        }
        bounds.expanded(DECORATION_MARGIN)
    }

    /// 绘制提示图形：先白色实线，再红色点线
    pub fn paint(&self, painter: &mut dyn DecorationPainter, converter: &dyn ViewConverter) {
        if !self.active {
            return;
        }
        let Some(strategy) = self.current_strategy() else {
            return;
        };

        let decoration = strategy.decoration(converter);
        painter.stroke(
            &decoration,
            StrokeStyle {
                color: Color::WHITE,
                line_style: LineStyle::Solid,
            },
        );
        painter.stroke(
            &decoration,
            StrokeStyle {
                color: Color::RED,
                line_style: LineStyle::Dotted,
            },
        );
    }

    /// 添加自定义策略，只接受 `Custom` 类型
    pub fn add_custom_snap_strategy(&mut self, strategy: Box<dyn SnapStrategy>) -> SnapResult<()> {
        let kind = strategy.kind();
        if kind != SnapStrategyKind::Custom {
            warn!("Rejected {} strategy offered as custom", kind);
            return Err(SnapError::NotCustomStrategy(kind));
        }
        self.strategies.push(strategy);
        self.current_winner = None;
        debug!("Added custom strategy, {} strategies in total", self.strategies.len());
        Ok(())
    }

    /// 替换第一个 `kind` 类型的策略；`None` 表示移除，不存在时追加
    ///
    /// 新策略的类型必须与 `kind` 一致，否则返回错误且策略列表不变。
    pub fn override_snap_strategy(
        &mut self,
        kind: SnapStrategyKind,
        strategy: Option<Box<dyn SnapStrategy>>,
    ) -> SnapResult<()> {
        if let Some(actual) = strategy.as_ref().map(|s| s.kind()).filter(|&actual| actual != kind) {
            warn!("Rejected {} strategy offered for the {} slot", actual, kind);
            return Err(SnapError::KindMismatch { expected: kind, actual });
        }
        self.current_winner = None;
        let position = self.strategies.iter().position(|s| s.kind() == kind);

        match (position, strategy) {
            (Some(index), Some(strategy)) => {
                self.strategies[index] = strategy;
                debug!("Replaced {} strategy", kind);
            }
            (Some(index), None) => {
                self.strategies.remove(index);
                debug!("Removed {} strategy", kind);
            }
            (None, Some(strategy)) => {
                self.strategies.push(strategy);
                debug!("Appended {} strategy", kind);
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// 清除胜出策略、过滤条件和所有自定义策略
    pub fn reset(&mut self) {
        self.current_winner = None;
        self.filter.clear();
        self.strategies
            .retain(|s| s.kind() != SnapStrategyKind::Custom);
        debug!("Snap guide reset, {} strategies kept", self.strategies.len());
    }

    /// 按求值顺序列出策略类型
    pub fn strategies(&self) -> Vec<SnapStrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }
}

impl Default for SnapGuide {
    fn default() -> Self {
        Self::new()
    }
}
