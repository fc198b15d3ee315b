//! 捕捉提示图形
//!
//! 每次捕捉成功后，胜出的策略给出一条小的矢量路径，用来在画布上提示
//! 捕捉到了什么。它只用于显示，从不持久化。

use crate::math::{BoundingBox2, Point2, Vector2};
use crate::shape::ViewConverter;

/// 提示标记的半尺寸（屏幕像素）
pub const MARKER_HALF_SIZE: f64 = 5.0;

/// 点标记（圆/方框）的边长（屏幕像素）
pub const MARKER_BOX_SIZE: f64 = 11.0;

/// 提示路径元素
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo(Point2),
    LineTo(Point2),
    /// 内切于矩形的椭圆
    Ellipse(BoundingBox2),
    Rect(BoundingBox2),
}

/// 提示路径
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoration {
    elements: Vec<PathElement>,
}

impl Decoration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Point2) {
        self.elements.push(PathElement::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Point2) {
        self.elements.push(PathElement::LineTo(point));
    }

    /// 添加一条独立线段
    pub fn add_line(&mut self, from: Point2, to: Point2) {
        self.move_to(from);
        self.line_to(to);
    }

    /// 以 `center` 为中心的十字，先横后竖
    pub fn add_cross(&mut self, center: Point2, half: Vector2) {
        self.add_horizontal_tick(center, half.x);
        self.add_vertical_tick(center, half.y);
    }

    pub fn add_horizontal_tick(&mut self, center: Point2, half_width: f64) {
        self.add_line(center - Vector2::new(half_width, 0.0), center + Vector2::new(half_width, 0.0));
    }

    pub fn add_vertical_tick(&mut self, center: Point2, half_height: f64) {
        self.add_line(center - Vector2::new(0.0, half_height), center + Vector2::new(0.0, half_height));
    }

    pub fn add_ellipse(&mut self, rect: BoundingBox2) {
        self.elements.push(PathElement::Ellipse(rect));
    }

    pub fn add_rect(&mut self, rect: BoundingBox2) {
        self.elements.push(PathElement::Rect(rect));
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// 没有任何可绘制内容（只有 move_to 也算空）
    pub fn is_empty(&self) -> bool {
        self.elements
            .iter()
            .all(|e| matches!(e, PathElement::MoveTo(_)))
    }

    /// 当前画笔位置
    pub fn current_position(&self) -> Point2 {
        match self.elements.last() {
            Some(PathElement::MoveTo(p)) | Some(PathElement::LineTo(p)) => *p,
            // 椭圆从右侧中点开始并回到该点
            Some(PathElement::Ellipse(r)) => Point2::new(r.max.x, r.center().y),
            Some(PathElement::Rect(r)) => r.min,
            None => Point2::origin(),
        }
    }

    /// 所有元素的包围盒
    pub fn bounding_rect(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::empty();
        for element in &self.elements {
            match element {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => bbox.expand_to_include(p),
                PathElement::Ellipse(r) | PathElement::Rect(r) => bbox = bbox.union(r),
            }
        }
        bbox
    }
}

/// 以 `center` 为中心、边长为 `MARKER_BOX_SIZE` 像素的文档矩形
pub fn marker_box(center: Point2, converter: &dyn ViewConverter) -> BoundingBox2 {
    let size = converter.view_to_document(Vector2::new(MARKER_BOX_SIZE, MARKER_BOX_SIZE));
    BoundingBox2::new(center - size / 2.0, center + size / 2.0)
}

/// `MARKER_HALF_SIZE` 像素换算成的文档尺寸
pub fn marker_half_size(converter: &dyn ViewConverter) -> Vector2 {
    converter.view_to_document(Vector2::new(MARKER_HALF_SIZE, MARKER_HALF_SIZE))
}

/// 颜色（RGBA）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// 线型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dotted,
}

/// 描边样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: Color,
    pub line_style: LineStyle,
}

/// 绘制提示图形的表面（由宿主画布实现）
pub trait DecorationPainter {
    fn stroke(&mut self, decoration: &Decoration, style: StrokeStyle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ZoomConverter;

    #[test]
    fn test_empty_decoration() {
        let mut decoration = Decoration::new();
        assert!(decoration.is_empty());
        decoration.move_to(Point2::new(1.0, 1.0));
        assert!(decoration.is_empty());
        decoration.line_to(Point2::new(2.0, 2.0));
        assert!(!decoration.is_empty());
        assert_eq!(decoration.current_position(), Point2::new(2.0, 2.0));
    }

    #[test]
    fn test_marker_box_bounds() {
        let mut decoration = Decoration::new();
        decoration.add_ellipse(marker_box(Point2::origin(), &ZoomConverter::default()));
        let bounds = decoration.bounding_rect();
        assert_eq!(bounds.min, Point2::new(-5.5, -5.5));
        assert_eq!(bounds.max, Point2::new(5.5, 5.5));
    }

    #[test]
    fn test_bounding_rect_mixed() {
        let mut decoration = Decoration::new();
        decoration.add_line(Point2::new(0.0, 0.0), Point2::new(10.0, 2.0));
        decoration.add_rect(BoundingBox2::new(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)));
        let bounds = decoration.bounding_rect();
        assert_eq!(bounds.min, Point2::new(-1.0, -1.0));
        assert_eq!(bounds.max, Point2::new(10.0, 2.0));
    }
}
