//! 二维仿射变换
//!
//! 图形坐标到文档坐标的映射。

use crate::math::{BoundingBox2, Point2, Vector2};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// 二维仿射变换（齐次坐标 3x3 矩阵）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub matrix: Matrix3<f64>,
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new_translation(&Vector2::new(dx, dy)),
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy)),
        }
    }

    /// 绕原点旋转（弧度）
    pub fn rotation(angle: f64) -> Self {
        Self {
            matrix: Matrix3::new_rotation(angle),
        }
    }

    /// 先应用 `self`，再应用 `other`
    pub fn then(&self, other: &Transform2D) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// 变换点
    pub fn map_point(&self, point: &Point2) -> Point2 {
        self.matrix.transform_point(point)
    }

    /// 变换向量（忽略平移）
    pub fn map_vector(&self, vector: &Vector2) -> Vector2 {
        self.matrix.transform_vector(vector)
    }

    /// 变换包围盒，返回四个角点变换后的包围盒
    pub fn map_rect(&self, rect: &BoundingBox2) -> BoundingBox2 {
        if rect.is_empty() {
            return *rect;
        }
        BoundingBox2::from_points(rect.corners().iter().map(|p| self.map_point(p)))
    }

    /// 逆变换；矩阵奇异时返回 `None`
    pub fn inverse(&self) -> Option<Transform2D> {
        self.matrix.try_inverse().map(|matrix| Transform2D { matrix })
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
