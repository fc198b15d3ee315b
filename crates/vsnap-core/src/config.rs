//! 捕捉配置
//!
//! 只包含宿主可持久化的三个选项；写入偏好设置由宿主负责。

use crate::error::SnapResult;
use crate::strategy::StrategyMask;
use serde::{Deserialize, Serialize};

/// 默认捕捉距离（屏幕像素）
pub const DEFAULT_SNAP_DISTANCE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// 是否启用捕捉
    pub active: bool,
    /// 捕捉距离（屏幕像素）
    pub snap_distance: u32,
    /// 启用的策略类型
    pub enabled_strategies: StrategyMask,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            active: true,
            snap_distance: DEFAULT_SNAP_DISTANCE,
            enabled_strategies: StrategyMask::default(),
        }
    }
}

impl SnapConfig {
    pub fn from_json(json: &str) -> SnapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SnapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
