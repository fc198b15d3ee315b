//! 捕捉引擎错误定义

use crate::strategy::SnapStrategyKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    #[error("Strategy {0} is not a custom strategy")]
    NotCustomStrategy(SnapStrategyKind),

    #[error("Strategy {actual} cannot replace a {expected} strategy")]
    KindMismatch {
        expected: SnapStrategyKind,
        actual: SnapStrategyKind,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type SnapResult<T> = Result<T, SnapError>;
