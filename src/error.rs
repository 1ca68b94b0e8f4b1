//! # 统一错误处理模块
//!
//! 定义 Bicsim 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Bicsim 统一错误类型
#[derive(Error, Debug)]
pub enum BicError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 数值求解错误
    // ─────────────────────────────────────────────────────────────
    #[error("Eigenvalue solver failed: {0}")]
    EigenError(String),

    // ─────────────────────────────────────────────────────────────
    // 版图导出错误
    // ─────────────────────────────────────────────────────────────
    #[error("GDSII export failed: {0}")]
    GdsError(String),

    // ─────────────────────────────────────────────────────────────
    // 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, BicError>;
