//! # 工具模块
//!
//! 终端输出与进度条封装。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `bic/` 模块使用

pub mod output;
pub mod progress;
