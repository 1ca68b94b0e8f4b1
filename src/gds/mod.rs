//! # GDSII 版图模块
//!
//! 自包含的 GDSII 流格式写入器与 BIC 阵列版图生成。
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 调用
//! - 使用 `models/params.rs` 的 DeviceParams

pub mod layout;
pub mod library;
pub mod record;

pub use layout::{build_layout, LayoutOptions};
pub use library::{GdsCell, GdsElement, GdsLibrary};
