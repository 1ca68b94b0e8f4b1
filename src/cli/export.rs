//! # export 子命令 CLI 定义
//!
//! GDSII 版图导出参数：图层号、多边形顶点数与数据库单位。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/export.rs`

use crate::cli::DeviceArgs;

use clap::Args;
use std::path::PathBuf;

/// export 子命令参数
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Output GDSII file path
    #[arg(short, long, default_value = "bic_array.gds")]
    pub output: PathBuf,

    /// Layer number for the disk geometry
    #[arg(long, default_value_t = 1)]
    pub disk_layer: i16,

    /// Layer number for the alignment marks
    #[arg(long, default_value_t = 2)]
    pub mark_layer: i16,

    /// Number of polygon vertices approximating the disk (8-512)
    #[arg(long, default_value_t = 64)]
    pub vertices: usize,

    /// Database unit in meters
    #[arg(long, default_value_t = 1e-9)]
    pub unit: f64,
}
