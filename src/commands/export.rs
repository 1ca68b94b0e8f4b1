//! # export 子命令实现
//!
//! 将器件几何导出为 GDSII 版图文件：圆盘阵列（AREF 引用）
//! 与外围对准标记。
//!
//! ## 依赖关系
//! - 使用 `cli/export.rs` 定义的 ExportArgs
//! - 使用 `gds/layout.rs` 构建版图并写出文件

use crate::cli::export::ExportArgs;
use crate::error::Result;
use crate::gds::layout::{self, LayoutOptions};
use crate::utils::output;

/// 执行 GDSII 导出
pub fn execute(args: ExportArgs) -> Result<()> {
    output::print_header("Fabrication Export");

    let params = args.device.to_params()?;

    let opts = LayoutOptions {
        disk_layer: args.disk_layer,
        mark_layer: args.mark_layer,
        vertices: args.vertices,
        db_unit: args.unit,
    };

    output::print_info(&format!(
        "{} disks, radius {:.1} nm, spacing {:.1} nm",
        params.n_cells,
        params.radius * 1e9,
        params.lattice * 1e9
    ));
    output::print_info(&format!(
        "Layers: disk = {}, marks = {}; {} polygon vertices",
        opts.disk_layer, opts.mark_layer, opts.vertices
    ));

    let library = layout::build_layout(&params, &opts)?;
    library.write_to(&args.output)?;

    output::print_success(&format!(
        "GDSII file saved as '{}'",
        args.output.display()
    ));
    Ok(())
}
