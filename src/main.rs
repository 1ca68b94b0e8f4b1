//! # Bicsim - 光子晶体 BIC 谐振器仿真工具箱
//!
//! 将 BIC (连续域束缚态) 谐振器的仿真、参数扫描、容差分析和
//! 版图导出统一成单一可执行文件。
//!
//! ## 子命令
//! - `simulate` - 频谱仿真，提取高 Q 谐振峰
//! - `sweep` - 器件参数扫描（半径、晶格常数、损耗、单元数）
//! - `tolerance` - 蒙特卡洛工艺容差分析
//! - `export` - 导出 GDSII 加工版图
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── bic/     (哈密顿量、本征值求解、绘图、数据导出)
//!   │     ├── gds/     (GDSII 二进制写入与版图生成)
//!   │     └── models/  (器件参数与谐振峰数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod bic;
mod cli;
mod commands;
mod error;
mod gds;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
