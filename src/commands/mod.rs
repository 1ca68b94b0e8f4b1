//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `bic/`, `gds/`, `models/`, `utils/`
//! - 子模块: simulate, sweep, tolerance, export

pub mod export;
pub mod simulate;
pub mod sweep;
pub mod tolerance;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Simulate(args) => simulate::execute(args),
        Commands::Sweep(args) => sweep::execute(args),
        Commands::Tolerance(args) => tolerance::execute(args),
        Commands::Export(args) => export::execute(args),
    }
}
