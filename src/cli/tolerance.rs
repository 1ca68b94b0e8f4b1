//! # tolerance 子命令 CLI 定义
//!
//! 蒙特卡洛工艺容差分析参数：扰动强度、试验次数与随机种子。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/tolerance.rs`

use crate::cli::DeviceArgs;

use clap::Args;
use std::path::PathBuf;

/// tolerance 子命令参数
#[derive(Args, Debug)]
pub struct ToleranceArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Standard deviation of the disk radius perturbation (nm)
    #[arg(long, default_value_t = 2.0)]
    pub sigma_radius: f64,

    /// Standard deviation of the lattice constant perturbation (nm)
    #[arg(long, default_value_t = 2.0)]
    pub sigma_lattice: f64,

    /// Number of Monte Carlo trials
    #[arg(long, default_value_t = 200)]
    pub trials: usize,

    /// Frequency samples per trial
    #[arg(long, default_value_t = 2_000)]
    pub samples: usize,

    /// RNG seed (trials derive per-trial seeds for deterministic parallel runs)
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Quality factor threshold for yield computation
    #[arg(long, default_value_t = 1.0e5)]
    pub q_yield: f64,

    /// Output CSV file path
    #[arg(short, long, default_value = "tolerance_results.csv")]
    pub output: PathBuf,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
