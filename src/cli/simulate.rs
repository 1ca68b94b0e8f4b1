//! # simulate 子命令 CLI 定义
//!
//! 频谱仿真参数：采样配置、筛选阈值与输出选项。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/simulate.rs`

use crate::cli::DeviceArgs;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 频谱输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpectrumOutputFormat {
    /// PNG image (publication quality)
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (frequency, Q, linewidth)
    Csv,
    /// XY data file (frequency, Q)
    Xy,
}

impl std::fmt::Display for SpectrumOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectrumOutputFormat::Png => write!(f, "png"),
            SpectrumOutputFormat::Svg => write!(f, "svg"),
            SpectrumOutputFormat::Csv => write!(f, "csv"),
            SpectrumOutputFormat::Xy => write!(f, "xy"),
        }
    }
}

/// simulate 子命令参数
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Number of frequency samples across the sweep window
    #[arg(long, default_value_t = 50_000)]
    pub samples: usize,

    /// Sweep window as a fraction of the design frequency (e.g., "0.92-1.08")
    #[arg(long, default_value = "0.92-1.08")]
    pub window: String,

    /// Acceptance band in THz (e.g., "193-194")
    #[arg(long, default_value = "193-194")]
    pub band: String,

    /// Minimum quality factor for a resonance to be reported
    #[arg(long, default_value_t = 1.5e5)]
    pub q_min: f64,

    /// Output file path
    #[arg(short, long, default_value = "bic_spectrum.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SpectrumOutputFormat>,

    /// Number of top resonances to print
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1400)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 700)]
    pub height: u32,

    /// Title for the plot (default: derived from device parameters)
    #[arg(long)]
    pub title: Option<String>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Print Hamiltonian diagnostics at the design frequency
    #[arg(long, default_value_t = false)]
    pub diagnostics: bool,
}
