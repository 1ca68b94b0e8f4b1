//! # sweep 子命令 CLI 定义
//!
//! 器件参数扫描：可扫描半径、晶格常数、损耗 ε″ 与单元数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sweep.rs`

use crate::cli::DeviceArgs;
use crate::error::{BicError, Result};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 可扫描的器件参数
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SweepParam {
    /// Disk radius (nm)
    Radius,
    /// Lattice constant (nm)
    Lattice,
    /// Imaginary part of the permittivity
    EpsIm,
    /// Number of unit cells
    Cells,
}

impl std::fmt::Display for SweepParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepParam::Radius => write!(f, "radius"),
            SweepParam::Lattice => write!(f, "lattice"),
            SweepParam::EpsIm => write!(f, "eps-im"),
            SweepParam::Cells => write!(f, "cells"),
        }
    }
}

impl SweepParam {
    /// 图表横轴描述
    pub fn axis_label(&self) -> &'static str {
        match self {
            SweepParam::Radius => "Disk radius (nm)",
            SweepParam::Lattice => "Lattice constant (nm)",
            SweepParam::EpsIm => "Im(epsilon)",
            SweepParam::Cells => "Unit cells",
        }
    }
}

/// 解析 "start:stop:steps" 形式的扫描取值
pub fn parse_sweep_values(spec: &str) -> Result<Vec<f64>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(BicError::InvalidRange(format!(
            "{} (expected start:stop:steps)",
            spec
        )));
    }

    let start: f64 = parts[0]
        .parse()
        .map_err(|_| BicError::InvalidRange(spec.to_string()))?;
    let stop: f64 = parts[1]
        .parse()
        .map_err(|_| BicError::InvalidRange(spec.to_string()))?;
    let steps: usize = parts[2]
        .parse()
        .map_err(|_| BicError::InvalidRange(spec.to_string()))?;

    if !start.is_finite() || !stop.is_finite() || steps == 0 {
        return Err(BicError::InvalidRange(spec.to_string()));
    }
    if steps == 1 {
        return Ok(vec![start]);
    }
    if stop <= start {
        return Err(BicError::InvalidRange(format!(
            "{} (must be start < stop)",
            spec
        )));
    }

    let step = (stop - start) / (steps - 1) as f64;
    Ok((0..steps).map(|i| start + i as f64 * step).collect())
}

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Device parameter to sweep
    #[arg(long, value_enum)]
    pub param: SweepParam,

    /// Sweep values as start:stop:steps (e.g., "195:210:16")
    #[arg(long)]
    pub range: String,

    /// Frequency samples per sweep point
    #[arg(long, default_value_t = 5_000)]
    pub samples: usize,

    /// Output CSV file path
    #[arg(short, long, default_value = "sweep_results.csv")]
    pub output: PathBuf,

    /// Optional plot output path (PNG or SVG)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sweep_values() {
        let values = parse_sweep_values("195:210:16").unwrap();
        assert_eq!(values.len(), 16);
        assert!((values[0] - 195.0).abs() < 1e-12);
        assert!((values[15] - 210.0).abs() < 1e-12);
        assert!((values[1] - 196.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_sweep_single_step() {
        let values = parse_sweep_values("200:210:1").unwrap();
        assert_eq!(values, vec![200.0]);
    }

    #[test]
    fn test_parse_sweep_rejects_bad_specs() {
        assert!(parse_sweep_values("195:210").is_err());
        assert!(parse_sweep_values("210:195:5").is_err());
        assert!(parse_sweep_values("a:b:5").is_err());
        assert!(parse_sweep_values("195:210:0").is_err());
    }
}
