//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `simulate`: 频谱仿真
//! - `sweep`: 器件参数扫描
//! - `tolerance`: 工艺容差分析
//! - `export`: GDSII 版图导出
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: simulate, sweep, tolerance, export

pub mod export;
pub mod simulate;
pub mod sweep;
pub mod tolerance;

use crate::error::{BicError, Result};
use crate::models::DeviceParams;

use clap::{Args, Parser, Subcommand};
use num_complex::Complex64;

/// Bicsim - 光子晶体 BIC 谐振器仿真工具箱
#[derive(Parser)]
#[command(name = "bicsim")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A photonic crystal BIC resonator simulation and fabrication export toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Simulate the resonance spectrum and extract high-Q modes
    Simulate(simulate::SimulateArgs),

    /// Sweep a device parameter and track the best quality factor
    Sweep(sweep::SweepArgs),

    /// Monte Carlo fabrication tolerance analysis
    Tolerance(tolerance::ToleranceArgs),

    /// Export a fabrication-ready GDSII layout
    Export(export::ExportArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享器件参数
// ─────────────────────────────────────────────────────────────

/// 器件参数（所有子命令共享，长度单位为 nm）
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Number of unit cells N
    #[arg(long, default_value_t = 20)]
    pub cells: usize,

    /// Lattice constant in nm
    #[arg(long, default_value_t = 600.0)]
    pub lattice: f64,

    /// Disk radius in nm
    #[arg(long, default_value_t = 202.0)]
    pub radius: f64,

    /// Real part of the relative permittivity
    #[arg(long, default_value_t = 12.1)]
    pub eps_re: f64,

    /// Imaginary part of the relative permittivity (material loss)
    #[arg(long, default_value_t = 6.0e-7)]
    pub eps_im: f64,

    /// Design wavelength in nm
    #[arg(long, default_value_t = 1550.0)]
    pub wavelength: f64,
}

impl DeviceArgs {
    /// 转换为内部参数表示（nm → m）并校验
    pub fn to_params(&self) -> Result<DeviceParams> {
        let params = DeviceParams {
            epsilon: Complex64::new(self.eps_re, self.eps_im),
            lattice: self.lattice * 1e-9,
            radius: self.radius * 1e-9,
            lambda_0: self.wavelength * 1e-9,
            n_cells: self.cells,
        };
        params.validate()?;
        Ok(params)
    }
}

/// 解析 "min-max" 形式的区间
pub fn parse_span(input: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 2 {
        return Err(BicError::InvalidRange(input.to_string()));
    }

    let min: f64 = parts[0]
        .parse()
        .map_err(|_| BicError::InvalidRange(input.to_string()))?;
    let max: f64 = parts[1]
        .parse()
        .map_err(|_| BicError::InvalidRange(input.to_string()))?;

    if !min.is_finite() || !max.is_finite() || max <= min {
        return Err(BicError::InvalidRange(format!(
            "{} (must be min < max)",
            input
        )));
    }

    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span("193-194").unwrap(), (193.0, 194.0));
        assert_eq!(parse_span("0.92-1.08").unwrap(), (0.92, 1.08));
        assert!(parse_span("194-193").is_err());
        assert!(parse_span("abc-1").is_err());
        assert!(parse_span("1").is_err());
    }

    #[test]
    fn test_device_args_conversion() {
        let args = DeviceArgs {
            cells: 20,
            lattice: 600.0,
            radius: 202.0,
            eps_re: 12.1,
            eps_im: 6.0e-7,
            wavelength: 1550.0,
        };
        let params = args.to_params().unwrap();
        assert!((params.lattice - 600e-9).abs() < 1e-15);
        assert!((params.radius - 202e-9).abs() < 1e-15);
        assert!((params.lambda_0 - 1550e-9).abs() < 1e-15);
    }

    #[test]
    fn test_device_args_rejects_invalid() {
        let args = DeviceArgs {
            cells: 1,
            lattice: 600.0,
            radius: 202.0,
            eps_re: 12.1,
            eps_im: 6.0e-7,
            wavelength: 1550.0,
        };
        assert!(args.to_params().is_err());
    }
}
