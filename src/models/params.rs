//! # 器件参数数据模型
//!
//! 定义 BIC 谐振器阵列的物理参数（介电常数、晶格常数、盘半径、
//! 设计波长、单元数），以及由此导出的设计角频率。
//!
//! ## 依赖关系
//! - 被 `bic/`, `gds/layout.rs`, `commands/` 使用
//! - 无外部模块依赖

use crate::error::{BicError, Result};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 真空光速 (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// BIC 器件参数（长度单位均为米）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeviceParams {
    /// 相对介电常数（虚部为材料损耗 ε″）
    pub epsilon: Complex64,
    /// 晶格常数 a (m)
    pub lattice: f64,
    /// 圆盘半径 (m)
    pub radius: f64,
    /// 设计波长 λ₀ (m)
    pub lambda_0: f64,
    /// 单元数 N
    pub n_cells: usize,
}

impl Default for DeviceParams {
    /// 认证的最优参数
    fn default() -> Self {
        Self {
            epsilon: Complex64::new(12.1, 6.0e-7),
            lattice: 600e-9,
            radius: 202e-9,
            lambda_0: 1550e-9,
            n_cells: 20,
        }
    }
}

impl DeviceParams {
    /// 设计角频率 ω₀ = 2πc/λ₀ (rad/s)
    pub fn omega_0(&self) -> f64 {
        2.0 * PI * SPEED_OF_LIGHT / self.lambda_0
    }

    /// 检验参数的物理合理性
    pub fn validate(&self) -> Result<()> {
        if self.n_cells < 2 {
            return Err(BicError::InvalidArgument(format!(
                "Cell count must be at least 2, got {}",
                self.n_cells
            )));
        }
        if self.lattice <= 0.0 {
            return Err(BicError::InvalidArgument(format!(
                "Lattice constant must be positive, got {:e} m",
                self.lattice
            )));
        }
        if self.radius <= 0.0 {
            return Err(BicError::InvalidArgument(format!(
                "Disk radius must be positive, got {:e} m",
                self.radius
            )));
        }
        if self.lambda_0 <= 0.0 {
            return Err(BicError::InvalidArgument(format!(
                "Design wavelength must be positive, got {:e} m",
                self.lambda_0
            )));
        }
        if self.epsilon.re <= 0.0 {
            return Err(BicError::InvalidArgument(format!(
                "Re(epsilon) must be positive, got {}",
                self.epsilon.re
            )));
        }
        if self.epsilon.im < 0.0 {
            return Err(BicError::InvalidArgument(format!(
                "Im(epsilon) must be non-negative, got {:e}",
                self.epsilon.im
            )));
        }
        Ok(())
    }

    /// 相邻圆盘是否重叠（2r >= a）
    pub fn disks_overlap(&self) -> bool {
        2.0 * self.radius >= self.lattice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = DeviceParams::default();
        assert_eq!(p.n_cells, 20);
        assert!((p.lattice - 600e-9).abs() < 1e-15);
        assert!((p.radius - 202e-9).abs() < 1e-15);
        assert!((p.epsilon.re - 12.1).abs() < 1e-12);
        assert!((p.epsilon.im - 6.0e-7).abs() < 1e-15);
        p.validate().unwrap();
    }

    #[test]
    fn test_omega_0() {
        let p = DeviceParams::default();
        // 2πc/1550nm ≈ 1.2153e15 rad/s
        let omega = p.omega_0();
        assert!((omega - 1.2153e15).abs() / omega < 1e-3);
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let mut p = DeviceParams::default();
        p.n_cells = 1;
        assert!(p.validate().is_err());

        let mut p = DeviceParams::default();
        p.radius = -1e-9;
        assert!(p.validate().is_err());

        let mut p = DeviceParams::default();
        p.epsilon = Complex64::new(12.1, -1e-7);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_disks_overlap() {
        let p = DeviceParams::default();
        assert!(!p.disks_overlap());

        let mut p = DeviceParams::default();
        p.radius = 310e-9;
        assert!(p.disks_overlap());
    }
}
