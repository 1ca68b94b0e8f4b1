//! # BIC 仿真核心模块
//!
//! 实现有效哈密顿量构建、复矩阵本征值求解、频谱扫描以及
//! 结果的绘图与数据导出。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块调用
//! - 使用 `models/` 的 DeviceParams, Resonance, Spectrum

pub mod eigen;
pub mod export;
pub mod hamiltonian;
pub mod plot;
pub mod solver;

pub use solver::{BicSolver, SweepConfig};
