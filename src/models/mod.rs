//! # 数据模型模块
//!
//! 定义器件参数与仿真结果的数据结构。
//!
//! ## 依赖关系
//! - 被 `bic/`, `gds/`, `commands/` 使用

pub mod params;
pub mod resonance;

pub use params::DeviceParams;
pub use resonance::{Resonance, Spectrum};
