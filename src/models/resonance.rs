//! # 谐振峰数据模型
//!
//! 定义单个谐振峰（频率、品质因子）与完整频谱结果。
//!
//! ## 依赖关系
//! - 被 `bic/solver.rs` 产生，被 `bic/plot.rs`, `bic/export.rs`,
//!   `commands/` 消费

use serde::{Deserialize, Serialize};

/// 理论参考值：谐振频率 (THz)
pub const THEORETICAL_FREQ_THZ: f64 = 193.4145;
/// 理论参考值：品质因子
pub const THEORETICAL_Q: f64 = 3.2e5;
/// 理论参考值：线宽 (MHz)
pub const THEORETICAL_LINEWIDTH_MHZ: f64 = 0.60;

/// 单个谐振峰
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Resonance {
    /// 谐振频率 (THz)
    pub freq_thz: f64,
    /// 品质因子 Q
    pub q: f64,
}

impl Resonance {
    /// 线宽 (MHz)，由 f/Q 换算
    pub fn linewidth_mhz(&self) -> f64 {
        self.freq_thz / self.q * 1e3
    }
}

/// 频谱仿真结果
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// 谐振峰列表（按 Q 降序排列）
    pub resonances: Vec<Resonance>,
}

impl Spectrum {
    /// 由谐振峰列表创建，按 Q 降序排序
    pub fn from_resonances(mut resonances: Vec<Resonance>) -> Self {
        resonances.sort_by(|a, b| b.q.partial_cmp(&a.q).unwrap());
        Self { resonances }
    }

    /// 最高 Q 的谐振峰
    pub fn best(&self) -> Option<&Resonance> {
        self.resonances.first()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.resonances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linewidth() {
        // 理论参考点：193.4145 THz / 3.2e5 ≈ 0.60 MHz
        let r = Resonance {
            freq_thz: THEORETICAL_FREQ_THZ,
            q: THEORETICAL_Q,
        };
        assert!((r.linewidth_mhz() - THEORETICAL_LINEWIDTH_MHZ).abs() < 0.01);
    }

    #[test]
    fn test_spectrum_sorted_by_q() {
        let spectrum = Spectrum::from_resonances(vec![
            Resonance {
                freq_thz: 193.2,
                q: 1.0e5,
            },
            Resonance {
                freq_thz: 193.5,
                q: 3.0e5,
            },
            Resonance {
                freq_thz: 193.8,
                q: 2.0e5,
            },
        ]);
        assert!((spectrum.best().unwrap().q - 3.0e5).abs() < 1.0);
        assert!(spectrum.resonances[1].q > spectrum.resonances[2].q);
    }

    #[test]
    fn test_empty_spectrum() {
        let spectrum = Spectrum::default();
        assert!(spectrum.is_empty());
        assert!(spectrum.best().is_none());
    }
}
