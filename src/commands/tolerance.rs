//! # tolerance 子命令实现
//!
//! 蒙特卡洛工艺容差分析：对盘半径与晶格常数施加高斯扰动，
//! 统计扰动后最优 Q 的分布与良率。
//!
//! ## 功能
//! - 每次试验独立派生随机种子，并行下结果可复现
//! - Box-Muller 高斯采样
//! - Q 统计（均值/标准差/极值）、良率与失败试验计数
//! - 逐试验结果 CSV 导出
//!
//! ## 依赖关系
//! - 使用 `cli/tolerance.rs` 定义的 ToleranceArgs
//! - 使用 `bic/solver.rs` 执行每次试验的频谱扫描
//! - 使用 `rand` crate 的 StdRng

use crate::bic::{BicSolver, SweepConfig};
use crate::cli::tolerance::ToleranceArgs;
use crate::error::{BicError, Result};
use crate::utils::{output, progress};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f64::consts::PI;

/// 单次试验结果
struct TrialResult {
    trial: usize,
    radius_nm: f64,
    lattice_nm: f64,
    /// 扰动后的最优谐振；参数非法或无谐振时为 None
    resonance: Option<(f64, f64)>,
}

/// 执行容差分析
pub fn execute(args: ToleranceArgs) -> Result<()> {
    output::print_header("BIC Tolerance Analysis");

    let base = args.device.to_params()?;

    output::print_info(&format!(
        "{} trials, σ_radius = {} nm, σ_lattice = {} nm, seed = {}",
        args.trials, args.sigma_radius, args.sigma_lattice, args.seed
    ));

    if args.trials == 0 {
        return Err(BicError::InvalidArgument(
            "trial count must be positive".to_string(),
        ));
    }

    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| BicError::Other(e.to_string()))?;

    let pb = progress::create_progress_bar(args.trials as u64, "Running trials");

    let config = SweepConfig {
        samples: args.samples,
        jobs: 1,
        show_progress: false,
        ..SweepConfig::default()
    };

    let trials: Result<Vec<TrialResult>> = pool.install(|| {
        (0..args.trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(trial as u64));
                let radius_nm = base.radius * 1e9 + args.sigma_radius * gaussian(&mut rng);
                let lattice_nm = base.lattice * 1e9 + args.sigma_lattice * gaussian(&mut rng);

                let mut params = base;
                params.radius = radius_nm * 1e-9;
                params.lattice = lattice_nm * 1e-9;

                let resonance = if params.validate().is_err() {
                    None
                } else {
                    BicSolver::new(params, config)
                        .run()?
                        .best()
                        .map(|r| (r.freq_thz, r.q))
                };

                pb.inc(1);
                Ok(TrialResult {
                    trial,
                    radius_nm,
                    lattice_nm,
                    resonance,
                })
            })
            .collect()
    });
    pb.finish_and_clear();
    let trials = trials?;

    write_csv(&trials, &args.output)?;
    output::print_success(&format!("Results saved to '{}'", args.output.display()));

    let qs: Vec<f64> = trials
        .iter()
        .filter_map(|t| t.resonance.map(|(_, q)| q))
        .collect();
    let failed = trials.len() - qs.len();

    output::print_separator();
    if qs.is_empty() {
        output::print_warning("No trial produced a resonance passing the filters");
        return Ok(());
    }

    let stats = QStats::from_samples(&qs);
    let yield_count = qs.iter().filter(|&&q| q >= args.q_yield).count();
    let yield_frac = yield_count as f64 / trials.len() as f64;

    output::print_info(&format!("Successful trials: {}/{}", qs.len(), trials.len()));
    if failed > 0 {
        output::print_warning(&format!("Failed trials: {}", failed));
    }
    output::print_info(&format!("Mean Q:  {:.2e}", stats.mean));
    output::print_info(&format!("Std Q:   {:.2e}", stats.std));
    output::print_info(&format!("Min Q:   {:.2e}", stats.min));
    output::print_info(&format!("Max Q:   {:.2e}", stats.max));
    output::print_success(&format!(
        "Yield (Q >= {:.1e}): {:.1}%",
        args.q_yield,
        yield_frac * 100.0
    ));

    Ok(())
}

/// Box-Muller 标准正态采样
fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-300);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Q 分布统计量
struct QStats {
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
}

impl QStats {
    fn from_samples(qs: &[f64]) -> Self {
        let n = qs.len() as f64;
        let mean = qs.iter().sum::<f64>() / n;
        let var = qs.iter().map(|q| (q - mean).powi(2)).sum::<f64>() / n;
        let min = qs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = qs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean,
            std: var.sqrt(),
            min,
            max,
        }
    }
}

/// 写出逐试验结果 CSV
fn write_csv(trials: &[TrialResult], path: &std::path::Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["trial", "radius_nm", "lattice_nm", "frequency_thz", "q"])?;
    for t in trials {
        match t.resonance {
            Some((freq, q)) => writer.write_record([
                format!("{}", t.trial),
                format!("{:.4}", t.radius_nm),
                format!("{:.4}", t.lattice_nm),
                format!("{:.6}", freq),
                format!("{:.6e}", q),
            ])?,
            None => writer.write_record([
                format!("{}", t.trial),
                format!("{:.4}", t.radius_nm),
                format!("{:.4}", t.lattice_nm),
                String::new(),
                String::new(),
            ])?,
        }
    }
    writer.flush().map_err(|e| BicError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_deterministic_for_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(gaussian(&mut a), gaussian(&mut b));
        }
    }

    #[test]
    fn test_gaussian_sample_moments() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples: Vec<f64> = (0..20_000).map(|_| gaussian(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.05);
        assert!((var - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_q_stats() {
        let stats = QStats::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.min - 1.0).abs() < 1e-12);
        assert!((stats.max - 4.0).abs() < 1e-12);
        assert!((stats.std - (1.25f64).sqrt()).abs() < 1e-12);
    }
}
