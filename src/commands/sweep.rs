//! # sweep 子命令实现
//!
//! 在一系列器件参数取值上重复频谱仿真，记录每个取值下的
//! 最优谐振峰，输出 CSV 并可选绘制趋势图。
//!
//! ## 功能
//! - 外层 rayon 并行扫描参数取值
//! - 每个取值执行单线程频谱扫描
//! - 结果表格、CSV 导出与可选 Q-参数曲线图
//!
//! ## 依赖关系
//! - 使用 `cli/sweep.rs` 定义的 SweepArgs 与 SweepParam
//! - 使用 `bic/solver.rs` 与 `bic/plot.rs`

use crate::bic::{self, BicSolver, SweepConfig};
use crate::cli::sweep::{parse_sweep_values, SweepArgs, SweepParam};
use crate::error::{BicError, Result};
use crate::models::{DeviceParams, Resonance};
use crate::utils::{output, progress};

use rayon::prelude::*;

/// 执行参数扫描
pub fn execute(args: SweepArgs) -> Result<()> {
    output::print_header("BIC Parameter Sweep");

    let base = args.device.to_params()?;
    let values = parse_sweep_values(&args.range)?;

    output::print_info(&format!(
        "Sweeping {} over {} values ({} samples each)",
        args.param,
        values.len(),
        args.samples
    ));

    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| BicError::Other(e.to_string()))?;

    let pb = progress::create_progress_bar(values.len() as u64, "Sweeping parameter");

    let config = SweepConfig {
        samples: args.samples,
        jobs: 1,
        show_progress: false,
        ..SweepConfig::default()
    };

    let results: Result<Vec<(f64, Option<Resonance>)>> = pool.install(|| {
        values
            .par_iter()
            .map(|&value| {
                let mut params = base;
                apply_value(&mut params, args.param, value)?;
                params.validate()?;
                let spectrum = BicSolver::new(params, config).run()?;
                pb.inc(1);
                Ok((value, spectrum.best().copied()))
            })
            .collect()
    });
    pb.finish_and_clear();
    let results = results?;

    write_csv(&results, &args.output)?;
    output::print_success(&format!("Results saved to '{}'", args.output.display()));

    print_sweep_table(args.param, &results);

    let found: Vec<(f64, f64)> = results
        .iter()
        .filter_map(|(v, r)| r.map(|res| (*v, res.q)))
        .collect();

    if found.is_empty() {
        output::print_warning("No sweep point produced a resonance passing the filters");
        return Ok(());
    }

    let (best_value, best_q) = found
        .iter()
        .copied()
        .fold((found[0].0, 0.0f64), |acc, (v, q)| {
            if q > acc.1 {
                (v, q)
            } else {
                acc
            }
        });
    output::print_separator();
    output::print_success(&format!(
        "Best {}: {:.4} (Q = {:.2e})",
        args.param, best_value, best_q
    ));

    if let Some(plot_path) = &args.plot {
        let use_svg = plot_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        let title = format!("Q factor vs {}", args.param.axis_label());
        bic::plot::generate_sweep_plot(
            &found,
            plot_path,
            &title,
            args.param.axis_label(),
            args.width,
            args.height,
            use_svg,
        )?;
        output::print_success(&format!("Plot saved to '{}'", plot_path.display()));
    }

    Ok(())
}

/// 将扫描取值应用到器件参数（长度单位为 nm）
fn apply_value(params: &mut DeviceParams, param: SweepParam, value: f64) -> Result<()> {
    match param {
        SweepParam::Radius => params.radius = value * 1e-9,
        SweepParam::Lattice => params.lattice = value * 1e-9,
        SweepParam::EpsIm => params.epsilon.im = value,
        SweepParam::Cells => {
            let cells = value.round();
            if cells < 2.0 {
                return Err(BicError::InvalidArgument(format!(
                    "cell count {} must be at least 2",
                    value
                )));
            }
            params.n_cells = cells as usize;
        }
    }
    Ok(())
}

/// 写出扫描结果 CSV
fn write_csv(results: &[(f64, Option<Resonance>)], path: &std::path::Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["value", "frequency_thz", "q", "linewidth_mhz"])?;
    for (value, res) in results {
        match res {
            Some(r) => writer.write_record([
                format!("{}", value),
                format!("{:.6}", r.freq_thz),
                format!("{:.6e}", r.q),
                format!("{:.6}", r.linewidth_mhz()),
            ])?,
            None => writer.write_record([format!("{}", value), String::new(), String::new(), String::new()])?,
        }
    }
    writer.flush().map_err(|e| BicError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 打印扫描结果表格
fn print_sweep_table(param: SweepParam, results: &[(f64, Option<Resonance>)]) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct SweepRow {
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "f (THz)")]
        freq: String,
        #[tabled(rename = "Q")]
        q: String,
    }

    let rows: Vec<SweepRow> = results
        .iter()
        .map(|(value, res)| match res {
            Some(r) => SweepRow {
                value: format!("{:.4}", value),
                freq: format!("{:.4}", r.freq_thz),
                q: format!("{:.2e}", r.q),
            },
            None => SweepRow {
                value: format!("{:.4}", value),
                freq: "-".to_string(),
                q: "-".to_string(),
            },
        })
        .collect();

    output::print_header(&format!("Sweep Results ({})", param.axis_label()));
    let table = Table::new(&rows);
    println!("{}", table);
}
