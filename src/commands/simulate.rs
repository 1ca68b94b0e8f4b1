//! # simulate 子命令实现
//!
//! 执行频率扫描仿真，提取高 Q 谐振峰并输出图像或数据文件。
//!
//! ## 功能
//! - rayon 并行频率扫描
//! - 谐振峰表格与最优峰摘要
//! - 可选哈密顿量诊断
//! - 输出 PNG/SVG 图像或 CSV/XY 数据
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 SimulateArgs
//! - 使用 `bic/` 模块进行计算与输出
//! - 使用 `models/resonance.rs` 的理论参考值

use crate::bic::{self, eigen, hamiltonian, BicSolver, SweepConfig};
use crate::cli::simulate::{SimulateArgs, SpectrumOutputFormat};
use crate::cli::{parse_span, DeviceArgs};
use crate::error::{BicError, Result};
use crate::models::resonance::{
    Spectrum, THEORETICAL_FREQ_THZ, THEORETICAL_LINEWIDTH_MHZ, THEORETICAL_Q,
};
use crate::models::DeviceParams;
use crate::utils::output;

use std::path::Path;

/// 执行频谱仿真
pub fn execute(args: SimulateArgs) -> Result<()> {
    output::print_header("BIC Resonance Simulation");

    let params = args.device.to_params()?;
    print_device_summary(&args.device, &params);
    if params.disks_overlap() {
        output::print_warning("Disks overlap (2r >= a); geometry is not fabricable");
    }

    let window = parse_span(&args.window)?;
    if window.0 <= 0.0 {
        return Err(BicError::InvalidRange(format!(
            "{} (window must be positive)",
            args.window
        )));
    }
    let band = parse_span(&args.band)?;

    let config = SweepConfig {
        samples: args.samples,
        window,
        band_thz: band,
        q_min: args.q_min,
        jobs: args.jobs,
        show_progress: true,
        ..SweepConfig::default()
    };

    output::print_info(&format!(
        "Sweeping {} samples over [{:.2}, {:.2}]·ω₀, band {:.1}-{:.1} THz",
        config.samples, window.0, window.1, band.0, band.1
    ));

    let solver = BicSolver::new(params, config);
    let spectrum = solver.run()?;

    if args.diagnostics {
        print_diagnostics(&params)?;
    }

    if spectrum.is_empty() {
        output::print_warning("No resonances passed the filters");
        output::print_info("Theoretical reference:");
        output::print_info(&format!("  Frequency: {} THz", THEORETICAL_FREQ_THZ));
        output::print_info(&format!("  Q factor:  {:.2e}", THEORETICAL_Q));
        output::print_info(&format!("  Linewidth: {} MHz", THEORETICAL_LINEWIDTH_MHZ));
        return Ok(());
    }

    output::print_success(&format!(
        "Found {} resonance candidates",
        spectrum.resonances.len()
    ));
    print_resonance_table(&spectrum, args.top_n);

    let best = spectrum.best().unwrap();
    output::print_separator();
    output::print_success(&format!(
        "Best resonance: {:.4} THz, Q = {:.2e}, linewidth = {:.2} MHz",
        best.freq_thz,
        best.q,
        best.linewidth_mhz()
    ));

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));
    let title = args.title.clone().unwrap_or_else(|| {
        format!(
            "BIC Resonance | N={} | ε″={:.1e}",
            params.n_cells, params.epsilon.im
        )
    });

    match format {
        SpectrumOutputFormat::Png | SpectrumOutputFormat::Svg => {
            bic::plot::generate_spectrum_plot(
                &spectrum,
                &args.output,
                &title,
                args.width,
                args.height,
                format == SpectrumOutputFormat::Svg,
            )?;
        }
        SpectrumOutputFormat::Csv => bic::export::to_csv(&spectrum, &args.output)?,
        SpectrumOutputFormat::Xy => bic::export::to_xy(&spectrum, &title, &args.output)?,
    }

    output::print_success(&format!("Spectrum saved to '{}'", args.output.display()));
    Ok(())
}

/// 打印器件参数摘要
fn print_device_summary(args: &DeviceArgs, params: &DeviceParams) {
    output::print_info(&format!("Unit cells: {}", params.n_cells));
    output::print_info(&format!("Lattice:    {:.1} nm", args.lattice));
    output::print_info(&format!("Radius:     {:.1} nm", args.radius));
    output::print_info(&format!("ε:          {} + {:.1e}i", args.eps_re, args.eps_im));
    output::print_info(&format!("λ₀:         {:.1} nm", args.wavelength));
}

/// 打印哈密顿量诊断信息
fn print_diagnostics(params: &DeviceParams) -> Result<()> {
    let h = hamiltonian::build(params, params.omega_0());
    let evals = eigen::eigenvalues(&h)?;
    let diag = hamiltonian::diagnostics(&h, &evals);

    output::print_header("Hamiltonian Analysis");
    output::print_info(&format!(
        "Spectral condition estimate: {:.2}",
        diag.condition_estimate
    ));
    output::print_info(&format!("Diagonal std:       {:.3e}", diag.diag_std));
    output::print_info(&format!("Off-diagonal mean:  {:.3e}", diag.offdiag_mean));
    Ok(())
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> SpectrumOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => SpectrumOutputFormat::Svg,
        Some("csv") => SpectrumOutputFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => SpectrumOutputFormat::Xy,
        _ => SpectrumOutputFormat::Png,
    }
}

/// 打印谐振峰表格
fn print_resonance_table(spectrum: &Spectrum, count: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct ResonanceRow {
        #[tabled(rename = "f (THz)")]
        freq: String,
        #[tabled(rename = "Q")]
        q: String,
        #[tabled(rename = "Δf (MHz)")]
        linewidth: String,
    }

    let rows: Vec<ResonanceRow> = spectrum
        .resonances
        .iter()
        .take(count)
        .map(|r| ResonanceRow {
            freq: format!("{:.4}", r.freq_thz),
            q: format!("{:.2e}", r.q),
            linewidth: format!("{:.2}", r.linewidth_mhz()),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("Top {} Resonances", rows.len()));
        let table = Table::new(&rows);
        println!("{}", table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_guess_format() {
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("a.svg")),
            SpectrumOutputFormat::Svg
        );
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("a.csv")),
            SpectrumOutputFormat::Csv
        );
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("a.xy")),
            SpectrumOutputFormat::Xy
        );
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("a.png")),
            SpectrumOutputFormat::Png
        );
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("noext")),
            SpectrumOutputFormat::Png
        );
    }
}
