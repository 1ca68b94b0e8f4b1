//! # 频谱图表生成
//!
//! 使用 `plotters` 库生成高质量谐振频谱图。
//!
//! ## 功能
//! - Q-频率散点图（对数 Q 轴，按 log₁₀Q 着色）
//! - 理论参考线（目标 Q 与设计频率）
//! - 参数扫描结果折线图
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 与 `commands/sweep.rs` 调用
//! - 使用 `models/resonance.rs` 的 Spectrum 结构
//! - 使用 `plotters` 渲染图表

use crate::error::{BicError, Result};
use crate::models::resonance::{Spectrum, THEORETICAL_FREQ_THZ, THEORETICAL_Q};

use plotters::prelude::*;
use std::path::Path;

/// 生成谐振频谱散点图
pub fn generate_spectrum_plot(
    spectrum: &Spectrum,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, title)?;
        root.present()
            .map_err(|e| BicError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, title)?;
        root.present()
            .map_err(|e| BicError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制频谱散点图的核心逻辑
fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spectrum: &Spectrum,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    // 确定坐标范围（包含理论参考点）
    let mut x_min = THEORETICAL_FREQ_THZ;
    let mut x_max = THEORETICAL_FREQ_THZ;
    let mut q_min = THEORETICAL_Q;
    let mut q_max = THEORETICAL_Q;
    for r in &spectrum.resonances {
        x_min = x_min.min(r.freq_thz);
        x_max = x_max.max(r.freq_thz);
        q_min = q_min.min(r.q);
        q_max = q_max.max(r.q);
    }
    let x_margin = ((x_max - x_min) * 0.05).max(0.05);
    let x_min = x_min - x_margin;
    let x_max = x_max + x_margin;
    let y_min = q_min / 2.0;
    let y_max = q_max * 2.0;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Frequency (THz)")
        .y_desc("Quality Factor Q")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    // 理论参考线：目标 Q（水平）与设计频率（垂直）
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_min, THEORETICAL_Q), (x_max, THEORETICAL_Q)],
            RED.stroke_width(1),
        )))
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(THEORETICAL_FREQ_THZ, y_min), (THEORETICAL_FREQ_THZ, y_max)],
            BLACK.stroke_width(1),
        )))
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    // 散点，按 log₁₀Q 着色
    chart
        .draw_series(spectrum.resonances.iter().map(|r| {
            Circle::new((r.freq_thz, r.q), 3, q_color(r.q, q_min, q_max).filled())
        }))
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    // 参考值标注
    let target_text = format!("Target Q = {:.1e}", THEORETICAL_Q);
    chart
        .draw_series(std::iter::once(Text::new(
            target_text,
            (x_min + x_margin * 0.5, y_max / 1.5),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

/// 生成参数扫描结果图（最优 Q vs 参数值）
pub fn generate_sweep_plot(
    data: &[(f64, f64)],
    output_path: &Path,
    title: &str,
    x_desc: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_sweep_chart(&root, data, title, x_desc)?;
        root.present()
            .map_err(|e| BicError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_sweep_chart(&root, data, title, x_desc)?;
        root.present()
            .map_err(|e| BicError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制扫描结果图的核心逻辑
fn draw_sweep_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &[(f64, f64)],
    title: &str,
    x_desc: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    let x_min = data.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let x_max = data
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let q_min = data.iter().map(|(_, q)| *q).fold(f64::INFINITY, f64::min);
    let q_max = data
        .iter()
        .map(|(_, q)| *q)
        .fold(f64::NEG_INFINITY, f64::max);
    let x_margin = ((x_max - x_min) * 0.05).max(1e-9);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            x_min - x_margin..x_max + x_margin,
            (q_min / 2.0..q_max * 2.0).log_scale(),
        )
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Best Quality Factor Q")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            data.iter().copied(),
            line_color.stroke_width(2),
        ))
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;
    chart
        .draw_series(
            data.iter()
                .map(|&(x, q)| Circle::new((x, q), 4, line_color.filled())),
        )
        .map_err(|e| BicError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

/// 按 log₁₀Q 在蓝-红之间插值着色
fn q_color(q: f64, q_min: f64, q_max: f64) -> RGBColor {
    let span = (q_max.log10() - q_min.log10()).max(1e-12);
    let t = ((q.log10() - q_min.log10()) / span).clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(0.0, 204.0), lerp(102.0, 51.0), lerp(204.0, 0.0))
}
