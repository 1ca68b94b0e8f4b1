//! # 频谱数据导出
//!
//! 导出谐振峰数据到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: 频率、Q、线宽的完整数据
//! - XY: 两列数据交换格式（频率, Q）
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 调用
//! - 使用 `models/resonance.rs` 的 Spectrum 结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{BicError, Result};
use crate::models::Spectrum;

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 导出谐振峰为 CSV 格式（按频率升序）
pub fn to_csv(spectrum: &Spectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(BicError::CsvError)?;

    wtr.write_record(["frequency_thz", "q", "linewidth_mhz"])
        .map_err(BicError::CsvError)?;

    let mut resonances = spectrum.resonances.clone();
    resonances.sort_by(|a, b| a.freq_thz.partial_cmp(&b.freq_thz).unwrap());

    for r in &resonances {
        wtr.write_record(&[
            format!("{:.6}", r.freq_thz),
            format!("{:.4e}", r.q),
            format!("{:.4}", r.linewidth_mhz()),
        ])
        .map_err(BicError::CsvError)?;
    }

    wtr.flush().map_err(|e| BicError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出谐振峰为 XY 格式
pub fn to_xy(spectrum: &Spectrum, title: &str, output_path: &Path) -> Result<()> {
    let map_err = |e: std::io::Error| BicError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let mut file = File::create(output_path).map_err(map_err)?;

    writeln!(file, "# BIC Resonance Spectrum: {}", title).map_err(map_err)?;
    writeln!(file, "# Columns: frequency (THz), quality factor Q").map_err(map_err)?;
    writeln!(file, "#").map_err(map_err)?;

    let mut resonances = spectrum.resonances.clone();
    resonances.sort_by(|a, b| a.freq_thz.partial_cmp(&b.freq_thz).unwrap());

    for r in &resonances {
        writeln!(file, "{:.6}\t{:.4e}", r.freq_thz, r.q).map_err(map_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resonance;

    fn sample_spectrum() -> Spectrum {
        Spectrum::from_resonances(vec![
            Resonance {
                freq_thz: 193.8,
                q: 1.8e5,
            },
            Resonance {
                freq_thz: 193.4,
                q: 3.1e5,
            },
        ])
    }

    #[test]
    fn test_csv_export_sorted_by_frequency() {
        let path = std::env::temp_dir().join("bicsim_test_spectrum.csv");
        to_csv(&sample_spectrum(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "frequency_thz,q,linewidth_mhz");
        assert!(lines[1].starts_with("193.4"));
        assert!(lines[2].starts_with("193.8"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_xy_export_has_header_comments() {
        let path = std::env::temp_dir().join("bicsim_test_spectrum.xy");
        to_xy(&sample_spectrum(), "test device", &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# BIC Resonance Spectrum: test device"));
        assert_eq!(content.lines().filter(|l| !l.starts_with('#')).count(), 2);
        std::fs::remove_file(&path).ok();
    }
}
