//! # BIC 阵列版图生成
//!
//! 由器件参数构建加工版图：圆盘单元、N×1 阵列引用与对准标记。
//!
//! ## 版图结构
//! - `DISK` 单元：64 边形近似的圆盘（可配置顶点数）
//! - `TOP` 单元：DISK 的阵列引用（列距 = 晶格常数）+ 对准标记
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 调用
//! - 使用 `gds/library.rs` 的数据模型
//! - 使用 `models/params.rs` 的 DeviceParams

use crate::error::{BicError, Result};
use crate::gds::{GdsCell, GdsElement, GdsLibrary};
use crate::models::DeviceParams;

use std::f64::consts::PI;

/// 顶层单元名
pub const TOP_CELL: &str = "TOP";
/// 圆盘单元名
pub const DISK_CELL: &str = "DISK";
/// 库名
pub const LIBRARY_NAME: &str = "BICSIM";
/// 用户单位 (m)
const USER_UNIT: f64 = 1e-6;

/// 版图生成选项
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    /// 圆盘图层号
    pub disk_layer: i16,
    /// 对准标记图层号
    pub mark_layer: i16,
    /// 圆盘多边形顶点数
    pub vertices: usize,
    /// 数据库单位 (m)
    pub db_unit: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            disk_layer: 1,
            mark_layer: 2,
            vertices: 64,
            db_unit: 1e-9,
        }
    }
}

/// 由器件参数构建完整 GDSII 库
pub fn build_layout(params: &DeviceParams, opts: &LayoutOptions) -> Result<GdsLibrary> {
    params.validate()?;
    if params.disks_overlap() {
        return Err(BicError::InvalidArgument(format!(
            "Disks overlap: 2r = {:.1} nm >= a = {:.1} nm",
            2.0 * params.radius * 1e9,
            params.lattice * 1e9
        )));
    }
    if !(8..=512).contains(&opts.vertices) {
        return Err(BicError::InvalidArgument(format!(
            "Polygon vertex count must be in 8..=512, got {}",
            opts.vertices
        )));
    }
    if opts.db_unit <= 0.0 {
        return Err(BicError::InvalidArgument(format!(
            "Database unit must be positive, got {:e}",
            opts.db_unit
        )));
    }
    if params.n_cells > i16::MAX as usize {
        return Err(BicError::InvalidArgument(format!(
            "Cell count {} exceeds GDSII array limit",
            params.n_cells
        )));
    }

    let to_db = |meters: f64| -> i64 { (meters / opts.db_unit).round() as i64 };

    // 圆盘单元
    let mut disk_cell = GdsCell::new(DISK_CELL);
    disk_cell.elements.push(GdsElement::Boundary {
        layer: opts.disk_layer,
        datatype: 0,
        xy: disk_polygon(params.radius, opts.vertices, opts.db_unit),
    });

    // 顶层单元：阵列引用 + 对准标记
    let mut top_cell = GdsCell::new(TOP_CELL);
    top_cell.elements.push(GdsElement::Aref {
        cell: DISK_CELL.to_string(),
        origin: (0, 0),
        cols: params.n_cells as i16,
        rows: 1,
        col_spacing: to_db(params.lattice),
        row_spacing: 0,
    });

    // 对准标记：阵列两端各一组十字条
    let mark_size = params.lattice * 0.5;
    let array_span = params.n_cells as f64 * params.lattice;
    for x in [-params.lattice, array_span] {
        for y in [-mark_size, mark_size] {
            // 水平条
            top_cell.elements.push(rectangle(
                opts.mark_layer,
                to_db(x - mark_size / 2.0),
                to_db(y - mark_size / 20.0),
                to_db(x + mark_size / 2.0),
                to_db(y + mark_size / 20.0),
            ));
            // 垂直条
            top_cell.elements.push(rectangle(
                opts.mark_layer,
                to_db(y - mark_size / 20.0),
                to_db(x - mark_size / 2.0),
                to_db(y + mark_size / 20.0),
                to_db(x + mark_size / 2.0),
            ));
        }
    }

    let mut lib = GdsLibrary::new(LIBRARY_NAME, USER_UNIT, opts.db_unit);
    lib.cells.push(disk_cell);
    lib.cells.push(top_cell);
    Ok(lib)
}

/// 生成圆盘的闭合多边形近似（数据库单位）
fn disk_polygon(radius: f64, vertices: usize, db_unit: f64) -> Vec<(i64, i64)> {
    let mut xy: Vec<(i64, i64)> = (0..vertices)
        .map(|k| {
            let angle = 2.0 * PI * k as f64 / vertices as f64;
            (
                (radius * angle.cos() / db_unit).round() as i64,
                (radius * angle.sin() / db_unit).round() as i64,
            )
        })
        .collect();
    xy.push(xy[0]);
    xy
}

/// 构造闭合矩形边界
fn rectangle(layer: i16, x0: i64, y0: i64, x1: i64, y1: i64) -> GdsElement {
    GdsElement::Boundary {
        layer,
        datatype: 0,
        xy: vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_structure() {
        let params = DeviceParams::default();
        let opts = LayoutOptions::default();
        let lib = build_layout(&params, &opts).unwrap();

        assert_eq!(lib.name, "BICSIM");
        assert_eq!(lib.cells.len(), 2);
        assert_eq!(lib.cells[0].name, DISK_CELL);
        assert_eq!(lib.cells[1].name, TOP_CELL);

        // TOP 单元：1 个阵列引用 + 2 端 × 2 位置 × 2 方向 = 8 个标记
        assert_eq!(lib.cells[1].elements.len(), 9);
    }

    #[test]
    fn test_disk_polygon_closed_and_sized() {
        let xy = disk_polygon(202e-9, 64, 1e-9);
        assert_eq!(xy.len(), 65);
        assert_eq!(xy.first(), xy.last());
        // 首顶点在 (r, 0)，半径 202 nm = 202 个数据库单位
        assert_eq!(xy[0], (202, 0));
        // 所有顶点到圆心距离接近半径
        for &(x, y) in &xy {
            let dist = ((x * x + y * y) as f64).sqrt();
            assert!((dist - 202.0).abs() < 1.5);
        }
    }

    #[test]
    fn test_aref_matches_params() {
        let params = DeviceParams::default();
        let lib = build_layout(&params, &LayoutOptions::default()).unwrap();

        match &lib.cells[1].elements[0] {
            GdsElement::Aref {
                cell,
                cols,
                rows,
                col_spacing,
                ..
            } => {
                assert_eq!(cell, DISK_CELL);
                assert_eq!(*cols, 20);
                assert_eq!(*rows, 1);
                assert_eq!(*col_spacing, 600);
            }
            other => panic!("expected Aref, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_overlapping_disks() {
        let mut params = DeviceParams::default();
        params.radius = 320e-9;
        assert!(build_layout(&params, &LayoutOptions::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_vertex_count() {
        let params = DeviceParams::default();
        let mut opts = LayoutOptions::default();
        opts.vertices = 4;
        assert!(build_layout(&params, &opts).is_err());
    }

    #[test]
    fn test_full_write_roundtrip() {
        let params = DeviceParams::default();
        let lib = build_layout(&params, &LayoutOptions::default()).unwrap();
        let path = std::env::temp_dir().join("bicsim_test_layout.gds");
        lib.write_to(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.windows(4).any(|w| w == b"DISK"));
        assert!(bytes.windows(6).any(|w| w == b"BICSIM"));
        std::fs::remove_file(&path).ok();
    }
}
