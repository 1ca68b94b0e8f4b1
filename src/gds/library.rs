//! # GDSII 库数据模型
//!
//! 定义 GDSII 库、单元与图形元素的内存表示，
//! 并负责序列化为完整的二进制流文件。
//!
//! ## 依赖关系
//! - 被 `gds/layout.rs` 构建，被 `commands/export.rs` 写出
//! - 使用 `gds/record.rs` 的记录写入器

use crate::error::{BicError, Result};
use crate::gds::record::{self, RecordWriter};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// GDSII 图形元素（坐标单位为数据库单位）
#[derive(Debug, Clone)]
pub enum GdsElement {
    /// 闭合多边形
    Boundary {
        layer: i16,
        datatype: i16,
        xy: Vec<(i64, i64)>,
    },
    /// 单元阵列引用
    Aref {
        cell: String,
        origin: (i64, i64),
        cols: i16,
        rows: i16,
        col_spacing: i64,
        row_spacing: i64,
    },
}

/// GDSII 单元
#[derive(Debug, Clone)]
pub struct GdsCell {
    /// 单元名
    pub name: String,
    /// 图形元素列表
    pub elements: Vec<GdsElement>,
}

impl GdsCell {
    /// 创建空单元
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            elements: Vec::new(),
        }
    }
}

/// GDSII 库
#[derive(Debug, Clone)]
pub struct GdsLibrary {
    /// 库名
    pub name: String,
    /// 用户单位 (m)，gdspy 默认 1e-6
    pub unit: f64,
    /// 数据库单位 (m)，gdspy 默认 1e-9
    pub precision: f64,
    /// 单元列表
    pub cells: Vec<GdsCell>,
}

impl GdsLibrary {
    /// 创建新库
    pub fn new(name: &str, unit: f64, precision: f64) -> Self {
        Self {
            name: name.to_string(),
            unit,
            precision,
            cells: Vec::new(),
        }
    }

    /// 序列化为 GDSII 流文件
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if self.cells.is_empty() {
            return Err(BicError::GdsError("Library has no cells".to_string()));
        }
        if self.unit <= 0.0 || self.precision <= 0.0 {
            return Err(BicError::GdsError(format!(
                "Invalid units: unit = {:e}, precision = {:e}",
                self.unit, self.precision
            )));
        }

        let file = File::create(path).map_err(|e| BicError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut w = RecordWriter::new(BufWriter::new(file));

        // 库头：版本 600 (GDSII release 6)
        w.record_i16(record::HEADER, &[600])?;
        w.record_i16(record::BGNLIB, &[0; 12])?;
        w.record_ascii(record::LIBNAME, &self.name)?;
        w.record_real8(record::UNITS, &[self.precision / self.unit, self.precision])?;

        for cell in &self.cells {
            w.record_i16(record::BGNSTR, &[0; 12])?;
            w.record_ascii(record::STRNAME, &cell.name)?;
            for element in &cell.elements {
                write_element(&mut w, element)?;
            }
            w.record_no_data(record::ENDSTR)?;
        }

        w.record_no_data(record::ENDLIB)?;

        w.into_inner()
            .flush()
            .map_err(|e| BicError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(())
    }
}

/// 写出单个图形元素
fn write_element<W: Write>(w: &mut RecordWriter<W>, element: &GdsElement) -> Result<()> {
    match element {
        GdsElement::Boundary {
            layer,
            datatype,
            xy,
        } => {
            if xy.len() < 4 {
                return Err(BicError::GdsError(format!(
                    "Boundary needs at least 4 points (closed), got {}",
                    xy.len()
                )));
            }
            if xy.first() != xy.last() {
                return Err(BicError::GdsError(
                    "Boundary polygon is not closed".to_string(),
                ));
            }
            w.record_no_data(record::BOUNDARY)?;
            w.record_i16(record::LAYER, &[*layer])?;
            w.record_i16(record::DATATYPE, &[*datatype])?;
            w.record_i32(record::XY, &flatten_xy(xy)?)?;
            w.record_no_data(record::ENDEL)?;
        }
        GdsElement::Aref {
            cell,
            origin,
            cols,
            rows,
            col_spacing,
            row_spacing,
        } => {
            if *cols < 1 || *rows < 1 {
                return Err(BicError::GdsError(format!(
                    "Array reference needs cols >= 1 and rows >= 1, got {}x{}",
                    cols, rows
                )));
            }
            // AREF 坐标：原点、列位移端点、行位移端点
            let col_end = (
                origin.0 + col_spacing * (*cols as i64),
                origin.1,
            );
            let row_end = (
                origin.0,
                origin.1 + row_spacing * (*rows as i64),
            );
            w.record_no_data(record::AREF)?;
            w.record_ascii(record::SNAME, cell)?;
            w.record_i16(record::COLROW, &[*cols, *rows])?;
            w.record_i32(record::XY, &flatten_xy(&[*origin, col_end, row_end])?)?;
            w.record_no_data(record::ENDEL)?;
        }
    }
    Ok(())
}

/// 展平坐标并检查 i32 取值范围
fn flatten_xy(xy: &[(i64, i64)]) -> Result<Vec<i32>> {
    let mut out = Vec::with_capacity(xy.len() * 2);
    for &(x, y) in xy {
        out.push(to_i32(x)?);
        out.push(to_i32(y)?);
    }
    Ok(out)
}

fn to_i32(v: i64) -> Result<i32> {
    i32::try_from(v).map_err(|_| {
        BicError::GdsError(format!("Coordinate {} does not fit in 32-bit database units", v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(layer: i16) -> GdsElement {
        GdsElement::Boundary {
            layer,
            datatype: 0,
            xy: vec![(0, 0), (100, 0), (100, 100), (0, 100), (0, 0)],
        }
    }

    #[test]
    fn test_write_minimal_library() {
        let mut lib = GdsLibrary::new("BICSIM", 1e-6, 1e-9);
        let mut cell = GdsCell::new("TOP");
        cell.elements.push(square(1));
        lib.cells.push(cell);

        let path = std::env::temp_dir().join("bicsim_test_minimal.gds");
        lib.write_to(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // HEADER 记录：长度 6、类型 0x0002、版本 600
        assert_eq!(&bytes[0..6], &[0x00, 0x06, 0x00, 0x02, 0x02, 0x58]);
        // 文件以 ENDLIB 结束
        assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0x04, 0x04, 0x00]);
        // 包含单元名
        assert!(bytes.windows(3).any(|w| w == b"TOP"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejects_open_polygon() {
        let mut lib = GdsLibrary::new("BICSIM", 1e-6, 1e-9);
        let mut cell = GdsCell::new("TOP");
        cell.elements.push(GdsElement::Boundary {
            layer: 1,
            datatype: 0,
            xy: vec![(0, 0), (100, 0), (100, 100), (0, 100)],
        });
        lib.cells.push(cell);

        let path = std::env::temp_dir().join("bicsim_test_open.gds");
        assert!(lib.write_to(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejects_empty_library() {
        let lib = GdsLibrary::new("BICSIM", 1e-6, 1e-9);
        let path = std::env::temp_dir().join("bicsim_test_empty.gds");
        assert!(lib.write_to(&path).is_err());
    }

    #[test]
    fn test_rejects_oversized_coordinates() {
        let mut lib = GdsLibrary::new("BICSIM", 1e-6, 1e-9);
        let mut cell = GdsCell::new("TOP");
        let big = i64::from(i32::MAX) + 1;
        cell.elements.push(GdsElement::Boundary {
            layer: 1,
            datatype: 0,
            xy: vec![(0, 0), (big, 0), (big, big), (0, 0)],
        });
        lib.cells.push(cell);

        let path = std::env::temp_dir().join("bicsim_test_oversize.gds");
        assert!(lib.write_to(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
