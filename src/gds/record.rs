//! # GDSII 记录级二进制写入
//!
//! 实现 GDSII 流格式的底层记录编码：大端字节序、
//! 4 字节记录头（长度 + 记录类型 + 数据类型）、excess-64 浮点。
//!
//! ## 记录布局
//! ```text
//! [u16 总长度] [u8 记录类型] [u8 数据类型] [载荷...]
//! ```
//!
//! ## 依赖关系
//! - 被 `gds/library.rs` 调用
//! - 仅使用标准库 I/O

use crate::error::{BicError, Result};

use std::io::Write;

/// 记录类型 (记录类型字节, 数据类型字节)
pub type RecordType = (u8, u8);

pub const HEADER: RecordType = (0x00, 0x02);
pub const BGNLIB: RecordType = (0x01, 0x02);
pub const LIBNAME: RecordType = (0x02, 0x06);
pub const UNITS: RecordType = (0x03, 0x05);
pub const ENDLIB: RecordType = (0x04, 0x00);
pub const BGNSTR: RecordType = (0x05, 0x02);
pub const STRNAME: RecordType = (0x06, 0x06);
pub const ENDSTR: RecordType = (0x07, 0x00);
pub const BOUNDARY: RecordType = (0x08, 0x00);
pub const AREF: RecordType = (0x0B, 0x00);
pub const LAYER: RecordType = (0x0D, 0x02);
pub const DATATYPE: RecordType = (0x0E, 0x02);
pub const XY: RecordType = (0x10, 0x03);
pub const ENDEL: RecordType = (0x11, 0x00);
pub const SNAME: RecordType = (0x12, 0x06);
pub const COLROW: RecordType = (0x13, 0x02);

/// 单条记录的最大载荷字节数（u16 长度上限减去记录头）
const MAX_PAYLOAD: usize = 65530;

/// GDSII 记录写入器
pub struct RecordWriter<W: Write> {
    sink: W,
}

impl<W: Write> RecordWriter<W> {
    /// 创建新的记录写入器
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// 写入无数据记录
    pub fn record_no_data(&mut self, rt: RecordType) -> Result<()> {
        self.write_record(rt, &[])
    }

    /// 写入 i16 数组记录
    pub fn record_i16(&mut self, rt: RecordType, values: &[i16]) -> Result<()> {
        let mut payload = Vec::with_capacity(values.len() * 2);
        for v in values {
            payload.extend_from_slice(&v.to_be_bytes());
        }
        self.write_record(rt, &payload)
    }

    /// 写入 i32 数组记录
    pub fn record_i32(&mut self, rt: RecordType, values: &[i32]) -> Result<()> {
        let mut payload = Vec::with_capacity(values.len() * 4);
        for v in values {
            payload.extend_from_slice(&v.to_be_bytes());
        }
        self.write_record(rt, &payload)
    }

    /// 写入 8 字节浮点数组记录
    pub fn record_real8(&mut self, rt: RecordType, values: &[f64]) -> Result<()> {
        let mut payload = Vec::with_capacity(values.len() * 8);
        for v in values {
            payload.extend_from_slice(&encode_real8(*v)?);
        }
        self.write_record(rt, &payload)
    }

    /// 写入 ASCII 字符串记录（奇数长度补 NUL）
    pub fn record_ascii(&mut self, rt: RecordType, s: &str) -> Result<()> {
        if !s.is_ascii() {
            return Err(BicError::GdsError(format!(
                "Non-ASCII string in GDSII record: '{}'",
                s
            )));
        }
        let mut payload = s.as_bytes().to_vec();
        if payload.len() % 2 != 0 {
            payload.push(0);
        }
        self.write_record(rt, &payload)
    }

    fn write_record(&mut self, rt: RecordType, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_PAYLOAD {
            return Err(BicError::GdsError(format!(
                "Record payload too large: {} bytes",
                payload.len()
            )));
        }
        let len = (payload.len() + 4) as u16;
        let io_err = |e: std::io::Error| BicError::GdsError(format!("I/O error: {}", e));
        self.sink.write_all(&len.to_be_bytes()).map_err(io_err)?;
        self.sink.write_all(&[rt.0, rt.1]).map_err(io_err)?;
        self.sink.write_all(payload).map_err(io_err)?;
        Ok(())
    }

    /// 结束写入，返回底层 sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// 编码 GDSII 8 字节浮点：符号位 + 7 位 excess-64 十六进制指数 + 56 位尾数
pub fn encode_real8(value: f64) -> Result<[u8; 8]> {
    if !value.is_finite() {
        return Err(BicError::GdsError(format!(
            "Cannot encode non-finite value: {}",
            value
        )));
    }
    if value == 0.0 {
        return Ok([0; 8]);
    }

    let sign = value < 0.0;
    let mut mantissa = value.abs();
    let mut exponent = 64i32;

    // 归一化到 1/16 <= m < 1
    while mantissa >= 1.0 {
        mantissa /= 16.0;
        exponent += 1;
    }
    while mantissa < 1.0 / 16.0 {
        mantissa *= 16.0;
        exponent -= 1;
    }

    let mut bits = (mantissa * 2f64.powi(56)) as u64;
    // 尾数舍入进位到 2^56 时重新归一化
    if bits >= 1 << 56 {
        bits >>= 4;
        exponent += 1;
    }

    if !(0..=127).contains(&exponent) {
        return Err(BicError::GdsError(format!(
            "Value out of GDSII real range: {}",
            value
        )));
    }
    let mut out = [0u8; 8];
    out[0] = (exponent as u8) | if sign { 0x80 } else { 0 };
    out[1..].copy_from_slice(&bits.to_be_bytes()[1..]);
    Ok(out)
}
