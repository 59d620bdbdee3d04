//! 线格式标签表：每个编码值的首字节常量与标签头长度函数。
//!
//! # 模块定位（Why）
//! - 标签字节是整个格式的语法入口，集中命名可避免编码、解码两侧散落魔法数字；
//! - [`header_size`] 把“标签 → 最小头部长度”固化为纯函数，解码器据此在触碰
//!   载荷字节之前完成粗粒度的充足性预检。
//!
//! # 契约说明（What）
//! - 常量值与互操作标签表逐字节一致，不允许增删改；
//! - `0xDF`（4 字节长度映射）在表中存在，但编码器从不产生、解码器按策略拒绝。

/// nil。
pub const NIL: u8 = 0xC0;
/// 保留字节，任何合法编码都不会产生。
pub const RESERVED: u8 = 0xC1;
/// 布尔假。
pub const FALSE: u8 = 0xC2;
/// 布尔真。
pub const TRUE: u8 = 0xC3;
/// 二进制，1 字节长度。
pub const BIN8: u8 = 0xC4;
/// 二进制，2 字节长度。
pub const BIN16: u8 = 0xC5;
/// 二进制，4 字节长度。
pub const BIN32: u8 = 0xC6;
/// 扩展，1 字节长度 + 类型字节。
pub const EXT8: u8 = 0xC7;
/// 扩展，2 字节长度 + 类型字节。
pub const EXT16: u8 = 0xC8;
/// 扩展，4 字节长度 + 类型字节。
pub const EXT32: u8 = 0xC9;
/// IEEE 754 单精度浮点。
pub const FLOAT32: u8 = 0xCA;
/// IEEE 754 双精度浮点。
pub const FLOAT64: u8 = 0xCB;
/// 8 位无符号整数。
pub const UINT8: u8 = 0xCC;
/// 16 位无符号整数。
pub const UINT16: u8 = 0xCD;
/// 32 位无符号整数。
pub const UINT32: u8 = 0xCE;
/// 64 位无符号整数。
pub const UINT64: u8 = 0xCF;
/// 8 位有符号整数。
pub const INT8: u8 = 0xD0;
/// 16 位有符号整数。
pub const INT16: u8 = 0xD1;
/// 32 位有符号整数。
pub const INT32: u8 = 0xD2;
/// 64 位有符号整数。
pub const INT64: u8 = 0xD3;
/// 定长扩展，1 字节载荷。
pub const FIXEXT1: u8 = 0xD4;
/// 定长扩展，2 字节载荷。
pub const FIXEXT2: u8 = 0xD5;
/// 定长扩展，4 字节载荷。
pub const FIXEXT4: u8 = 0xD6;
/// 定长扩展，8 字节载荷。
pub const FIXEXT8: u8 = 0xD7;
/// 定长扩展，16 字节载荷。
pub const FIXEXT16: u8 = 0xD8;
/// 字符串，1 字节长度。
pub const STR8: u8 = 0xD9;
/// 字符串，2 字节长度。
pub const STR16: u8 = 0xDA;
/// 字符串，4 字节长度。
pub const STR32: u8 = 0xDB;
/// 数组，2 字节长度。
pub const ARRAY16: u8 = 0xDC;
/// 数组，4 字节长度。
pub const ARRAY32: u8 = 0xDD;
/// 映射，2 字节长度。
pub const MAP16: u8 = 0xDE;
/// 映射，4 字节长度——策略上拒绝，不予实现。
pub const MAP32: u8 = 0xDF;

/// fixmap 标签基值，低四位承载条目数（0x80–0x8F）。
pub const FIXMAP_BASE: u8 = 0x80;
/// fixarray 标签基值，低四位承载元素数（0x90–0x9F）。
pub const FIXARRAY_BASE: u8 = 0x90;
/// fixstr 标签基值，低五位承载字节长度（0xA0–0xBF）。
pub const FIXSTR_BASE: u8 = 0xA0;

/// 返回标签的最小头部长度（标签字节 + 定宽载荷或长度/类型字节）。
///
/// # 契约说明（What）
/// - 返回 `Some(n)` 表示：缓冲剩余字节（含标签本身）少于 `n` 时该值必然不完整，
///   解码器可立即发出“数据未到齐”信号而不触碰载荷；
/// - 返回 `None` 的标签（单字节立即值、fixstr/fixarray/fixmap、0xDC/0xDD 等）
///   自带语义或在各自分支内完成头部检查。
pub fn header_size(tag: u8) -> Option<usize> {
    match tag {
        BIN8 => Some(2),
        BIN16 => Some(3),
        BIN32 => Some(5),
        EXT8 => Some(3),
        EXT16 => Some(4),
        EXT32 => Some(6),
        FLOAT32 => Some(5),
        FLOAT64 => Some(9),
        UINT8 => Some(2),
        UINT16 => Some(3),
        UINT32 => Some(5),
        UINT64 => Some(9),
        INT8 => Some(2),
        INT16 => Some(3),
        INT32 => Some(5),
        INT64 => Some(9),
        FIXEXT1 => Some(3),
        FIXEXT2 => Some(4),
        FIXEXT4 => Some(6),
        FIXEXT8 => Some(10),
        FIXEXT16 => Some(18),
        STR8 => Some(2),
        STR16 => Some(3),
        STR32 => Some(5),
        MAP16 => Some(3),
        _ => None,
    }
}
