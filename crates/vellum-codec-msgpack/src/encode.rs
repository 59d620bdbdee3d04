use alloc::format;

use vellum_buffer::WireBuffer;

use crate::error::{CodecError, codes};
use crate::registry::TypeRegistry;
use crate::tags;
use crate::value::Value;

/// 整数标签可精确表达的最大绝对值（2^53 − 1），越界回退为双精度编码。
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// `Encoder` 把值的带标签二进制表示追加到缓冲。
///
/// # 设计背景（Why）
/// - 算法本身无状态：全部输入来自值与目标缓冲，注册表仅在值落入开放扩展
///   变体时被查询，因此以共享借用挂接注册表即可；
/// - 编码只向缓冲尾部追加，从不触碰读游标。
///
/// # 分发次序（How）
/// 按优先级匹配值形态：无值标记 → 布尔 → 文本 → 数值 → 空值 → 二进制 →
/// 序列 → 映射 → 扩展兜底。扩展兜底按注册顺序尝试谓词，首个命中者获胜；
/// 全部落空则以 `codec.unsupported_value` 点名肇事类型。
///
/// # 契约说明（What）
/// - **后置条件**：成功时缓冲尾部恰好追加了一个完整的带标签值；
///   失败时缓冲可能残留部分字节，调用方不应复用该缓冲继续拼帧。
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Encoder<'a> {
    /// 以注册表借用构造编码器。
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// 把 `value` 的编码追加到 `buf`，嵌套值递归处理。
    pub fn encode(&self, value: &Value, buf: &mut WireBuffer) -> Result<(), CodecError> {
        match value {
            // “无值”标记的规范编码：fixext-1 + 保留类型号 0 + 单个零载荷字节。
            Value::Undefined => {
                buf.put_u8(tags::FIXEXT1);
                buf.put_u8(0);
                buf.put_u8(0);
                Ok(())
            }
            Value::Bool(v) => {
                buf.put_u8(if *v { tags::TRUE } else { tags::FALSE });
                Ok(())
            }
            Value::Str(s) => self.encode_str(s, buf),
            Value::Integer(x) => {
                self.encode_integer(*x, buf);
                Ok(())
            }
            Value::Float(x) => {
                buf.put_u8(tags::FLOAT64);
                buf.put_f64(*x);
                Ok(())
            }
            Value::Nil => {
                buf.put_u8(tags::NIL);
                Ok(())
            }
            Value::Bin(bytes) => self.encode_bin(bytes, buf),
            Value::Array(items) => {
                let len = items.len();
                if len < 16 {
                    buf.put_u8(tags::FIXARRAY_BASE | len as u8);
                } else if len < 65536 {
                    buf.put_u8(tags::ARRAY16);
                    buf.put_u16(len as u16);
                } else {
                    let len = u32::try_from(len).map_err(|_| {
                        CodecError::new(
                            codes::LENGTH_OVERFLOW,
                            format!("array length {len} exceeds 32-bit length field"),
                        )
                    })?;
                    buf.put_u8(tags::ARRAY32);
                    buf.put_u32(len);
                }
                for item in items {
                    self.encode(item, buf)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                let len = entries.len();
                if len < 16 {
                    buf.put_u8(tags::FIXMAP_BASE | len as u8);
                } else if len < 65536 {
                    buf.put_u8(tags::MAP16);
                    buf.put_u16(len as u16);
                } else {
                    // 0xDF 属于格式族但按策略不产生：直接编码的映射条目数上限为 2^16 − 1。
                    return Err(CodecError::new(
                        codes::OVERSIZED_MAP,
                        format!("map with {len} entries exceeds the 16-bit map policy"),
                    ));
                }
                for (key, val) in entries {
                    self.encode(key, buf)?;
                    self.encode(val, buf)?;
                }
                Ok(())
            }
            Value::Extension(ext) => {
                let Some(entry) = self.registry.find_encoder(value) else {
                    return Err(CodecError::new(
                        codes::UNSUPPORTED_VALUE,
                        format!("not supported: {}", ext.type_name()),
                    ));
                };
                let payload = entry.encode(value)?;
                self.encode_ext_frame(entry.type_id(), &payload, buf)
            }
        }
    }

    /// 数值区间阶梯：按符号与量级选择最紧凑的整数标签，越出 2^53 − 1 回退双精度。
    fn encode_integer(&self, x: i64, buf: &mut WireBuffer) {
        if x >= 0 {
            if x < 128 {
                buf.put_u8(x as u8);
            } else if x < 256 {
                buf.put_u8(tags::UINT8);
                buf.put_u8(x as u8);
            } else if x < 65536 {
                buf.put_u8(tags::UINT16);
                buf.put_u16(x as u16);
            } else if x <= 0xFFFF_FFFF {
                buf.put_u8(tags::UINT32);
                buf.put_u32(x as u32);
            } else if x <= MAX_SAFE_INTEGER {
                buf.put_u8(tags::UINT64);
                buf.put_u64(x as u64);
            } else {
                buf.put_u8(tags::FLOAT64);
                buf.put_f64(x as f64);
            }
        } else if x >= -32 {
            buf.put_i8(x as i8);
        } else if x >= -128 {
            buf.put_u8(tags::INT8);
            buf.put_i8(x as i8);
        } else if x >= -32768 {
            buf.put_u8(tags::INT16);
            buf.put_i16(x as i16);
        } else if x >= i64::from(i32::MIN) {
            buf.put_u8(tags::INT32);
            buf.put_i32(x as i32);
        } else if x >= -MAX_SAFE_INTEGER {
            buf.put_u8(tags::INT64);
            buf.put_i64(x);
        } else {
            buf.put_u8(tags::FLOAT64);
            buf.put_f64(x as f64);
        }
    }

    /// 文本编码策略，亦覆盖映射中的字符串键：按字节长度选择 fixstr/str8/str16/str32。
    fn encode_str(&self, s: &str, buf: &mut WireBuffer) -> Result<(), CodecError> {
        let len = s.len();
        if len < 32 {
            // 零长文本仅写标签字节本身。
            buf.put_u8(tags::FIXSTR_BASE | len as u8);
        } else if len <= 0xFF {
            buf.put_u8(tags::STR8);
            buf.put_u8(len as u8);
        } else if len <= 0xFFFF {
            buf.put_u8(tags::STR16);
            buf.put_u16(len as u16);
        } else {
            let len = u32::try_from(len).map_err(|_| {
                CodecError::new(
                    codes::LENGTH_OVERFLOW,
                    format!("string length {len} exceeds 32-bit length field"),
                )
            })?;
            buf.put_u8(tags::STR32);
            buf.put_u32(len);
        }
        buf.put_slice(s.as_bytes());
        Ok(())
    }

    fn encode_bin(&self, bytes: &[u8], buf: &mut WireBuffer) -> Result<(), CodecError> {
        let len = bytes.len();
        if len <= 0xFF {
            buf.put_u8(tags::BIN8);
            buf.put_u8(len as u8);
        } else if len <= 0xFFFF {
            buf.put_u8(tags::BIN16);
            buf.put_u16(len as u16);
        } else {
            let len = u32::try_from(len).map_err(|_| {
                CodecError::new(
                    codes::LENGTH_OVERFLOW,
                    format!("binary length {len} exceeds 32-bit length field"),
                )
            })?;
            buf.put_u8(tags::BIN32);
            buf.put_u32(len);
        }
        buf.put_slice(bytes);
        Ok(())
    }

    /// 扩展帧头选择：载荷长度恰为 1/2/4/8/16 时用定长扩展标签，否则按长度
    /// 落入 1/2/4 字节长度的变长扩展族；随后写类型号与载荷。
    fn encode_ext_frame(
        &self,
        type_id: u8,
        payload: &[u8],
        buf: &mut WireBuffer,
    ) -> Result<(), CodecError> {
        match payload.len() {
            1 => buf.put_u8(tags::FIXEXT1),
            2 => buf.put_u8(tags::FIXEXT2),
            4 => buf.put_u8(tags::FIXEXT4),
            8 => buf.put_u8(tags::FIXEXT8),
            16 => buf.put_u8(tags::FIXEXT16),
            len if len < 256 => {
                buf.put_u8(tags::EXT8);
                buf.put_u8(len as u8);
            }
            len if len < 65536 => {
                buf.put_u8(tags::EXT16);
                buf.put_u16(len as u16);
            }
            len => {
                let len = u32::try_from(len).map_err(|_| {
                    CodecError::new(
                        codes::LENGTH_OVERFLOW,
                        format!("ext payload length {len} exceeds 32-bit length field"),
                    )
                })?;
                buf.put_u8(tags::EXT32);
                buf.put_u32(len);
            }
        }
        buf.put_u8(type_id);
        buf.put_slice(payload);
        Ok(())
    }
}
