use alloc::{format, string::String, vec::Vec};

use vellum_buffer::WireBuffer;

use crate::error::{CodecError, codes};
use crate::registry::TypeRegistry;
use crate::tags;
use crate::value::Value;

/// `DecodeOutcome` 表示一次尝试解码的结果状态。
///
/// # 设计背景（Why）
/// - 递归下降解析中，“数据未到齐”必须与合法的 `nil` 载荷严格区分，
///   因此以双变体结果类型贯穿每一层递归，而不是用空值哨兵；
/// - `consumed` 随成功结果一并上报：复合值的子结果消费量之和加上自身头部
///   长度恰等于整值消费量，流式调用方依赖该恒等式重新切片缓冲。
///
/// # 契约说明（What）
/// - `Complete`：成功解析出一个完整值，`consumed` 为其占用的总字节数；
/// - `Incomplete`：缓冲尚未包含完整值，调用方补齐字节后应以原始缓冲的
///   新副本重试——读游标已按“前进后失败”语义部分推进，不会回滚。
#[derive(Debug)]
pub enum DecodeOutcome<T> {
    /// 成功解析出完整值。
    Complete {
        /// 解出的值。
        value: T,
        /// 该值占用的总字节数（头部 + 载荷 + 全部子值）。
        consumed: usize,
    },
    /// 数据不足，等待更多输入。
    Incomplete,
}

impl<T> DecodeOutcome<T> {
    /// 判断是否为“数据未到齐”。
    pub fn is_incomplete(&self) -> bool {
        matches!(self, DecodeOutcome::Incomplete)
    }
}

fn complete(value: Value, consumed: usize) -> DecodeOutcome<Value> {
    DecodeOutcome::Complete { value, consumed }
}

/// 载荷充足性判定：缓冲总量须覆盖“头部 + 载荷”。
fn is_valid_data_size(data_len: usize, buf_len: usize, header_len: usize) -> bool {
    header_len
        .checked_add(data_len)
        .is_some_and(|need| buf_len >= need)
}

/// `Decoder` 从缓冲当前读位置解析恰好一个带标签值。
///
/// # 设计背景（Why）
/// - 解码是平坦标签文法上的纯递归下降解析，顶层调用之间不保留任何状态，
///   唯一的“状态”是调用方持有的缓冲读游标；
/// - “数据未到齐”不在此层抛出：它以 [`DecodeOutcome::Incomplete`] 作为
///   返回值层层上传，由门面决定是否升格为错误。
///
/// # 游标语义（What）
/// - **粗探快失败**：读出标签字节后即按 [`tags::header_size`] 预检剩余量，
///   不足立即返回 `Incomplete`——标签字节（以及已读出的长度字段）不回滚；
/// - 需要精确续传的调用方必须以原始字节的新副本重试，而非已推进的缓冲；
/// - 嵌套解码中任何一层返回 `Incomplete` 都会使整个外层调用返回 `Incomplete`，
///   即使部分子元素已被消费。
///
/// # 错误分类（Trade-offs）
/// - `Incomplete` 是流式状态；`Err` 一律为终局失败（0xDF 策略拒绝、
///   未注册扩展号、保留标签、非法 UTF-8），补充字节无济于事。
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Decoder<'a> {
    /// 以注册表借用构造解码器。
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// 尝试从 `buf` 解析一个值，报告消费字节数或“数据未到齐”。
    pub fn try_decode(&self, buf: &mut WireBuffer) -> Result<DecodeOutcome<Value>, CodecError> {
        let buf_len = buf.remaining();
        let Some(first) = buf.read_u8() else {
            return Ok(DecodeOutcome::Incomplete);
        };

        if let Some(size) = tags::header_size(first)
            && buf_len < size
        {
            return Ok(DecodeOutcome::Incomplete);
        }

        match first {
            tags::NIL => Ok(complete(Value::Nil, 1)),
            tags::FALSE => Ok(complete(Value::Bool(false), 1)),
            tags::TRUE => Ok(complete(Value::Bool(true), 1)),
            tags::UINT8 => {
                let Some(v) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(i64::from(v)), 2))
            }
            tags::UINT16 => {
                let Some(v) = buf.read_u16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(i64::from(v)), 3))
            }
            tags::UINT32 => {
                let Some(v) = buf.read_u32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(i64::from(v)), 5))
            }
            tags::UINT64 => {
                let Some(v) = buf.read_u64() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                // i64 无法承载的高半区按源格式的数值语义降级为双精度。
                let value = match i64::try_from(v) {
                    Ok(x) => Value::Integer(x),
                    Err(_) => Value::Float(v as f64),
                };
                Ok(complete(value, 9))
            }
            tags::INT8 => {
                let Some(v) = buf.read_i8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(i64::from(v)), 2))
            }
            tags::INT16 => {
                let Some(v) = buf.read_i16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(i64::from(v)), 3))
            }
            tags::INT32 => {
                let Some(v) = buf.read_i32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(i64::from(v)), 5))
            }
            tags::INT64 => {
                let Some(v) = buf.read_i64() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Integer(v), 9))
            }
            tags::FLOAT32 => {
                let Some(v) = buf.read_f32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Float(f64::from(v)), 5))
            }
            tags::FLOAT64 => {
                let Some(v) = buf.read_f64() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                Ok(complete(Value::Float(v), 9))
            }
            tags::STR8 => {
                let Some(len) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_str(buf, len as usize, buf_len, 2)
            }
            tags::STR16 => {
                let Some(len) = buf.read_u16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_str(buf, len as usize, buf_len, 3)
            }
            tags::STR32 => {
                let Some(len) = buf.read_u32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_str(buf, len as usize, buf_len, 5)
            }
            tags::BIN8 => {
                let Some(len) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_bin(buf, len as usize, buf_len, 2)
            }
            tags::BIN16 => {
                let Some(len) = buf.read_u16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_bin(buf, len as usize, buf_len, 3)
            }
            tags::BIN32 => {
                let Some(len) = buf.read_u32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_bin(buf, len as usize, buf_len, 5)
            }
            tags::ARRAY16 => {
                if buf_len < 3 {
                    return Ok(DecodeOutcome::Incomplete);
                }
                let Some(len) = buf.read_u16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_array(buf, len as usize, 3)
            }
            tags::ARRAY32 => {
                if buf_len < 5 {
                    return Ok(DecodeOutcome::Incomplete);
                }
                let Some(len) = buf.read_u32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_array(buf, len as usize, 5)
            }
            tags::MAP16 => {
                let Some(len) = buf.read_u16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                self.decode_map(buf, len as usize, 3)
            }
            tags::MAP32 => Err(CodecError::new(
                codes::OVERSIZED_MAP,
                "map too big to decode (0xDF is rejected by policy)",
            )),
            tags::FIXEXT1 => self.decode_fixext(buf, 1),
            tags::FIXEXT2 => self.decode_fixext(buf, 2),
            tags::FIXEXT4 => self.decode_fixext(buf, 4),
            tags::FIXEXT8 => self.decode_fixext(buf, 8),
            tags::FIXEXT16 => self.decode_fixext(buf, 16),
            tags::EXT8 => {
                let Some(len) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                let Some(type_id) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                if !is_valid_data_size(len as usize, buf_len, 3) {
                    return Ok(DecodeOutcome::Incomplete);
                }
                self.decode_ext(buf, type_id, len as usize, 3)
            }
            tags::EXT16 => {
                let Some(len) = buf.read_u16() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                let Some(type_id) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                if !is_valid_data_size(len as usize, buf_len, 4) {
                    return Ok(DecodeOutcome::Incomplete);
                }
                self.decode_ext(buf, type_id, len as usize, 4)
            }
            tags::EXT32 => {
                let Some(len) = buf.read_u32() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                let Some(type_id) = buf.read_u8() else {
                    return Ok(DecodeOutcome::Incomplete);
                };
                if !is_valid_data_size(len as usize, buf_len, 6) {
                    return Ok(DecodeOutcome::Incomplete);
                }
                self.decode_ext(buf, type_id, len as usize, 6)
            }
            first if first & 0xF0 == tags::FIXARRAY_BASE => {
                self.decode_array(buf, (first & 0x0F) as usize, 1)
            }
            first if first & 0xF0 == tags::FIXMAP_BASE => {
                self.decode_map(buf, (first & 0x0F) as usize, 1)
            }
            first if first & 0xE0 == tags::FIXSTR_BASE => {
                self.decode_str(buf, (first & 0x1F) as usize, buf_len, 1)
            }
            first if first >= 0xE0 => Ok(complete(Value::Integer(i64::from(first as i8)), 1)),
            first if first < 0x80 => Ok(complete(Value::Integer(i64::from(first)), 1)),
            _ => Err(CodecError::new(
                codes::RESERVED_TAG,
                format!("reserved tag byte 0x{first:02X}"),
            )),
        }
    }

    fn decode_str(
        &self,
        buf: &mut WireBuffer,
        len: usize,
        buf_len: usize,
        header_len: usize,
    ) -> Result<DecodeOutcome<Value>, CodecError> {
        if !is_valid_data_size(len, buf_len, header_len) {
            return Ok(DecodeOutcome::Incomplete);
        }
        let Some(bytes) = buf.read_bytes(len) else {
            return Ok(DecodeOutcome::Incomplete);
        };
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
            CodecError::new(codes::INVALID_UTF8, "string payload is not valid UTF-8")
        })?;
        Ok(complete(Value::Str(text), header_len + len))
    }

    fn decode_bin(
        &self,
        buf: &mut WireBuffer,
        len: usize,
        buf_len: usize,
        header_len: usize,
    ) -> Result<DecodeOutcome<Value>, CodecError> {
        if !is_valid_data_size(len, buf_len, header_len) {
            return Ok(DecodeOutcome::Incomplete);
        }
        let Some(bytes) = buf.read_bytes(len) else {
            return Ok(DecodeOutcome::Incomplete);
        };
        Ok(complete(Value::Bin(bytes), header_len + len))
    }

    /// 递归解码恰好 `len` 个元素；任何一层“数据未到齐”都放弃整个数组。
    fn decode_array(
        &self,
        buf: &mut WireBuffer,
        len: usize,
        header_len: usize,
    ) -> Result<DecodeOutcome<Value>, CodecError> {
        let mut items = Vec::new();
        let mut total = 0usize;
        for _ in 0..len {
            match self.try_decode(buf)? {
                DecodeOutcome::Complete { value, consumed } => {
                    items.push(value);
                    total += consumed;
                }
                DecodeOutcome::Incomplete => return Ok(DecodeOutcome::Incomplete),
            }
        }
        Ok(complete(Value::Array(items), header_len + total))
    }

    /// 递归解码恰好 `len` 组键值对；键不限于字符串，插入顺序原样保留。
    fn decode_map(
        &self,
        buf: &mut WireBuffer,
        len: usize,
        header_len: usize,
    ) -> Result<DecodeOutcome<Value>, CodecError> {
        let mut entries = Vec::new();
        let mut total = 0usize;
        for _ in 0..len {
            let (key, key_consumed) = match self.try_decode(buf)? {
                DecodeOutcome::Complete { value, consumed } => (value, consumed),
                DecodeOutcome::Incomplete => return Ok(DecodeOutcome::Incomplete),
            };
            let (val, val_consumed) = match self.try_decode(buf)? {
                DecodeOutcome::Complete { value, consumed } => (value, consumed),
                DecodeOutcome::Incomplete => return Ok(DecodeOutcome::Incomplete),
            };
            entries.push((key, val));
            total += key_consumed + val_consumed;
        }
        Ok(complete(Value::Map(entries), header_len + total))
    }

    /// 定长扩展：头部预检已确保类型字节与载荷俱全，读出类型号后转入通用扩展路径。
    fn decode_fixext(
        &self,
        buf: &mut WireBuffer,
        size: usize,
    ) -> Result<DecodeOutcome<Value>, CodecError> {
        let Some(type_id) = buf.read_u8() else {
            return Ok(DecodeOutcome::Incomplete);
        };
        self.decode_ext(buf, type_id, size, 2)
    }

    /// 扩展分发：注册表优先，保留 id 0 的单零字节回退为“无值”，其余为终局失败。
    fn decode_ext(
        &self,
        buf: &mut WireBuffer,
        type_id: u8,
        size: usize,
        header_len: usize,
    ) -> Result<DecodeOutcome<Value>, CodecError> {
        let Some(payload) = buf.read_bytes(size) else {
            return Ok(DecodeOutcome::Incomplete);
        };
        if let Some(entry) = self.registry.find_decoder(type_id) {
            let value = entry.decode(&payload)?;
            return Ok(complete(value, header_len + size));
        }
        if type_id == 0 && payload.as_ref() == [0] {
            return Ok(complete(Value::Undefined, header_len + size));
        }
        Err(CodecError::new(
            codes::UNKNOWN_EXT_TYPE,
            format!("no decoder for extension type {type_id}"),
        ))
    }
}
