//! 约定俗成的扩展类型注册：日期（125）、53 位窗口之外的 64 位整数（119）、
//! 标准错误（126）。
//!
//! # 模块定位（Why）
//! - 这些编解码器全部通过核心的注册表 API 挂接，不享有任何特权路径，
//!   同时示范扩展点的标准用法：载荷布局自定，框架头由核心负责；
//! - 类型号沿用调用方约定：1–99 用户类型，119 任意精度整数，125 日期，
//!   126 标准错误；123/124/127 在源生态中服务于 JavaScript 集合与
//!   异常继承体系，本值模型的 `Map`/`Array` 变体已覆盖其语义，编号保留不用。
//!
//! # 载荷布局（What）
//! - `ExtDate`：8 字节大端毫秒时间戳（恰为 fixext8）；
//! - `ExtLong`：1 字节符号标志 + 8 字节大端数值，共 9 字节；
//! - `ExtFault`：2 字节大端错误码，随后 detail 与 message 以嵌套的
//!   本格式字符串编码（载荷内只含内建形态，嵌套编解码无需注册表）。

use alloc::{string::String, vec::Vec};

use vellum_buffer::WireBuffer;

use crate::decode::{DecodeOutcome, Decoder};
use crate::encode::Encoder;
use crate::error::{CodecError, codes};
use crate::registry::TypeRegistry;
use crate::serializer::Serializer;
use crate::value::{ExtValue, Value};

/// 日期扩展类型号。
pub const EXT_ID_DATE: i8 = 125;
/// 64 位整数扩展类型号。
pub const EXT_ID_LONG: i8 = 119;
/// 标准错误扩展类型号。
pub const EXT_ID_FAULT: i8 = 126;

/// `ExtDate`：以 Unix 纪元毫秒数表示的时间点。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtDate {
    millis: u64,
}

impl ExtDate {
    /// 以纪元毫秒数构造日期。
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// 返回纪元毫秒数。
    pub fn millis(&self) -> u64 {
        self.millis
    }
}

impl ExtValue for ExtDate {
    fn type_name(&self) -> &'static str {
        "ExtDate"
    }

    fn ext_eq(&self, other: &dyn ExtValue) -> bool {
        (other as &dyn core::any::Any)
            .downcast_ref::<Self>()
            .is_some_and(|o| self == o)
    }
}

/// `ExtLong`：整数标签的 2^53 窗口之外仍需精确表达的 64 位整数。
///
/// # 契约说明（What）
/// - `unsigned` 标志决定 8 字节数值按无符号还是有符号解释；
/// - 与 [`Value::Integer`] 刻意分离：走整数标签的数值不需要它，
///   它只服务于双精度回退会丢失精度的高量级场景。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtLong {
    unsigned: bool,
    bits: u64,
}

impl ExtLong {
    /// 以有符号语义构造。
    pub fn from_i64(value: i64) -> Self {
        Self {
            unsigned: false,
            bits: value as u64,
        }
    }

    /// 以无符号语义构造。
    pub fn from_u64(value: u64) -> Self {
        Self {
            unsigned: true,
            bits: value,
        }
    }

    /// 是否按无符号解释。
    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// 按有符号读取；无符号语义下高半区返回 `None`。
    pub fn as_i64(&self) -> Option<i64> {
        if self.unsigned {
            i64::try_from(self.bits).ok()
        } else {
            Some(self.bits as i64)
        }
    }

    /// 按无符号读取；有符号语义下的负值返回 `None`。
    pub fn as_u64(&self) -> Option<u64> {
        if self.unsigned || (self.bits as i64) >= 0 {
            Some(self.bits)
        } else {
            None
        }
    }
}

impl ExtValue for ExtLong {
    fn type_name(&self) -> &'static str {
        "ExtLong"
    }

    fn ext_eq(&self, other: &dyn ExtValue) -> bool {
        (other as &dyn core::any::Any)
            .downcast_ref::<Self>()
            .is_some_and(|o| self == o)
    }
}

/// `ExtFault`：携带稳定错误码、描述与细节（调用栈等）的标准错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtFault {
    code: u16,
    message: String,
    detail: String,
}

impl ExtFault {
    /// 构造标准错误。
    pub fn new(code: u16, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// 返回错误码。
    pub fn code(&self) -> u16 {
        self.code
    }

    /// 返回描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 返回细节。
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl ExtValue for ExtFault {
    fn type_name(&self) -> &'static str {
        "ExtFault"
    }

    fn ext_eq(&self, other: &dyn ExtValue) -> bool {
        (other as &dyn core::any::Any)
            .downcast_ref::<Self>()
            .is_some_and(|o| self == o)
    }
}

/// 对只含内建形态的嵌套载荷做无注册表编码。
fn plain_encode(value: &Value, buf: &mut WireBuffer) -> Result<(), CodecError> {
    let registry = TypeRegistry::new();
    Encoder::new(&registry).encode(value, buf)
}

/// 对只含内建形态的嵌套载荷做无注册表解码；载荷截断视为布局损坏。
fn plain_decode(buf: &mut WireBuffer) -> Result<Value, CodecError> {
    let registry = TypeRegistry::new();
    match Decoder::new(&registry).try_decode(buf)? {
        DecodeOutcome::Complete { value, .. } => Ok(value),
        DecodeOutcome::Incomplete => Err(CodecError::new(
            codes::EXT_PAYLOAD,
            "ext payload ends before its nested value",
        )),
    }
}

fn expect_str(value: Value) -> Result<String, CodecError> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(CodecError::new(
            codes::EXT_PAYLOAD,
            "ext payload nested value is not a string",
        )),
    }
}

/// 把约定的扩展类型注册到一个门面上。
///
/// # 契约说明（What）
/// - 注册次序即编码侧谓词的裁决次序：错误在前、日期次之、长整数最后，
///   与各类型互不重叠的谓词共同保证确定性；
/// - **前置条件**：应在首次编解码之前调用；
/// - **后置条件**：125/119/126 三个类型号的两半均可用。
pub fn register_common_types(s: &mut Serializer) -> Result<(), CodecError> {
    s.register_ext::<ExtFault, _, _>(EXT_ID_FAULT, encode_fault, decode_fault)?;
    s.register_ext::<ExtDate, _, _>(EXT_ID_DATE, encode_date, decode_date)?;
    s.register_ext::<ExtLong, _, _>(EXT_ID_LONG, encode_long, decode_long)?;
    Ok(())
}

fn encode_date(date: &ExtDate) -> Result<Vec<u8>, CodecError> {
    Ok(date.millis().to_be_bytes().to_vec())
}

fn decode_date(payload: &[u8]) -> Result<Value, CodecError> {
    let bytes: [u8; 8] = payload
        .try_into()
        .map_err(|_| CodecError::new(codes::EXT_PAYLOAD, "date payload must be 8 bytes"))?;
    Ok(Value::ext(ExtDate::from_millis(u64::from_be_bytes(bytes))))
}

fn encode_long(long: &ExtLong) -> Result<Vec<u8>, CodecError> {
    let mut payload = Vec::with_capacity(9);
    payload.push(u8::from(long.is_unsigned()));
    payload.extend_from_slice(&long.bits.to_be_bytes());
    Ok(payload)
}

fn decode_long(payload: &[u8]) -> Result<Value, CodecError> {
    if payload.len() != 9 {
        return Err(CodecError::new(
            codes::EXT_PAYLOAD,
            "long payload must be flag byte plus 8 bytes",
        ));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&payload[1..]);
    let bits = u64::from_be_bytes(bytes);
    let long = if payload[0] != 0 {
        ExtLong::from_u64(bits)
    } else {
        ExtLong::from_i64(bits as i64)
    };
    Ok(Value::ext(long))
}

fn encode_fault(fault: &ExtFault) -> Result<Vec<u8>, CodecError> {
    let mut buf = WireBuffer::new();
    buf.put_u16(fault.code());
    plain_encode(&Value::Str(String::from(fault.detail())), &mut buf)?;
    plain_encode(&Value::Str(String::from(fault.message())), &mut buf)?;
    Ok(buf.freeze().to_vec())
}

fn decode_fault(payload: &[u8]) -> Result<Value, CodecError> {
    let mut buf = WireBuffer::from_slice(payload);
    let Some(code) = buf.read_u16() else {
        return Err(CodecError::new(
            codes::EXT_PAYLOAD,
            "fault payload ends before its code",
        ));
    };
    let detail = expect_str(plain_decode(&mut buf)?)?;
    let message = expect_str(plain_decode(&mut buf)?)?;
    Ok(Value::ext(ExtFault::new(code, message, detail)))
}
