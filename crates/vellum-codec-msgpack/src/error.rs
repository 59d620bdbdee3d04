use alloc::borrow::Cow;
use core::fmt;

/// 稳定错误码命名空间，遵循 `<域>.<语义>` 约定。
///
/// # 设计意图（Why）
/// - 错误码是机读分类的唯一依据：日志、指标与上层重试策略均以码值而非消息文本分派；
/// - 所有码值一经发布即冻结，新增语义只允许追加新码。
pub mod codes {
    /// 缓冲包含一个合法编码的开头，但字节尚未到齐——唯一可通过补充数据重试的条件。
    pub const INCOMPLETE_BUFFER: &str = "codec.incomplete_buffer";
    /// 编码侧遇到既非内建形态、又无任何扩展谓词命中的值。
    pub const UNSUPPORTED_VALUE: &str = "codec.unsupported_value";
    /// 解码侧遇到未注册且不属于保留缺省模式的扩展类型号。
    pub const UNKNOWN_EXT_TYPE: &str = "codec.unknown_ext_type";
    /// 扩展类型号越出 [0,127] 允许区间的注册请求。
    pub const INVALID_EXT_ID: &str = "codec.invalid_ext_id";
    /// 直接编码条目数达到 2^16 的映射：格式族保留了 0xDF 标签，但本实现按策略拒绝。
    pub const OVERSIZED_MAP: &str = "codec.oversized_map";
    /// 标签表中的保留字节（0xC1），任何合法编码都不会产生。
    pub const RESERVED_TAG: &str = "codec.reserved_tag";
    /// 字符串载荷不是合法 UTF-8。
    pub const INVALID_UTF8: &str = "codec.invalid_utf8";
    /// 长度超出线格式 4 字节长度字段的表达能力。
    pub const LENGTH_OVERFLOW: &str = "codec.length_overflow";
    /// 扩展载荷虽然完整到达，但内部结构不符合该扩展自身的布局约定。
    pub const EXT_PAYLOAD: &str = "codec.ext_payload";
}

/// `CodecError` 是编解码核心对外的统一错误形态。
///
/// # 设计背景（Why）
/// - 递归下降解析中存在两类失败：可重试的“数据未到齐”与不可重试的硬错误；
///   前者在内部以 [`DecodeOutcome::Incomplete`](crate::DecodeOutcome::Incomplete)
///   传播，仅在门面层转换为本类型（码值 [`codes::INCOMPLETE_BUFFER`]），
///   其余码值一律表示当次调用的终局失败。
/// - 需要兼容 `no_std + alloc`，因此不以 `std::error::Error` 为中心建模，
///   仅在 `std` Feature 下补充该实现。
///
/// # 契约说明（What）
/// - `code`：[`codes`] 中的稳定常量；
/// - `message`：面向排障人员的描述，可携带具体的类型名或长度数值；
/// - **后置条件**：实例可跨线程传递（`Send + Sync + 'static`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    code: &'static str,
    message: Cow<'static, str>,
}

impl CodecError {
    /// 以稳定错误码与描述构造错误。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 构造“缓冲不完整”条件，仅供门面层将 `Incomplete` 升格为错误时使用。
    pub fn incomplete() -> Self {
        Self::new(codes::INCOMPLETE_BUFFER, "incomplete buffer")
    }

    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 返回人类可读描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 判断是否为可通过补充字节重试的“缓冲不完整”条件。
    pub fn is_incomplete(&self) -> bool {
        self.code == codes::INCOMPLETE_BUFFER
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}
