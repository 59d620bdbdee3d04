use alloc::vec::Vec;

use bytes::Bytes;
use vellum_buffer::WireBuffer;

use crate::decode::{DecodeOutcome, Decoder};
use crate::encode::Encoder;
use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::value::{ExtValue, Value};

/// 默认的编码缓冲初始容量（字节）。
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// `Serializer` 是编解码门面：一个编码器、一个解码器，共享同一份注册表。
///
/// # 设计背景（Why）
/// - 注册表由门面独占持有并以借用传给两个子组件，不设全局状态；
///   需要独立扩展集合的调用方各自创建门面实例即可；
/// - 注册只发生在首次编解码之前；编解码期间注册表只读，
///   因此同一门面可在不同缓冲上的并发调用间安全共享（`&self` 即可编解码）。
///
/// # 对外操作（What）
/// - [`encode`](Self::encode)：值 → 字节；
/// - [`decode`](Self::decode)：字节 → 值，数据未到齐时以
///   `codec.incomplete_buffer` 错误上报（读游标停留在探测推进到的位置）；
/// - [`try_decode`](Self::try_decode)：把原始探测结果暴露给流式调用方，
///   由其自行决定是否等待更多字节。
#[derive(Debug, Default)]
pub struct Serializer {
    registry: TypeRegistry,
    initial_capacity: usize,
}

impl Serializer {
    /// 创建带默认缓冲容量的门面。
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// 指定编码缓冲的初始容量创建门面。
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            registry: TypeRegistry::new(),
            initial_capacity,
        }
    }

    /// 访问底层注册表。
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// 同时注册一个扩展类型号的编码与解码两半，支持链式调用。
    pub fn register<P, E, D>(
        &mut self,
        type_id: i8,
        predicate: P,
        encode: E,
        decode: D,
    ) -> Result<&mut Self, CodecError>
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        E: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.registry.register(type_id, predicate, encode, decode)?;
        Ok(self)
    }

    /// 仅注册编码半边。
    pub fn register_encoder<P, E>(
        &mut self,
        type_id: i8,
        predicate: P,
        encode: E,
    ) -> Result<&mut Self, CodecError>
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        E: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        self.registry.register_encoder(type_id, predicate, encode)?;
        Ok(self)
    }

    /// 仅注册解码半边。
    pub fn register_decoder<D>(&mut self, type_id: i8, decode: D) -> Result<&mut Self, CodecError>
    where
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.registry.register_decoder(type_id, decode)?;
        Ok(self)
    }

    /// 以具体扩展类型 `T` 注册：谓词自动按向下转型命中。
    ///
    /// # 契约说明（What）
    /// - `encode` 只需面对 `&T`，载荷字节不含框架头；
    /// - `decode` 收到完整载荷切片，应还原出携带 `T` 的 [`Value::Extension`]。
    pub fn register_ext<T, E, D>(
        &mut self,
        type_id: i8,
        encode: E,
        decode: D,
    ) -> Result<&mut Self, CodecError>
    where
        T: ExtValue,
        E: Fn(&T) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.registry.register(
            type_id,
            |value: &Value| value.downcast_ref::<T>().is_some(),
            move |value: &Value| {
                let Some(concrete) = value.downcast_ref::<T>() else {
                    // 谓词与编码函数同源，正常路径不可达；保底返回类型错误。
                    return Err(CodecError::new(
                        crate::error::codes::UNSUPPORTED_VALUE,
                        "extension encoder invoked with a foreign value",
                    ));
                };
                encode(concrete)
            },
            decode,
        )?;
        Ok(self)
    }

    /// 基于门面注册表构造无状态编码器视图。
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.registry)
    }

    /// 基于门面注册表构造无状态解码器视图。
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.registry)
    }

    /// 编码一个值并返回累积的只读字节。
    pub fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        let mut buf = WireBuffer::with_capacity(self.initial_capacity);
        self.encode_into(value, &mut buf)?;
        Ok(buf.freeze())
    }

    /// 把一个值的编码追加到调用方提供的缓冲（流式复用场景）。
    pub fn encode_into(&self, value: &Value, buf: &mut WireBuffer) -> Result<(), CodecError> {
        self.encoder().encode(value, buf)
    }

    /// 解码一个值；数据未到齐时升格为 `codec.incomplete_buffer` 错误。
    pub fn decode(&self, buf: &mut WireBuffer) -> Result<Value, CodecError> {
        match self.try_decode(buf)? {
            DecodeOutcome::Complete { value, .. } => Ok(value),
            DecodeOutcome::Incomplete => Err(CodecError::incomplete()),
        }
    }

    /// 以独立缓冲解码一段完整字节的便捷入口。
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        let mut buf = WireBuffer::from_slice(bytes);
        self.decode(&mut buf)
    }

    /// 暴露原始探测结果：`Complete { value, consumed }` 或 `Incomplete`。
    pub fn try_decode(&self, buf: &mut WireBuffer) -> Result<DecodeOutcome<Value>, CodecError> {
        self.decoder().try_decode(buf)
    }
}
