use alloc::{boxed::Box, format, vec::Vec};

use crate::error::{CodecError, codes};
use crate::value::Value;

/// 编码侧扩展谓词：判断一个值是否归属本条目。
pub type ExtPredicate = dyn Fn(&Value) -> bool + Send + Sync;
/// 编码侧扩展编码函数：把值转换为不含框架头的载荷字节。
pub type ExtEncodeFn = dyn Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync;
/// 解码侧扩展解码函数：把载荷字节还原为值。
pub type ExtDecodeFn = dyn Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync;

/// 编码侧注册条目：类型号 + 谓词 + 编码函数。
pub struct EncoderEntry {
    type_id: u8,
    predicate: Box<ExtPredicate>,
    encode: Box<ExtEncodeFn>,
}

impl EncoderEntry {
    /// 返回条目的扩展类型号。
    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    /// 判断值是否命中本条目的谓词。
    pub fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// 调用编码函数生成载荷字节。
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        (self.encode)(value)
    }
}

impl core::fmt::Debug for EncoderEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EncoderEntry")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

/// 解码侧注册条目：类型号 + 解码函数，每个类型号至多一条。
pub struct DecoderEntry {
    type_id: u8,
    decode: Box<ExtDecodeFn>,
}

impl DecoderEntry {
    /// 返回条目的扩展类型号。
    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    /// 调用解码函数还原载荷。
    pub fn decode(&self, payload: &[u8]) -> Result<Value, CodecError> {
        (self.decode)(payload)
    }
}

impl core::fmt::Debug for DecoderEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecoderEntry")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

/// `TypeRegistry` 维护扩展类型编解码器的开放集合。
///
/// # 设计背景（Why）
/// - 编码侧的条目是“有序谓词列表”：注册顺序即裁决顺序，首个命中的谓词获胜，
///   歧义重叠不做唯一性校验——开放扩展点的裁决权交给注册方；
/// - 解码侧按类型号查表，同号重复注册采取后写覆盖（last-writer-wins），
///   与编码侧的累积语义刻意不同。
///
/// # 生命周期与并发（What）
/// - 注册表由门面创建并独占持有，所有 `register*` 调用发生在首次编解码之前；
/// - 编解码期间注册表只读，可在不同缓冲上的并发调用间安全共享；
/// - 各操作复杂度为 O(n)，n 为注册条目数（≤ 128 的量级）。
#[derive(Debug, Default)]
pub struct TypeRegistry {
    encoders: Vec<EncoderEntry>,
    decoders: Vec<DecoderEntry>,
}

impl TypeRegistry {
    /// 创建空注册表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验扩展类型号落在 [0,127]，越界时在任何变更发生之前拒绝。
    fn checked_type_id(type_id: i8) -> Result<u8, CodecError> {
        if type_id < 0 {
            return Err(CodecError::new(
                codes::INVALID_EXT_ID,
                format!("bad ext type id: 0 <= {type_id} <= 127"),
            ));
        }
        Ok(type_id as u8)
    }

    /// 同时注册一个类型号的编码与解码两半。
    ///
    /// # 契约说明（What）
    /// - **输入**：`type_id` ∈ [0,127]；`predicate`/`encode`/`decode` 为应用提供的闭包；
    /// - **前置条件**：越界类型号在任何内部状态变更之前被拒绝；
    /// - **后置条件**：编码条目追加到有序列表尾部，解码条目按号插入或覆盖。
    pub fn register<P, E, D>(
        &mut self,
        type_id: i8,
        predicate: P,
        encode: E,
        decode: D,
    ) -> Result<(), CodecError>
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        E: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        let id = Self::checked_type_id(type_id)?;
        self.push_encoder(id, predicate, encode);
        self.put_decoder(id, decode);
        Ok(())
    }

    /// 仅注册编码半边。
    pub fn register_encoder<P, E>(
        &mut self,
        type_id: i8,
        predicate: P,
        encode: E,
    ) -> Result<(), CodecError>
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        E: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        let id = Self::checked_type_id(type_id)?;
        self.push_encoder(id, predicate, encode);
        Ok(())
    }

    /// 仅注册解码半边，同号重复注册覆盖旧条目。
    pub fn register_decoder<D>(&mut self, type_id: i8, decode: D) -> Result<(), CodecError>
    where
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        let id = Self::checked_type_id(type_id)?;
        self.put_decoder(id, decode);
        Ok(())
    }

    fn push_encoder<P, E>(&mut self, type_id: u8, predicate: P, encode: E)
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        E: Fn(&Value) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        self.encoders.push(EncoderEntry {
            type_id,
            predicate: Box::new(predicate),
            encode: Box::new(encode),
        });
    }

    fn put_decoder<D>(&mut self, type_id: u8, decode: D)
    where
        D: Fn(&[u8]) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        let decode: Box<ExtDecodeFn> = Box::new(decode);
        if let Some(entry) = self
            .decoders
            .iter_mut()
            .find(|entry| entry.type_id == type_id)
        {
            entry.decode = decode;
        } else {
            self.decoders.push(DecoderEntry { type_id, decode });
        }
    }

    /// 按注册顺序返回首个谓词命中的编码条目。
    pub fn find_encoder(&self, value: &Value) -> Option<&EncoderEntry> {
        self.encoders.iter().find(|entry| entry.matches(value))
    }

    /// 按类型号返回解码条目。
    pub fn find_decoder(&self, type_id: u8) -> Option<&DecoderEntry> {
        self.decoders.iter().find(|entry| entry.type_id == type_id)
    }
}
